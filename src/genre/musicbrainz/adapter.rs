//! Adapter layer: Convert MusicBrainz DTOs to domain values
//!
//! This is the ONLY place where DTO types are converted to domain values.
//! This isolates API changes - if MusicBrainz changes their response format,
//! only this file and dto.rs need to change.

use super::dto;

/// Collect tag names from search results, first-occurrence order,
/// deduplicated case-insensitively.
pub fn collect_recording_tags(recordings: &[dto::Recording]) -> Vec<String> {
    let mut tags = Vec::new();
    for recording in recordings {
        append_tags(&mut tags, &recording.tags);
    }
    tags
}

/// Append tag names onto an existing deduplicated list.
pub fn append_tags(tags: &mut Vec<String>, new: &[dto::Tag]) {
    for tag in new {
        let name = tag.name.trim();
        if name.is_empty() {
            continue;
        }
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(name)) {
            tags.push(name.to_string());
        }
    }
}

/// Distinct credited artist IDs across the search results, in order.
pub fn credited_artist_ids(recordings: &[dto::Recording]) -> Vec<String> {
    let mut ids = Vec::new();
    for recording in recordings {
        for credit in &recording.artist_credit {
            if !ids.contains(&credit.artist.id) {
                ids.push(credit.artist.id.clone());
            }
        }
    }
    ids
}

/// Earliest first-release year across the results.
///
/// Dates come back as YYYY, YYYY-MM, or YYYY-MM-DD; only the year matters
/// here, and the earliest one is the song's original release.
pub fn earliest_release_year(recordings: &[dto::Recording]) -> Option<String> {
    recordings
        .iter()
        .filter_map(|r| r.first_release_date.as_deref())
        .filter_map(|d| d.split('-').next())
        .filter_map(|y| y.parse::<u32>().ok())
        .filter(|y| (1000..=9999).contains(y))
        .min()
        .map(|y| y.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording(id: &str, tags: &[(&str, i32)], date: Option<&str>) -> dto::Recording {
        dto::Recording {
            id: id.to_string(),
            title: format!("{id} title"),
            score: Some(100),
            first_release_date: date.map(String::from),
            tags: tags
                .iter()
                .map(|(name, count)| dto::Tag {
                    name: name.to_string(),
                    count: *count,
                })
                .collect(),
            artist_credit: vec![],
        }
    }

    #[test]
    fn test_collect_tags_dedups_preserving_order() {
        let recordings = vec![
            recording("a", &[("hip hop", 5), ("trap", 3)], None),
            recording("b", &[("Trap", 2), ("drill", 1)], None),
        ];

        let tags = collect_recording_tags(&recordings);
        assert_eq!(tags, vec!["hip hop", "trap", "drill"]);
    }

    #[test]
    fn test_collect_tags_skips_blank_names() {
        let recordings = vec![recording("a", &[("", 1), ("  ", 2), ("pop", 1)], None)];
        assert_eq!(collect_recording_tags(&recordings), vec!["pop"]);
    }

    #[test]
    fn test_earliest_release_year_picks_minimum() {
        let recordings = vec![
            recording("a", &[], Some("2015-03-01")),
            recording("b", &[], Some("2011-08-16")),
            recording("c", &[], Some("2013")),
        ];
        assert_eq!(earliest_release_year(&recordings).as_deref(), Some("2011"));
    }

    #[test]
    fn test_earliest_release_year_ignores_garbage_dates() {
        let recordings = vec![
            recording("a", &[], Some("????")),
            recording("b", &[], Some("")),
            recording("c", &[], None),
        ];
        assert_eq!(earliest_release_year(&recordings), None);
    }

    #[test]
    fn test_credited_artist_ids_dedup() {
        let mut a = recording("a", &[], None);
        a.artist_credit = vec![dto::ArtistCredit {
            artist: dto::Artist {
                id: "art-1".to_string(),
                name: "One".to_string(),
                sort_name: None,
            },
            name: None,
            joinphrase: None,
        }];
        let mut b = recording("b", &[], None);
        b.artist_credit = a.artist_credit.clone();

        assert_eq!(credited_artist_ids(&[a, b]), vec!["art-1"]);
    }
}
