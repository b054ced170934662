//! Title and artist string cleanup before any search or LLM call.
//!
//! File tags are noisy: titles carry "(Radio Edit)" / "[Remastered]" suffixes
//! and artist fields carry featuring clauses, both of which wreck search
//! relevance. Both functions are pure and idempotent.

/// Featuring markers that end the primary-artist portion of an artist string.
/// Matched as standalone words, case-insensitively; a trailing dot
/// ("feat.") falls outside the word and needs no special casing.
const FEAT_MARKERS: [&str; 4] = ["ft", "feat", "featuring", "with"];

/// Strip trailing parenthesized/bracketed suffixes from a title, repeatedly.
///
/// "So Fresh (Radio Edit) [Remastered]" becomes "So Fresh". Stops rather
/// than consuming the whole title: a title that is nothing but a bracketed
/// group is returned as-is.
pub fn clean_title(title: &str) -> String {
    let mut current = title.trim();
    while let Some(stripped) = strip_trailing_group(current) {
        if stripped.is_empty() {
            break;
        }
        current = stripped;
    }
    current.to_string()
}

/// Remove one trailing `(...)` or `[...]` group, or return None if the
/// string doesn't end with one.
fn strip_trailing_group(s: &str) -> Option<&str> {
    let trimmed = s.trim_end();
    let open = match trimmed.chars().next_back()? {
        ')' => '(',
        ']' => '[',
        _ => return None,
    };
    let start = trimmed.rfind(open)?;
    Some(trimmed[..start].trim_end())
}

/// Truncate an artist string at the first featuring marker.
///
/// "Travis Scott ft. Drake" becomes "Travis Scott"; markers are only honored
/// as whole words, so "Swift" or "Within Temptation" survive intact. A
/// dangling separator left behind by the cut ("(", ",", "&", "-") is trimmed
/// along with whitespace.
pub fn clean_artist(artist: &str) -> String {
    let mut word_start: Option<usize> = None;

    // One extra non-word sentinel so a marker at end-of-string still closes.
    let chars = artist.char_indices().chain([(artist.len(), ' ')]);
    for (i, c) in chars {
        if c.is_alphanumeric() {
            word_start.get_or_insert(i);
            continue;
        }
        if let Some(start) = word_start.take() {
            let word = artist[start..i].to_lowercase();
            if FEAT_MARKERS.contains(&word.as_str()) {
                return artist[..start]
                    .trim_end()
                    .trim_end_matches(['(', ',', '&', '-'])
                    .trim()
                    .to_string();
            }
        }
    }

    artist.trim().to_string()
}
