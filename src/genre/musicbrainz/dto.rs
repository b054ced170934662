//! MusicBrainz API Data Transfer Objects
//!
//! These types match EXACTLY what the MusicBrainz web service returns.
//! DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the musicbrainz module - convert to domain types.
//!
//! API Reference: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! We use the /recording search endpoint (tags + first release dates come
//! back inline) and the /artist lookup endpoint with `inc=tags` when a
//! recording's own tags are thin.

use serde::{Deserialize, Serialize};

/// Recording search response
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordingSearchResponse {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub recordings: Vec<Recording>,
}

/// A recording from search results
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Recording {
    /// MusicBrainz recording ID
    pub id: String,
    /// Track title
    pub title: String,
    /// Search relevance score (0-100)
    pub score: Option<u32>,
    /// Earliest release date (YYYY, YYYY-MM, or YYYY-MM-DD)
    pub first_release_date: Option<String>,
    /// Folksonomy tags (genre votes)
    #[serde(default)]
    pub tags: Vec<Tag>,
    /// Artist credits
    #[serde(default)]
    pub artist_credit: Vec<ArtistCredit>,
}

/// A folksonomy tag with its vote count
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub count: i32,
}

/// Artist credit (can be multiple for collaborations)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistCredit {
    /// The artist
    pub artist: Artist,
    /// How this artist is credited (may differ from official name)
    pub name: Option<String>,
    /// Join phrase (e.g., " & ", " feat. ")
    pub joinphrase: Option<String>,
}

/// Artist info
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Artist {
    /// MusicBrainz artist ID
    pub id: String,
    /// Official artist name
    pub name: String,
    /// Sort name (e.g., "Beatles, The")
    pub sort_name: Option<String>,
}

/// Artist lookup response (with `inc=tags`)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArtistResponse {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Error response from MusicBrainz API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub error: String,
    pub help: Option<String>,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================

#[cfg(test)]
mod contract_tests {
    use super::*;

    /// Test parsing a minimal search response
    #[test]
    fn test_parse_minimal_search() {
        let json = r#"{
            "count": 0,
            "recordings": []
        }"#;

        let response: RecordingSearchResponse =
            serde_json::from_str(json).expect("Should parse empty search");

        assert_eq!(response.count, 0);
        assert!(response.recordings.is_empty());
    }

    /// Test parsing a recording with tags and a first release date
    #[test]
    fn test_parse_recording_with_tags() {
        let json = r#"{
            "count": 1,
            "recordings": [{
                "id": "rec-123",
                "title": "Midnight City",
                "score": 100,
                "first-release-date": "2011-08-16",
                "tags": [
                    {"name": "synth-pop", "count": 7},
                    {"name": "indietronica", "count": 3}
                ],
                "artist-credit": [{
                    "artist": {
                        "id": "art-123",
                        "name": "M83",
                        "sort-name": "M83"
                    },
                    "name": "M83",
                    "joinphrase": ""
                }]
            }]
        }"#;

        let response: RecordingSearchResponse =
            serde_json::from_str(json).expect("Should parse recording with tags");

        let recording = &response.recordings[0];
        assert_eq!(recording.title, "Midnight City");
        assert_eq!(recording.first_release_date.as_deref(), Some("2011-08-16"));
        assert_eq!(recording.tags.len(), 2);
        assert_eq!(recording.tags[0].name, "synth-pop");
        assert_eq!(recording.tags[0].count, 7);
        assert_eq!(recording.artist_credit[0].artist.id, "art-123");
    }

    /// Test that recordings without tags or dates still parse
    #[test]
    fn test_parse_recording_without_optionals() {
        let json = r#"{
            "recordings": [{
                "id": "rec-456",
                "title": "Obscure B-Side"
            }]
        }"#;

        let response: RecordingSearchResponse =
            serde_json::from_str(json).expect("Should parse sparse recording");

        let recording = &response.recordings[0];
        assert!(recording.tags.is_empty());
        assert!(recording.first_release_date.is_none());
        assert!(recording.artist_credit.is_empty());
    }

    /// Test parsing an artist lookup with tags
    #[test]
    fn test_parse_artist_with_tags() {
        let json = r#"{
            "id": "art-123",
            "name": "M83",
            "tags": [
                {"name": "shoegaze", "count": 5},
                {"name": "dream pop", "count": 4}
            ]
        }"#;

        let artist: ArtistResponse = serde_json::from_str(json).expect("Should parse artist");
        assert_eq!(artist.name, "M83");
        assert_eq!(artist.tags.len(), 2);
    }

    /// Test parsing error response
    #[test]
    fn test_parse_error_response() {
        let json = r#"{
            "error": "Not Found",
            "help": "For usage, please see: https://musicbrainz.org/doc/MusicBrainz_API"
        }"#;

        let error: ApiError = serde_json::from_str(json).expect("Should parse error");
        assert_eq!(error.error, "Not Found");
        assert!(error.help.is_some());
    }
}
