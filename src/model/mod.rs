//! Core data models.
//!
//! One explicit record type per song, carrying the tag fields the engine
//! consumes and the suggestion fields the caller applies back.

use std::path::PathBuf;

/// A song queued for genre recommendation.
///
/// `title` and `artist` must be non-empty before the record reaches the
/// engine; the CLI filters malformed files out at collection time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongRecord {
    /// Absolute path of the MP3 file
    pub path: PathBuf,
    /// Track title, raw as read from the tag
    pub title: String,
    /// Artist name, raw as read from the tag
    pub artist: String,
    /// Known release year, or empty when unknown
    pub year: String,
    /// Genre already in the tag (fallback value), or empty
    pub original_genre: String,
    /// Recommended genre, once computed
    pub suggestion: Option<String>,
    /// Year surfaced by the registry for an undated song, once computed
    pub suggested_year: Option<String>,
}

impl SongRecord {
    /// Build a record from tag fields; suggestion fields start empty.
    pub fn new(
        path: impl Into<PathBuf>,
        title: impl Into<String>,
        artist: impl Into<String>,
        year: impl Into<String>,
        original_genre: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            title: title.into(),
            artist: artist.into(),
            year: year.into(),
            original_genre: original_genre.into(),
            suggestion: None,
            suggested_year: None,
        }
    }

    /// Whether the record is well-formed enough to submit to the engine.
    pub fn is_searchable(&self) -> bool {
        !self.title.trim().is_empty() && !self.artist.trim().is_empty()
    }
}
