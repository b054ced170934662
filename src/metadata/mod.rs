//! Audio file metadata reading and writing.
//!
//! Uses the lofty crate for format-independent tag access. Reading pulls
//! the fields the recommendation engine cares about (title, artist, year,
//! genre); writing applies a suggested genre, and optionally a year the
//! registry surfaced for an undated song.

use lofty::config::WriteOptions;
use lofty::file::TaggedFileExt;
use lofty::probe::Probe;
use lofty::tag::{Accessor, Tag, TagExt};
use std::path::Path;

use crate::error::{Error, Result};
use crate::model::SongRecord;

/// Tag fields relevant to genre recommendation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SongTags {
    pub title: String,
    pub artist: String,
    /// Empty when the file has no year tag
    pub year: String,
    /// Empty when the file has no genre tag
    pub genre: String,
}

pub fn read(path: &Path) -> Result<SongTags> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }

    // Probe the file to determine format and read tags
    let tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, format!("Failed to open for probing: {e}")))?
        .read()
        .map_err(|e| Error::metadata(path, format!("Failed to read metadata: {e}")))?;

    // Get the primary tag, or fall back to the first available tag
    let tag = tagged_file.primary_tag().or_else(|| tagged_file.first_tag());

    let title = tag
        .and_then(|t| t.title().map(|s| s.to_string()))
        .unwrap_or_default();
    let artist = tag
        .and_then(|t| t.artist().map(|s| s.to_string()))
        .unwrap_or_default();
    let year = tag
        .and_then(|t| t.year())
        .map(|y| y.to_string())
        .unwrap_or_default();
    let genre = tag
        .and_then(|t| t.genre().map(|s| s.to_string()))
        .unwrap_or_default();

    Ok(SongTags {
        title,
        artist,
        year,
        genre,
    })
}

/// Build a [`SongRecord`] from a file's tags.
pub fn read_song(path: &Path) -> Result<SongRecord> {
    let tags = read(path)?;
    Ok(SongRecord::new(path, tags.title, tags.artist, tags.year, tags.genre))
}

/// Result of a suggestion write.
#[derive(Debug, Clone)]
pub struct WriteResult {
    /// Number of fields that were updated
    pub fields_updated: usize,
}

/// Write a song's suggestion fields back into its tags.
///
/// Writes the suggested genre, and the suggested year only when the file
/// had no year of its own. A record with no suggestion is a no-op.
pub fn write_suggestion(path: &Path, song: &SongRecord) -> Result<WriteResult> {
    let Some(ref genre) = song.suggestion else {
        return Ok(WriteResult { fields_updated: 0 });
    };

    let mut tagged_file = Probe::open(path)
        .map_err(|e| Error::metadata(path, format!("Failed to open for writing: {e}")))?
        .read()
        .map_err(|e| Error::metadata(path, format!("Failed to read for tag writing: {e}")))?;

    let tag_type = tagged_file.primary_tag_type();

    // Get or create the tag
    let tag = if let Some(tag) = tagged_file.tag_mut(tag_type) {
        tag
    } else {
        tagged_file.insert_tag(Tag::new(tag_type));
        tagged_file.tag_mut(tag_type).expect("Just inserted tag")
    };

    let mut fields_updated = 0;

    tag.set_genre(genre.clone());
    fields_updated += 1;

    if song.year.trim().is_empty()
        && let Some(year) = song.suggested_year.as_ref().and_then(|y| y.parse::<u32>().ok())
    {
        tag.set_year(year);
        fields_updated += 1;
    }

    tag.save_to_path(path, WriteOptions::default())
        .map_err(|e| Error::metadata(path, format!("Failed to write tags: {e}")))?;

    Ok(WriteResult { fields_updated })
}
