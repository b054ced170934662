//! Persistent genre cache.
//!
//! Maps a normalized (title, artist, year) triple to the final genre string
//! so repeated runs over the same library cost no network or API calls.
//! Backed by a single JSON file, loaded eagerly at construction; a missing
//! or corrupt file is a cold start, never a crash.
//!
//! Many batch workers `set()` concurrently: the in-memory map sits behind a
//! RwLock, and only the serialize-to-disk step takes the save mutex. Writes
//! go to a temp file and are renamed into place, so the file on disk is
//! never half-written.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

/// How many `set` calls between automatic saves. Bounds data loss on an
/// abrupt exit to at most this many uncommitted entries.
const AUTOSAVE_EVERY: usize = 50;

/// On-disk shape of the cache file.
#[derive(Debug, Default, Serialize, Deserialize)]
struct CacheFile {
    /// RFC 3339 timestamp of the last save.
    #[serde(default)]
    saved_at: String,
    #[serde(default)]
    entries: HashMap<String, String>,
}

/// Disk-backed genre cache.
pub struct GenreCache {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
    sets_since_save: AtomicUsize,
    save_lock: Mutex<()>,
    autosave_every: usize,
}

/// Cache persistence errors. Lookups and inserts never fail; only `save`
/// reports problems, and callers are expected to log rather than propagate.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write cache to {0}: {1}")]
    Write(PathBuf, std::io::Error),

    #[error("Failed to rename temp file {0} to {1}: {2}")]
    Rename(PathBuf, PathBuf, std::io::Error),
}

impl GenreCache {
    /// Open (or cold-start) a cache at the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = load_entries(&path);
        Self {
            path,
            entries: RwLock::new(entries),
            sets_since_save: AtomicUsize::new(0),
            save_lock: Mutex::new(()),
            autosave_every: AUTOSAVE_EVERY,
        }
    }

    /// Cache in the default location (user cache directory).
    pub fn default_location() -> Self {
        let path = dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from(".cache"))
            .join("genre-minder")
            .join("genre_cache.json");
        Self::new(path)
    }

    /// Look up the cached genre for a song.
    pub fn get(&self, title: &str, artist: &str, year: &str) -> Option<String> {
        let key = cache_key(title, artist, year);
        self.entries.read().get(&key).cloned()
    }

    /// Store a genre for a song, overwriting any previous value.
    ///
    /// Every [`AUTOSAVE_EVERY`]th set also flushes to disk; a failed
    /// auto-save is logged and the entry stays in memory for the next flush.
    pub fn set(&self, title: &str, artist: &str, year: &str, genre: &str) {
        let key = cache_key(title, artist, year);
        self.entries.write().insert(key, genre.to_string());

        let sets = self.sets_since_save.fetch_add(1, Ordering::Relaxed) + 1;
        if sets % self.autosave_every == 0
            && let Err(e) = self.save()
        {
            tracing::warn!("Genre cache auto-save failed: {}", e);
        }
    }

    /// Flush the cache to disk (write-to-temp, then atomic rename).
    pub fn save(&self) -> Result<(), CacheError> {
        let _guard = self.save_lock.lock();

        let file = CacheFile {
            saved_at: chrono::Utc::now().to_rfc3339(),
            entries: self.entries.read().clone(),
        };
        let contents = serde_json::to_string_pretty(&file)?;

        if let Some(dir) = self.path.parent() {
            // Best effort; the write below surfaces a missing directory.
            let _ = std::fs::create_dir_all(dir);
        }

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &contents)
            .map_err(|e| CacheError::Write(temp_path.clone(), e))?;
        std::fs::rename(&temp_path, &self.path)
            .map_err(|e| CacheError::Rename(temp_path, self.path.clone(), e))?;

        tracing::debug!("Saved {} genre cache entries to {:?}", file.entries.len(), self.path);
        Ok(())
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop all entries (in memory and on disk).
    pub fn clear(&self) -> Result<(), CacheError> {
        self.entries.write().clear();
        self.save()
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Cache key for a (title, artist, year) triple.
///
/// Two songs with the same audible identity but different punctuation,
/// casing, or whitespace must collide to the same key.
pub fn cache_key(title: &str, artist: &str, year: &str) -> String {
    format!(
        "{}|{}|{}",
        normalize_component(title),
        normalize_component(artist),
        year.trim()
    )
}

/// Lowercase, strip everything that is neither a word character nor
/// whitespace, collapse whitespace runs.
fn normalize_component(s: &str) -> String {
    let cleaned: String = s
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn load_entries(path: &Path) -> HashMap<String, String> {
    if !path.exists() {
        tracing::info!("No genre cache at {:?}, starting empty", path);
        return HashMap::new();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str::<CacheFile>(&contents) {
            Ok(file) => {
                tracing::info!("Loaded {} genre cache entries from {:?}", file.entries.len(), path);
                file.entries
            }
            Err(e) => {
                tracing::error!("Corrupt genre cache at {:?}: {} - starting empty", path, e);
                HashMap::new()
            }
        },
        Err(e) => {
            tracing::error!("Failed to read genre cache at {:?}: {} - starting empty", path, e);
            HashMap::new()
        }
    }
}
