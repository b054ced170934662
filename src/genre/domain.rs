//! Internal domain models for genre recommendation.
//!
//! These types are OUR types - they don't change when external APIs change.
//! All external API responses get converted into these types via adapters.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Genre token used when every source comes up empty and the song
/// carries no original genre.
pub const DEFAULT_GENRE: &str = "Unknown Genre";

/// Outcome of a single recommendation request.
///
/// The engine never fails: every error path degrades into `Found` with a
/// fallback genre. `Cancelled` is not an error - it means the stop flag was
/// observed before the work could complete, and nothing was cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recommendation {
    Found {
        /// Final genre line, filtered and titlecased. Never empty.
        genre: String,
        /// First-release year surfaced by the registry, only when the
        /// caller had no year of its own.
        extracted_year: Option<String>,
        /// Which path produced the genre.
        source: RecommendSource,
    },
    Cancelled,
}

impl Recommendation {
    /// Convenience accessor for the genre line, if any.
    pub fn genre(&self) -> Option<&str> {
        match self {
            Recommendation::Found { genre, .. } => Some(genre),
            Recommendation::Cancelled => None,
        }
    }
}

/// Which path inside the engine produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendSource {
    /// Served from the persistent cache, no network work.
    Cache,
    /// Known back-catalog song, LLM asked directly from title/artist.
    LlmDirect,
    /// Registry/catalog tags curated by the LLM.
    LlmRefined,
    /// All sources empty or failed; the song's own genre tag was kept.
    OriginalTag,
    /// All sources empty or failed and no original tag; default token.
    Fallback,
}

/// Result of one logical tag lookup against an external source.
///
/// Lookups are infallible at this boundary: transport and parse failures are
/// logged inside the client and degrade to an empty tag list. `rate_limited`
/// is the one failure the engine needs to distinguish, because a rate-limited
/// source is "unusable right now" rather than "knows nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagLookup {
    /// Raw tags, first-occurrence order, already deduplicated.
    pub tags: Vec<String>,
    /// Year extracted from the earliest first-release date, if requested
    /// and available.
    pub first_release_year: Option<String>,
    /// The source kept answering 429 through the whole retry budget.
    pub rate_limited: bool,
}

impl TagLookup {
    /// A lookup that yielded nothing (distinct from rate-limited).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The rate-limited sentinel.
    pub fn rate_limited() -> Self {
        Self {
            rate_limited: true,
            ..Self::default()
        }
    }
}

/// Errors inside the source clients.
///
/// These never cross the engine boundary - the engine and the clients map
/// them into `TagLookup` / fallback genres.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SourceError {
    #[error("rate limited - retry budget exhausted")]
    RateLimited,

    #[error("request timed out")]
    Timeout,

    #[error("invalid or missing credential")]
    InvalidCredential,

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to parse response: {0}")]
    Parse(String),

    #[error("API error: {0}")]
    Api(String),
}

/// Shared cooperative-stop flag.
///
/// Cloning is cheap; all clones observe the same flag. Checked by the engine
/// at every stage boundary and by the clients before retry sleeps and
/// fan-out requests, so a stop request ends a batch after at most one
/// in-flight attempt per worker.
#[derive(Debug, Clone, Default)]
pub struct StopFlag(Arc<AtomicBool>);

impl StopFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Re-arm the flag at the start of a new batch.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Relaxed);
    }
}
