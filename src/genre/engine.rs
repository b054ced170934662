//! Genre recommendation engine - orchestrates the full per-song flow.
//!
//! This is the high-level API for one song:
//! 1. Check the stop flag, then the persistent cache
//! 2. Normalize the noisy title/artist strings
//! 3. Back-catalog song (year known and at/below the cutoff): ask the LLM
//!    directly
//! 4. Otherwise: gather tags from MusicBrainz, widen to Discogs when thin,
//!    and have the LLM curate the merged list
//! 5. Filter + titlecase the LLM line, cache, return
//!
//! The engine is the error boundary: nothing below it raises to the caller.
//! Every failure path degrades to the song's own genre tag, or the default
//! token, and that outcome is cached so a consistently-failing song is not
//! re-attempted on every run.

use std::sync::Arc;

use super::cache::GenreCache;
use super::domain::{DEFAULT_GENRE, Recommendation, RecommendSource, StopFlag, TagLookup};
use super::traits::{CompletionApi, RecordingRegistryApi, ReleaseCatalogApi};
use super::{filter, normalize};

/// Engine tuning knobs.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Songs with a known year at or below this are treated as back-catalog
    /// and go straight to the LLM. A product tuning choice, not a contract.
    pub cutoff_year: i32,
    /// Registry tag count that makes the catalog lookup unnecessary.
    pub registry_sufficient_tags: usize,
    /// Token returned when every source and fallback comes up empty.
    pub default_genre: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cutoff_year: 2023,
            registry_sufficient_tags: 3,
            default_genre: DEFAULT_GENRE.to_string(),
        }
    }
}

/// Per-song genre recommendation orchestrator.
pub struct GenreEngine {
    config: EngineConfig,
    registry: Arc<dyn RecordingRegistryApi>,
    catalog: Arc<dyn ReleaseCatalogApi>,
    completion: Arc<dyn CompletionApi>,
    cache: Arc<GenreCache>,
    stop: StopFlag,
}

impl GenreEngine {
    pub fn new(
        config: EngineConfig,
        registry: Arc<dyn RecordingRegistryApi>,
        catalog: Arc<dyn ReleaseCatalogApi>,
        completion: Arc<dyn CompletionApi>,
        cache: Arc<GenreCache>,
        stop: StopFlag,
    ) -> Self {
        Self {
            config,
            registry,
            catalog,
            completion,
            cache,
            stop,
        }
    }

    /// The shared cooperative-stop flag.
    pub fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }

    /// The persistent cache backing this engine.
    pub fn cache(&self) -> &Arc<GenreCache> {
        &self.cache
    }

    /// Recommend a genre for one song. Never fails; see module docs for the
    /// decision flow and fallback chain.
    pub async fn recommend(
        &self,
        title: &str,
        artist: &str,
        year: &str,
        original_genre: &str,
    ) -> Recommendation {
        if self.stop.is_stop_requested() {
            return Recommendation::Cancelled;
        }

        if let Some(genre) = self.cache.get(title, artist, year) {
            tracing::debug!("Cache hit for {} - {}: {}", title, artist, genre);
            return Recommendation::Found {
                genre,
                extracted_year: None,
                source: RecommendSource::Cache,
            };
        }

        let clean_title = normalize::clean_title(title);
        let clean_artist = normalize::clean_artist(artist);
        tracing::info!("Genre search: {} - {} (year: {:?})", clean_title, clean_artist, year);

        // Back-catalog split: the model already knows old songs, so tag
        // gathering would only add latency and API load.
        if let Ok(y) = year.trim().parse::<i32>()
            && y <= self.config.cutoff_year
        {
            return self
                .recommend_direct(title, artist, year, &clean_title, &clean_artist, original_genre)
                .await;
        }

        self.recommend_from_sources(title, artist, year, &clean_title, &clean_artist, original_genre)
            .await
    }

    /// LLM-direct path for known back-catalog songs.
    async fn recommend_direct(
        &self,
        title: &str,
        artist: &str,
        year: &str,
        clean_title: &str,
        clean_artist: &str,
        original_genre: &str,
    ) -> Recommendation {
        if self.stop.is_stop_requested() {
            return Recommendation::Cancelled;
        }

        match self.completion.direct_recommendation(clean_title, clean_artist).await {
            Ok(line) => {
                let genre = finalize_line(&line);
                self.cache_and_return(title, artist, year, genre, None, RecommendSource::LlmDirect)
            }
            Err(e) => {
                tracing::warn!("Direct recommendation failed for {} - {}: {}", clean_title, clean_artist, e);
                self.fallback(title, artist, year, original_genre, None)
            }
        }
    }

    /// Registry + catalog + LLM-refine path for new or undated songs.
    async fn recommend_from_sources(
        &self,
        title: &str,
        artist: &str,
        year: &str,
        clean_title: &str,
        clean_artist: &str,
        original_genre: &str,
    ) -> Recommendation {
        if self.stop.is_stop_requested() {
            return Recommendation::Cancelled;
        }

        // Only ask for year extraction when the caller has none.
        let registry_lookup = if year.trim().is_empty() {
            self.registry.lookup_with_year(clean_title, clean_artist).await
        } else {
            self.registry.lookup(clean_title, clean_artist).await
        };
        if self.stop.is_stop_requested() {
            return Recommendation::Cancelled;
        }

        let extracted_year = registry_lookup.first_release_year.clone();
        let mut rate_limited = registry_lookup.rate_limited;
        let mut tags = registry_lookup.tags;

        if tags.len() < self.config.registry_sufficient_tags {
            let catalog_lookup = self.catalog.lookup(clean_title, clean_artist).await;
            if self.stop.is_stop_requested() {
                return Recommendation::Cancelled;
            }
            rate_limited |= catalog_lookup.rate_limited;
            merge_tags(&mut tags, catalog_lookup);
        } else {
            tracing::debug!("Registry tags sufficient ({}), skipping catalog", tags.len());
        }

        if tags.is_empty() {
            if rate_limited {
                tracing::warn!("All tag sources rate limited for {} - {}", clean_title, clean_artist);
            }
            return self.fallback(title, artist, year, original_genre, extracted_year);
        }

        if self.stop.is_stop_requested() {
            return Recommendation::Cancelled;
        }

        match self.completion.refine_tags(&tags).await {
            Ok(line) => {
                let genre = finalize_line(&line);
                self.cache_and_return(
                    title,
                    artist,
                    year,
                    genre,
                    extracted_year,
                    RecommendSource::LlmRefined,
                )
            }
            Err(e) => {
                tracing::warn!("Tag refine failed for {} - {}: {}", clean_title, clean_artist, e);
                self.fallback(title, artist, year, original_genre, extracted_year)
            }
        }
    }

    /// Degrade to the song's own genre tag, or the default token. The
    /// outcome is cached too, so a song that consistently fails doesn't
    /// hammer the sources on every run.
    fn fallback(
        &self,
        title: &str,
        artist: &str,
        year: &str,
        original_genre: &str,
        extracted_year: Option<String>,
    ) -> Recommendation {
        let (genre, source) = if original_genre.trim().is_empty() {
            (self.config.default_genre.clone(), RecommendSource::Fallback)
        } else {
            (original_genre.trim().to_string(), RecommendSource::OriginalTag)
        };
        self.cache_and_return(title, artist, year, genre, extracted_year, source)
    }

    fn cache_and_return(
        &self,
        title: &str,
        artist: &str,
        year: &str,
        genre: String,
        extracted_year: Option<String>,
        source: RecommendSource,
    ) -> Recommendation {
        self.cache.set(title, artist, year, &genre);
        Recommendation::Found {
            genre,
            extracted_year,
            source,
        }
    }
}

/// Post-LLM enforcement: deny-list filtering against the model's original
/// casing, then titlecasing as the final step.
fn finalize_line(line: &str) -> String {
    filter::titlecase_segments(&filter::filter_regional(line))
}

/// First-occurrence merge of catalog tags into the registry tags.
fn merge_tags(tags: &mut Vec<String>, catalog: TagLookup) {
    for tag in catalog.tags {
        if !tags.iter().any(|t| t.eq_ignore_ascii_case(&tag)) {
            tags.push(tag);
        }
    }
}
