//! Batch scheduler - runs the engine over many songs concurrently.
//!
//! Lookups are I/O-bound (network round trips dominate), so songs run on a
//! bounded pool of concurrent tasks. Completion order is whatever the
//! network gives us, but results surface to the caller in submission order
//! once the whole batch (or the cancelled remainder) settles, so the caller
//! applies them deterministically.
//!
//! Cancellation is cooperative: `request_stop()` flips a flag the engine
//! checks at each stage boundary. Queued songs drain as `Cancelled` without
//! network work, in-flight attempts finish without further retries, and the
//! cache is flushed on the way out either way.

use std::sync::Arc;

use futures::StreamExt;
use parking_lot::Mutex;

use super::domain::{Recommendation, StopFlag};
use super::engine::GenreEngine;
use crate::model::SongRecord;

/// Default concurrent lookups when the caller doesn't choose.
const DEFAULT_WORKERS: usize = 4;

/// Cache checkpoint interval, in completed songs. Independent of the
/// cache's own per-set auto-save counter.
const CHECKPOINT_EVERY: usize = 100;

/// Scheduler lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchState {
    Idle,
    Running,
    Completed,
    Cancelled,
}

/// Outcome of one batch run.
#[derive(Debug)]
pub struct BatchResult {
    /// One entry per submitted song, in submission order.
    pub results: Vec<Recommendation>,
    /// Songs that produced a recommendation.
    pub completed: usize,
    /// Songs skipped by cancellation.
    pub cancelled: usize,
}

/// Runs the engine across songs on a bounded worker pool.
pub struct BatchScheduler {
    engine: Arc<GenreEngine>,
    stop: StopFlag,
    workers: usize,
    state: Mutex<BatchState>,
}

impl BatchScheduler {
    /// Create a scheduler sharing the engine's stop flag.
    pub fn new(engine: Arc<GenreEngine>, workers: Option<usize>) -> Self {
        let stop = engine.stop_flag().clone();
        Self {
            engine,
            stop,
            workers: workers.unwrap_or_else(default_workers),
            state: Mutex::new(BatchState::Idle),
        }
    }

    /// The shared cooperative-stop flag (same one the engine checks).
    pub fn stop_flag(&self) -> &StopFlag {
        &self.stop
    }

    /// Request cooperative cancellation of the running batch.
    pub fn request_stop(&self) {
        self.stop.request_stop();
    }

    pub fn is_stop_requested(&self) -> bool {
        self.stop.is_stop_requested()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> BatchState {
        *self.state.lock()
    }

    /// Flush the genre cache (for caller-determined checkpoints, e.g. after
    /// a bulk tag save).
    pub fn save_cache(&self) {
        if let Err(e) = self.engine.cache().save() {
            tracing::warn!("Genre cache save failed: {}", e);
        }
    }

    /// Run the engine over `songs`, invoking `on_song` as each finishes
    /// (with the song's submission index), and returning all results in
    /// submission order once the batch settles.
    ///
    /// `on_song` is a progress signal only: it stops firing once a stop
    /// request is observed, and the ordered results in [`BatchResult`] are
    /// the ones to apply.
    pub async fn run_batch<F>(&self, songs: Vec<SongRecord>, on_song: F) -> BatchResult
    where
        F: Fn(usize, &Recommendation) + Send + Sync,
    {
        let total = songs.len();
        self.stop.reset();
        *self.state.lock() = BatchState::Running;
        tracing::info!("Batch start: {} songs, {} workers", total, self.workers);

        let mut slots: Vec<Option<Recommendation>> = (0..total).map(|_| None).collect();
        let mut completed = 0usize;
        let mut cancelled = 0usize;

        {
            let engine = &self.engine;
            let mut stream = futures::stream::iter(songs.into_iter().enumerate().map(
                |(index, song)| async move {
                    let rec = engine
                        .recommend(&song.title, &song.artist, &song.year, &song.original_genre)
                        .await;
                    (index, rec)
                },
            ))
            .buffer_unordered(self.workers);

            while let Some((index, rec)) = stream.next().await {
                match &rec {
                    Recommendation::Cancelled => cancelled += 1,
                    Recommendation::Found { .. } => {
                        completed += 1;
                        if !self.stop.is_stop_requested() {
                            on_song(index, &rec);
                        }
                        if completed % CHECKPOINT_EVERY == 0 {
                            tracing::info!("Batch progress: {}/{} songs", completed, total);
                            self.save_cache();
                        }
                    }
                }
                slots[index] = Some(rec);
            }
        }

        // Flush completed-but-unsaved entries no matter how the batch ended.
        self.save_cache();

        let was_cancelled = self.stop.is_stop_requested();
        *self.state.lock() = if was_cancelled {
            BatchState::Cancelled
        } else {
            BatchState::Completed
        };
        tracing::info!("Batch done: {} completed, {} cancelled", completed, cancelled);

        BatchResult {
            results: slots
                .into_iter()
                .map(|slot| slot.unwrap_or(Recommendation::Cancelled))
                .collect(),
            completed,
            cancelled,
        }
    }
}

/// Worker count from available parallelism, clamped to a range that is
/// polite to the external services.
fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().clamp(3, 8))
        .unwrap_or(DEFAULT_WORKERS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genre::cache::GenreCache;
    use crate::genre::domain::RecommendSource;
    use crate::genre::engine::EngineConfig;
    use crate::genre::traits::mocks::{MockCatalog, MockCompletion, MockRegistry};
    use parking_lot::Mutex as PlMutex;
    use tempfile::TempDir;

    fn song(title: &str, artist: &str, year: &str) -> SongRecord {
        SongRecord {
            path: std::path::PathBuf::from(format!("/music/{title}.mp3")),
            title: title.to_string(),
            artist: artist.to_string(),
            year: year.to_string(),
            original_genre: String::new(),
            suggestion: None,
            suggested_year: None,
        }
    }

    fn scheduler(dir: &TempDir, completion: MockCompletion) -> (BatchScheduler, Arc<GenreCache>) {
        let cache = Arc::new(GenreCache::new(dir.path().join("cache.json")));
        let engine = Arc::new(GenreEngine::new(
            EngineConfig::default(),
            Arc::new(MockRegistry::with_tags(&["pop", "dance", "house"])),
            Arc::new(MockCatalog::default()),
            Arc::new(completion),
            cache.clone(),
            StopFlag::new(),
        ));
        (BatchScheduler::new(engine, Some(3)), cache)
    }

    #[tokio::test]
    async fn test_results_in_submission_order() {
        let dir = TempDir::new().unwrap();
        let (scheduler, _cache) = scheduler(&dir, MockCompletion::with_line("pop / dance"));

        let songs: Vec<_> = (0..10)
            .map(|i| song(&format!("Song {i}"), &format!("Artist {i}"), "2010"))
            .collect();

        let result = scheduler.run_batch(songs, |_, _| {}).await;

        assert_eq!(result.results.len(), 10);
        assert_eq!(result.completed, 10);
        assert_eq!(result.cancelled, 0);
        assert_eq!(scheduler.state(), BatchState::Completed);
        for rec in &result.results {
            assert_eq!(rec.genre(), Some("Pop / Dance"));
        }
    }

    #[tokio::test]
    async fn test_per_song_callback_carries_submission_index() {
        let dir = TempDir::new().unwrap();
        let (scheduler, _cache) = scheduler(&dir, MockCompletion::with_line("pop"));

        let seen: PlMutex<Vec<usize>> = PlMutex::new(Vec::new());
        let songs: Vec<_> = (0..5).map(|i| song(&format!("S{i}"), "A", "2000")).collect();

        scheduler.run_batch(songs, |index, _| seen.lock().push(index)).await;

        let mut indices = seen.into_inner();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_stop_mid_batch_cancels_remainder() {
        let dir = TempDir::new().unwrap();
        let (scheduler, cache) = scheduler(&dir, MockCompletion::with_line("pop"));

        // Stop as soon as the first song completes: queued songs drain as
        // Cancelled without doing lookups.
        let songs: Vec<_> = (0..6).map(|i| song(&format!("S{i}"), "A", "2000")).collect();
        let result = scheduler
            .run_batch(songs, |_, _| scheduler.request_stop())
            .await;

        assert!(result.completed >= 1);
        assert_eq!(result.completed + result.cancelled, 6);
        assert!(result.cancelled > 0);
        assert_eq!(scheduler.state(), BatchState::Cancelled);

        // The cache still flushed the completed entries.
        assert!(cache.path().exists());
    }

    #[tokio::test]
    async fn test_cancelled_count_matches_cancelled_slots() {
        let dir = TempDir::new().unwrap();
        let (scheduler, _cache) = scheduler(&dir, MockCompletion::with_line("pop"));

        let songs: Vec<_> = (0..8).map(|i| song(&format!("S{i}"), "A", "2000")).collect();
        let result = scheduler
            .run_batch(songs, |_, _| scheduler.request_stop())
            .await;

        assert_eq!(result.results.len(), 8);
        let cancelled_count = result
            .results
            .iter()
            .filter(|r| **r == Recommendation::Cancelled)
            .count();
        assert_eq!(cancelled_count, result.cancelled);
    }

    #[tokio::test]
    async fn test_batch_serves_cache_on_second_run() {
        let dir = TempDir::new().unwrap();
        let (scheduler, _cache) = scheduler(&dir, MockCompletion::with_line("pop / dance"));

        let songs: Vec<_> = (0..4).map(|i| song(&format!("S{i}"), "A", "2001")).collect();
        scheduler.run_batch(songs.clone(), |_, _| {}).await;

        let result = scheduler.run_batch(songs, |_, _| {}).await;
        for rec in &result.results {
            assert!(matches!(
                rec,
                Recommendation::Found { source: RecommendSource::Cache, .. }
            ));
        }
    }

    #[test]
    fn test_default_workers_polite_range() {
        let workers = default_workers();
        assert!((3..=8).contains(&workers));
    }
}
