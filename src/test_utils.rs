//! Test utilities and fixtures for genre-minder tests.
//!
//! This module provides common test helpers to reduce boilerplate:
//! temp-file-backed caches, stock song records, and an engine wired to
//! mock clients.
//!
//! # Example
//!
//! ```ignore
//! use crate::test_utils::{temp_cache, mock_song};
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let (cache, _dir) = temp_cache();
//!     let song = mock_song();
//!     // ... test logic
//! }
//! ```

use std::sync::Arc;

use tempfile::TempDir;

use crate::genre::cache::GenreCache;
use crate::genre::domain::StopFlag;
use crate::genre::engine::{EngineConfig, GenreEngine};
use crate::genre::traits::mocks::{MockCatalog, MockCompletion, MockRegistry};
use crate::model::SongRecord;

/// Creates a temporary disk-backed genre cache.
///
/// Keep the TempDir alive for the duration of your test - the cache file
/// is deleted when it drops.
pub fn temp_cache() -> (Arc<GenreCache>, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp directory");
    let cache = Arc::new(GenreCache::new(dir.path().join("genre_cache.json")));
    (cache, dir)
}

/// Creates a mock SongRecord with sensible defaults.
///
/// Customize using struct update syntax:
///
/// ```ignore
/// let song = SongRecord {
///     year: "2024".to_string(),
///     ..mock_song()
/// };
/// ```
pub fn mock_song() -> SongRecord {
    SongRecord::new("/test/path/song.mp3", "Test Track", "Test Artist", "2010", "Pop")
}

/// Creates an engine wired to the given mocks over a temp cache.
///
/// Returns the engine and the TempDir keeping its cache alive.
pub fn engine_with_mocks(
    registry: MockRegistry,
    catalog: MockCatalog,
    completion: MockCompletion,
) -> (GenreEngine, Arc<GenreCache>, TempDir) {
    let (cache, dir) = temp_cache();
    let engine = GenreEngine::new(
        EngineConfig::default(),
        Arc::new(registry),
        Arc::new(catalog),
        Arc::new(completion),
        cache.clone(),
        StopFlag::new(),
    );
    (engine, cache, dir)
}

/// Spawn a minimal HTTP server that answers every request with 429.
///
/// Returns the server's base URL and a counter of requests received, for
/// asserting exact retry attempt counts. Responses close the connection so
/// every retry shows up as a fresh request.
pub fn spawn_rate_limited_server() -> (String, Arc<std::sync::atomic::AtomicUsize>) {
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicUsize, Ordering};

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind test server");
    let addr = listener.local_addr().expect("Failed to get test server addr");
    let hits = Arc::new(AtomicUsize::new(0));

    let server_hits = hits.clone();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            server_hits.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 2048];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(
                b"HTTP/1.1 429 Too Many Requests\r\ncontent-length: 0\r\nconnection: close\r\n\r\n",
            );
        }
    });

    (format!("http://{addr}"), hits)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::genre::domain::{Recommendation, RecommendSource};

    #[test]
    fn test_mock_song_defaults() {
        let song = mock_song();
        assert_eq!(song.title, "Test Track");
        assert_eq!(song.artist, "Test Artist");
        assert!(song.is_searchable());
    }

    #[tokio::test]
    async fn test_engine_with_mocks_runs_end_to_end() {
        let (engine, cache, _dir) = engine_with_mocks(
            MockRegistry::default(),
            MockCatalog::default(),
            MockCompletion::with_line("pop / dance"),
        );

        let song = mock_song();
        let rec = engine
            .recommend(&song.title, &song.artist, &song.year, &song.original_genre)
            .await;

        assert!(matches!(
            rec,
            Recommendation::Found { source: RecommendSource::LlmDirect, .. }
        ));
        assert_eq!(cache.len(), 1);
    }
}
