//! Trait definitions for external API clients.
//!
//! These traits enable dependency injection and mocking for tests.
//! Production code uses the real client implementations, while tests
//! can substitute mock implementations.
//!
//! # Example
//!
//! ```ignore
//! use genre_minder::genre::traits::RecordingRegistryApi;
//!
//! // In production code:
//! async fn gather<T: RecordingRegistryApi>(registry: &T) {
//!     let lookup = registry.lookup("Midnight City", "M83").await;
//! }
//!
//! // In tests:
//! struct MockRegistry { ... }
//! impl RecordingRegistryApi for MockRegistry { ... }
//! ```

use async_trait::async_trait;

use super::domain::{SourceError, TagLookup};

/// Trait for recording-registry tag lookup (MusicBrainz).
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait RecordingRegistryApi: Send + Sync {
    /// Look up raw genre tags for a song.
    async fn lookup(&self, title: &str, artist: &str) -> TagLookup;

    /// Look up raw genre tags plus the earliest first-release year.
    async fn lookup_with_year(&self, title: &str, artist: &str) -> TagLookup;
}

/// Trait for catalog genre/style lookup (Discogs).
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait ReleaseCatalogApi: Send + Sync {
    /// Look up raw genre/style tags for a song.
    async fn lookup(&self, title: &str, artist: &str) -> TagLookup;
}

/// Trait for LLM genre curation (OpenAI).
///
/// Implement this trait to create mock implementations for testing.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    /// Recommend a genre line from title/artist alone.
    async fn direct_recommendation(&self, title: &str, artist: &str)
    -> Result<String, SourceError>;

    /// Curate a genre line from a gathered tag list.
    async fn refine_tags(&self, tags: &[String]) -> Result<String, SourceError>;
}

// Implement traits for real clients

#[async_trait]
impl RecordingRegistryApi for super::musicbrainz::MusicBrainzClient {
    async fn lookup(&self, title: &str, artist: &str) -> TagLookup {
        self.lookup(title, artist).await
    }

    async fn lookup_with_year(&self, title: &str, artist: &str) -> TagLookup {
        self.lookup_with_year(title, artist).await
    }
}

#[async_trait]
impl ReleaseCatalogApi for super::discogs::DiscogsClient {
    async fn lookup(&self, title: &str, artist: &str) -> TagLookup {
        self.lookup(title, artist).await
    }
}

#[async_trait]
impl CompletionApi for super::openai::OpenAiClient {
    async fn direct_recommendation(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<String, SourceError> {
        self.direct_recommendation(title, artist).await
    }

    async fn refine_tags(&self, tags: &[String]) -> Result<String, SourceError> {
        self.refine_tags(tags).await
    }
}

/// Mock clients for testing.
///
/// All mocks count their calls so tests can assert which sources a
/// scenario touched (or didn't).
#[cfg(test)]
pub mod mocks {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Mock registry that returns a predefined lookup.
    #[derive(Default)]
    pub struct MockRegistry {
        pub result: TagLookup,
        pub calls: AtomicUsize,
    }

    impl MockRegistry {
        /// A registry that yields the given tags.
        pub fn with_tags(tags: &[&str]) -> Self {
            Self {
                result: TagLookup {
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                    ..TagLookup::default()
                },
                calls: AtomicUsize::new(0),
            }
        }

        /// A registry that yields tags plus a first-release year.
        pub fn with_tags_and_year(tags: &[&str], year: &str) -> Self {
            let mut mock = Self::with_tags(tags);
            mock.result.first_release_year = Some(year.to_string());
            mock
        }

        /// A registry that always reports rate limiting.
        pub fn rate_limited() -> Self {
            Self {
                result: TagLookup::rate_limited(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl RecordingRegistryApi for MockRegistry {
        async fn lookup(&self, _title: &str, _artist: &str) -> TagLookup {
            self.calls.fetch_add(1, Ordering::Relaxed);
            let mut result = self.result.clone();
            result.first_release_year = None;
            result
        }

        async fn lookup_with_year(&self, _title: &str, _artist: &str) -> TagLookup {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.result.clone()
        }
    }

    /// Mock catalog that returns a predefined lookup.
    #[derive(Default)]
    pub struct MockCatalog {
        pub result: TagLookup,
        pub calls: AtomicUsize,
    }

    impl MockCatalog {
        pub fn with_tags(tags: &[&str]) -> Self {
            Self {
                result: TagLookup {
                    tags: tags.iter().map(|t| t.to_string()).collect(),
                    ..TagLookup::default()
                },
                calls: AtomicUsize::new(0),
            }
        }

        pub fn empty() -> Self {
            Self::default()
        }

        pub fn rate_limited() -> Self {
            Self {
                result: TagLookup::rate_limited(),
                calls: AtomicUsize::new(0),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl ReleaseCatalogApi for MockCatalog {
        async fn lookup(&self, _title: &str, _artist: &str) -> TagLookup {
            self.calls.fetch_add(1, Ordering::Relaxed);
            self.result.clone()
        }
    }

    /// Mock completion client with independent direct/refine behavior.
    pub struct MockCompletion {
        pub direct: Result<String, SourceError>,
        pub refine: Result<String, SourceError>,
        pub direct_calls: AtomicUsize,
        pub refine_calls: AtomicUsize,
    }

    impl MockCompletion {
        /// Both calls answer with the same line.
        pub fn with_line(line: &str) -> Self {
            Self {
                direct: Ok(line.to_string()),
                refine: Ok(line.to_string()),
                direct_calls: AtomicUsize::new(0),
                refine_calls: AtomicUsize::new(0),
            }
        }

        /// Both calls fail with the given error.
        pub fn failing(error: SourceError) -> Self {
            Self {
                direct: Err(error.clone()),
                refine: Err(error),
                direct_calls: AtomicUsize::new(0),
                refine_calls: AtomicUsize::new(0),
            }
        }

        pub fn direct_call_count(&self) -> usize {
            self.direct_calls.load(Ordering::Relaxed)
        }

        pub fn refine_call_count(&self) -> usize {
            self.refine_calls.load(Ordering::Relaxed)
        }
    }

    #[async_trait]
    impl CompletionApi for MockCompletion {
        async fn direct_recommendation(
            &self,
            _title: &str,
            _artist: &str,
        ) -> Result<String, SourceError> {
            self.direct_calls.fetch_add(1, Ordering::Relaxed);
            self.direct.clone()
        }

        async fn refine_tags(&self, _tags: &[String]) -> Result<String, SourceError> {
            self.refine_calls.fetch_add(1, Ordering::Relaxed);
            self.refine.clone()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_registry_counts_calls() {
            let mock = MockRegistry::with_tags(&["hip hop", "trap"]);
            let lookup = mock.lookup("T", "A").await;
            assert_eq!(lookup.tags, vec!["hip hop", "trap"]);
            assert_eq!(mock.call_count(), 1);
        }

        #[tokio::test]
        async fn test_mock_registry_year_only_on_year_lookup() {
            let mock = MockRegistry::with_tags_and_year(&["pop"], "2011");
            assert_eq!(mock.lookup("T", "A").await.first_release_year, None);
            assert_eq!(
                mock.lookup_with_year("T", "A").await.first_release_year.as_deref(),
                Some("2011")
            );
        }

        #[tokio::test]
        async fn test_mock_completion_failing() {
            let mock = MockCompletion::failing(SourceError::InvalidCredential);
            assert!(mock.direct_recommendation("T", "A").await.is_err());
            assert_eq!(mock.direct_call_count(), 1);
            assert_eq!(mock.refine_call_count(), 0);
        }
    }
}
