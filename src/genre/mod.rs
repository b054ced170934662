//! Genre recommendation module - suggests genres from external services.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Internal types that represent our business logic
//! - **API DTOs** (`musicbrainz/dto.rs`, `discogs/dto.rs`, `openai/dto.rs`) - Exact API response shapes
//! - **Adapters** - Convert DTOs to domain values
//! - **Clients** - HTTP clients for external APIs
//! - **Normalize / Filter** - Pure string cleanup before and after the lookups
//! - **Engine** - High-level orchestration of the per-song flow
//! - **Cache** - Persistent (title, artist, year) -> genre store
//! - **Batch** - Bounded-concurrency scheduling with cooperative cancellation
//!
//! This decoupling means:
//! 1. API changes don't ripple through our codebase
//! 2. We can test API contracts independently
//! 3. We can swap providers without changing business logic
//!
//! # Usage
//!
//! ```ignore
//! use genre::{EngineConfig, GenreEngine, StopFlag};
//!
//! let stop = StopFlag::new();
//! let engine = GenreEngine::new(
//!     EngineConfig::default(),
//!     Arc::new(MusicBrainzClient::new(stop.clone())),
//!     Arc::new(DiscogsClient::new(token, stop.clone())),
//!     Arc::new(OpenAiClient::new(api_key, stop.clone())),
//!     Arc::new(GenreCache::default_location()),
//!     stop,
//! );
//!
//! let rec = engine.recommend("Midnight City", "M83", "2011", "").await;
//! ```

pub mod batch;
pub mod cache;
pub mod discogs;
pub mod domain;
pub mod engine;
pub mod filter;
pub mod musicbrainz;
pub mod normalize;
pub mod openai;
pub mod traits;

pub use batch::{BatchResult, BatchScheduler, BatchState};
pub use cache::GenreCache;
pub use discogs::DiscogsClient;
pub use domain::{DEFAULT_GENRE, Recommendation, RecommendSource, SourceError, StopFlag, TagLookup};
pub use engine::{EngineConfig, GenreEngine};
pub use musicbrainz::MusicBrainzClient;
pub use openai::OpenAiClient;
