//! MusicBrainz HTTP client
//!
//! Handles communication with the MusicBrainz web service.
//! See: https://musicbrainz.org/doc/MusicBrainz_API
//!
//! IMPORTANT: MusicBrainz requires a User-Agent header and rate limits to
//! 1 req/sec, hence the courtesy pause after every successful logical call.

use std::time::Duration;

use serde::de::DeserializeOwned;

use super::{adapter, dto};
use crate::genre::domain::{SourceError, StopFlag, TagLookup};

/// User agent string - MusicBrainz requires this
const USER_AGENT: &str = concat!(
    "GenreMinder/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/genre-minder)"
);

/// Recordings fetched per search
const SEARCH_LIMIT: u32 = 5;

/// Tag count at which we stop widening the search
const ENOUGH_TAGS: usize = 5;

/// Per-artist tag lookups are capped so one search can't fan out unboundedly
const ARTIST_LOOKUP_CAP: usize = 5;

/// Per-request timeout; a hung request must not stall a whole batch
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Backoff delays between rate-limited attempts
const RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(2),
    Duration::from_secs(4),
    Duration::from_secs(8),
];

/// Pause after a successful logical call, per service etiquette
const COURTESY_DELAY: Duration = Duration::from_millis(1100);

/// MusicBrainz API client
pub struct MusicBrainzClient {
    http_client: reqwest::Client,
    base_url: String,
    stop: StopFlag,
    retry_delays: Vec<Duration>,
    courtesy_delay: Duration,
}

impl MusicBrainzClient {
    /// Create a new client
    pub fn new(stop: StopFlag) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: "https://musicbrainz.org/ws/2".to_string(),
            stop,
            retry_delays: RETRY_DELAYS.to_vec(),
            courtesy_delay: COURTESY_DELAY,
        }
    }

    /// Create a client for testing with custom base URL and no delays
    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>, stop: StopFlag) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            base_url: base_url.into(),
            stop,
            retry_delays: vec![Duration::ZERO; 3],
            courtesy_delay: Duration::ZERO,
        }
    }

    /// Look up raw genre tags for a song.
    pub async fn lookup(&self, title: &str, artist: &str) -> TagLookup {
        self.lookup_inner(title, artist, false).await
    }

    /// Look up raw genre tags plus the earliest first-release year.
    pub async fn lookup_with_year(&self, title: &str, artist: &str) -> TagLookup {
        self.lookup_inner(title, artist, true).await
    }

    async fn lookup_inner(&self, title: &str, artist: &str, want_year: bool) -> TagLookup {
        let response = match self.send_search_request(title, artist).await {
            Ok(response) => response,
            Err(SourceError::RateLimited) => return TagLookup::rate_limited(),
            Err(e) => {
                tracing::warn!("MusicBrainz search failed for {} - {}: {}", title, artist, e);
                return TagLookup::empty();
            }
        };

        let mut tags = adapter::collect_recording_tags(&response.recordings);
        let first_release_year = if want_year {
            adapter::earliest_release_year(&response.recordings)
        } else {
            None
        };

        // Thin yield: widen to per-artist tags until we have enough.
        if tags.len() < ENOUGH_TAGS {
            let artist_ids = adapter::credited_artist_ids(&response.recordings);
            for artist_id in artist_ids.iter().take(ARTIST_LOOKUP_CAP) {
                if tags.len() >= ENOUGH_TAGS || self.stop.is_stop_requested() {
                    break;
                }
                match self.send_artist_request(artist_id).await {
                    Ok(artist_response) => adapter::append_tags(&mut tags, &artist_response.tags),
                    Err(SourceError::RateLimited) => break,
                    Err(e) => {
                        tracing::debug!("MusicBrainz artist tag lookup {} failed: {}", artist_id, e);
                    }
                }
            }
        }

        self.courtesy_pause().await;
        TagLookup {
            tags,
            first_release_year,
            rate_limited: false,
        }
    }

    async fn send_search_request(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<dto::RecordingSearchResponse, SourceError> {
        let query = format!("recording:\"{}\" AND artist:\"{}\"", title, artist);
        let url = format!(
            "{}/recording?query={}&fmt=json&limit={}",
            self.base_url,
            urlencoding::encode(&query),
            SEARCH_LIMIT
        );
        self.get_json(&url).await
    }

    async fn send_artist_request(&self, artist_id: &str) -> Result<dto::ArtistResponse, SourceError> {
        let url = format!("{}/artist/{}?fmt=json&inc=tags", self.base_url, artist_id);
        self.get_json(&url).await
    }

    /// GET with JSON decode and the shared 429 retry/backoff loop.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let attempts = self.retry_delays.len();
        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            let response = self
                .http_client
                .get(url)
                .send()
                .await
                .map_err(map_transport_error)?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!(
                    "MusicBrainz rate limited (attempt {}/{}), backing off {:?}",
                    attempt + 1,
                    attempts,
                    delay
                );
                if self.stop.is_stop_requested() {
                    return Err(SourceError::RateLimited);
                }
                tokio::time::sleep(*delay).await;
                continue;
            }

            if !status.is_success() {
                if let Ok(error) = response.json::<dto::ApiError>().await {
                    return Err(SourceError::Api(error.error));
                }
                return Err(SourceError::Network(format!(
                    "HTTP {}: {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown")
                )));
            }

            return response
                .json::<T>()
                .await
                .map_err(|e| SourceError::Parse(e.to_string()));
        }

        Err(SourceError::RateLimited)
    }

    async fn courtesy_pause(&self) {
        if !self.stop.is_stop_requested() {
            tokio::time::sleep(self.courtesy_delay).await;
        }
    }
}

fn map_transport_error(e: reqwest::Error) -> SourceError {
    if e.is_timeout() {
        SourceError::Timeout
    } else {
        SourceError::Network(e.to_string())
    }
}
