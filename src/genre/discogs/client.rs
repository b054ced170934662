//! Discogs HTTP client
//!
//! Handles communication with the Discogs database-search API.
//! See: https://www.discogs.com/developers/
//!
//! Searches releases first (genres + styles), then falls back to an
//! artist-level search when releases yield too few distinct tags.
//! Requires a personal access token.

use std::time::Duration;

use super::{adapter, dto};
use crate::genre::domain::{SourceError, StopFlag, TagLookup};

const USER_AGENT: &str = concat!(
    "GenreMinder/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/genre-minder)"
);

/// Release hits fetched per search
const RELEASE_PER_PAGE: u32 = 5;

/// Artist hits fetched in the fallback search
const ARTIST_PER_PAGE: u32 = 2;

/// Below this many distinct tags from releases, the artist fallback runs
const RELEASE_TAG_FLOOR: usize = 3;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Backoff delays between rate-limited attempts
const RETRY_DELAYS: [Duration; 3] = [
    Duration::from_secs(3),
    Duration::from_secs(6),
    Duration::from_secs(12),
];

/// Pause after a successful logical call, per service etiquette
const COURTESY_DELAY: Duration = Duration::from_secs(2);

/// Discogs API client
pub struct DiscogsClient {
    token: String,
    http_client: reqwest::Client,
    base_url: String,
    stop: StopFlag,
    retry_delays: Vec<Duration>,
    courtesy_delay: Duration,
}

impl DiscogsClient {
    /// Create a new client with the given access token
    pub fn new(token: impl Into<String>, stop: StopFlag) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            token: token.into(),
            http_client,
            base_url: "https://api.discogs.com".to_string(),
            stop,
            retry_delays: RETRY_DELAYS.to_vec(),
            courtesy_delay: COURTESY_DELAY,
        }
    }

    /// Create a client for testing with custom base URL and no delays
    #[cfg(test)]
    pub fn with_base_url(
        token: impl Into<String>,
        base_url: impl Into<String>,
        stop: StopFlag,
    ) -> Self {
        Self {
            token: token.into(),
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            stop,
            retry_delays: vec![Duration::ZERO; 3],
            courtesy_delay: Duration::ZERO,
        }
    }

    /// Look up raw genre/style tags for a song.
    pub async fn lookup(&self, title: &str, artist: &str) -> TagLookup {
        let mut tags = Vec::new();

        match self.send_search_request(&format!("{} {}", title, artist), "release", RELEASE_PER_PAGE).await
        {
            Ok(response) => adapter::append_result_tags(&mut tags, &response.results),
            Err(SourceError::RateLimited) => return TagLookup::rate_limited(),
            Err(e) => {
                tracing::warn!("Discogs release search failed for {} - {}: {}", title, artist, e);
            }
        }

        // Releases too thin: try the artist itself, unless we're stopping.
        if tags.len() < RELEASE_TAG_FLOOR && !self.stop.is_stop_requested() {
            match self.send_search_request(artist, "artist", ARTIST_PER_PAGE).await {
                Ok(response) => adapter::append_result_tags(&mut tags, &response.results),
                Err(SourceError::RateLimited) => {
                    // Keep whatever the release search produced.
                    if tags.is_empty() {
                        return TagLookup::rate_limited();
                    }
                }
                Err(e) => {
                    tracing::warn!("Discogs artist search failed for {}: {}", artist, e);
                }
            }
        }

        self.courtesy_pause().await;
        TagLookup {
            tags,
            first_release_year: None,
            rate_limited: false,
        }
    }

    async fn send_search_request(
        &self,
        query: &str,
        kind: &str,
        per_page: u32,
    ) -> Result<dto::SearchResponse, SourceError> {
        let url = format!(
            "{}/database/search?q={}&type={}&per_page={}",
            self.base_url,
            urlencoding::encode(query),
            kind,
            per_page
        );

        let attempts = self.retry_delays.len();
        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            let response = self
                .http_client
                .get(&url)
                .header("Authorization", format!("Discogs token={}", self.token))
                .send()
                .await
                .map_err(map_transport_error)?;

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                tracing::warn!(
                    "Discogs rate limited (attempt {}/{}), backing off {:?}",
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

            if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
                return Err(SourceError::InvalidCredential);
            }

            if !status.is_success() {
                if let Ok(error) = response.json::<dto::ApiError>().await {
                    return Err(SourceError::Api(error.message));
                }
                return Err(SourceError::Network(format!(
                    "HTTP {}: {}",
                    status,
                    status.canonical_reason().unwrap_or("Unknown")
                )));
            }

            return response
                .json::<dto::SearchResponse>()
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
