//! OpenAI chat-completion HTTP client
//!
//! One client, two call shapes: a direct genre recommendation from
//! title/artist, and a refine pass over a gathered tag list. Both use a
//! small response budget and near-deterministic sampling so repeated runs
//! produce stable, cache-friendly lines.

use std::time::Duration;

use super::{dto, prompts};
use crate::genre::domain::{SourceError, StopFlag};

/// Model used for both call shapes
const MODEL: &str = "gpt-4o-mini";

/// Response token budget - a genre line is a handful of tokens
const MAX_TOKENS: u32 = 256;

/// Low randomness keeps outputs stable across runs
const TEMPERATURE: f32 = 0.2;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Fixed delays before the two retries on timeout/rate-limit
const RETRY_DELAYS: [Duration; 2] = [Duration::from_secs(2), Duration::from_secs(5)];

/// OpenAI API client
pub struct OpenAiClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
    stop: StopFlag,
    retry_delays: Vec<Duration>,
}

impl OpenAiClient {
    /// Create a new client with the given API key
    pub fn new(api_key: impl Into<String>, stop: StopFlag) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            api_key: api_key.into(),
            http_client,
            base_url: "https://api.openai.com/v1".to_string(),
            stop,
            retry_delays: RETRY_DELAYS.to_vec(),
        }
    }

    /// Create a client for testing with custom base URL and no delays
    #[cfg(test)]
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        stop: StopFlag,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            http_client: reqwest::Client::new(),
            base_url: base_url.into(),
            stop,
            retry_delays: vec![Duration::ZERO; 2],
        }
    }

    /// Ask for a genre line from title/artist alone (back-catalog path).
    pub async fn direct_recommendation(
        &self,
        title: &str,
        artist: &str,
    ) -> Result<String, SourceError> {
        self.complete(&prompts::direct_prompt(title, artist)).await
    }

    /// Ask for a curated genre line derived only from the given tags.
    pub async fn refine_tags(&self, tags: &[String]) -> Result<String, SourceError> {
        self.complete(&prompts::refine_prompt(tags)).await
    }

    /// Send one completion request, retrying on timeout/rate-limit.
    async fn complete(&self, user_prompt: &str) -> Result<String, SourceError> {
        let request = dto::ChatRequest {
            model: MODEL.to_string(),
            messages: vec![
                dto::ChatMessage::system(prompts::SYSTEM_PROMPT),
                dto::ChatMessage::user(user_prompt),
            ],
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let mut attempt = 0;
        loop {
            match self.send_completion_request(&request).await {
                Ok(content) => return Ok(content),
                Err(e @ (SourceError::Timeout | SourceError::RateLimited)) => {
                    let Some(delay) = self.retry_delays.get(attempt) else {
                        return Err(e);
                    };
                    if self.stop.is_stop_requested() {
                        return Err(e);
                    }
                    tracing::warn!(
                        "Completion attempt {} failed ({}), retrying in {:?}",
                        attempt + 1,
                        e,
                        delay
                    );
                    tokio::time::sleep(*delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_completion_request(
        &self,
        request: &dto::ChatRequest,
    ) -> Result<String, SourceError> {
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SourceError::Timeout
                } else {
                    SourceError::Network(e.to_string())
                }
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SourceError::InvalidCredential);
        }
        if !status.is_success() {
            if let Ok(error) = response.json::<dto::ErrorResponse>().await {
                return Err(SourceError::Api(error.error.message));
            }
            return Err(SourceError::Network(format!(
                "HTTP {}: {}",
                status,
                status.canonical_reason().unwrap_or("Unknown")
            )));
        }

        let completion: dto::ChatResponse = response
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;

        completion
            .choices
            .first()
            .map(|choice| choice.message.content.trim().to_string())
            .ok_or_else(|| SourceError::Parse("completion had no choices".to_string()))
    }
}
