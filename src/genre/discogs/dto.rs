//! Discogs API Data Transfer Objects
//!
//! These types match EXACTLY what the Discogs database-search endpoint
//! returns. DO NOT add fields that aren't in the API response.
//! DO NOT use these types outside the discogs module - convert to domain types.
//!
//! API Reference: https://www.discogs.com/developers/#page:database

use serde::{Deserialize, Serialize};

/// Database search response (release or artist searches share this shape)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

/// One search hit
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchResult {
    pub id: u64,
    pub title: String,
    /// Broad genres ("Hip Hop", "Electronic")
    #[serde(default)]
    pub genre: Vec<String>,
    /// Finer styles ("Trap", "Synth-pop")
    #[serde(default)]
    pub style: Vec<String>,
    /// Release year, as a string in search results
    pub year: Option<String>,
}

/// Error response from the Discogs API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiError {
    pub message: String,
}

// ============================================================================
// CONTRACT TESTS
// These verify our DTOs match what the real API returns.
// If these fail, the API has changed and we need to update our DTOs.
// ============================================================================
