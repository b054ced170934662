//! MusicBrainz recording-registry lookup.
//!
//! Searches recordings by title + artist and harvests folksonomy tags, with
//! a per-artist tag fallback when the per-recording yield is thin, plus
//! first-release-date extraction for songs with no year tag.

pub mod adapter;
pub mod client;
pub mod dto;

pub use client::MusicBrainzClient;
