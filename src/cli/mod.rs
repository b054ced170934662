//! Command-line interface for genre-minder.
//!
//! This module provides CLI commands for recommending genres for MP3 files,
//! writing suggestions back into tags, and managing the genre cache.

mod commands;

pub use commands::{Cli, Commands, run_command};
