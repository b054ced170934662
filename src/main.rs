//! Genre Minder - bulk MP3 genre tagging with machine-suggested genres.
//!
//! Gathers raw genre tags from MusicBrainz and Discogs, has an LLM curate
//! them into a short slash-separated genre line, and caches every result on
//! disk so repeated runs are free. Driven entirely from the CLI.

pub mod cli;
pub mod config;
pub mod error;
pub mod genre;
pub mod metadata;
pub mod model;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("genre_minder=info".parse().unwrap()))
        .init();

    cli::run_command(&args)
}
