//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule for maintainability:
//! - `recommend`: single-song and batch genre recommendation
//! - `cache`: genre cache statistics and clearing

mod cache;
mod recommend;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::runtime::Runtime;

pub use cache::{cmd_cache_clear, cmd_cache_stats};
pub use recommend::{cmd_recommend, cmd_suggest};

/// Genre Minder CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Recommend a genre for a single audio file
    Suggest {
        /// Path to the audio file
        path: PathBuf,
        /// OpenAI API key (or set OPENAI_API_KEY env var)
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        openai_api_key: Option<String>,
        /// Discogs access token (or set DISCOGS_TOKEN env var)
        #[arg(long, env = "DISCOGS_TOKEN", hide_env_values = true)]
        discogs_token: Option<String>,
        /// Write the suggested genre (and extracted year) into the file
        #[arg(long)]
        write: bool,
    },
    /// Recommend genres for every audio file under a path
    Recommend {
        /// Path to file or directory
        path: PathBuf,
        /// OpenAI API key (or set OPENAI_API_KEY env var)
        #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
        openai_api_key: Option<String>,
        /// Discogs access token (or set DISCOGS_TOKEN env var)
        #[arg(long, env = "DISCOGS_TOKEN", hide_env_values = true)]
        discogs_token: Option<String>,
        /// Recursive directory scan
        #[arg(short, long)]
        recursive: bool,
        /// Write suggestions into the files after the batch finishes
        #[arg(long)]
        write: bool,
        /// Concurrent lookups (default: from config, else CPU-based 3-8)
        #[arg(long)]
        workers: Option<usize>,
    },
    /// Show genre cache statistics
    CacheStats,
    /// Delete all cached genre recommendations
    CacheClear {
        /// Actually clear (without this flag, only reports what would happen)
        #[arg(long)]
        yes: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let rt = Runtime::new()?;

    match &cli.command {
        Commands::Suggest {
            path,
            openai_api_key,
            discogs_token,
            write,
        } => cmd_suggest(
            &rt,
            path,
            openai_api_key.as_deref(),
            discogs_token.as_deref(),
            *write,
        ),
        Commands::Recommend {
            path,
            openai_api_key,
            discogs_token,
            recursive,
            write,
            workers,
        } => cmd_recommend(
            &rt,
            path,
            openai_api_key.as_deref(),
            discogs_token.as_deref(),
            *recursive,
            *write,
            *workers,
        ),
        Commands::CacheStats => cmd_cache_stats(),
        Commands::CacheClear { yes } => cmd_cache_clear(*yes),
    }
}

/// Collect audio files from a path (a single file, or a directory scan).
pub(crate) fn collect_audio_files(path: &PathBuf, recursive: bool) -> Vec<PathBuf> {
    if path.is_dir() {
        if recursive {
            walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file())
                .filter(|e| is_audio_file(e.path()))
                .map(|e| e.path().to_path_buf())
                .collect()
        } else {
            std::fs::read_dir(path)
                .map(|entries| {
                    entries
                        .filter_map(|e| e.ok())
                        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
                        .filter(|e| is_audio_file(&e.path()))
                        .map(|e| e.path())
                        .collect()
                })
                .unwrap_or_default()
        }
    } else {
        vec![path.clone()]
    }
}

/// Check if a path has an audio file extension
pub(crate) fn is_audio_file(path: &std::path::Path) -> bool {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase());
    matches!(ext.as_deref(), Some("mp3" | "flac" | "ogg" | "m4a" | "wav"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_audio_file() {
        assert!(is_audio_file(std::path::Path::new("/music/song.mp3")));
        assert!(is_audio_file(std::path::Path::new("/music/SONG.MP3")));
        assert!(is_audio_file(std::path::Path::new("/music/track.flac")));
        assert!(!is_audio_file(std::path::Path::new("/music/cover.jpg")));
        assert!(!is_audio_file(std::path::Path::new("/music/noext")));
    }

    #[test]
    fn test_collect_single_file() {
        let path = PathBuf::from("/music/one.mp3");
        assert_eq!(collect_audio_files(&path, false), vec![path.clone()]);
    }

    #[test]
    fn test_collect_from_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::write(dir.path().join("a.mp3"), b"x").unwrap();
        std::fs::write(dir.path().join("b.txt"), b"x").unwrap();
        let sub = dir.path().join("sub");
        std::fs::create_dir(&sub).unwrap();
        std::fs::write(sub.join("c.mp3"), b"x").unwrap();

        let flat = collect_audio_files(&dir.path().to_path_buf(), false);
        assert_eq!(flat.len(), 1);

        let mut deep = collect_audio_files(&dir.path().to_path_buf(), true);
        deep.sort();
        assert_eq!(deep.len(), 2);
    }
}
