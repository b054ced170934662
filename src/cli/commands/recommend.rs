//! Genre recommendation commands.

use std::path::PathBuf;
use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::genre::{
    BatchScheduler, DiscogsClient, EngineConfig, GenreCache, GenreEngine, MusicBrainzClient,
    OpenAiClient, Recommendation, StopFlag,
};
use crate::{config, metadata};

use super::collect_audio_files;

/// Recommend a genre for a single file.
pub fn cmd_suggest(
    rt: &Runtime,
    path: &PathBuf,
    openai_api_key: Option<&str>,
    discogs_token: Option<&str>,
    write: bool,
) -> anyhow::Result<()> {
    let cfg = config::load();
    let engine = build_engine(&cfg, openai_api_key, discogs_token)?;

    let mut song = metadata::read_song(path)?;
    if !song.is_searchable() {
        eprintln!("File has no usable title/artist tags: {:?}", path);
        std::process::exit(1);
    }

    println!("Suggesting: {} - {}", song.artist, song.title);

    rt.block_on(async {
        let rec = engine
            .recommend(&song.title, &song.artist, &song.year, &song.original_genre)
            .await;

        match rec {
            Recommendation::Found {
                genre,
                extracted_year,
                source,
            } => {
                println!("✓ {}  ({:?})", genre, source);
                if let Some(ref year) = extracted_year {
                    println!("  First release year: {}", year);
                }
                song.suggestion = Some(genre);
                song.suggested_year = extracted_year;
            }
            Recommendation::Cancelled => {
                println!("✗ Cancelled");
            }
        }
    });

    if write && song.suggestion.is_some() {
        let result = metadata::write_suggestion(path, &song)?;
        println!("✓ Tags written ({} fields updated)", result.fields_updated);
    }

    if let Err(e) = engine.cache().save() {
        tracing::warn!("Genre cache save failed: {}", e);
    }
    Ok(())
}

/// Batch recommend genres for every audio file under a path.
pub fn cmd_recommend(
    rt: &Runtime,
    path: &PathBuf,
    openai_api_key: Option<&str>,
    discogs_token: Option<&str>,
    recursive: bool,
    write: bool,
    workers: Option<usize>,
) -> anyhow::Result<()> {
    let cfg = config::load();
    let engine = build_engine(&cfg, openai_api_key, discogs_token)?;

    // Collect and read files, skipping anything without searchable tags.
    let files = collect_audio_files(path, recursive);
    if files.is_empty() {
        println!("No audio files found.");
        return Ok(());
    }

    let mut songs = Vec::with_capacity(files.len());
    for file in &files {
        match metadata::read_song(file) {
            Ok(song) if song.is_searchable() => songs.push(song),
            Ok(_) => {
                tracing::warn!("Skipping {:?}: missing title/artist tags", file);
            }
            Err(e) => {
                tracing::warn!("Skipping {:?}: {}", file, e);
            }
        }
    }

    if songs.is_empty() {
        println!("No files with usable tags found.");
        return Ok(());
    }

    println!("Recommending genres for {} file(s)... (Ctrl-C to stop)\n", songs.len());

    let workers = workers.or((cfg.engine.workers > 0).then_some(cfg.engine.workers));
    let scheduler = BatchScheduler::new(engine, workers);

    let mut songs = rt.block_on(async {
        // Ctrl-C flips the cooperative stop flag; workers drain instead of
        // being torn down, and the cache flush below still runs.
        let stop = scheduler.stop_flag().clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nStop requested, finishing in-flight lookups...");
                stop.request_stop();
            }
        });

        let total = songs.len();
        let batch = scheduler
            .run_batch(songs.clone(), |index, rec| {
                if let Some(genre) = rec.genre() {
                    println!("[{}/{}] {} -> {}", index + 1, total, songs[index].title, genre);
                }
            })
            .await;

        // Apply results in submission order.
        let mut songs = songs;
        for (song, rec) in songs.iter_mut().zip(batch.results) {
            if let Recommendation::Found {
                genre,
                extracted_year,
                ..
            } = rec
            {
                song.suggestion = Some(genre);
                song.suggested_year = extracted_year;
            }
        }

        println!();
        if batch.cancelled > 0 {
            println!("Stopped. {} completed, {} cancelled", batch.completed, batch.cancelled);
        } else {
            println!("Done! {} file(s) processed", batch.completed);
        }
        songs
    });

    if write {
        let mut written = 0;
        let mut failed = 0;
        for song in &mut songs {
            if song.suggestion.is_none() {
                continue;
            }
            match metadata::write_suggestion(&song.path, song) {
                Ok(_) => written += 1,
                Err(e) => {
                    eprintln!("✗ Failed to write {:?}: {}", song.path, e);
                    failed += 1;
                }
            }
        }
        println!("Tags written: {} ok, {} failed", written, failed);
        // Cache reflects everything just written.
        scheduler.save_cache();
    }

    Ok(())
}

/// Wire up cache, clients, and engine from config + CLI credentials.
fn build_engine(
    cfg: &config::Config,
    openai_api_key: Option<&str>,
    discogs_token: Option<&str>,
) -> anyhow::Result<Arc<GenreEngine>> {
    let openai_api_key = openai_api_key
        .map(String::from)
        .or_else(|| cfg.credentials.openai_api_key.clone());
    let Some(openai_api_key) = openai_api_key else {
        eprintln!("Error: OpenAI API key required.");
        eprintln!("Use --openai-api-key, set OPENAI_API_KEY, or add it to config.toml");
        std::process::exit(1);
    };

    let discogs_token = discogs_token
        .map(String::from)
        .or_else(|| cfg.credentials.discogs_token.clone())
        .unwrap_or_default();
    if discogs_token.is_empty() {
        tracing::warn!("No Discogs token configured; catalog lookups will come back empty");
    }

    let cache = match &cfg.cache.path {
        Some(path) => GenreCache::new(path.clone()),
        None => GenreCache::default_location(),
    };

    let stop = StopFlag::new();
    let engine_config = EngineConfig {
        cutoff_year: cfg.engine.cutoff_year,
        ..EngineConfig::default()
    };

    Ok(Arc::new(GenreEngine::new(
        engine_config,
        Arc::new(MusicBrainzClient::new(stop.clone())),
        Arc::new(DiscogsClient::new(discogs_token, stop.clone())),
        Arc::new(OpenAiClient::new(openai_api_key, stop.clone())),
        Arc::new(cache),
        stop,
    )))
}
