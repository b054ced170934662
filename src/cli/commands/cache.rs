//! Genre cache management commands.

use crate::config;
use crate::genre::GenreCache;

fn open_cache() -> GenreCache {
    let cfg = config::load();
    match cfg.cache.path {
        Some(path) => GenreCache::new(path),
        None => GenreCache::default_location(),
    }
}

/// Show cache statistics.
pub fn cmd_cache_stats() -> anyhow::Result<()> {
    let cache = open_cache();

    println!("Genre cache: {:?}", cache.path());
    println!("  Entries: {}", cache.len());
    if !cache.path().exists() {
        println!("  (no cache file yet - nothing has been recommended)");
    }
    Ok(())
}

/// Clear the cache.
pub fn cmd_cache_clear(yes: bool) -> anyhow::Result<()> {
    let cache = open_cache();
    let entries = cache.len();

    if !yes {
        println!("Would delete {} cached recommendation(s) from {:?}", entries, cache.path());
        println!("Run again with --yes to clear.");
        return Ok(());
    }

    cache.clear()?;
    println!("✓ Cleared {} cached recommendation(s)", entries);
    Ok(())
}
