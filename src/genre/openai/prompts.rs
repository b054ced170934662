//! Prompt builders for the two completion contracts.
//!
//! The wording here is advisory; the filter pipeline re-enforces the same
//! rules programmatically on whatever comes back, so prompt drift can't
//! leak denied tags into results.

/// Shared system instruction for both calls.
pub const SYSTEM_PROMPT: &str = "You are a professional DJ and music genre expert.";

/// Prompt for the direct path: only title and artist are known.
pub fn direct_prompt(title: &str, artist: &str) -> String {
    format!(
        "Recommend genres for this song, suitable for DJ set curation.\n\
         \n\
         Artist: {artist}\n\
         Title: {title}\n\
         \n\
         Rules:\n\
         - At most 4 items: 1-3 broad genres (Hip Hop, Pop, Rock, R&B, EDM...), \
         optionally 1-2 specific styles (Trap, Pop Rap, Amapiano...).\n\
         - Never use country names, nationalities, or language names \
         (American, Korean, UK, Japan...). The only regional labels allowed \
         are: UK Drill, K-Pop, K-Rap, Latin, Afrobeats.\n\
         - Never use decade or era tags (1990s, 00s, \"era\"...).\n\
         - Answer with a single line, items separated by \" / \", nothing else.\n\
         \n\
         Example:\n\
         Hip Hop / Trap / Pop Rap"
    )
}

/// Prompt for the refine path: curate a raw tag list gathered from the
/// registry and catalog. The model must not invent genres that aren't
/// derivable from the input.
pub fn refine_prompt(tags: &[String]) -> String {
    let tag_list = tags
        .iter()
        .filter(|t| !t.is_empty())
        .map(|t| format!("'{t}'"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Below is a raw genre tag list collected for one song from music \
         databases:\n\
         \n\
         {tag_list}\n\
         \n\
         Curate it for DJ set tagging. Rules:\n\
         - Use ONLY words that appear in the list above, or that result from \
         splitting a compound tag in it. Never add a genre that is not in \
         the list.\n\
         - At most 4 items: broad genres first, then specific styles.\n\
         - Drop tags that clearly don't fit the rest of the list.\n\
         - Drop country, nationality, language, decade, and era tags \
         (the only regional labels allowed: UK Drill, K-Pop, K-Rap, Latin, \
         Afrobeats).\n\
         - Drop filler qualifiers like 'alternative', 'contemporary', \
         'experimental'.\n\
         - Minimize near-duplicates (pick one of Soul/Funk/R&B, not all).\n\
         - Answer with a single line, items separated by \" / \", nothing \
         else.\n\
         \n\
         Example:\n\
         Pop / Dance-pop / House"
    )
}
