//! Rule-based cleanup of LLM genre output.
//!
//! The LLM is instructed to avoid regional/nationality/decade tags, but
//! instructions are not enforcement: this pass re-applies the rules
//! programmatically on the returned slash-separated line, so the guarantee
//! holds independent of model compliance.

/// Segment substituted when filtering leaves nothing usable.
const DEFAULT_SEGMENT: &str = "Hip Hop";

/// Maximum number of `/`-separated segments in the final line.
const MAX_SEGMENTS: usize = 4;

/// Phrases that disqualify a segment when they appear as a standalone word
/// sequence. Longer compounds are listed for clarity, but the bare
/// qualifiers already cover them ("Southern Hip Hop" contains "Southern").
const DENY_PHRASES: &[&str] = &[
    // regional hip-hop qualifiers
    "southern hip hop",
    "east coast hip hop",
    "west coast hip hop",
    "midwest hip hop",
    "southern",
    "east coast",
    "west coast",
    "midwest",
    // languages / nationalities
    "english",
    "american",
    "british",
    "german",
    "french",
    "italian",
    "spanish",
    "japanese",
    "chinese",
    "korean",
    // bare country references
    "usa",
    "us",
    "uk",
    "germany",
    "france",
    "italy",
    "spain",
    "japan",
    "china",
];

/// Segments kept verbatim even though a deny phrase matches inside them.
const ALLOW_SEGMENTS: &[&str] = &["uk drill", "k-pop", "k-rap", "latin", "afrobeats", "hardcore"];

/// Filter a slash-separated genre line through the deny/allow tables.
///
/// Deny-list matching happens against the input's original casing
/// (lowercased for comparison only); call [`titlecase_segments`] afterwards,
/// not before. The result always has 1..=4 segments and is never empty.
pub fn filter_regional(line: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();

    for raw in line.split('/') {
        let segment = raw.trim();
        if segment.is_empty() {
            continue;
        }
        if kept.iter().any(|k| k.eq_ignore_ascii_case(segment)) {
            continue;
        }
        if is_allowed(segment) || !is_denied(segment) {
            kept.push(segment);
        }
    }

    let mut segments: Vec<String> = kept.into_iter().map(str::to_string).collect();

    if segments.is_empty() {
        segments.push(DEFAULT_SEGMENT.to_string());
    }
    // A lone non-default segment gets the default alongside it, so the line
    // always names a broad genre.
    if segments.len() < 2 && !segments[0].eq_ignore_ascii_case(DEFAULT_SEGMENT) {
        segments.insert(0, DEFAULT_SEGMENT.to_string());
    }

    segments.truncate(MAX_SEGMENTS);
    segments.join(" / ")
}

/// Capitalize the first letter of every word, lowercase the rest, without
/// touching separators. "hip hop / UK drill" becomes "Hip Hop / Uk Drill".
pub fn titlecase_segments(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut in_word = false;

    for c in line.chars() {
        if c.is_alphanumeric() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
                in_word = true;
            }
        } else {
            out.push(c);
            in_word = false;
        }
    }

    out
}

fn is_allowed(segment: &str) -> bool {
    let lower = segment.to_lowercase();
    ALLOW_SEGMENTS.iter().any(|a| *a == lower.trim())
}

fn is_denied(segment: &str) -> bool {
    let words = segment_words(segment);

    if words.iter().any(|w| is_decade_token(w)) {
        return true;
    }

    DENY_PHRASES.iter().any(|phrase| {
        let phrase_words: Vec<&str> = phrase.split_whitespace().collect();
        contains_word_sequence(&words, &phrase_words)
    })
}

/// Lowercased words of a segment, alphanumeric runs only (hyphens bind,
/// so "k-pop" stays one word and never matches the bare "us"/"uk" entries).
fn segment_words(segment: &str) -> Vec<String> {
    segment
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == ',' || c == '.' || c == '(' || c == ')')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// "1990s", "90s", "00s" and friends: digits followed by a lone `s`.
fn is_decade_token(word: &str) -> bool {
    let Some(rest) = word.strip_suffix('s') else {
        return false;
    };
    !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit())
}

fn contains_word_sequence(words: &[String], phrase: &[&str]) -> bool {
    if phrase.is_empty() || phrase.len() > words.len() {
        return false;
    }
    words
        .windows(phrase.len())
        .any(|window| window.iter().zip(phrase).all(|(w, p)| w == p))
}
