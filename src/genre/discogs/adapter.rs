//! Adapter layer: Convert Discogs DTOs to domain values
//!
//! This is the ONLY place where DTO types are converted to domain values.

use super::dto;

/// Append each result's genres then styles onto a deduplicated list,
/// first-occurrence order.
pub fn append_result_tags(tags: &mut Vec<String>, results: &[dto::SearchResult]) {
    for result in results {
        for name in result.genre.iter().chain(&result.style) {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if !tags.iter().any(|t| t.eq_ignore_ascii_case(name)) {
                tags.push(name.to_string());
            }
        }
    }
}
