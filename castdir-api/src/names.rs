//! Actor name normalization
//!
//! The upstream search is fuzzy and returns best-effort matches, so the top
//! hit is only accepted when its name matches the requested one once case
//! and punctuation are ignored.

use crate::services::Person;

/// Canonicalize free text into a search query
///
/// Every run of characters that are not letters or digits becomes a single
/// space; leading and trailing separators are dropped. Casing is preserved.
pub fn normalize_query(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut pending_space = false;

    for c in input.chars() {
        if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        } else {
            pending_space = true;
        }
    }

    out
}

/// Comparison key: letters and digits only, lower-cased
pub fn comparison_key(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// True iff the first search result names the same person as `input`
pub fn matches_top_result(input: &str, results: &[Person]) -> bool {
    match results.first() {
        Some(top) => {
            let key = comparison_key(input);
            !key.is_empty() && comparison_key(&top.name) == key
        }
        None => false,
    }
}
