// ==========================================
// Exam Ops - Token Set Similarity
// ==========================================
// Order-insensitive name similarity (0-100) used by the
// optional fuzzy fallback of the abbreviation matcher
// ==========================================

use crate::engine::normalizer::normalize_name;
use std::collections::BTreeSet;

/// Token set ratio between two names
///
/// Both names are normalized and split into token sets. The shared tokens
/// (sorted) are compared against each side's shared + remaining tokens and
/// the best Levenshtein similarity is returned, scaled to 0-100.
/// A name with no tokens scores 0 against anything.
pub fn token_set_ratio(left: &str, right: &str) -> u8 {
    let left_norm = normalize_name(left);
    let right_norm = normalize_name(right);

    let left_tokens: BTreeSet<&str> = left_norm.split_whitespace().collect();
    let right_tokens: BTreeSet<&str> = right_norm.split_whitespace().collect();
    if left_tokens.is_empty() || right_tokens.is_empty() {
        return 0;
    }

    let shared = join(left_tokens.intersection(&right_tokens));
    let left_rest = join(left_tokens.difference(&right_tokens));
    let right_rest = join(right_tokens.difference(&left_tokens));

    let left_combined = concat(&shared, &left_rest);
    let right_combined = concat(&shared, &right_rest);

    let mut best = ratio(&left_combined, &right_combined);
    if !shared.is_empty() {
        best = best
            .max(ratio(&shared, &left_combined))
            .max(ratio(&shared, &right_combined));
    }
    best
}

fn join<'a>(tokens: impl Iterator<Item = &'a &'a str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn concat(head: &str, tail: &str) -> String {
    format!("{} {}", head, tail).trim().to_string()
}

fn ratio(a: &str, b: &str) -> u8 {
    (strsim::normalized_levenshtein(a, b) * 100.0).round() as u8
}
