//! Similarity functions for field comparison
//!
//! All functions return a similarity score in range [0.0, 1.0] where 1.0 means identical.
//! Inputs are normalized field values (already lowercased and trimmed).

use crate::schema::FieldType;
use std::collections::HashSet;

/// Compare two present values of a field
pub fn field_similarity(a: &str, b: &str, field_type: FieldType) -> f32 {
    match field_type {
        FieldType::String => string_similarity(a, b),
        FieldType::ShortString => short_string_similarity(a, b),
        FieldType::Text => trigram_similarity(a, b),
        FieldType::Exact => exact_similarity(a, b),
        FieldType::Price => price_similarity(a, b),
    }
}

/// Jaro-Winkler similarity, rewarding shared prefixes
pub fn string_similarity(a: &str, b: &str) -> f32 {
    strsim::jaro_winkler(a, b) as f32
}

/// Edit-distance similarity including transpositions
pub fn short_string_similarity(a: &str, b: &str) -> f32 {
    strsim::normalized_damerau_levenshtein(a, b) as f32
}

/// Exact match: 1 if equal, 0 otherwise
pub fn exact_similarity(a: &str, b: &str) -> f32 {
    if a == b { 1.0 } else { 0.0 }
}

/// Relative numeric similarity for prices and amounts
///
/// Falls back to exact comparison when either side does not parse as a number.
pub fn price_similarity(a: &str, b: &str) -> f32 {
    match (parse_amount(a), parse_amount(b)) {
        (Some(x), Some(y)) => {
            let max = x.abs().max(y.abs());
            if max == 0.0 {
                1.0 // Both are zero
            } else {
                (1.0 - (x - y).abs() / max).max(0.0) as f32
            }
        }
        _ => exact_similarity(a, b),
    }
}

fn parse_amount(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    cleaned.parse().ok().filter(|v: &f64| v.is_finite())
}

/// Trigram similarity between two strings
pub fn trigram_similarity(a: &str, b: &str) -> f32 {
    let trigrams_a = generate_trigrams(a);
    let trigrams_b = generate_trigrams(b);

    if trigrams_a.is_empty() && trigrams_b.is_empty() {
        return 1.0;
    }

    if trigrams_a.is_empty() || trigrams_b.is_empty() {
        return 0.0;
    }

    let intersection = trigrams_a.intersection(&trigrams_b).count();
    let union = trigrams_a.union(&trigrams_b).count();

    if union == 0 { 0.0 } else { intersection as f32 / union as f32 }
}

/// Generate character trigrams from a string
fn generate_trigrams(s: &str) -> HashSet<String> {
    let padded = format!("  {}  ", s);
    let chars: Vec<char> = padded.chars().collect();

    chars.windows(3)
        .map(|w| w.iter().collect::<String>())
        .collect()
}
