//! Field value normalization
//!
//! Raw CSV cells are cleaned before comparison: surrounding whitespace and
//! quote characters are removed, the text is lowercased, and placeholder
//! values for "no data" collapse to an absent value.

/// Values that mean "no data" once trimmed and lowercased.
const ABSENT_MARKERS: [&str; 2] = ["na", "n/a"];

/// Normalize one raw field value.
///
/// Returns `None` (the absent marker) for empty, whitespace-only, quoted-empty
/// and `NA`/`N/A` values. Quotes and whitespace are stripped from both ends
/// until none remain, which makes the function idempotent.
pub fn normalize_field(raw: &str) -> Option<String> {
    let lowered = strip_enclosing(raw).to_lowercase();
    let cleaned = strip_enclosing(&lowered);

    if cleaned.is_empty() || ABSENT_MARKERS.contains(&cleaned) {
        None
    } else {
        Some(cleaned.to_string())
    }
}

fn strip_enclosing(s: &str) -> &str {
    s.trim_matches(|c: char| c.is_whitespace() || c == '"' || c == '\'')
}
