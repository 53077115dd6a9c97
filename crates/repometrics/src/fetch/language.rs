/// Default share of plain-English characters a description needs.
pub const DEFAULT_ENGLISH_THRESHOLD: f64 = 0.8;

/// Heuristic check that a repository description is written in English.
///
/// Missing or empty text passes. Otherwise the share of characters that are
/// ASCII letters, ASCII digits, whitespace or one of `.,!?` must be strictly
/// greater than `threshold`.
pub fn is_mostly_english(text: Option<&str>, threshold: f64) -> bool {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return true;
    };

    let mut total = 0usize;
    let mut plain = 0usize;
    for c in text.chars() {
        total += 1;
        if c.is_ascii_alphanumeric() || c.is_whitespace() || matches!(c, '.' | ',' | '!' | '?') {
            plain += 1;
        }
    }

    (plain as f64 / total as f64) > threshold
}
