//! Text normalization shared by capture and matching.
//!
//! The same normalization order applies everywhere: whitespace is collapsed
//! first, then the result is truncated. Capture and recall must agree on
//! this, otherwise a context string captured near a length boundary can fail
//! to match its own source element.

/// Collapse all runs of whitespace (including newlines) to single spaces
/// and trim the ends.
pub fn collapse_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The first `n` characters of `s`, sliced on a char boundary.
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Truncate to at most `n` characters.
pub fn truncate_chars(s: &str, n: usize) -> String {
    char_prefix(s, n).to_string()
}

/// Truncate to at most `n` characters, appending `…` when anything was cut.
pub fn ellipsize(s: &str, n: usize) -> String {
    if s.chars().count() > n {
        let mut out = truncate_chars(s, n);
        out.push('…');
        out
    } else {
        s.to_string()
    }
}
