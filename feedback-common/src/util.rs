//! Text helpers shared across the feedback services.

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Handles multi-byte UTF-8 characters by cutting on character boundaries.
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => {
            let truncated = &s[..idx];
            format!("{}...", truncated.trim_end())
        }
        None => s.to_string(),
    }
}

/// Return the first `max_chars` characters of `s` without any marker.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Trim the ends and collapse every internal whitespace run to one space.
pub fn collapse_whitespace(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for word in s.split_whitespace() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Short single-line preview of user text for log lines.
pub fn preview(s: &str) -> String {
    truncate_with_ellipsis(s, 50)
}
