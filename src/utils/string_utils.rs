//! UTF-8-safe string helpers for text read out of the DOM

/// Truncate a string to at most `max_chars` characters (not bytes).
///
/// Respects UTF-8 character boundaries and never panics on multi-byte text.
/// Returns a slice of the input without allocating.
///
/// # Examples
/// ```
/// # use shelfwalk::utils::string_utils::safe_truncate_chars;
/// assert_eq!(safe_truncate_chars("Hello, World!", 5), "Hello");
/// assert_eq!(safe_truncate_chars("ééé", 2), "éé");
/// assert_eq!(safe_truncate_chars("Hi", 100), "Hi");
/// ```
#[inline]
pub fn safe_truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        None => s,
        Some((byte_idx, _)) => &s[..byte_idx],
    }
}

/// Trim and collapse runs of whitespace (including newlines from `innerText`)
/// into single spaces
#[must_use]
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
