//! Excerpt extraction: cut generated text at a sentence boundary within a
//! fixed character budget.

/// Characters that end a sentence.
pub const SENTENCE_STOPS: &[char] = &['.', '?', '!'];

/// Default character budget for a post.
pub const DEFAULT_CHAR_LIMIT: usize = 140;

/// Return the longest prefix of `text` ending in a sentence stop at or
/// before char index `limit`, using [`SENTENCE_STOPS`].
pub fn extract(text: &str, limit: usize) -> String {
    extract_with(text, limit, SENTENCE_STOPS)
}

/// Scan backward from char index `limit` down to index 1 for one of
/// `stops`, and return everything up to and including it.
///
/// Indices count Unicode scalar values, not bytes. When `text` is no longer
/// than `limit` the scan starts at its last char. An empty string means the
/// window holds no sentence boundary.
pub fn extract_with(text: &str, limit: usize, stops: &[char]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let Some(last) = chars.len().checked_sub(1) else {
        return String::new();
    };
    let start = limit.min(last);

    (1..=start)
        .rev()
        .find(|&i| stops.contains(&chars[i]))
        .map(|i| chars[..=i].iter().collect())
        .unwrap_or_default()
}
