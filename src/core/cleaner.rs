//! Cleaner: repairs unbalanced punctuation pairs left behind by truncation.

pub const OPEN_QUOTE: char = '\u{201C}';
pub const CLOSE_QUOTE: char = '\u{201D}';

/// Remove every character of a paired kind whose occurrences don't balance.
///
/// Parentheses and brackets are stripped when their depth doesn't return to
/// zero; directional quotes (“ ”) when their running count is odd. Each kind
/// is handled on its own, so several may be stripped from one text.
pub fn clean(text: &str) -> String {
    let mut parens = 0i32;
    let mut brackets = 0i32;
    let mut quotes = 0i32;

    for c in text.chars() {
        match c {
            '(' => parens += 1,
            ')' => parens -= 1,
            '[' => brackets += 1,
            ']' => brackets -= 1,
            OPEN_QUOTE => quotes += 1,
            CLOSE_QUOTE => quotes -= 1,
            _ => {}
        }
    }

    let strip_parens = parens != 0;
    let strip_brackets = brackets != 0;
    let strip_quotes = quotes % 2 != 0;

    if !(strip_parens || strip_brackets || strip_quotes) {
        return text.to_string();
    }

    tracing::trace!(strip_parens, strip_brackets, strip_quotes, "cleaning excerpt");

    text.chars()
        .filter(|&c| match c {
            '(' | ')' => !strip_parens,
            '[' | ']' => !strip_brackets,
            OPEN_QUOTE | CLOSE_QUOTE => !strip_quotes,
            _ => true,
        })
        .collect()
}
