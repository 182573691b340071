//! Reserved-word resolution.
//!
//! Action Code has a small fixed reserved set. The lookup uses the
//! identifier's length as a first-pass filter (keywords range from 2-8
//! chars), then matches against the keywords of that length.

/// The reserved words of Action Code.
///
/// Declaring a local variable with one of these names is the one hard
/// error the analysis reports — it is guaranteed to fail in the dialect.
pub const RESERVED: &[&str] = &[
    "var", "function", "if", "else", "while", "return", "break", "continue", "true", "false",
];

/// Returns `true` if `text` is a reserved word.
///
/// Sigil-prefixed attribute names (`$Color`) can never match: they start
/// with `$`, which fails the first-byte guard.
#[inline]
pub fn is_keyword(text: &str) -> bool {
    let bytes = text.as_bytes();
    let len = bytes.len();

    // Guard: all keywords are 2-8 chars and start with a lowercase letter
    if !(2..=8).contains(&len) {
        return false;
    }
    if !bytes[0].is_ascii_lowercase() {
        return false;
    }

    match len {
        2 => text == "if",
        3 => text == "var",
        4 => matches!(text, "else" | "true"),
        5 => matches!(text, "while" | "break" | "false"),
        6 => text == "return",
        8 => matches!(text, "function" | "continue"),
        _ => false,
    }
}
