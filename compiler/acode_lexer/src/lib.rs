//! Single-pass tokenizer for Action Code.
//!
//! Converts raw text into a contiguous, exhaustive token stream: the
//! concatenation of all token texts in order reproduces the source
//! exactly, for any input whatsoever. The scanner never raises errors,
//! never backtracks, and always advances — unterminated strings and
//! stray symbols lex to ordinary tokens.

mod cursor;
mod keywords;
mod scanner;

pub use keywords::{is_keyword, RESERVED};
pub use scanner::Scanner;

use acode_ir::Token;

/// Tokenize a source string, collecting all tokens.
pub fn tokenize(source: &str) -> Vec<Token> {
    Scanner::new(source).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
