//! Hand-written single-pass scanner producing [`Token`] values.
//!
//! The scanner operates on a byte [`Cursor`](crate::cursor::Cursor) and
//! classifies on a best-effort basis: there is no notion of invalid input
//! and no error path. Every byte of the source lands in exactly one token,
//! and the fallback arm advances one full character, so the scan always
//! terminates — including on unterminated strings and stray symbols.
//!
//! # Rule priority
//!
//! At each position, checked in order: whitespace run → line comment →
//! string literal → identifier/keyword → number → two-character operator →
//! one-character operator → punctuation → one-character fallback.

use acode_ir::{Span, Token, TokenKind};

use crate::cursor::Cursor;
use crate::keywords;

/// Best-effort scanner over one document.
pub struct Scanner<'a> {
    cursor: Cursor<'a>,
    /// Whether the previous significant token can end an expression
    /// (identifier, number, string, `)` or `]`). Gates the leading-minus
    /// number rule so `x-1` lexes the minus as a subtraction operator
    /// while `-1` in expression position lexes as one number.
    prev_ends_expr: bool,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Scanner {
            cursor: Cursor::new(source),
            prev_ends_expr: false,
        }
    }

    /// Produce the next token, or `None` at end of input.
    pub fn next_token(&mut self) -> Option<Token> {
        if self.cursor.is_eof() {
            return None;
        }
        let start = self.cursor.pos();
        let kind = self.scan(start);
        let span = Span::new(start, self.cursor.pos());
        let token = Token::new(kind, span);
        if !token.is_trivia() {
            self.prev_ends_expr = match kind {
                TokenKind::Ident | TokenKind::Number | TokenKind::Str => true,
                TokenKind::Punct => {
                    let b = self.cursor.byte_at(span.start);
                    b == b')' || b == b']'
                }
                _ => false,
            };
        }
        Some(token)
    }

    fn scan(&mut self, start: u32) -> TokenKind {
        match self.cursor.current() {
            b if b.is_ascii_whitespace() => self.whitespace(),
            b'/' if self.cursor.peek() == b'/' => self.line_comment(),
            b'"' | b'\'' => self.string(),
            b if is_ident_start(b) => self.ident_or_keyword(start),
            b if b.is_ascii_digit() => self.number_body(),
            b'-' if self.cursor.peek().is_ascii_digit() && !self.prev_ends_expr => {
                self.cursor.advance(); // consume '-'
                self.number_body()
            }
            _ => self.operator_or_punct(),
        }
    }

    // ─── Trivia ──────────────────────────────────────────────────────────

    fn whitespace(&mut self) -> TokenKind {
        self.cursor.eat_while(|b| b.is_ascii_whitespace());
        TokenKind::Whitespace
    }

    fn line_comment(&mut self) -> TokenKind {
        self.cursor.advance_n(2); // consume "//"
        self.cursor.eat_until_newline_or_eof();
        TokenKind::Comment
    }

    // ─── Strings ─────────────────────────────────────────────────────────

    /// Consume a quoted literal: from the opening quote to the matching
    /// unescaped same quote, or to end of input (unterminated is fine).
    /// A backslash always consumes the following character verbatim,
    /// regardless of what it is.
    fn string(&mut self) -> TokenKind {
        let quote = self.cursor.current();
        self.cursor.advance(); // consume opening quote
        loop {
            match self.cursor.current() {
                0 if self.cursor.is_eof() => return TokenKind::Str,
                b'\\' => {
                    self.cursor.advance(); // consume '\'
                    if !self.cursor.is_eof() {
                        self.cursor.advance_char(); // escaped char, verbatim
                    }
                }
                b if b == quote => {
                    self.cursor.advance(); // consume closing quote
                    return TokenKind::Str;
                }
                _ => self.cursor.advance_char(),
            }
        }
    }

    // ─── Identifiers & Keywords ──────────────────────────────────────────

    fn ident_or_keyword(&mut self, start: u32) -> TokenKind {
        let sigil = self.cursor.current() == b'$';
        self.cursor.advance(); // consume first char (already validated)
        self.cursor.eat_while(is_ident_continue);
        if !sigil && self.is_reserved(start) {
            TokenKind::Keyword
        } else {
            TokenKind::Ident
        }
    }

    fn is_reserved(&self, start: u32) -> bool {
        keywords::is_keyword(self.cursor.slice(start, self.cursor.pos()))
    }

    // ─── Numbers ─────────────────────────────────────────────────────────

    /// Digits plus at most one decimal point. The optional leading minus
    /// has already been consumed by the caller.
    fn number_body(&mut self) -> TokenKind {
        self.cursor.eat_while(|b| b.is_ascii_digit());
        if self.cursor.current() == b'.' && self.cursor.peek().is_ascii_digit() {
            self.cursor.advance(); // consume '.'
            self.cursor.eat_while(|b| b.is_ascii_digit());
        }
        TokenKind::Number
    }

    // ─── Operators & Punctuation ─────────────────────────────────────────

    fn operator_or_punct(&mut self) -> TokenKind {
        let b = self.cursor.current();
        let next = self.cursor.peek();

        // Two-character operators first
        if is_two_char_operator(b, next) {
            self.cursor.advance_n(2);
            return TokenKind::Operator;
        }
        if is_one_char_operator(b) {
            self.cursor.advance();
            return TokenKind::Operator;
        }
        if is_punct(b) {
            self.cursor.advance();
            return TokenKind::Punct;
        }

        // Fallback: one full character, guaranteeing forward progress on
        // anything unrecognized (smart quotes, emoji, stray bytes).
        self.cursor.advance_char();
        TokenKind::Punct
    }
}

impl Iterator for Scanner<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        self.next_token()
    }
}

/// Identifier start: letter, underscore, or the `$` attribute sigil.
#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b'$'
}

/// Identifier continuation: letter, digit, or underscore.
#[inline]
fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_two_char_operator(a: u8, b: u8) -> bool {
    matches!(
        (a, b),
        (b'=' | b'!' | b'<' | b'>', b'=')
            | (b'&', b'&')
            | (b'|', b'|')
            | (b'+' | b'-' | b'*' | b'/', b'=')
    )
}

fn is_one_char_operator(b: u8) -> bool {
    matches!(
        b,
        b'=' | b'<' | b'>' | b'!' | b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|'
    )
}

fn is_punct(b: u8) -> bool {
    matches!(
        b,
        b'(' | b')' | b'[' | b']' | b'{' | b'}' | b',' | b';' | b':' | b'.' | b'^'
    )
}
