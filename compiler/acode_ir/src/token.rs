//! Tokens produced by the Action Code tokenizer.

use crate::Span;

/// Token classification.
///
/// Eight kinds only — the tokenizer performs best-effort classification
/// and has no notion of invalid input. Unrecognized characters become
/// one-character `Punct` tokens so that every byte of the source is
/// covered by exactly one token.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TokenKind {
    /// Run of spaces, tabs, and newlines.
    Whitespace,
    /// `//` through end of line.
    Comment,
    /// Quoted literal, single or double quotes. May be unterminated.
    Str,
    /// Numeric literal, optionally with a leading minus and one decimal point.
    Number,
    /// Reserved word (`var`, `function`, `if`, ...).
    Keyword,
    /// Identifier, including `$`-sigil attribute names.
    Ident,
    /// One- or two-character operator.
    Operator,
    /// Bracket, comma, semicolon, colon, dot, caret — or any character the
    /// scanner could not otherwise classify.
    Punct,
}

/// A single token: classification plus the source span it covers.
///
/// Tokens are contiguous and exhaustive: concatenating the source slices
/// of all tokens in order reproduces the document exactly. Token text is
/// recovered by slicing the source with [`Token::text`].
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    /// Create a new token.
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// The source text covered by this token.
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.to_range()]
    }

    /// `true` for whitespace and comments, which carry no meaning for
    /// scope or type analysis.
    #[inline]
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::Comment)
    }
}
