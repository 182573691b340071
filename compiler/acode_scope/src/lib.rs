//! Scope and declaration resolution over Action Code token streams.
//!
//! # Design
//!
//! Everything here is a pure function over `(source, tokens)` — the
//! resolver holds no state and builds no tree. A scope is the token span
//! of one `function` body, found by brace-depth counting over
//! punctuation tokens only, so braces inside strings and comments never
//! affect depth. The whole document is the implicit top-level scope.
//!
//! Resolution is deliberately lenient about ordering: a reference that
//! textually precedes its declaration in the same scope still resolves.

mod decl;
mod resolve;
mod scope;

pub use decl::{document_symbols, is_declaration, local_types};
pub use resolve::{find_references, resolve};
pub use scope::enclosing_function;

use acode_ir::Token;

/// Index of the nearest significant (non-trivia) token before `index`.
fn prev_significant(tokens: &[Token], index: usize) -> Option<usize> {
    tokens[..index].iter().rposition(|t| !t.is_trivia())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
