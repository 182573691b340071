//! Shared data model for the Action Code analysis engine.
//!
//! This crate is the dependency-free hub of the workspace: spans, tokens,
//! and symbol records used by the lexer, scope resolver, type inference
//! engine, export tag parser, and workspace index.

mod span;
mod symbol;
mod token;

pub use span::Span;
pub use symbol::{SymbolKind, SymbolRecord};
pub use token::{Token, TokenKind};
