//! Diagnostic types for Action Code analysis.
//!
//! Three tiers:
//! - *Style warnings* — smart quotes, a likely missing terminator,
//!   off-canonical casing, unknown export tags, stray carets.
//! - *Semantic warnings* — declared vs. inferred type mismatches, only
//!   reported when inference is conclusive.
//! - *Hard errors* — a reserved word used as a variable name, the one
//!   construct guaranteed to fail in the target dialect.
//!
//! Diagnostics are plain data; rendering them onto a protocol is the
//! consumer's job.

mod diagnostic;
mod error_code;

pub use diagnostic::{Diagnostic, Severity};
pub use error_code::ErrorCode;
