use std::fmt;

/// Error codes for all analysis diagnostics.
///
/// Format: A### where the first digit indicates the tier:
/// - A0xx: style warnings
/// - A1xx: semantic warnings
/// - A2xx: hard errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Style warnings (A0xx)
    /// Typographic (smart) quote where a straight quote was likely meant
    A001,
    /// Statement likely missing its `;` terminator
    A002,
    /// Name differs only by letter case from the canonical catalog name
    A003,
    /// Export tag name not in the known vocabulary
    A004,
    /// Stray `^` not part of any well-formed export tag
    A005,

    // Semantic warnings (A1xx)
    /// Declared type and inferred value type cannot match
    A101,

    // Hard errors (A2xx)
    /// Reserved word used as a variable name
    A201,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::A001 => "A001",
            ErrorCode::A002 => "A002",
            ErrorCode::A003 => "A003",
            ErrorCode::A004 => "A004",
            ErrorCode::A005 => "A005",
            ErrorCode::A101 => "A101",
            ErrorCode::A201 => "A201",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
