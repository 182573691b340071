//! Inferred types and the compatibility matrix.

use std::fmt;

/// An inferred (or declared) Action Code type.
///
/// The well-known types get their own variants for exhaustive dispatch;
/// anything else declared by the data-type catalog flows through
/// [`Ty::Other`]. `Json` and `Xml` are pseudo-types: they exist only to
/// gate access to the JSON/XML method tables after a `.json` / `.xml`
/// step on a string.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Ty {
    Str,
    Number,
    Boolean,
    Color,
    List,
    Set,
    Json,
    Xml,
    Other(String),
    Unknown,
}

impl Ty {
    /// Resolve a declared type name, case-insensitively.
    ///
    /// Unrecognized names become [`Ty::Other`] with the original spelling
    /// preserved; an empty name is [`Ty::Unknown`].
    pub fn from_name(name: &str) -> Ty {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Ty::Unknown;
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "string" => Ty::Str,
            "number" => Ty::Number,
            "boolean" => Ty::Boolean,
            "color" => Ty::Color,
            "list" => Ty::List,
            "set" => Ty::Set,
            "json" => Ty::Json,
            "xml" => Ty::Xml,
            _ => Ty::Other(trimmed.to_string()),
        }
    }

    /// The lower-case name used as a method-table key.
    pub fn key(&self) -> String {
        match self {
            Ty::Other(name) => name.to_ascii_lowercase(),
            other => other.name().to_string(),
        }
    }

    /// Canonical display name.
    pub fn name(&self) -> &str {
        match self {
            Ty::Str => "string",
            Ty::Number => "number",
            Ty::Boolean => "boolean",
            Ty::Color => "color",
            Ty::List => "list",
            Ty::Set => "set",
            Ty::Json => "json",
            Ty::Xml => "xml",
            Ty::Other(name) => name,
            Ty::Unknown => "unknown",
        }
    }

    #[inline]
    pub fn is_unknown(&self) -> bool {
        matches!(self, Ty::Unknown)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Deliberately permissive compatibility check.
///
/// Exact match is required only for string/number/boolean. `color`
/// additionally accepts a string value (named colors and `#RRGGBB` text
/// both coerce). `list` and `set` accept each other. Every other pairing
/// — including anything `Unknown` on either side — is treated as
/// compatible, so only confidently wrong combinations are ever flagged.
pub fn is_compatible(target: &Ty, value: &Ty) -> bool {
    use Ty::{Boolean, Color, List, Number, Set, Str};
    if target == value {
        return true;
    }
    match (target, value) {
        (Color, Str) => true,
        (List, Set) | (Set, List) => true,
        // Both sides confidently known and none of the accepted pairings.
        (
            Str | Number | Boolean | Color | List | Set,
            Str | Number | Boolean | Color | List | Set,
        ) => false,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_is_case_insensitive() {
        assert_eq!(Ty::from_name("String"), Ty::Str);
        assert_eq!(Ty::from_name("NUMBER"), Ty::Number);
        assert_eq!(Ty::from_name("  boolean "), Ty::Boolean);
    }

    #[test]
    fn unrecognized_names_are_other() {
        assert_eq!(Ty::from_name("interval"), Ty::Other("interval".into()));
        assert_eq!(Ty::from_name(""), Ty::Unknown);
    }

    #[test]
    fn exact_match_for_scalars() {
        assert!(is_compatible(&Ty::Str, &Ty::Str));
        assert!(!is_compatible(&Ty::Str, &Ty::Number));
        assert!(!is_compatible(&Ty::Number, &Ty::Boolean));
        assert!(!is_compatible(&Ty::Boolean, &Ty::Str));
    }

    #[test]
    fn color_accepts_color_or_string() {
        assert!(is_compatible(&Ty::Color, &Ty::Color));
        assert!(is_compatible(&Ty::Color, &Ty::Str));
        assert!(!is_compatible(&Ty::Color, &Ty::Number));
    }

    #[test]
    fn list_and_set_are_mutually_accepted() {
        assert!(is_compatible(&Ty::List, &Ty::Set));
        assert!(is_compatible(&Ty::Set, &Ty::List));
        assert!(!is_compatible(&Ty::List, &Ty::Str));
    }

    #[test]
    fn unknown_is_always_compatible() {
        for target in [Ty::Str, Ty::Number, Ty::Boolean, Ty::Color, Ty::List] {
            assert!(is_compatible(&target, &Ty::Unknown), "{target} vs unknown");
        }
        assert!(is_compatible(&Ty::Unknown, &Ty::Number));
    }

    #[test]
    fn other_pairings_are_compatible() {
        assert!(is_compatible(&Ty::Json, &Ty::Str));
        assert!(is_compatible(&Ty::Other("interval".into()), &Ty::Number));
        assert!(is_compatible(&Ty::Str, &Ty::Json));
    }
}
