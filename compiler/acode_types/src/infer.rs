//! Best-effort expression type inference.
//!
//! # Design
//!
//! Inference works over the raw expression text, not a parse tree. Each
//! rule is checked against the *whole* trimmed expression, in a fixed
//! priority order, before any recursion happens. Dot-chains recurse on
//! the receiver to the left of the rightmost top-level dot; everything
//! the rules cannot classify is [`Ty::Unknown`]. The function never
//! fails and never panics, whatever the input.

use rustc_hash::FxHashMap;

use crate::registry::Catalog;
use crate::Ty;

/// In-scope local variable names mapped to their declared types.
pub type LocalTypes = FxHashMap<String, Ty>;

/// Dot-chains deeper than this infer as unknown. No real expression
/// comes close; the cap exists so adversarial input cannot blow the
/// stack.
const MAX_CHAIN_DEPTH: u32 = 256;

/// Infer the type of `expr` given the local scope and reference data.
pub fn infer(expr: &str, locals: &LocalTypes, catalog: &Catalog) -> Ty {
    infer_at(expr, locals, catalog, 0)
}

fn infer_at(expr: &str, locals: &LocalTypes, catalog: &Catalog, depth: u32) -> Ty {
    let expr = expr.trim();
    if expr.is_empty() || depth > MAX_CHAIN_DEPTH {
        return Ty::Unknown;
    }

    if is_string_literal(expr) {
        return Ty::Str;
    }
    if is_number_literal(expr) {
        return Ty::Number;
    }
    if expr.eq_ignore_ascii_case("true") || expr.eq_ignore_ascii_case("false") {
        return Ty::Boolean;
    }
    if is_hex_color(expr) {
        return Ty::Color;
    }
    if expr.starts_with('[') && expr.ends_with(']') {
        return Ty::List;
    }
    if expr.starts_with('{') && expr.ends_with('}') {
        return Ty::Set;
    }
    if is_bare_name(expr) {
        if let Some(ty) = locals.get(expr) {
            return ty.clone();
        }
    }
    if let Some(rest) = expr.strip_prefix('$') {
        let name: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if let Some(attr) = catalog.attribute(&name) {
            return Ty::from_name(&attr.attr_type);
        }
    }
    if let Some(dot) = rightmost_top_level_dot(expr) {
        let receiver = &expr[..dot];
        let step = &expr[dot + 1..];
        let method: String = step
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
            .collect();
        if method.is_empty() {
            return Ty::Unknown;
        }
        let receiver_ty = infer_at(receiver, locals, catalog, depth + 1);
        if receiver_ty == Ty::Str {
            // `.json` / `.xml` on a string unlock the JSON/XML method
            // tables without being catalog operators themselves.
            if method.eq_ignore_ascii_case("json") {
                return Ty::Json;
            }
            if method.eq_ignore_ascii_case("xml") {
                return Ty::Xml;
            }
        }
        if receiver_ty.is_unknown() {
            return Ty::Unknown;
        }
        if let Some(op) = catalog.method(&receiver_ty.key(), &method) {
            return Ty::from_name(&op.return_type);
        }
        return Ty::Unknown;
    }
    Ty::Unknown
}

// ─── Whole-expression shape checks ───────────────────────────────────────

/// One quoted literal spanning the entire expression. The closing quote
/// must be the final character; backslash escapes the next character.
fn is_string_literal(expr: &str) -> bool {
    let bytes = expr.as_bytes();
    let quote = match bytes.first() {
        Some(&q @ (b'"' | b'\'')) => q,
        _ => return false,
    };
    if bytes.len() < 2 {
        return false;
    }
    let mut i = 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == quote => return i == bytes.len() - 1,
            _ => i += 1,
        }
    }
    false
}

fn is_number_literal(expr: &str) -> bool {
    let digits = expr.strip_prefix('-').unwrap_or(expr);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return false,
        }
    }
    seen_digit
}

fn is_hex_color(expr: &str) -> bool {
    let hex = match expr.strip_prefix('#') {
        Some(h) => h,
        None => return false,
    };
    hex.len() == 6 && hex.chars().all(|c| c.is_ascii_hexdigit())
}

fn is_bare_name(expr: &str) -> bool {
    !expr.is_empty()
        && expr
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        && !expr.starts_with(|c: char| c.is_ascii_digit())
}

/// Offset of the rightmost `.` at parenthesis depth zero and outside any
/// quoted string, or `None`.
///
/// A single forward scan keeps the quote/escape bookkeeping simple while
/// still finding the *last* qualifying dot, which is what matters:
/// argument lists may contain arbitrarily nested parens, dots, and
/// quotes without perturbing the split point.
fn rightmost_top_level_dot(expr: &str) -> Option<usize> {
    let bytes = expr.as_bytes();
    let mut depth: u32 = 0;
    let mut quote: Option<u8> = None;
    let mut escaped = false;
    let mut found = None;
    for (i, &b) in bytes.iter().enumerate() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == q {
                quote = None;
            }
            continue;
        }
        match b {
            b'"' | b'\'' => quote = Some(b),
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b'.' if depth == 0 => found = Some(i),
            _ => {}
        }
    }
    found
}
