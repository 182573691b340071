//! Catalog loader for the tabular reference-data sources.
//!
//! The sources are CSV files with a header row, quoted fields, doubled
//! double-quote escaping, and quoted fields that may span multiple lines
//! (the Japanese description columns regularly do). The parser here is a
//! small hand-rolled state machine over the raw bytes; no table is large
//! enough to warrant more.
//!
//! A table that fails to load stays empty. Features degrade to "no
//! matches" instead of the session refusing to start.

use std::io;
use std::path::{Path, PathBuf};

use super::{
    AttributeDef, Catalog, ColorDef, DataTypeDef, DesignatorDef, ExportTagDef, OperatorDef,
};

/// Tags whose argument is an Action Code expression, not template text.
pub const EXPRESSION_TAGS: &[&str] = &["value", "action", "if"];

/// File locations for the six catalog tables.
#[derive(Clone, Debug)]
pub struct CatalogSources {
    pub operators: PathBuf,
    pub attributes: PathBuf,
    pub data_types: PathBuf,
    pub designators: PathBuf,
    pub colors: PathBuf,
    pub export_tags: PathBuf,
}

impl CatalogSources {
    /// Conventional layout: all six tables side by side in one directory.
    pub fn in_dir(dir: &Path) -> Self {
        CatalogSources {
            operators: dir.join("operators.csv"),
            attributes: dir.join("attributes.csv"),
            data_types: dir.join("data_types.csv"),
            designators: dir.join("designators.csv"),
            colors: dir.join("colors.csv"),
            export_tags: dir.join("export_tags.csv"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{path}: row {row} has {got} fields, expected at least {want}")]
    ShortRow {
        path: PathBuf,
        row: usize,
        got: usize,
        want: usize,
    },
}

/// Load every table, logging and skipping any that fails.
pub fn load_catalog(sources: &CatalogSources) -> Catalog {
    Catalog::new(
        load_table(&sources.operators, 4, operator_from_row),
        load_table(&sources.attributes, 2, attribute_from_row),
        load_table(&sources.data_types, 1, data_type_from_row),
        load_table(&sources.designators, 1, designator_from_row),
        load_table(&sources.colors, 2, color_from_row),
        load_table(&sources.export_tags, 1, export_tag_from_row),
    )
}

fn load_table<T>(path: &Path, min_fields: usize, from_row: fn(&[String]) -> T) -> Vec<T> {
    match read_table(path, min_fields) {
        Ok(rows) => rows.iter().map(|row| from_row(row)).collect(),
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "catalog table unavailable");
            Vec::new()
        }
    }
}

fn read_table(path: &Path, min_fields: usize) -> Result<Vec<Vec<String>>, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rows = parse_csv(&text);
    if !rows.is_empty() {
        rows.remove(0); // header
    }
    for (i, row) in rows.iter().enumerate() {
        if row.len() < min_fields {
            return Err(LoadError::ShortRow {
                path: path.to_path_buf(),
                row: i + 2, // 1-based, counting the header
                got: row.len(),
                want: min_fields,
            });
        }
    }
    Ok(rows)
}

// ─── Row conversions ─────────────────────────────────────────────────────

fn field(row: &[String], i: usize) -> &str {
    row.get(i).map_or("", |s| s.as_str())
}

fn is_truthy(s: &str) -> bool {
    matches!(
        s.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "1"
    )
}

/// `Name, DotOperator, Scope, ReturnType, DescriptionEn, DescriptionJa`
fn operator_from_row(row: &[String]) -> OperatorDef {
    OperatorDef {
        name: field(row, 0).trim().to_string(),
        dot_operator: is_truthy(field(row, 1)),
        scope: field(row, 2).trim().to_string(),
        return_type: field(row, 3).trim().to_string(),
        description_en: field(row, 4).to_string(),
        description_ja: field(row, 5).to_string(),
    }
}

/// `Name, Type, Default, ReadOnly`
fn attribute_from_row(row: &[String]) -> AttributeDef {
    let name = field(row, 0).trim();
    AttributeDef {
        name: name.strip_prefix('$').unwrap_or(name).to_string(),
        attr_type: field(row, 1).trim().to_string(),
        default: field(row, 2).to_string(),
        read_only: is_truthy(field(row, 3)),
    }
}

/// `Name, DescriptionEn`
fn data_type_from_row(row: &[String]) -> DataTypeDef {
    DataTypeDef {
        name: field(row, 0).trim().to_string(),
        description_en: field(row, 1).to_string(),
    }
}

/// `Name, DescriptionEn, DescriptionJa`
fn designator_from_row(row: &[String]) -> DesignatorDef {
    DesignatorDef {
        name: field(row, 0).trim().to_string(),
        description_en: field(row, 1).to_string(),
        description_ja: field(row, 2).to_string(),
    }
}

/// `Name, Hex`
fn color_from_row(row: &[String]) -> ColorDef {
    ColorDef {
        name: field(row, 0).trim().to_string(),
        hex: field(row, 1).trim().to_string(),
    }
}

/// `Name, DescriptionEn, DescriptionJa`
///
/// The name column carries the full signature (`^value(expression)^`);
/// the bare tag name is the leading identifier run after the caret.
fn export_tag_from_row(row: &[String]) -> ExportTagDef {
    let name = bare_tag_name(field(row, 0));
    let wraps_expression = EXPRESSION_TAGS.contains(&name.as_str());
    ExportTagDef {
        name,
        description_en: field(row, 1).to_string(),
        description_ja: field(row, 2).to_string(),
        wraps_expression,
    }
}

fn bare_tag_name(signature: &str) -> String {
    signature
        .trim()
        .trim_start_matches('^')
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

// ─── CSV parsing ─────────────────────────────────────────────────────────

/// Parse CSV text into rows of fields.
///
/// Handles quoted fields, `""` escapes inside quotes, embedded newlines
/// inside quoted fields, and both `\n` and `\r\n` record separators.
/// Never fails: malformed input parses as best-effort fields.
pub(super) fn parse_csv(text: &str) -> Vec<Vec<String>> {
    let bytes = text.as_bytes();
    let mut rows = Vec::new();
    let mut row: Vec<String> = Vec::new();
    let mut fld = String::new();
    let mut in_quotes = false;
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if in_quotes {
            if b == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    fld.push('"');
                    i += 2;
                    continue;
                }
                in_quotes = false;
                i += 1;
            } else {
                let ch_len = utf8_len(b);
                fld.push_str(&text[i..i + ch_len]);
                i += ch_len;
            }
            continue;
        }
        match b {
            b'"' if fld.is_empty() => {
                in_quotes = true;
                i += 1;
            }
            b',' => {
                row.push(std::mem::take(&mut fld));
                i += 1;
            }
            b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                row.push(std::mem::take(&mut fld));
                rows.push(std::mem::take(&mut row));
                i += 2;
            }
            b'\n' => {
                row.push(std::mem::take(&mut fld));
                rows.push(std::mem::take(&mut row));
                i += 1;
            }
            _ => {
                let ch_len = utf8_len(b);
                fld.push_str(&text[i..i + ch_len]);
                i += ch_len;
            }
        }
    }
    if !fld.is_empty() || !row.is_empty() {
        row.push(fld);
        rows.push(row);
    }
    // Trailing blank lines produce empty single-field rows; drop them.
    rows.retain(|r| !(r.len() == 1 && r[0].is_empty()));
    rows
}

#[inline]
fn utf8_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        _ => 4,
    }
}
