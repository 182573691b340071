//! Read-only reference data: operators, system attributes, data types,
//! designators, named colors, and export tags.
//!
//! The [`Catalog`] is built once per session by the loader and never
//! mutated afterwards. Core functions take it by reference; nothing in
//! the workspace holds it in a global.

mod load;

pub use load::{load_catalog, CatalogSources, LoadError, EXPRESSION_TAGS};

use rustc_hash::FxHashMap;

/// Which locale a description should be served in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Locale {
    #[default]
    En,
    Ja,
}

/// A catalog operator or dot-method.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct OperatorDef {
    pub name: String,
    /// `true` for methods invoked through a dot-chain step.
    pub dot_operator: bool,
    /// Receiver type for dot operators (`string`, `list`, `json`, ...);
    /// empty for free operators.
    pub scope: String,
    pub return_type: String,
    pub description_en: String,
    pub description_ja: String,
}

impl OperatorDef {
    pub fn description(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ja if !self.description_ja.is_empty() => &self.description_ja,
            _ => &self.description_en,
        }
    }
}

/// A predeclared, sigil-prefixed, fixed-type system attribute.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct AttributeDef {
    /// Canonical name without the `$` sigil.
    pub name: String,
    pub attr_type: String,
    pub default: String,
    pub read_only: bool,
}

/// A declared data type name.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DataTypeDef {
    pub name: String,
    pub description_en: String,
}

/// A reserved word denoting a structural position (`parent`, `this`, ...).
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct DesignatorDef {
    pub name: String,
    pub description_en: String,
    pub description_ja: String,
}

/// A named color with its hex value.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ColorDef {
    pub name: String,
    pub hex: String,
}

/// One entry of the export tag vocabulary.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ExportTagDef {
    pub name: String,
    pub description_en: String,
    pub description_ja: String,
    /// `true` for the fixed subset of tags whose argument is an Action
    /// Code expression (`value`, `action`, `if`).
    pub wraps_expression: bool,
}

impl ExportTagDef {
    pub fn description(&self, locale: Locale) -> &str {
        match locale {
            Locale::Ja if !self.description_ja.is_empty() => &self.description_ja,
            _ => &self.description_en,
        }
    }
}

/// What a bare name resolves to in the reference data.
///
/// A proper sum type so downstream consumers dispatch exhaustively
/// instead of comparing string tags.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum CatalogRef<'a> {
    Operator(&'a OperatorDef),
    Attribute(&'a AttributeDef),
    Designator(&'a DesignatorDef),
    Color(&'a ColorDef),
    DataType(&'a DataTypeDef),
}

/// The complete reference data for one session. Write-once, then shared
/// immutably.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    operators: Vec<OperatorDef>,
    attributes: Vec<AttributeDef>,
    data_types: Vec<DataTypeDef>,
    designators: Vec<DesignatorDef>,
    colors: Vec<ColorDef>,
    export_tags: Vec<ExportTagDef>,

    /// `(receiver type lower-cased, method name)` → operator index.
    methods: FxHashMap<(String, String), usize>,
    /// Exact attribute name (no sigil) → attribute index.
    attrs_by_name: FxHashMap<String, usize>,
    /// Lower-cased attribute name → attribute index, for casing hints.
    attrs_ci: FxHashMap<String, usize>,
    /// Lower-cased operator name → operator index, for casing hints.
    operators_ci: FxHashMap<String, usize>,
    export_tags_by_name: FxHashMap<String, usize>,
}

impl Catalog {
    /// Build the lookup maps. Called once by the loader (or by tests
    /// constructing catalogs by hand).
    pub fn new(
        operators: Vec<OperatorDef>,
        attributes: Vec<AttributeDef>,
        data_types: Vec<DataTypeDef>,
        designators: Vec<DesignatorDef>,
        colors: Vec<ColorDef>,
        export_tags: Vec<ExportTagDef>,
    ) -> Self {
        let mut catalog = Catalog {
            operators,
            attributes,
            data_types,
            designators,
            colors,
            export_tags,
            ..Catalog::default()
        };
        for (i, op) in catalog.operators.iter().enumerate() {
            if op.dot_operator {
                catalog
                    .methods
                    .insert((op.scope.to_ascii_lowercase(), op.name.clone()), i);
            }
            catalog
                .operators_ci
                .entry(op.name.to_ascii_lowercase())
                .or_insert(i);
        }
        for (i, attr) in catalog.attributes.iter().enumerate() {
            catalog.attrs_by_name.insert(attr.name.clone(), i);
            catalog
                .attrs_ci
                .entry(attr.name.to_ascii_lowercase())
                .or_insert(i);
        }
        for (i, tag) in catalog.export_tags.iter().enumerate() {
            catalog.export_tags_by_name.insert(tag.name.clone(), i);
        }
        catalog
    }

    // ─── Lookups ─────────────────────────────────────────────────────────

    /// Dot-method lookup keyed by the receiver type's lower-case name.
    pub fn method(&self, receiver_key: &str, name: &str) -> Option<&OperatorDef> {
        // Key is assembled on the fly; method tables are small and this
        // path only runs per dot-chain step.
        self.methods
            .get(&(receiver_key.to_ascii_lowercase(), name.to_string()))
            .map(|&i| &self.operators[i])
    }

    /// Exact-name system attribute lookup. `name` carries no sigil.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attrs_by_name.get(name).map(|&i| &self.attributes[i])
    }

    /// Case-insensitive attribute lookup, for casing diagnostics: returns
    /// the canonical definition when `name` matches only up to case.
    pub fn attribute_ci(&self, name: &str) -> Option<&AttributeDef> {
        self.attrs_ci
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.attributes[i])
    }

    /// Case-insensitive operator lookup, for casing diagnostics.
    pub fn operator_ci(&self, name: &str) -> Option<&OperatorDef> {
        self.operators_ci
            .get(&name.to_ascii_lowercase())
            .map(|&i| &self.operators[i])
    }

    /// Export tag vocabulary lookup by exact name.
    pub fn export_tag(&self, name: &str) -> Option<&ExportTagDef> {
        self.export_tags_by_name
            .get(name)
            .map(|&i| &self.export_tags[i])
    }

    /// Resolve a bare name to whatever reference data knows about it.
    ///
    /// A leading `$` sigil is stripped before the attribute lookup.
    /// Attributes win over operators, operators over designators, then
    /// colors, then data types — mirroring how often each is asked about.
    pub fn lookup<'a>(&'a self, name: &str) -> Option<CatalogRef<'a>> {
        let bare = name.strip_prefix('$').unwrap_or(name);
        if let Some(attr) = self.attribute(bare) {
            return Some(CatalogRef::Attribute(attr));
        }
        if let Some(op) = self.operators.iter().find(|op| op.name == name) {
            return Some(CatalogRef::Operator(op));
        }
        if let Some(d) = self.designators.iter().find(|d| d.name == name) {
            return Some(CatalogRef::Designator(d));
        }
        if let Some(c) = self.colors.iter().find(|c| c.name == name) {
            return Some(CatalogRef::Color(c));
        }
        if let Some(t) = self.data_types.iter().find(|t| t.name == name) {
            return Some(CatalogRef::DataType(t));
        }
        None
    }

    // ─── Table access (completion lists, hover payloads) ─────────────────

    pub fn operators(&self) -> &[OperatorDef] {
        &self.operators
    }

    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    pub fn data_types(&self) -> &[DataTypeDef] {
        &self.data_types
    }

    pub fn designators(&self) -> &[DesignatorDef] {
        &self.designators
    }

    pub fn colors(&self) -> &[ColorDef] {
        &self.colors
    }

    pub fn export_tags(&self) -> &[ExportTagDef] {
        &self.export_tags
    }

    /// `true` when every table is empty (nothing loaded, or load failed).
    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
            && self.attributes.is_empty()
            && self.data_types.is_empty()
            && self.designators.is_empty()
            && self.colors.is_empty()
            && self.export_tags.is_empty()
    }
}
