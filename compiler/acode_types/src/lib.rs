//! Type inference and reference data for Action Code.
//!
//! Two halves:
//!
//! - [`registry`] — the read-only reference-data catalog: operators,
//!   system attributes, data types, designators, named colors, and export
//!   tags, loaded once per session from tabular sources and never mutated
//!   afterwards. The [`Catalog`] value is passed explicitly into every
//!   function that needs it; there is no global.
//! - [`infer`] — best-effort expression type inference over raw expression
//!   text, including dot-chains resolved through the catalog's method
//!   tables. Returns [`Ty::Unknown`] instead of failing; it never panics.

pub mod infer;
pub mod registry;
mod ty;

pub use infer::{infer, LocalTypes};
pub use registry::{
    load_catalog, AttributeDef, Catalog, CatalogRef, CatalogSources, ColorDef, DataTypeDef,
    DesignatorDef, ExportTagDef, LoadError, Locale, OperatorDef, EXPRESSION_TAGS,
};
pub use ty::{is_compatible, Ty};
