//! # Registry
//!
//! The field map and the lookup tables it composes.
//!
//! [`FieldMap`] is the public resolution surface: registration operations
//! populate the tables from declarative rules during setup, and the lookup
//! operations resolve a configuration per field at query time. The tables
//! themselves are exposed for callers that assemble a registry by hand.

pub mod field_map;
pub mod tables;

pub use field_map::{FieldMap, FieldMapStats};
pub use tables::{FieldNameTable, FieldTypeNameTable, TypeMatchTable};
