//! # Fieldmap Core
//!
//! Field-configuration resolution registry for document-indexing
//! pipelines.
//!
//! ## Overview
//!
//! When a document field is about to be indexed, the pipeline needs the
//! configuration object that governs how that field is analyzed, stored
//! and queried. This crate answers that question: declarative rules
//! populate a registry of three lookup tables - by field name, by declared
//! storage type name, and by native runtime type - and a deterministic
//! fallback chain resolves the first matching configuration per field,
//! optionally filtered by a caller-supplied acceptance predicate.
//!
//! ## Architecture
//!
//! Configuration variants are built by a **registered factory map**: rules
//! name the variant they want and [`ConfigurationFactory`] constructs it,
//! so new variants plug in through an explicit registration API without
//! the registry knowing every variant at compile time. Native runtime
//! types are likewise resolved through an explicitly-populated
//! [`TypeResolver`] rather than any dynamic type loading.
//!
//! Population and querying are separate phases: registration operations
//! take `&mut FieldMap`, lookups take `&FieldMap`. Publish the populated
//! map (behind an `Arc` when shared) and query it from any number of
//! threads without locking.
//!
//! ## Module Organization
//!
//! - [`registry`] - The [`FieldMap`] resolver and its lookup tables
//! - [`configuration`] - Configuration objects and built-in variants
//! - [`factory`] - Declarative construction of configuration variants
//! - [`rules`] - Parsed rule records handed over by the config parser
//! - [`native`] - Native runtime-type handles and the name resolver
//! - [`field`] - The indexing pipeline's view of a document field
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust
//! use fieldmap_core::{FieldConfiguration, FieldDescriptor, FieldMap};
//!
//! # fn example() -> fieldmap_core::Result<()> {
//! let mut map = FieldMap::new();
//! map.add_field_by_field_name(
//!     "title",
//!     Some("text"),
//!     [("boost".to_string(), "2.0".to_string())].into(),
//!     Default::default(),
//! )?;
//! map.add_field_by_field_type_name(
//!     "date",
//!     "datetime|system.datetime",
//!     Default::default(),
//!     Default::default(),
//! )?;
//!
//! // Name match wins over everything else, case-insensitively.
//! let title = FieldDescriptor::new("Title", "single-line text");
//! assert_eq!(map.get_field_configuration(&title).unwrap().variant(), "text");
//!
//! // Anonymous field falls through to the declared type name.
//! let created = FieldDescriptor::new("", "System.DateTime");
//! assert_eq!(map.get_field_configuration(&created).unwrap().variant(), "date");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod configuration;
pub mod error;
pub mod factory;
pub mod field;
pub mod native;
pub mod registry;
pub mod rules;

pub use configuration::{
    ConfigurationBase, DateFieldConfiguration, FieldConfiguration, GenericFieldConfiguration,
    TextFieldConfiguration,
};
pub use error::{FieldMapError, Result};
pub use factory::{ConfigurationFactory, ConstructionRequest};
pub use field::{FieldDescriptor, IndexableField};
pub use native::{NativeType, TypeResolver};
pub use registry::{FieldMap, FieldMapStats};
pub use rules::{FieldRule, RuleKind, RuleSource};
