//! # Native Type Registry
//!
//! Runtime-type handles and the name-to-type resolver used by the
//! type-match resolution path.
//!
//! ## Overview
//!
//! Declarative rules and field descriptors refer to native runtime types by
//! name (`"system.datetime"`, `"integer"`, ...). The [`TypeResolver`] is an
//! explicitly-populated, case-insensitive table mapping those names to
//! [`NativeType`] handles; there is no dynamic type loading. Resolution is
//! best-effort and never fails - an unknown name is simply `None`.
//!
//! Two [`NativeType`]s are equal exactly when they identify the same Rust
//! type. The type-match table relies on this strict equality; no subtype or
//! assignability matching is performed.

use std::any::TypeId;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Handle for a native runtime type: its `TypeId` plus the canonical name
/// it was registered under.
#[derive(Debug, Clone)]
pub struct NativeType {
    id: TypeId,
    name: Arc<str>,
}

impl NativeType {
    /// Creates a handle for `T` under the given canonical name.
    pub fn of<T: 'static>(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: name.into(),
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Canonical registered name, for diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` if this handle identifies `T`.
    pub fn is<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

// Equality is by type identity alone; the name is diagnostic.
impl PartialEq for NativeType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for NativeType {}

impl Hash for NativeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Case-insensitive table of registered native types.
///
/// Replaces dynamic type loading with an explicit registration API: every
/// type a rule or field may name must be registered here first.
#[derive(Debug, Clone, Default)]
pub struct TypeResolver {
    types: HashMap<String, NativeType>,
}

impl TypeResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver pre-populated with the standard field value
    /// types used by indexing pipelines.
    pub fn with_builtins() -> Self {
        let mut resolver = Self::new();
        resolver.register::<String>("system.string", &["string", "text"]);
        resolver.register::<i32>("system.int32", &["int"]);
        resolver.register::<i64>("system.int64", &["integer", "long"]);
        resolver.register::<f64>("system.double", &["float", "double"]);
        resolver.register::<bool>("system.boolean", &["boolean", "bool"]);
        resolver.register::<chrono::DateTime<chrono::Utc>>("system.datetime", &["datetime"]);
        resolver.register::<chrono::NaiveDate>("system.date", &["date"]);
        resolver.register::<uuid::Uuid>("system.guid", &["guid", "uniqueidentifier"]);
        resolver
    }

    /// Registers `T` under a canonical name and any number of aliases.
    ///
    /// All names are matched case-insensitively. Registering a name twice
    /// overwrites the earlier entry (last write wins).
    pub fn register<T: 'static>(&mut self, canonical: &str, aliases: &[&str]) {
        let native = NativeType::of::<T>(canonical.to_lowercase());
        self.register_native(native, aliases);
    }

    /// Registers an existing handle under its canonical name and aliases.
    pub fn register_native(&mut self, native: NativeType, aliases: &[&str]) {
        self.types
            .insert(native.name().to_lowercase(), native.clone());
        for alias in aliases {
            self.types.insert(alias.to_lowercase(), native.clone());
        }
    }

    /// Best-effort, case-insensitive lookup. Never errors.
    pub fn resolve(&self, name: &str) -> Option<NativeType> {
        if name.is_empty() {
            return None;
        }
        self.types.get(&name.to_lowercase()).cloned()
    }

    /// Number of registered names (aliases counted individually).
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_case_insensitive() {
        let resolver = TypeResolver::with_builtins();
        let lower = resolver.resolve("system.datetime").unwrap();
        let mixed = resolver.resolve("System.DateTime").unwrap();
        assert_eq!(lower, mixed);
        assert!(lower.is::<chrono::DateTime<chrono::Utc>>());
    }

    #[test]
    fn test_resolve_unknown_is_none() {
        let resolver = TypeResolver::with_builtins();
        assert!(resolver.resolve("system.stream").is_none());
        assert!(resolver.resolve("").is_none());
    }

    #[test]
    fn test_aliases_share_identity() {
        let resolver = TypeResolver::with_builtins();
        let canonical = resolver.resolve("system.int64").unwrap();
        let alias = resolver.resolve("Integer").unwrap();
        assert_eq!(canonical, alias);
        // Canonical name survives alias registration.
        assert_eq!(alias.name(), "system.int64");
    }

    #[test]
    fn test_equality_ignores_name() {
        let a = NativeType::of::<String>("system.string");
        let b = NativeType::of::<String>("text");
        let c = NativeType::of::<i64>("system.int64");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_register_custom_type() {
        struct DocumentRef;
        let mut resolver = TypeResolver::new();
        resolver.register::<DocumentRef>("custom.documentref", &["docref"]);

        let resolved = resolver.resolve("DocRef").unwrap();
        assert!(resolved.is::<DocumentRef>());
        assert_eq!(resolved.name(), "custom.documentref");
    }

    #[test]
    fn test_last_registration_wins() {
        let mut resolver = TypeResolver::new();
        resolver.register::<i32>("number", &[]);
        resolver.register::<i64>("number", &[]);
        assert!(resolver.resolve("number").unwrap().is::<i64>());
    }
}
