//! The three lookup tables composed by the field map.
//!
//! The name and type-name tables key off lower-cased strings with
//! last-write-wins semantics; the type-match table is an ordered sequence
//! scanned by exact native-type equality, so first match wins and
//! registration order is observable.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::configuration::FieldConfiguration;
use crate::error::{FieldMapError, Result};
use crate::native::NativeType;

/// Case-insensitive field-name to configuration map. Highest-priority
/// resolution strategy.
#[derive(Debug, Default)]
pub struct FieldNameTable {
    entries: HashMap<String, Arc<dyn FieldConfiguration>>,
}

impl FieldNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under the lower-cased field name, replacing any earlier
    /// entry for the same normalized key.
    pub fn insert(&mut self, field_name: &str, config: Arc<dyn FieldConfiguration>) {
        let key = field_name.to_lowercase();
        if self.entries.insert(key, config).is_some() {
            warn!(
                field_name = field_name,
                "Field name registration replaced an earlier entry"
            );
        }
    }

    /// Exact lookup under the lower-cased name.
    pub fn lookup(&self, field_name: &str) -> Option<Arc<dyn FieldConfiguration>> {
        self.entries.get(&field_name.to_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Case-insensitive type-identifier to configuration map. Second-priority
/// resolution strategy.
#[derive(Debug, Default)]
pub struct FieldTypeNameTable {
    entries: HashMap<String, Arc<dyn FieldConfiguration>>,
}

impl FieldTypeNameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts keyed by the configuration's own type identifier.
    ///
    /// Fails with [`FieldMapError::InvalidArgumentError`] when the
    /// configuration carries no type identifier - a configuration that
    /// cannot be keyed here is a programming error at the call site.
    pub fn insert(&mut self, config: Arc<dyn FieldConfiguration>) -> Result<()> {
        let type_identifier = match config.type_identifier() {
            Some(id) if !id.is_empty() => id,
            _ => {
                return Err(FieldMapError::InvalidArgumentError {
                    argument: "type_identifier".to_string(),
                    reason: "configuration has no type identifier to key on".to_string(),
                })
            }
        };

        let key = type_identifier.to_lowercase();
        if self.entries.insert(key, Arc::clone(&config)).is_some() {
            warn!(
                type_identifier = config.type_identifier(),
                "Field type name registration replaced an earlier entry"
            );
        }
        Ok(())
    }

    /// Exact lookup under the lower-cased identifier.
    pub fn lookup(&self, type_identifier: &str) -> Option<Arc<dyn FieldConfiguration>> {
        self.entries.get(&type_identifier.to_lowercase()).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Ordered sequence of type-bound configurations. Last-resort resolution
/// strategy, scanned in registration order.
#[derive(Debug, Default)]
pub struct TypeMatchTable {
    entries: Vec<Arc<dyn FieldConfiguration>>,
}

impl TypeMatchTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, config: Arc<dyn FieldConfiguration>) {
        self.entries.push(config);
    }

    /// First entry bound to exactly this native type. Later registrations
    /// for the same type are never returned.
    pub fn lookup(&self, native: &NativeType) -> Option<Arc<dyn FieldConfiguration>> {
        self.entries
            .iter()
            .find(|config| config.bound_type() == Some(native))
            .cloned()
    }

    /// All registered entries, in registration order.
    pub fn entries(&self) -> &[Arc<dyn FieldConfiguration>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{ConfigurationBase, GenericFieldConfiguration};
    use crate::rules::RuleSource;
    use std::collections::BTreeMap;

    fn named(field_name: &str) -> Arc<dyn FieldConfiguration> {
        Arc::new(GenericFieldConfiguration::new(ConfigurationBase::new(
            Some(field_name.to_string()),
            None,
            None,
            BTreeMap::new(),
            RuleSource::default(),
        )))
    }

    fn typed(type_identifier: &str) -> Arc<dyn FieldConfiguration> {
        Arc::new(GenericFieldConfiguration::new(ConfigurationBase::new(
            None,
            None,
            Some(type_identifier.to_string()),
            BTreeMap::new(),
            RuleSource::default(),
        )))
    }

    fn bound(native: &NativeType) -> Arc<dyn FieldConfiguration> {
        Arc::new(GenericFieldConfiguration::new(ConfigurationBase::new(
            None,
            Some(native.clone()),
            None,
            BTreeMap::new(),
            RuleSource::default(),
        )))
    }

    #[test]
    fn test_field_name_table_normalizes_case() {
        let mut table = FieldNameTable::new();
        let config = named("Title");
        table.insert("Title", Arc::clone(&config));

        let found = table.lookup("tItLe").unwrap();
        assert!(Arc::ptr_eq(&found, &config));
    }

    #[test]
    fn test_field_name_table_last_write_wins() {
        let mut table = FieldNameTable::new();
        table.insert("title", named("title"));
        let replacement = named("TITLE");
        table.insert("TITLE", Arc::clone(&replacement));

        assert_eq!(table.len(), 1);
        assert!(Arc::ptr_eq(&table.lookup("title").unwrap(), &replacement));
    }

    #[test]
    fn test_type_name_table_requires_identifier() {
        let mut table = FieldTypeNameTable::new();
        let err = table.insert(named("title")).unwrap_err();
        assert!(matches!(err, FieldMapError::InvalidArgumentError { .. }));
        assert!(table.is_empty());
    }

    #[test]
    fn test_type_name_table_lookup() {
        let mut table = FieldTypeNameTable::new();
        let config = typed("Single-Line Text");
        table.insert(Arc::clone(&config)).unwrap();

        let found = table.lookup("single-line text").unwrap();
        assert!(Arc::ptr_eq(&found, &config));
        assert!(table.lookup("multi-line text").is_none());
    }

    #[test]
    fn test_type_match_table_first_match_wins() {
        let native = NativeType::of::<i64>("system.int64");
        let first = bound(&native);
        let second = bound(&native);

        let mut table = TypeMatchTable::new();
        table.push(Arc::clone(&first));
        table.push(Arc::clone(&second));

        let found = table.lookup(&native).unwrap();
        assert!(Arc::ptr_eq(&found, &first));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_type_match_table_exact_equality() {
        let mut table = TypeMatchTable::new();
        table.push(bound(&NativeType::of::<i64>("system.int64")));

        assert!(table.lookup(&NativeType::of::<i32>("system.int32")).is_none());
        assert!(table.lookup(&NativeType::of::<i64>("long")).is_some());
    }

    #[test]
    fn test_type_match_table_preserves_order() {
        let int64 = NativeType::of::<i64>("system.int64");
        let boolean = NativeType::of::<bool>("system.boolean");

        let mut table = TypeMatchTable::new();
        table.push(bound(&int64));
        table.push(bound(&boolean));

        let bound_types: Vec<&str> = table
            .entries()
            .iter()
            .filter_map(|c| c.bound_type().map(NativeType::name))
            .collect();
        assert_eq!(bound_types, ["system.int64", "system.boolean"]);
    }
}
