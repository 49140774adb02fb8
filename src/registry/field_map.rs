//! # Field Map
//!
//! The field-configuration resolution registry.
//!
//! ## Overview
//!
//! The [`FieldMap`] owns three lookup tables populated from declarative
//! rules at setup time and consulted in a fixed priority order at query
//! time:
//!
//! 1. **Field name** - exact, case-insensitive match on the field's name
//! 2. **Field type name** - case-insensitive match on the declared storage
//!    type identifier
//! 3. **Resolved native type** - the type identifier resolved to a
//!    registered native type, matched against the type-match entries
//! 4. **Native field type** - the field's own native type, matched against
//!    the type-match entries
//!
//! Each step is skipped when its precondition fails, and a candidate the
//! caller's acceptance predicate rejects only disqualifies that candidate -
//! resolution continues with the next step. Absence is never an error.
//!
//! ## Usage
//!
//! ```rust
//! use fieldmap_core::configuration::FieldConfiguration;
//! use fieldmap_core::field::FieldDescriptor;
//! use fieldmap_core::registry::FieldMap;
//!
//! # fn example() -> fieldmap_core::Result<()> {
//! let mut map = FieldMap::new();
//! map.add_field_by_field_name(
//!     "title",
//!     Some("text"),
//!     [("boost".to_string(), "2.0".to_string())].into(),
//!     Default::default(),
//! )?;
//!
//! let field = FieldDescriptor::new("Title", "single-line text");
//! let config = map.get_field_configuration(&field).expect("title is registered");
//! assert_eq!(config.variant(), "text");
//! assert_eq!(config.attribute("boost"), Some("2.0"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! Registration takes `&mut self` and lookups take `&self`: populate the
//! map during setup, then publish it (behind an `Arc` if shared across
//! threads) and query it concurrently without locking.

use std::collections::BTreeMap;
use std::iter;
use std::sync::Arc;

use tracing::{debug, info};

use crate::configuration::{ConfigurationBase, FieldConfiguration, GenericFieldConfiguration};
use crate::error::{FieldMapError, Result};
use crate::factory::{ConfigurationFactory, ConstructionRequest};
use crate::field::IndexableField;
use crate::native::{NativeType, TypeResolver};
use crate::registry::tables::{FieldNameTable, FieldTypeNameTable, TypeMatchTable};
use crate::rules::{FieldRule, RuleKind, RuleSource};

/// Entry counts per table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapStats {
    pub field_name_entries: usize,
    pub field_type_name_entries: usize,
    pub type_match_entries: usize,
}

/// Field-configuration resolution registry.
///
/// Composes the three lookup tables, the configuration factory that builds
/// entries from rules, and the native-type resolver used by the type-match
/// path.
#[derive(Debug)]
pub struct FieldMap {
    field_name_map: FieldNameTable,
    field_type_name_map: FieldTypeNameTable,
    available_types: TypeMatchTable,
    factory: ConfigurationFactory,
    resolver: TypeResolver,
}

impl FieldMap {
    /// Creates a field map with the built-in configuration variants and
    /// native types registered.
    pub fn new() -> Self {
        Self::with_parts(
            ConfigurationFactory::with_builtins(),
            TypeResolver::with_builtins(),
        )
    }

    /// Creates a field map around a caller-assembled factory and resolver.
    pub fn with_parts(factory: ConfigurationFactory, resolver: TypeResolver) -> Self {
        Self {
            field_name_map: FieldNameTable::new(),
            field_type_name_map: FieldTypeNameTable::new(),
            available_types: TypeMatchTable::new(),
            factory,
            resolver,
        }
    }

    /// The configuration factory, for registering project-specific
    /// variants before population.
    pub fn factory_mut(&mut self) -> &mut ConfigurationFactory {
        &mut self.factory
    }

    /// The native-type resolver, for registering project-specific types
    /// before population.
    pub fn type_resolver_mut(&mut self) -> &mut TypeResolver {
        &mut self.resolver
    }

    pub fn type_resolver(&self) -> &TypeResolver {
        &self.resolver
    }

    // ── Population ─────────────────────────────────────────────

    /// Applies a batch of declarative rules in order.
    ///
    /// Stops at the first failing rule; a malformed rule is fatal to
    /// setup, not skipped.
    pub fn apply_rules<'a>(&mut self, rules: impl IntoIterator<Item = &'a FieldRule>) -> Result<()> {
        for rule in rules {
            self.apply_rule(rule)?;
        }
        Ok(())
    }

    /// Applies one declarative rule, dispatching on its kind.
    pub fn apply_rule(&mut self, rule: &FieldRule) -> Result<()> {
        match rule.kind {
            RuleKind::TypeMatch => {
                let type_name = rule.require("type_name", rule.type_name.as_deref())?;
                let factory_type = rule.require("factory_type", rule.factory_type.as_deref())?;
                self.add_type_match(
                    type_name,
                    factory_type,
                    rule.attributes.clone(),
                    rule.source.clone(),
                )
            }
            RuleKind::FieldByName => {
                let field_name = rule.require("field_name", rule.field_name.as_deref())?;
                self.add_field_by_field_name(
                    field_name,
                    rule.factory_type.as_deref(),
                    rule.attributes.clone(),
                    rule.source.clone(),
                )
            }
            RuleKind::FieldByTypeName => {
                let field_type_names =
                    rule.require("field_type_names", rule.field_type_names.as_deref())?;
                let factory_type = rule.require("factory_type", rule.factory_type.as_deref())?;
                self.add_field_by_field_type_name(
                    factory_type,
                    field_type_names,
                    rule.attributes.clone(),
                    rule.source.clone(),
                )
            }
        }
    }

    /// Registers a type-match entry: a configuration bound to the native
    /// type `type_name` resolves to.
    ///
    /// Fails with [`FieldMapError::ConfigurationError`] when `type_name`
    /// does not resolve to a registered native type.
    pub fn add_type_match(
        &mut self,
        type_name: &str,
        factory_type: &str,
        attributes: BTreeMap<String, String>,
        source: RuleSource,
    ) -> Result<()> {
        let bound_type = self.resolver.resolve(type_name).ok_or_else(|| {
            FieldMapError::ConfigurationError {
                rule: RuleKind::TypeMatch.as_str().to_string(),
                reason: format!(
                    "'{type_name}' does not resolve to a registered native type (rule {source})"
                ),
            }
        })?;

        let request = ConstructionRequest::for_bound_type(bound_type, attributes, source);
        let config = self.factory.construct(factory_type, request)?;

        info!(
            type_name = type_name,
            factory_type = factory_type,
            "Registered type-match configuration"
        );
        self.available_types.push(config);
        Ok(())
    }

    /// Registers a configuration under an exact field name.
    ///
    /// With no factory type, a bare attribute-only configuration is
    /// inserted (the generic override case). The name is the highest
    /// priority key at resolution time.
    pub fn add_field_by_field_name(
        &mut self,
        field_name: &str,
        factory_type: Option<&str>,
        attributes: BTreeMap<String, String>,
        source: RuleSource,
    ) -> Result<()> {
        if field_name.is_empty() {
            return Err(FieldMapError::InvalidArgumentError {
                argument: "field_name".to_string(),
                reason: "field name must not be empty".to_string(),
            });
        }

        let config = match factory_type {
            None => Arc::new(GenericFieldConfiguration::new(ConfigurationBase::new(
                Some(field_name.to_string()),
                None,
                None,
                attributes,
                source,
            ))) as Arc<dyn FieldConfiguration>,
            Some(factory_type) => self.factory.construct(
                factory_type,
                ConstructionRequest::for_field_name(field_name, attributes, source),
            )?,
        };

        info!(field_name = field_name, "Registered field-name configuration");
        self.field_name_map.insert(field_name, config);
        Ok(())
    }

    /// Registers configurations under one or more declared storage type
    /// names.
    ///
    /// `field_type_names` is pipe-delimited; empty segments are discarded.
    /// Each surviving identifier gets its own distinct configuration
    /// sharing the rule's attributes.
    pub fn add_field_by_field_type_name(
        &mut self,
        factory_type: &str,
        field_type_names: &str,
        attributes: BTreeMap<String, String>,
        source: RuleSource,
    ) -> Result<()> {
        for type_identifier in field_type_names.split('|').filter(|s| !s.is_empty()) {
            let request = ConstructionRequest::for_type_identifier(
                type_identifier,
                attributes.clone(),
                source.clone(),
            );
            let config = self.factory.construct(factory_type, request)?;
            self.add(config)?;
            debug!(
                type_identifier = type_identifier,
                factory_type = factory_type,
                "Registered field-type-name configuration"
            );
        }
        Ok(())
    }

    /// Inserts an already-constructed configuration keyed by its type
    /// identifier.
    ///
    /// Fails with [`FieldMapError::InvalidArgumentError`] when the
    /// configuration carries no type identifier.
    pub fn add(&mut self, config: Arc<dyn FieldConfiguration>) -> Result<()> {
        self.field_type_name_map.insert(config)
    }

    // ── Resolution ─────────────────────────────────────────────

    /// Resolves the configuration governing `field`, accepting the first
    /// candidate found.
    pub fn get_field_configuration(
        &self,
        field: &dyn IndexableField,
    ) -> Option<Arc<dyn FieldConfiguration>> {
        self.get_field_configuration_with(field, |_| true)
    }

    /// Resolves the configuration governing `field` with a caller-supplied
    /// acceptance predicate.
    ///
    /// The strategies run in priority order as a lazy chain; the first
    /// accepted candidate wins. A step whose precondition fails yields no
    /// candidate, and a rejected candidate does not stop the chain.
    pub fn get_field_configuration_with<F>(
        &self,
        field: &dyn IndexableField,
        accept: F,
    ) -> Option<Arc<dyn FieldConfiguration>>
    where
        F: Fn(&dyn FieldConfiguration) -> bool,
    {
        let resolved = iter::once_with(|| self.candidate_by_field_name(field))
            .chain(iter::once_with(|| self.candidate_by_type_key(field)))
            .chain(iter::once_with(|| self.candidate_by_resolved_type(field)))
            .chain(iter::once_with(|| self.candidate_by_native_type(field)))
            .flatten()
            .find(|config| accept(config.as_ref()));

        match &resolved {
            Some(config) => debug!(
                field_name = field.name(),
                variant = config.variant(),
                "Resolved field configuration"
            ),
            None => debug!(
                field_name = field.name(),
                type_key = field.type_key(),
                "No field configuration matched"
            ),
        }
        resolved
    }

    /// Field-name lookup only, no predicate - for callers that already
    /// know they want name-based resolution.
    pub fn get_field_configuration_by_name(
        &self,
        field_name: &str,
    ) -> Option<Arc<dyn FieldConfiguration>> {
        self.field_name_map.lookup(field_name)
    }

    /// First type-match entry bound to exactly this native type.
    pub fn get_field_configuration_by_type(
        &self,
        native: &NativeType,
    ) -> Option<Arc<dyn FieldConfiguration>> {
        self.available_types.lookup(native)
    }

    /// Direct field-type-name lookup, case-insensitive.
    pub fn get_field_configuration_by_field_type_name(
        &self,
        type_identifier: &str,
    ) -> Option<Arc<dyn FieldConfiguration>> {
        self.field_type_name_map.lookup(type_identifier)
    }

    /// All registered type-match entries, in registration order.
    pub fn available_types(&self) -> &[Arc<dyn FieldConfiguration>] {
        self.available_types.entries()
    }

    pub fn stats(&self) -> FieldMapStats {
        FieldMapStats {
            field_name_entries: self.field_name_map.len(),
            field_type_name_entries: self.field_type_name_map.len(),
            type_match_entries: self.available_types.len(),
        }
    }

    // ── Strategies ─────────────────────────────────────────────

    fn candidate_by_field_name(
        &self,
        field: &dyn IndexableField,
    ) -> Option<Arc<dyn FieldConfiguration>> {
        let name = field.name();
        if name.is_empty() {
            return None;
        }
        self.field_name_map.lookup(name)
    }

    fn candidate_by_type_key(
        &self,
        field: &dyn IndexableField,
    ) -> Option<Arc<dyn FieldConfiguration>> {
        self.field_type_name_map.lookup(field.type_key())
    }

    fn candidate_by_resolved_type(
        &self,
        field: &dyn IndexableField,
    ) -> Option<Arc<dyn FieldConfiguration>> {
        let native = self.resolver.resolve(field.type_key())?;
        self.available_types.lookup(&native)
    }

    fn candidate_by_native_type(
        &self,
        field: &dyn IndexableField,
    ) -> Option<Arc<dyn FieldConfiguration>> {
        field
            .native_type()
            .and_then(|native| self.available_types.lookup(native))
    }
}

impl Default for FieldMap {
    fn default() -> Self {
        Self::new()
    }
}
