//! # Configuration Factory
//!
//! Builds configuration variants from declarative rule data.
//!
//! ## Overview
//!
//! The factory is a registered map from factory-type name to constructor:
//! rules name the variant they want (`"text"`, `"date"`, ...), and the
//! registry asks the factory to construct it without compile-time knowledge
//! of every variant. New variants are added through
//! [`register`](ConfigurationFactory::register); nothing is discovered
//! dynamically.
//!
//! ## Usage
//!
//! ```rust
//! use fieldmap_core::configuration::{FieldConfiguration, GenericFieldConfiguration};
//! use fieldmap_core::factory::{ConfigurationFactory, ConstructionRequest};
//! use std::sync::Arc;
//!
//! # fn example() -> fieldmap_core::Result<()> {
//! let mut factory = ConfigurationFactory::with_builtins();
//!
//! // Register a project-specific variant.
//! factory.register("stored_only", |request: ConstructionRequest| {
//!     Ok(Arc::new(GenericFieldConfiguration::new(request.into_base())))
//! });
//!
//! let config = factory.construct(
//!     "stored_only",
//!     ConstructionRequest::for_field_name("title", Default::default(), Default::default()),
//! )?;
//! assert_eq!(config.field_name(), Some("title"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::configuration::{
    ConfigurationBase, DateFieldConfiguration, FieldConfiguration, GenericFieldConfiguration,
    TextFieldConfiguration,
};
use crate::error::{FieldMapError, Result};
use crate::native::NativeType;
use crate::rules::RuleSource;

/// Arguments for constructing one configuration object.
///
/// Exactly one of `field_name` / `type_identifier` is meaningful per call
/// site; registration paths leave the other absent.
#[derive(Debug, Clone)]
pub struct ConstructionRequest {
    pub field_name: Option<String>,
    pub type_identifier: Option<String>,
    pub bound_type: Option<NativeType>,
    pub attributes: BTreeMap<String, String>,
    pub source: RuleSource,
}

impl ConstructionRequest {
    /// Request for a field-by-name registration.
    pub fn for_field_name(
        field_name: impl Into<String>,
        attributes: BTreeMap<String, String>,
        source: RuleSource,
    ) -> Self {
        Self {
            field_name: Some(field_name.into()),
            type_identifier: None,
            bound_type: None,
            attributes,
            source,
        }
    }

    /// Request for a field-type-name registration.
    pub fn for_type_identifier(
        type_identifier: impl Into<String>,
        attributes: BTreeMap<String, String>,
        source: RuleSource,
    ) -> Self {
        Self {
            field_name: None,
            type_identifier: Some(type_identifier.into()),
            bound_type: None,
            attributes,
            source,
        }
    }

    /// Request for a type-match registration.
    pub fn for_bound_type(
        bound_type: NativeType,
        attributes: BTreeMap<String, String>,
        source: RuleSource,
    ) -> Self {
        Self {
            field_name: None,
            type_identifier: None,
            bound_type: Some(bound_type),
            attributes,
            source,
        }
    }

    /// Identifying context for errors: whichever identifier this request
    /// carries.
    pub fn target(&self) -> &str {
        self.field_name
            .as_deref()
            .or(self.type_identifier.as_deref())
            .or_else(|| self.bound_type.as_ref().map(NativeType::name))
            .unwrap_or("<unnamed>")
    }

    pub fn into_base(self) -> ConfigurationBase {
        ConfigurationBase::new(
            self.field_name,
            self.bound_type,
            self.type_identifier,
            self.attributes,
            self.source,
        )
    }
}

type Constructor =
    Box<dyn Fn(ConstructionRequest) -> Result<Arc<dyn FieldConfiguration>> + Send + Sync>;

/// Registered map from factory-type name to configuration constructor.
///
/// Names are matched case-insensitively, like every other string key in
/// this crate.
pub struct ConfigurationFactory {
    constructors: HashMap<String, Constructor>,
}

impl ConfigurationFactory {
    /// Creates an empty factory.
    pub fn new() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Creates a factory with the built-in variants registered:
    /// `generic`, `text` and `date`.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register(GenericFieldConfiguration::VARIANT, |request| {
            Ok(Arc::new(GenericFieldConfiguration::new(
                request.into_base(),
            )))
        });
        factory.register(TextFieldConfiguration::VARIANT, |request| {
            Ok(Arc::new(TextFieldConfiguration::new(request.into_base())?))
        });
        factory.register(DateFieldConfiguration::VARIANT, |request| {
            Ok(Arc::new(DateFieldConfiguration::new(request.into_base())?))
        });
        factory
    }

    /// Registers a constructor under a factory-type name.
    ///
    /// Registering a name twice overwrites the earlier constructor.
    pub fn register<F>(&mut self, factory_type: &str, constructor: F)
    where
        F: Fn(ConstructionRequest) -> Result<Arc<dyn FieldConfiguration>> + Send + Sync + 'static,
    {
        self.constructors
            .insert(factory_type.to_lowercase(), Box::new(constructor));
    }

    /// Constructs a configuration of the named variant.
    ///
    /// Fails with [`FieldMapError::FactoryResolutionError`] for an unknown
    /// factory type and propagates
    /// [`FieldMapError::ConstructionError`] from the constructor itself.
    /// Has no side effects; the caller owns the result.
    pub fn construct(
        &self,
        factory_type: &str,
        request: ConstructionRequest,
    ) -> Result<Arc<dyn FieldConfiguration>> {
        let constructor = self
            .constructors
            .get(&factory_type.to_lowercase())
            .ok_or_else(|| FieldMapError::FactoryResolutionError {
                factory_type: factory_type.to_string(),
            })?;

        debug!(
            factory_type = factory_type,
            target = request.target(),
            "Constructing field configuration"
        );
        constructor(request)
    }

    /// Returns `true` if a constructor is registered under the name.
    pub fn contains(&self, factory_type: &str) -> bool {
        self.constructors.contains_key(&factory_type.to_lowercase())
    }

    /// Number of registered factory types.
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }
}

impl Default for ConfigurationFactory {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl fmt::Debug for ConfigurationFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ConfigurationFactory")
            .field("factory_types", &names)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request_for(name: &str, attributes: &[(&str, &str)]) -> ConstructionRequest {
        let attributes = attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConstructionRequest::for_field_name(name, attributes, RuleSource::default())
    }

    #[test]
    fn test_builtins_registered() {
        let factory = ConfigurationFactory::with_builtins();
        assert!(factory.contains("generic"));
        assert!(factory.contains("text"));
        assert!(factory.contains("date"));
        assert_eq!(factory.len(), 3);
    }

    #[test]
    fn test_factory_names_case_insensitive() {
        let factory = ConfigurationFactory::with_builtins();
        let config = factory.construct("Text", request_for("title", &[])).unwrap();
        assert_eq!(config.variant(), "text");
    }

    #[test]
    fn test_unknown_factory_type() {
        let factory = ConfigurationFactory::with_builtins();
        let err = factory
            .construct("keyword", request_for("title", &[]))
            .unwrap_err();
        assert_eq!(
            err,
            FieldMapError::FactoryResolutionError {
                factory_type: "keyword".to_string()
            }
        );
    }

    #[test]
    fn test_construction_error_propagates() {
        let factory = ConfigurationFactory::with_builtins();
        let err = factory
            .construct("text", request_for("title", &[("boost", "much")]))
            .unwrap_err();
        match err {
            FieldMapError::ConstructionError {
                factory_type,
                target,
                ..
            } => {
                assert_eq!(factory_type, "text");
                assert_eq!(target, "title");
            }
            other => panic!("expected ConstructionError, got {other:?}"),
        }
    }

    #[test]
    fn test_custom_registration() {
        let mut factory = ConfigurationFactory::new();
        factory.register("custom", |request| {
            Ok(Arc::new(GenericFieldConfiguration::new(
                request.into_base(),
            )))
        });

        let config = factory
            .construct(
                "CUSTOM",
                ConstructionRequest::for_type_identifier(
                    "single-line text",
                    BTreeMap::new(),
                    RuleSource::default(),
                ),
            )
            .unwrap();
        assert_eq!(config.type_identifier(), Some("single-line text"));
    }
}
