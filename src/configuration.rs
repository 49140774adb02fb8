//! # Field Configurations
//!
//! The configuration objects resolved by the registry.
//!
//! ## Overview
//!
//! A field configuration is an immutable value built once from a
//! declarative rule: the declared storage type it targets, the field name
//! it was registered under (when registered by name), a flat attribute bag,
//! and the native runtime type it is bound to (for type-match entries).
//!
//! Concrete variants implement [`FieldConfiguration`] over a shared
//! [`ConfigurationBase`]; the indexing pipeline selects a variant once at
//! resolution time and holds it as `Arc<dyn FieldConfiguration>`. Variants
//! differ in the attribute validation they apply at construction; the
//! analyzed/stored behavior a variant controls downstream is owned by the
//! pipeline, not this crate.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{FieldMapError, Result};
use crate::native::NativeType;
use crate::rules::RuleSource;

/// Immutable data shared by every configuration variant.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigurationBase {
    field_name: Option<String>,
    type_identifier: Option<String>,
    bound_type: Option<NativeType>,
    attributes: BTreeMap<String, String>,
    source: RuleSource,
}

impl ConfigurationBase {
    pub fn new(
        field_name: Option<String>,
        bound_type: Option<NativeType>,
        type_identifier: Option<String>,
        attributes: BTreeMap<String, String>,
        source: RuleSource,
    ) -> Self {
        Self {
            field_name,
            type_identifier,
            bound_type,
            attributes,
            source,
        }
    }

    /// Field name this configuration was registered under, when registered
    /// by exact name.
    pub fn field_name(&self) -> Option<&str> {
        self.field_name.as_deref()
    }

    /// Declared storage type this configuration targets.
    pub fn type_identifier(&self) -> Option<&str> {
        self.type_identifier.as_deref()
    }

    /// Native runtime type this configuration is bound to, for type-match
    /// entries.
    pub fn bound_type(&self) -> Option<&NativeType> {
        self.bound_type.as_ref()
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Declarative rule this configuration was built from.
    pub fn source(&self) -> &RuleSource {
        &self.source
    }

    /// Identifying context for errors and log fields: the field name or
    /// type identifier, whichever the registration path supplied.
    pub fn target(&self) -> &str {
        self.field_name()
            .or_else(|| self.type_identifier())
            .or_else(|| self.bound_type.as_ref().map(NativeType::name))
            .unwrap_or("<unnamed>")
    }
}

/// A resolved field configuration.
///
/// Variants expose the shared data through [`base`](Self::base); the
/// delegating accessors exist so call sites never reach through the base
/// explicitly.
pub trait FieldConfiguration: fmt::Debug + Send + Sync {
    /// Shared configuration data.
    fn base(&self) -> &ConfigurationBase;

    /// Name of the concrete variant, matching the factory type it is
    /// registered under.
    fn variant(&self) -> &str;

    fn field_name(&self) -> Option<&str> {
        self.base().field_name()
    }

    fn type_identifier(&self) -> Option<&str> {
        self.base().type_identifier()
    }

    fn bound_type(&self) -> Option<&NativeType> {
        self.base().bound_type()
    }

    fn attributes(&self) -> &BTreeMap<String, String> {
        self.base().attributes()
    }

    fn attribute(&self, key: &str) -> Option<&str> {
        self.base().attribute(key)
    }
}

/// Attribute-bag-only configuration.
///
/// Also the bare override inserted when a field-by-name rule names no
/// factory type at all.
#[derive(Debug, Clone)]
pub struct GenericFieldConfiguration {
    base: ConfigurationBase,
}

impl GenericFieldConfiguration {
    pub const VARIANT: &'static str = "generic";

    pub fn new(base: ConfigurationBase) -> Self {
        Self { base }
    }

    /// Bare configuration carrying only attributes.
    pub fn with_attributes(attributes: BTreeMap<String, String>) -> Self {
        Self {
            base: ConfigurationBase::new(None, None, None, attributes, RuleSource::default()),
        }
    }
}

impl FieldConfiguration for GenericFieldConfiguration {
    fn base(&self) -> &ConfigurationBase {
        &self.base
    }

    fn variant(&self) -> &str {
        Self::VARIANT
    }
}

/// Configuration for analyzed text fields.
///
/// Validates at construction that any `boost` attribute parses as a
/// finite, positive float.
#[derive(Debug, Clone)]
pub struct TextFieldConfiguration {
    base: ConfigurationBase,
    boost: f32,
}

impl TextFieldConfiguration {
    pub const VARIANT: &'static str = "text";

    pub fn new(base: ConfigurationBase) -> Result<Self> {
        let boost = match base.attribute("boost") {
            None => 1.0,
            Some(raw) => match raw.parse::<f32>() {
                Ok(value) if value.is_finite() && value > 0.0 => value,
                _ => {
                    return Err(FieldMapError::ConstructionError {
                        factory_type: Self::VARIANT.to_string(),
                        target: base.target().to_string(),
                        reason: format!("boost '{raw}' is not a positive finite number"),
                    })
                }
            },
        };
        Ok(Self { base, boost })
    }

    pub fn boost(&self) -> f32 {
        self.boost
    }
}

impl FieldConfiguration for TextFieldConfiguration {
    fn base(&self) -> &ConfigurationBase {
        &self.base
    }

    fn variant(&self) -> &str {
        Self::VARIANT
    }
}

/// Configuration for date/time fields.
///
/// Validates at construction that any `format` attribute is non-empty.
#[derive(Debug, Clone)]
pub struct DateFieldConfiguration {
    base: ConfigurationBase,
    format: Option<String>,
}

impl DateFieldConfiguration {
    pub const VARIANT: &'static str = "date";

    pub fn new(base: ConfigurationBase) -> Result<Self> {
        let format = match base.attribute("format") {
            None => None,
            Some("") => {
                return Err(FieldMapError::ConstructionError {
                    factory_type: Self::VARIANT.to_string(),
                    target: base.target().to_string(),
                    reason: "format attribute is empty".to_string(),
                })
            }
            Some(fmt) => Some(fmt.to_string()),
        };
        Ok(Self { base, format })
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}

impl FieldConfiguration for DateFieldConfiguration {
    fn base(&self) -> &ConfigurationBase {
        &self.base
    }

    fn variant(&self) -> &str {
        Self::VARIANT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_with(attributes: &[(&str, &str)]) -> ConfigurationBase {
        let attributes = attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ConfigurationBase::new(
            Some("title".to_string()),
            None,
            None,
            attributes,
            RuleSource::default(),
        )
    }

    #[test]
    fn test_base_accessors() {
        let base = base_with(&[("boost", "2.0")]);
        assert_eq!(base.field_name(), Some("title"));
        assert_eq!(base.attribute("boost"), Some("2.0"));
        assert_eq!(base.attribute("missing"), None);
        assert_eq!(base.target(), "title");
    }

    #[test]
    fn test_generic_bare_override() {
        let config = GenericFieldConfiguration::with_attributes(
            [("stored".to_string(), "true".to_string())].into(),
        );
        assert_eq!(config.variant(), "generic");
        assert_eq!(config.attribute("stored"), Some("true"));
        assert!(config.field_name().is_none());
        assert!(config.type_identifier().is_none());
    }

    #[test]
    fn test_text_default_boost() {
        let config = TextFieldConfiguration::new(base_with(&[])).unwrap();
        assert_eq!(config.boost(), 1.0);
    }

    #[test]
    fn test_text_parses_boost() {
        let config = TextFieldConfiguration::new(base_with(&[("boost", "2.5")])).unwrap();
        assert_eq!(config.boost(), 2.5);
    }

    #[test]
    fn test_text_rejects_bad_boost() {
        for bad in ["abc", "-1", "0", "inf", "NaN"] {
            let err = TextFieldConfiguration::new(base_with(&[("boost", bad)])).unwrap_err();
            match err {
                FieldMapError::ConstructionError { target, .. } => assert_eq!(target, "title"),
                other => panic!("expected ConstructionError, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_date_rejects_empty_format() {
        assert!(DateFieldConfiguration::new(base_with(&[("format", "")])).is_err());
        let config = DateFieldConfiguration::new(base_with(&[("format", "%Y-%m-%d")])).unwrap();
        assert_eq!(config.format(), Some("%Y-%m-%d"));
    }
}
