//! Error types for registry population and configuration construction.

use thiserror::Error;

/// Errors raised while populating the field map from declarative rules.
///
/// Lookup operations never produce these: a missing configuration is an
/// `Option::None`, not an error. Everything here is fatal to setup and
/// carries the identifying context of the offending rule.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldMapError {
    /// Malformed or incomplete declarative rule (missing required
    /// attribute, unresolvable type name).
    #[error("Unable to process '{rule}' rule: {reason}")]
    ConfigurationError { rule: String, reason: String },

    /// No constructor is registered for the requested factory type.
    #[error("No configuration factory registered for '{factory_type}'")]
    FactoryResolutionError { factory_type: String },

    /// A registered constructor failed to build the configuration.
    #[error("Unable to create '{factory_type}' configuration for '{target}': {reason}")]
    ConstructionError {
        factory_type: String,
        target: String,
        reason: String,
    },

    /// A caller passed an empty or otherwise unusable key where one is
    /// required. Signals programmer error at the call site.
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgumentError { argument: String, reason: String },
}

pub type Result<T> = std::result::Result<T, FieldMapError>;
