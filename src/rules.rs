//! Declarative rule records handed over by the configuration parser.
//!
//! The registry never sees raw configuration markup. The external parser
//! extracts each rule into a [`FieldRule`] - a kind tag, a factory type
//! name, a flat attribute bag, and the identifier fields the kind needs -
//! and hands the records to [`FieldMap::apply_rules`](crate::FieldMap::apply_rules).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::error::{FieldMapError, Result};

/// Which registration operation a declarative rule targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Bind a configuration to a native runtime type (last-resort lookup).
    TypeMatch,
    /// Bind a configuration to an exact field name.
    FieldByName,
    /// Bind a configuration to one or more declared storage type names.
    FieldByTypeName,
}

impl RuleKind {
    /// Stable name used in error messages and log fields.
    pub fn as_str(&self) -> &'static str {
        match self {
            RuleKind::TypeMatch => "type_match",
            RuleKind::FieldByName => "field_by_name",
            RuleKind::FieldByTypeName => "field_by_type_name",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a rule came from, for diagnostics only.
///
/// Population typically runs across many rules read from one configuration
/// source; every setup error names the rule it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSource {
    /// Configuration document the rule was parsed from.
    pub document: Option<String>,
    /// Position of the rule within the document.
    pub entry: Option<usize>,
}

impl RuleSource {
    pub fn new(document: impl Into<String>, entry: usize) -> Self {
        Self {
            document: Some(document.into()),
            entry: Some(entry),
        }
    }

    /// Human-readable provenance for error messages.
    pub fn describe(&self) -> String {
        match (&self.document, self.entry) {
            (Some(doc), Some(entry)) => format!("{doc}#{entry}"),
            (Some(doc), None) => doc.clone(),
            (None, Some(entry)) => format!("#{entry}"),
            (None, None) => "<unknown source>".to_string(),
        }
    }
}

impl fmt::Display for RuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// One already-parsed declarative rule.
///
/// Which optional fields must be present depends on [`kind`](Self::kind):
/// `type_match` needs `type_name` and `factory_type`; `field_by_name` needs
/// `field_name` (factory type optional); `field_by_type_name` needs
/// `field_type_names` (pipe-delimited) and `factory_type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldRule {
    /// Which registration operation this rule targets.
    pub kind: RuleKind,

    /// Named configuration variant to construct.
    #[serde(default)]
    pub factory_type: Option<String>,

    /// Exact field name, for `field_by_name` rules.
    #[serde(default)]
    pub field_name: Option<String>,

    /// Native runtime type name, for `type_match` rules.
    #[serde(default)]
    pub type_name: Option<String>,

    /// Declared storage type name(s), pipe-delimited, for
    /// `field_by_type_name` rules.
    #[serde(default)]
    pub field_type_names: Option<String>,

    /// Declarative key/value settings carried onto the configuration.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,

    /// Provenance, for diagnostics.
    #[serde(default)]
    pub source: RuleSource,
}

impl FieldRule {
    pub fn new(kind: RuleKind) -> Self {
        Self {
            kind,
            factory_type: None,
            field_name: None,
            type_name: None,
            field_type_names: None,
            attributes: BTreeMap::new(),
            source: RuleSource::default(),
        }
    }

    /// Extracts a required field, failing with the rule's identifying
    /// context when it is missing or empty.
    pub fn require<'a>(&self, name: &str, value: Option<&'a str>) -> Result<&'a str> {
        match value {
            Some(v) if !v.is_empty() => Ok(v),
            _ => Err(FieldMapError::ConfigurationError {
                rule: self.kind.as_str().to_string(),
                reason: format!("missing required '{name}' in rule {}", self.source),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_source_describe() {
        assert_eq!(RuleSource::new("index.json", 3).describe(), "index.json#3");
        assert_eq!(RuleSource::default().describe(), "<unknown source>");
    }

    #[test]
    fn test_require_present() {
        let rule = FieldRule::new(RuleKind::FieldByName);
        assert_eq!(rule.require("field_name", Some("title")).unwrap(), "title");
    }

    #[test]
    fn test_require_missing_names_rule() {
        let mut rule = FieldRule::new(RuleKind::TypeMatch);
        rule.source = RuleSource::new("fields.json", 7);

        let err = rule.require("type_name", None).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("type_match"));
        assert!(message.contains("type_name"));
        assert!(message.contains("fields.json#7"));
    }

    #[test]
    fn test_require_rejects_empty() {
        let rule = FieldRule::new(RuleKind::FieldByName);
        assert!(rule.require("field_name", Some("")).is_err());
    }

    #[test]
    fn test_rule_kind_round_trip() {
        let kind: RuleKind = serde_json::from_str("\"field_by_type_name\"").unwrap();
        assert_eq!(kind, RuleKind::FieldByTypeName);
        assert_eq!(kind.to_string(), "field_by_type_name");
    }
}
