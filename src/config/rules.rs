//! Rule file loading
//!
//! Rule files are read into a loosely-typed document, checked by the
//! validator, and only then converted into typed rules.

use crate::config::KindText;
use crate::domain::{MonitoringRule, RuleRecord};
use crate::error::{AppError, ConfigError, Result};
use crate::services::validator::validate;

use serde_json::Value;
use std::path::Path;

/// Rule file handler
pub struct RulesFile;

impl RulesFile {
    /// Load the rule list from a TOML or JSON file
    ///
    /// TOML files hold rules under `[[views]]`. JSON files hold either a
    /// bare array or an object with a `views` key. A missing `views` key
    /// yields `null`, which the validator reports.
    pub fn load<P: AsRef<Path>>(path: P) -> std::result::Result<Value, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;

        let is_json = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("json"));

        if is_json {
            Self::parse_json(&content)
        } else {
            Self::parse_toml(&content)
        }
    }

    /// Parse rules from TOML text
    pub fn parse_toml(content: &str) -> std::result::Result<Value, ConfigError> {
        let mut table: toml::Table = toml::from_str(content)?;
        match table.remove("views") {
            Some(views) => Ok(serde_json::to_value(views)?),
            None => Ok(Value::Null),
        }
    }

    /// Parse rules from JSON text
    pub fn parse_json(content: &str) -> std::result::Result<Value, ConfigError> {
        let mut document: Value = serde_json::from_str(content)?;
        if document.is_array() {
            return Ok(document);
        }
        Ok(document
            .get_mut("views")
            .map(Value::take)
            .unwrap_or(Value::Null))
    }
}

/// Validate a rule document and convert it into typed rules
///
/// # Errors
/// Returns `AppError::Validation` with the full report if any rule fails
/// validation.
pub fn load_rules(rules: &Value, prefixes: &KindText) -> Result<Vec<MonitoringRule>> {
    let validation = validate(rules, prefixes);
    if !validation.ok {
        return Err(AppError::Validation(validation.diagnostics));
    }

    let records: Vec<RuleRecord> =
        serde_json::from_value(rules.clone()).map_err(ConfigError::from)?;

    records
        .into_iter()
        .map(|record| MonitoringRule::try_from(record).map_err(AppError::from))
        .collect()
}
