//! Unified error types for countwatch
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error from typed rule construction
    #[error("Rule error: {0}")]
    Domain(#[from] DomainError),

    /// Hard failure reported by the datasource
    #[error("Datasource error: {0}")]
    Datasource(#[from] DatasourceError),

    /// Failure delivering a notification
    #[error("Mailer error: {0}")]
    Mailer(#[from] MailerError),

    /// Rule set rejected by the validator; carries the full report
    #[error("Monitoring rules failed validation:\n{0}")]
    Validation(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while building typed rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Frequency string not recognised
    #[error("Invalid frequency: '{0}' (expected hourly, daily, weekly, hour-N or day-N)")]
    InvalidFrequency(String),

    /// Comparison not recognised
    #[error("Invalid comparison: '{0}' (expected gte or lte)")]
    InvalidComparison(String),

    /// Rule kind not recognised
    #[error("Invalid rule type: '{0}' (expected event or report)")]
    InvalidKind(String),

    /// Hour offset outside 0-23
    #[error("Invalid offset: {0} (must be 0-23)")]
    InvalidOffset(i64),

    /// Weekday outside 0 (Sunday) to 6 (Saturday)
    #[error("Invalid weekday: {0} (must be 0-6)")]
    InvalidWeekday(i64),

    /// Hour of day outside 0-23
    #[error("Invalid hour: {0} (must be 0-23)")]
    InvalidHour(i64),

    /// Holiday not in YYYY-MM-DD form
    #[error("Invalid holiday date: '{0}' (expected YYYY-MM-DD)")]
    InvalidHoliday(String),

    /// Recipient address not usable
    #[error("Invalid recipient address: '{0}'")]
    InvalidRecipient(String),

    /// Required field absent
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Field present where the rule kind forbids it
    #[error("Field '{0}' is not allowed on report rules")]
    UnexpectedField(&'static str),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Hard datasource failures
///
/// Per-view staleness is not an error; it is reported through the
/// `fresh` flag of each returned count.
#[derive(Error, Debug)]
pub enum DatasourceError {
    /// Upstream reported an error instead of counts
    #[error("{0}")]
    Rejected(String),

    /// Upstream could not be reached or returned garbage
    #[error("datasource unavailable: {0}")]
    Unavailable(String),

    /// Counts came back without some of the requested views
    #[error("no count returned for view(s) {0}")]
    MissingViews(String),
}

/// Errors from notification delivery
#[derive(Error, Debug)]
pub enum MailerError {
    /// No sender address configured
    #[error("email not sent: no sender address (subject: {0})")]
    MissingSender(String),

    /// No recipients on the payload
    #[error("email not sent: no recipients (subject: {0})")]
    MissingRecipients(String),

    /// Payload had an empty subject
    #[error("email not sent: no subject specified")]
    MissingSubject,

    /// Delivery failed
    #[error("email delivery failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
