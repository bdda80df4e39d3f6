//! Configuration system
//!
//! Handles TOML config file parsing, rule file loading and CLI argument
//! merging.

pub mod builder;
pub mod file;
pub mod rules;
pub mod settings;

pub use builder::ConfigBuilder;
pub use file::ConfigFile;
pub use rules::{load_rules, RulesFile};
pub use settings::{KindText, MonitorSettings};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Engine settings
    pub monitor: MonitorConfig,
    /// Mail transport settings
    pub mailer: MailerConfig,
    /// Count source settings
    pub datasource: DatasourceConfig,
}

impl Config {
    /// Engine settings object for the monitor
    pub fn monitor_settings(&self) -> MonitorSettings {
        let m = &self.monitor;
        MonitorSettings {
            admin_recipients: m.admin_recipients.clone(),
            retry_count: m.retry_count,
            backoff_interval: Duration::from_secs(m.backoff_seconds),
            subject_prefixes: KindText {
                event: m.event_subject_prefix.clone(),
                report: m.report_subject_prefix.clone(),
            },
            body_headings: KindText {
                event: m.event_body_heading.clone(),
                report: m.report_body_heading.clone(),
            },
            view_link_base: m.view_link_base.clone(),
        }
    }
}

/// Monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Recipients of technical alerts
    pub admin_recipients: Vec<String>,
    /// Fetch attempts per cycle
    pub retry_count: u32,
    /// Delay between fetch attempts in seconds
    pub backoff_seconds: u64,
    /// Base URL for view links in alert bodies
    pub view_link_base: String,
    pub event_subject_prefix: String,
    pub event_body_heading: String,
    pub report_subject_prefix: String,
    pub report_body_heading: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let defaults = MonitorSettings::default();
        Self {
            admin_recipients: defaults.admin_recipients,
            retry_count: defaults.retry_count,
            backoff_seconds: defaults.backoff_interval.as_secs(),
            view_link_base: defaults.view_link_base,
            event_subject_prefix: defaults.subject_prefixes.event,
            event_body_heading: defaults.body_headings.event,
            report_subject_prefix: defaults.subject_prefixes.report,
            report_body_heading: defaults.body_headings.report,
        }
    }
}

/// Mailer configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MailerConfig {
    /// Sender address
    pub from: Option<String>,
}

/// Datasource configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DatasourceConfig {
    /// JSON count document read by the file datasource
    pub counts_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.monitor.retry_count, 3);
        assert_eq!(config.monitor.backoff_seconds, 60);
        assert!(config.mailer.from.is_none());
    }

    #[test]
    fn test_monitor_settings_from_config() {
        let config: Config = toml::from_str(
            r#"
            [monitor]
            admin_recipients = ["admin@example.com"]
            retry_count = 5
            backoff_seconds = 2
            event_subject_prefix = "ZD-event: "
            "#,
        )
        .unwrap();

        let settings = config.monitor_settings();
        assert_eq!(settings.retry_count, 5);
        assert_eq!(settings.backoff_interval, Duration::from_secs(2));
        assert_eq!(settings.subject_prefixes.event, "ZD-event: ");
        assert_eq!(settings.subject_prefixes.report, "CW-report: ");
        assert_eq!(settings.admin_recipients, vec!["admin@example.com".to_string()]);
    }
}
