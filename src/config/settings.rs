//! Engine settings
//!
//! The explicit configuration object injected into the monitor at
//! construction. Built from the file config or directly in tests.

use std::time::Duration;

/// Text that differs between event and report alerts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KindText {
    pub event: String,
    pub report: String,
}

impl KindText {
    /// Select text for a rule kind
    pub fn for_report(&self, is_report: bool) -> &str {
        if is_report {
            &self.report
        } else {
            &self.event
        }
    }
}

/// Settings consumed by the poll-retry and alert engines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorSettings {
    /// Recipients of system, staleness and malformed-input alerts
    pub admin_recipients: Vec<String>,
    /// Maximum fetch attempts per cycle
    pub retry_count: u32,
    /// Fixed delay between fetch attempts
    pub backoff_interval: Duration,
    pub subject_prefixes: KindText,
    pub body_headings: KindText,
    /// View id is appended after a `/`
    pub view_link_base: String,
}

impl MonitorSettings {
    /// Link to a view in the upstream system
    pub fn view_link(&self, view_id: impl std::fmt::Display) -> String {
        format!("{}/{}", self.view_link_base.trim_end_matches('/'), view_id)
    }
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            admin_recipients: Vec::new(),
            retry_count: 3,
            backoff_interval: Duration::from_secs(60),
            subject_prefixes: KindText {
                event: "CW-event: ".to_string(),
                report: "CW-report: ".to_string(),
            },
            body_headings: KindText {
                event: "** Event monitoring for counted views **\n\n".to_string(),
                report: "** Report on counted views **\n\n".to_string(),
            },
            view_link_base: "https://example.zendesk.com/agent/filters".to_string(),
        }
    }
}
