//! Alert payload construction
//!
//! Every alert the engine emits goes through [`build_alert`], which turns an
//! [`AlertInput`] into exactly one [`AlertPayload`].

use crate::config::MonitorSettings;
use crate::domain::{MonitoringRule, RuleKind, RuleState};
use serde::Serialize;
use std::fmt;

/// A notification ready for the mailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AlertPayload {
    pub subject: String,
    pub body: String,
    pub recipients: Vec<String>,
}

/// What an alert is about
#[derive(Debug, Clone)]
pub enum AlertInput<'a> {
    /// A due rule and its evaluation state
    Rule {
        rule: &'a MonitoringRule,
        state: &'a RuleState,
    },
    /// The datasource failed outright
    DatasourceFailure(String),
    /// Anything that is not a rule/state pair
    Malformed(String),
}

impl fmt::Display for AlertInput<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rule { rule, state } => write!(
                f,
                "view {} '{}' (fresh: {}, value: {:?})",
                rule.view_id, rule.alert_issue, state.fresh, state.value
            ),
            Self::DatasourceFailure(error) => write!(f, "datasource failure: {}", error),
            Self::Malformed(input) => write!(f, "malformed input: {}", input),
        }
    }
}

/// Build the payload for an alert input
pub fn build_alert(input: &AlertInput<'_>, settings: &MonitorSettings) -> AlertPayload {
    let event_prefix = &settings.subject_prefixes.event;
    let event_heading = &settings.body_headings.event;

    match input {
        AlertInput::Malformed(raw) => AlertPayload {
            subject: format!("{}improper call to build_alert", event_prefix),
            body: format!("{}alert input: {}\n", event_heading, raw),
            recipients: settings.admin_recipients.clone(),
        },
        AlertInput::DatasourceFailure(error) => {
            let reason = if error.trim().is_empty() {
                "unspecified alerting system error"
            } else {
                error.as_str()
            };
            AlertPayload {
                subject: format!("{}{}", event_prefix, reason),
                body: format!(
                    "{}Datasource down, access credentials invalid, alerting views deleted, \
                     alerting views mis-specified, or some other issue.\n",
                    event_heading
                ),
                recipients: settings.admin_recipients.clone(),
            }
        }
        AlertInput::Rule { rule, state } if !state.fresh => AlertPayload {
            subject: format!(
                "{}view counts not fresh for view {}",
                event_prefix, rule.view_id
            ),
            body: format!(
                "{}Using {} tries, can't read fresh view count for view {}. \
                 May indicate view deleted or a problem with the datasource.\n\
                 View link: {}",
                event_heading,
                settings.retry_count,
                rule.view_id,
                settings.view_link(rule.view_id)
            ),
            recipients: settings.admin_recipients.clone(),
        },
        AlertInput::Rule { rule, state } => {
            let is_report = rule.kind.is_report();
            let value = state
                .value
                .map(|v| v.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            let link = settings.view_link(rule.view_id);

            let summary = match rule.kind {
                RuleKind::Report => format!("{}: {} items\n\n", rule.alert_issue, value),
                RuleKind::Event {
                    comparison,
                    threshold,
                } => format!(
                    "{} items in view {}\n\ncomparison: {}, threshold: {} \n=> {} \n\n",
                    value, rule.view_id, comparison, threshold, rule.alert_issue
                ),
            };

            AlertPayload {
                subject: format!(
                    "{}{}",
                    settings.subject_prefixes.for_report(is_report),
                    rule.alert_issue
                ),
                body: format!(
                    "{}{}View link: {}",
                    settings.body_headings.for_report(is_report),
                    summary,
                    link
                ),
                recipients: rule.recipients.clone(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Comparison;

    fn settings() -> MonitorSettings {
        MonitorSettings {
            admin_recipients: vec!["admin@example.com".to_string()],
            view_link_base: "https://host/agent/filters".to_string(),
            ..MonitorSettings::default()
        }
    }

    fn fresh(value: i64) -> RuleState {
        RuleState {
            fresh: true,
            value: Some(value),
            alerted: false,
        }
    }

    #[test]
    fn test_event_payload() {
        let rule = MonitoringRule::event(
            1,
            "high volume",
            Comparison::Gte,
            500,
            vec!["team@example.com".to_string()],
        );
        let state = fresh(600);
        let payload = build_alert(
            &AlertInput::Rule {
                rule: &rule,
                state: &state,
            },
            &settings(),
        );

        assert_eq!(payload.subject, "CW-event: high volume");
        assert_eq!(
            payload.body,
            "** Event monitoring for counted views **\n\n\
             600 items in view 1\n\n\
             comparison: gte, threshold: 500 \n\
             => high volume \n\n\
             View link: https://host/agent/filters/1"
        );
        assert_eq!(payload.recipients, vec!["team@example.com".to_string()]);
    }

    #[test]
    fn test_report_payload() {
        let rule = MonitoringRule::report(3, "items today", vec!["team@example.com".to_string()]);
        let state = fresh(42);
        let payload = build_alert(
            &AlertInput::Rule {
                rule: &rule,
                state: &state,
            },
            &settings(),
        );

        assert_eq!(payload.subject, "CW-report: items today");
        assert!(payload.body.starts_with("** Report on counted views **"));
        assert!(payload.body.contains("items today: 42 items"));
        assert!(!payload.body.contains("threshold"));
    }

    #[test]
    fn test_stale_payload_goes_to_admins() {
        let rule = MonitoringRule::event(
            2,
            "no items",
            Comparison::Lte,
            0,
            vec!["team@example.com".to_string()],
        );
        let state = RuleState::default();
        let payload = build_alert(
            &AlertInput::Rule {
                rule: &rule,
                state: &state,
            },
            &settings(),
        );

        assert_eq!(payload.subject, "CW-event: view counts not fresh for view 2");
        assert!(payload.body.contains("Using 3 tries"));
        assert_eq!(payload.recipients, vec!["admin@example.com".to_string()]);
    }

    #[test]
    fn test_datasource_failure_payload() {
        let payload = build_alert(
            &AlertInput::DatasourceFailure("auth failed".to_string()),
            &settings(),
        );
        assert!(payload.subject.contains("auth failed"));
        assert_eq!(payload.recipients, vec!["admin@example.com".to_string()]);

        let payload = build_alert(&AlertInput::DatasourceFailure(String::new()), &settings());
        assert!(payload.subject.contains("unspecified alerting system error"));
    }

    #[test]
    fn test_malformed_payload() {
        let payload = build_alert(&AlertInput::Malformed("42".to_string()), &settings());
        assert_eq!(payload.subject, "CW-event: improper call to build_alert");
        assert!(payload.body.contains("alert input: 42"));
        assert_eq!(payload.recipients, vec!["admin@example.com".to_string()]);
    }
}
