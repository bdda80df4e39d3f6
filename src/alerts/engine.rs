//! Alert engine
//!
//! Evaluates due rules against their cycle state and hands payloads to the
//! mailer. The `alerted` flag limits threshold and report alerts to one per
//! rule per cycle.

use super::mailer::Mailer;
use super::payload::{build_alert, AlertInput, AlertPayload};
use crate::config::MonitorSettings;
use crate::domain::{CycleState, MonitoringRule, RuleKind};

/// Alert engine bound to a mailer and settings
pub struct AlertEngine<M: Mailer> {
    mailer: M,
    settings: MonitorSettings,
}

impl<M: Mailer> AlertEngine<M> {
    /// Create a new alert engine
    pub fn new(mailer: M, settings: MonitorSettings) -> Self {
        Self { mailer, settings }
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    pub fn settings(&self) -> &MonitorSettings {
        &self.settings
    }

    /// Build and send one alert; returns the subject
    ///
    /// Delivery failures are logged and otherwise ignored.
    pub fn send_alert(&self, input: &AlertInput<'_>) -> String {
        let payload = build_alert(input, &self.settings);
        self.deliver(&payload);
        payload.subject
    }

    fn deliver(&self, payload: &AlertPayload) {
        match self.mailer.send(payload) {
            Ok(()) => log::debug!("Alert sent via {}: {}", self.mailer.name(), payload.subject),
            Err(e) => log::warn!(
                "Failed to send alert via {}: {}",
                self.mailer.name(),
                e
            ),
        }
    }

    /// Alert fresh event rules whose comparison holds; returns alerts sent
    pub fn alert_threshold(&self, due: &[&MonitoringRule], states: &mut CycleState) -> usize {
        let mut sent = 0;
        for (index, rule) in due.iter().enumerate() {
            let RuleKind::Event {
                comparison,
                threshold,
            } = rule.kind
            else {
                continue;
            };
            let Some(state) = states.get_mut(index) else {
                continue;
            };
            if !state.fresh || state.alerted {
                continue;
            }
            let Some(value) = state.value else {
                continue;
            };
            if comparison.evaluate(value, threshold) {
                self.send_alert(&AlertInput::Rule { rule, state });
                state.alerted = true;
                sent += 1;
            }
        }
        sent
    }

    /// Alert every fresh report rule once; returns alerts sent
    pub fn alert_report(&self, due: &[&MonitoringRule], states: &mut CycleState) -> usize {
        let mut sent = 0;
        for (index, rule) in due.iter().enumerate() {
            if !rule.kind.is_report() {
                continue;
            }
            let Some(state) = states.get_mut(index) else {
                continue;
            };
            if !state.fresh || state.alerted {
                continue;
            }
            self.send_alert(&AlertInput::Rule { rule, state });
            state.alerted = true;
            sent += 1;
        }
        sent
    }

    /// Alert each rule still not fresh; returns alerts sent
    pub fn alert_stale(&self, due: &[&MonitoringRule], states: &CycleState) -> usize {
        let mut sent = 0;
        for (index, rule) in due.iter().enumerate() {
            let Some(state) = states.get(index) else {
                continue;
            };
            if state.fresh {
                continue;
            }
            log::warn!(
                "View {} never reported a fresh count for '{}'",
                rule.view_id,
                rule.alert_issue
            );
            self.send_alert(&AlertInput::Rule { rule, state });
            sent += 1;
        }
        sent
    }
}
