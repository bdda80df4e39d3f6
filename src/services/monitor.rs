//! Poll-retry monitor
//!
//! Runs one monitoring cycle: select due rules, fetch their counts in
//! batched rounds, alert on fresh rules as soon as they are fresh, and
//! report rules that never become fresh.

use crate::alerts::{AlertEngine, AlertInput, Mailer};
use crate::config::MonitorSettings;
use crate::datasource::Datasource;
use crate::domain::{CycleState, MonitoringRule, ViewId};
use crate::error::DatasourceError;
use crate::services::scheduler::select_due;
use crate::services::validator::{validate, Validation};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::Duration;

/// Summary of one cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CycleOutcome {
    /// Rules selected by the scheduler
    pub due: usize,
    /// Fetch rounds performed
    pub attempts: u32,
    /// Threshold and report alerts sent
    pub alerts_sent: usize,
    /// Staleness alerts sent
    pub stale: usize,
    /// Whether a hard datasource error ended the cycle
    pub aborted: bool,
}

/// Blocks the cycle between fetch rounds
pub type SleepFn = Box<dyn Fn(Duration) + Send + Sync>;

/// Count monitor
pub struct Monitor<D: Datasource, M: Mailer> {
    datasource: D,
    alerts: AlertEngine<M>,
    sleep: SleepFn,
}

impl<D: Datasource, M: Mailer> Monitor<D, M> {
    /// Create a new monitor with the given collaborators and settings
    pub fn new(datasource: D, mailer: M, settings: MonitorSettings) -> Self {
        Self {
            datasource,
            alerts: AlertEngine::new(mailer, settings),
            sleep: Box::new(std::thread::sleep),
        }
    }

    /// Replace the backoff wait between fetch rounds
    pub fn with_sleep<F>(mut self, sleep: F) -> Self
    where
        F: Fn(Duration) + Send + Sync + 'static,
    {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn settings(&self) -> &MonitorSettings {
        self.alerts.settings()
    }

    pub fn datasource(&self) -> &D {
        &self.datasource
    }

    pub fn mailer(&self) -> &M {
        self.alerts.mailer()
    }

    /// Validate a loosely-typed rule set against these settings
    pub fn validate(&self, rules: &Value) -> Validation {
        validate(rules, &self.settings().subject_prefixes)
    }

    /// Fetch every rule's view once and return the ids that got no count
    ///
    /// Used to check a count source before scheduling; no alerts are sent.
    pub fn unread_views(
        &self,
        rules: &[MonitoringRule],
    ) -> Result<BTreeSet<ViewId>, DatasourceError> {
        let ids: BTreeSet<ViewId> = rules.iter().map(|rule| rule.view_id).collect();
        let counts = self.datasource.fetch(&ids)?;
        let read: BTreeSet<ViewId> = counts.iter().map(|count| count.view_id).collect();
        log::debug!("Read {} of {} view count(s)", read.len(), ids.len());
        Ok(ids.difference(&read).copied().collect())
    }

    /// Run one cycle at `now`, or at the current local time
    pub fn check(&self, rules: &[MonitoringRule], now: Option<NaiveDateTime>) -> CycleOutcome {
        let now = now.unwrap_or_else(|| Local::now().naive_local());
        let due = select_due(rules, &now);
        let mut states = CycleState::new(due.len());
        let mut outcome = CycleOutcome {
            due: due.len(),
            ..Default::default()
        };

        log::info!(
            "Cycle at {}: {} of {} rule(s) due",
            now.format("%Y-%m-%d %H:%M"),
            due.len(),
            rules.len()
        );

        let settings = self.settings();
        let mut pending = pending_ids(&due, &states);

        while !pending.is_empty() && outcome.attempts < settings.retry_count {
            outcome.attempts += 1;
            log::debug!(
                "Fetch attempt {}/{} for {} view(s)",
                outcome.attempts,
                settings.retry_count,
                pending.len()
            );

            let counts = match self.datasource.fetch(&pending) {
                Ok(counts) => counts,
                Err(e) => {
                    log::error!("Datasource {} failed: {}", self.datasource.name(), e);
                    self.alerts
                        .send_alert(&AlertInput::DatasourceFailure(e.to_string()));
                    outcome.aborted = true;
                    return outcome;
                }
            };

            for count in &counts {
                for (index, rule) in due.iter().enumerate() {
                    if rule.view_id != count.view_id {
                        continue;
                    }
                    match states.get_mut(index) {
                        Some(state) if !state.fresh => state.absorb(count),
                        _ => {}
                    }
                }
            }

            outcome.alerts_sent += self.alerts.alert_threshold(&due, &mut states);
            outcome.alerts_sent += self.alerts.alert_report(&due, &mut states);

            pending = pending_ids(&due, &states);
            if !pending.is_empty() && outcome.attempts < settings.retry_count {
                log::debug!(
                    "{} view(s) not fresh, retrying in {:?}",
                    pending.len(),
                    settings.backoff_interval
                );
                (self.sleep)(settings.backoff_interval);
            }
        }

        if states.pending_count() > 0 {
            outcome.stale = self.alerts.alert_stale(&due, &states);
        }

        log::info!(
            "Cycle done: {} attempt(s), {} alert(s), {} stale",
            outcome.attempts,
            outcome.alerts_sent,
            outcome.stale
        );
        outcome
    }
}

/// Distinct view ids of due rules that are not fresh yet
fn pending_ids(due: &[&MonitoringRule], states: &CycleState) -> BTreeSet<ViewId> {
    due.iter()
        .zip(states.iter())
        .filter(|(_, state)| !state.fresh)
        .map(|(rule, _)| rule.view_id)
        .collect()
}
