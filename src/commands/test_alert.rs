//! Test-alert command implementation
//!
//! One-off check before scheduling: renders a sample fresh event alert
//! through the regular alert builder and sends it, then optionally reads
//! the count of every monitored view once.

use crate::alerts::{build_alert, AlertInput, Mailer, TerminalMailer};
use crate::cli::args::{OutputFormat, TestAlertArgs};
use crate::cli::output::{print_output, CountCheck, TestAlertReport};
use crate::commands::{counts_file, read_rules};
use crate::config::{ConfigBuilder, MonitorSettings};
use crate::datasource::FileDatasource;
use crate::domain::{Comparison, MonitoringRule, RuleState};
use crate::error::{ConfigError, DatasourceError, Result};
use crate::services::Monitor;

use std::collections::BTreeSet;

const SAMPLE_VIEW_ID: u64 = 11111111;
const SAMPLE_ISSUE: &str = "SAMPLE (TEST) ALERT -- high number of items in past hour";

/// Sample event rule and a fresh state that crosses its threshold
fn sample_alert(recipients: Vec<String>) -> (MonitoringRule, RuleState) {
    let rule = MonitoringRule::event(
        SAMPLE_VIEW_ID,
        SAMPLE_ISSUE,
        Comparison::Gte,
        200,
        recipients,
    );
    let state = RuleState {
        fresh: true,
        value: Some(300),
        alerted: false,
    };
    (rule, state)
}

/// Execute the test-alert command
pub fn run_test_alert(
    args: &TestAlertArgs,
    format: OutputFormat,
    config_path: Option<&str>,
) -> Result<()> {
    let config = ConfigBuilder::new()
        .with_file(config_path)?
        .with_sender(args.from.clone())
        .with_counts_file(args.counts.clone())
        .build();
    let settings = config.monitor_settings();

    // Rules and count source are resolved first so a bad setup sends nothing
    let rules = args
        .rules
        .as_deref()
        .map(|path| read_rules(path, &config))
        .transpose()?;
    let counts = match rules {
        Some(_) => Some(counts_file(&config)?),
        None => None,
    };

    let recipients = match &args.to {
        Some(to) => vec![to.clone()],
        None => settings.admin_recipients.clone(),
    };
    if recipients.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "monitor.admin_recipients".to_string(),
            message: "no recipients; pass --to or set admin recipients".to_string(),
        }
        .into());
    }

    // Keep stdout clean for machine-readable output
    let mailer = match format {
        OutputFormat::Json => TerminalMailer::stderr(config.mailer.from.clone()),
        _ => TerminalMailer::new(config.mailer.from.clone()),
    };

    let subject = send_sample(&mailer, recipients.clone(), &settings)?;

    let count_check = match (rules, counts) {
        (Some(rules), Some(counts)) => {
            let monitor = Monitor::new(FileDatasource::new(counts), mailer, settings);
            let missing = monitor.unread_views(&rules)?;
            let views = rules
                .iter()
                .map(|rule| rule.view_id)
                .collect::<BTreeSet<_>>()
                .len();
            Some(CountCheck {
                views,
                read: views - missing.len(),
                missing: missing.into_iter().map(|id| id.0).collect(),
            })
        }
        _ => None,
    };

    let report = TestAlertReport {
        subject,
        sent_to: recipients,
        count_check,
    };
    print_output(&report, format)?;

    match &report.count_check {
        Some(check) if !check.missing.is_empty() => {
            let missing: Vec<String> = check.missing.iter().map(|id| id.to_string()).collect();
            Err(DatasourceError::MissingViews(missing.join(", ")).into())
        }
        _ => Ok(()),
    }
}

/// Render and send the sample alert; returns its subject
///
/// Unlike alerts sent during a cycle, delivery failures are returned.
fn send_sample<M: Mailer>(
    mailer: &M,
    recipients: Vec<String>,
    settings: &MonitorSettings,
) -> Result<String> {
    let (rule, state) = sample_alert(recipients);
    let payload = build_alert(
        &AlertInput::Rule {
            rule: &rule,
            state: &state,
        },
        settings,
    );

    log::debug!("Sending sample alert via {}", mailer.name());
    mailer.send(&payload)?;
    Ok(payload.subject)
}
