//! Output formatting utilities
//!
//! Provides table and JSON output formatting for CLI commands.

use crate::cli::args::OutputFormat;
use crate::domain::MonitoringRule;
use crate::services::{CycleOutcome, Validation};
use serde::Serialize;
use std::io::{self, Write};

/// Format and print output based on the selected format
pub fn print_output<T: Serialize + TableDisplay>(data: &T, format: OutputFormat) -> io::Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();

    match format {
        OutputFormat::Table => {
            writeln!(handle, "{}", data.to_table())?;
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string());
            writeln!(handle, "{}", json)?;
        }
        OutputFormat::Compact => {
            writeln!(handle, "{}", data.to_compact())?;
        }
    }

    Ok(())
}

/// Trait for types that can be displayed as a table
pub trait TableDisplay {
    /// Format as a table string
    fn to_table(&self) -> String;

    /// Format as a compact single line
    fn to_compact(&self) -> String {
        self.to_table().replace('\n', " | ")
    }
}

/// One rule as listed by `rules` and `due`
#[derive(Debug, Clone, Serialize)]
pub struct RuleEntry {
    pub view_id: u64,
    pub kind: String,
    pub freq: String,
    pub schedule: String,
    pub recipients: Vec<String>,
    pub alert_issue: String,
}

impl From<&MonitoringRule> for RuleEntry {
    fn from(rule: &MonitoringRule) -> Self {
        Self {
            view_id: rule.view_id.0,
            kind: rule.kind.to_string(),
            freq: rule.freq.clone(),
            schedule: describe_schedule(rule),
            recipients: rule.recipients.clone(),
            alert_issue: rule.alert_issue.clone(),
        }
    }
}

/// Calendar filters of a rule in short form, `-` when there are none
fn describe_schedule(rule: &MonitoringRule) -> String {
    let mut parts = Vec::new();

    if let Some(offset) = rule.offset {
        parts.push(format!("offset {}", offset));
    }
    if let Some(days) = &rule.weekdays {
        parts.push(format!("days {}", join_numbers(days)));
    }
    if let Some(hours) = &rule.hours {
        parts.push(format!("hours {}", join_numbers(hours)));
    }
    if let Some(holidays) = &rule.holidays {
        parts.push(format!("{} holiday(s)", holidays.len()));
    }

    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

fn join_numbers(values: &[u8]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

impl TableDisplay for RuleEntry {
    fn to_table(&self) -> String {
        format!(
            "  {:<12} {:<16} {:<9} {:<24} {}",
            self.view_id,
            self.kind,
            self.freq,
            self.schedule,
            self.alert_issue
        )
    }

    fn to_compact(&self) -> String {
        format!("{}:{}", self.view_id, self.freq)
    }
}

/// Rule list for display
#[derive(Debug, Clone, Serialize)]
pub struct RuleList {
    /// Instant the list was evaluated at, for due lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub at: Option<String>,
    pub total: usize,
    pub rules: Vec<RuleEntry>,
}

impl RuleList {
    /// List every rule in a rule set
    pub fn all(rules: &[MonitoringRule]) -> Self {
        Self {
            at: None,
            total: rules.len(),
            rules: rules.iter().map(RuleEntry::from).collect(),
        }
    }

    /// List the rules due at `at` out of `total`
    pub fn due(at: String, total: usize, due: &[&MonitoringRule]) -> Self {
        Self {
            at: Some(at),
            total,
            rules: due.iter().map(|r| RuleEntry::from(*r)).collect(),
        }
    }
}

impl TableDisplay for RuleList {
    fn to_table(&self) -> String {
        let mut output = match &self.at {
            Some(at) => format!("Due at {}: {} of {} rule(s)\n", at, self.rules.len(), self.total),
            None => format!("Rules: {}\n", self.total),
        };

        if self.rules.is_empty() {
            output.push_str("  No rules\n");
            return output;
        }

        output.push('\n');
        output.push_str(&format!(
            "  {:<12} {:<16} {:<9} {:<24} {}\n",
            "View", "Type", "Freq", "Schedule", "Issue"
        ));
        output.push_str("  ────────────────────────────────────────────────────────────\n");

        for rule in &self.rules {
            output.push_str(&rule.to_table());
            output.push('\n');
        }

        output
    }

    fn to_compact(&self) -> String {
        if self.rules.is_empty() {
            return "no rules".to_string();
        }
        self.rules
            .iter()
            .map(|r| r.to_compact())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Validation report for display
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub source: String,
    pub ok: bool,
    pub errors: usize,
    pub diagnostics: Vec<String>,
}

impl ValidationReport {
    pub fn new(source: impl Into<String>, validation: &Validation) -> Self {
        Self {
            source: source.into(),
            ok: validation.ok,
            errors: validation.error_count(),
            diagnostics: validation.diagnostics.lines().map(str::to_string).collect(),
        }
    }
}

impl TableDisplay for ValidationReport {
    fn to_table(&self) -> String {
        if self.ok {
            return format!("✓ {}: monitoring rules are valid", self.source);
        }

        let mut output = format!("✗ {}: {} error(s)\n", self.source, self.errors);
        for line in &self.diagnostics {
            output.push_str(&format!("  {}\n", line));
        }
        output
    }

    fn to_compact(&self) -> String {
        if self.ok {
            format!("{}: ok", self.source)
        } else {
            format!("{}: {} error(s)", self.source, self.errors)
        }
    }
}

/// Cycle summary for display
#[derive(Debug, Clone, Serialize)]
pub struct CycleReport {
    pub at: String,
    #[serde(flatten)]
    pub outcome: CycleOutcome,
}

impl TableDisplay for CycleReport {
    fn to_table(&self) -> String {
        let mut output = format!("Cycle at {}\n", self.at);
        output.push_str(&format!("  Rules Due:      {}\n", self.outcome.due));
        output.push_str(&format!("  Fetch Attempts: {}\n", self.outcome.attempts));
        output.push_str(&format!("  Alerts Sent:    {}\n", self.outcome.alerts_sent));
        output.push_str(&format!("  Stale Views:    {}\n", self.outcome.stale));
        if self.outcome.aborted {
            output.push_str("  Aborted on datasource error\n");
        }
        output
    }

    fn to_compact(&self) -> String {
        format!(
            "{} due={} attempts={} alerts={} stale={}{}",
            self.at,
            self.outcome.due,
            self.outcome.attempts,
            self.outcome.alerts_sent,
            self.outcome.stale,
            if self.outcome.aborted { " aborted" } else { "" }
        )
    }
}

/// Result of the test-alert command
#[derive(Debug, Clone, Serialize)]
pub struct TestAlertReport {
    pub subject: String,
    pub sent_to: Vec<String>,
    /// Count check results, when a rule file was given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count_check: Option<CountCheck>,
}

/// Views checked against the count source
#[derive(Debug, Clone, Serialize)]
pub struct CountCheck {
    pub views: usize,
    pub read: usize,
    pub missing: Vec<u64>,
}

impl TableDisplay for TestAlertReport {
    fn to_table(&self) -> String {
        let mut output = format!(
            "✓ Sample alert sent to {}\n  Subject: {}\n",
            self.sent_to.join(", "),
            self.subject
        );

        if let Some(check) = &self.count_check {
            output.push_str(&format!("  Views Monitored: {}\n", check.views));
            if check.missing.is_empty() {
                output.push_str("✓ All view counts read\n");
            } else {
                let missing: Vec<String> = check.missing.iter().map(|id| id.to_string()).collect();
                output.push_str(&format!(
                    "✗ {} of {} view counts read, missing: {}\n",
                    check.read,
                    check.views,
                    missing.join(", ")
                ));
            }
        }

        output
    }

    fn to_compact(&self) -> String {
        match &self.count_check {
            Some(check) => format!(
                "sent to {}; counts {}/{}",
                self.sent_to.join(","),
                check.read,
                check.views
            ),
            None => format!("sent to {}", self.sent_to.join(",")),
        }
    }
}

/// Simple message output
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub message: String,
    pub success: bool,
}

impl TableDisplay for Message {
    fn to_table(&self) -> String {
        if self.success {
            format!("✓ {}", self.message)
        } else {
            format!("✗ {}", self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Comparison;

    fn sample_rules() -> Vec<MonitoringRule> {
        vec![
            MonitoringRule::event(
                11111111,
                "too many items",
                Comparison::Gte,
                500,
                vec!["admin@example.com".to_string()],
            ),
            MonitoringRule::report(55555555, "weekly totals", vec!["w@example.com".to_string()])
                .with_freq("weekly")
                .unwrap()
                .with_weekdays(vec![2])
                .with_offset(14),
        ]
    }

    #[test]
    fn test_rule_entry_schedule() {
        let rules = sample_rules();
        assert_eq!(RuleEntry::from(&rules[0]).schedule, "-");
        assert_eq!(RuleEntry::from(&rules[1]).schedule, "offset 14, days 2");
    }

    #[test]
    fn test_rule_list_table() {
        let rules = sample_rules();
        let output = RuleList::all(&rules).to_table();
        assert!(output.contains("Rules: 2"));
        assert!(output.contains("event (gte 500)"));
        assert!(output.contains("weekly totals"));
    }

    #[test]
    fn test_due_list_compact() {
        let rules = sample_rules();
        let due: Vec<&MonitoringRule> = rules.iter().take(1).collect();
        let list = RuleList::due("2024-03-05 10:00".to_string(), rules.len(), &due);
        assert!(list.to_table().starts_with("Due at 2024-03-05 10:00: 1 of 2"));
        assert_eq!(list.to_compact(), "11111111:hourly");
    }

    #[test]
    fn test_validation_report() {
        let validation = Validation {
            ok: false,
            diagnostics: "error: a\nerror: b\n".to_string(),
        };
        let report = ValidationReport::new("rules.toml", &validation);
        assert_eq!(report.errors, 2);
        assert!(report.to_table().starts_with('✗'));
        assert_eq!(report.to_compact(), "rules.toml: 2 error(s)");
    }

    #[test]
    fn test_cycle_report_json_is_flat() {
        let report = CycleReport {
            at: "2024-03-05 10:00".to_string(),
            outcome: CycleOutcome {
                due: 3,
                attempts: 1,
                alerts_sent: 2,
                stale: 0,
                aborted: false,
            },
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["due"], 3);
        assert_eq!(json["alerts_sent"], 2);
    }

    #[test]
    fn test_test_alert_report_lists_missing_views() {
        let report = TestAlertReport {
            subject: "CW-event: sample".to_string(),
            sent_to: vec!["a@example.com".to_string()],
            count_check: Some(CountCheck {
                views: 3,
                read: 2,
                missing: vec![55555555],
            }),
        };
        let table = report.to_table();
        assert!(table.contains("2 of 3 view counts read, missing: 55555555"));
        assert_eq!(report.to_compact(), "sent to a@example.com; counts 2/3");
    }

    #[test]
    fn test_message_display() {
        let msg = Message {
            message: "Operation completed".to_string(),
            success: true,
        };

        assert!(msg.to_table().starts_with('✓'));
    }
}
