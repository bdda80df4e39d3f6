//! Rule set validator
//!
//! Checks a loosely-typed rule set before it is converted into typed rules.
//! Never fails: every violation becomes one line of the report.

use crate::alerts::MAX_SUBJECT_LEN;
use crate::config::KindText;
use crate::domain::{is_valid_address, parse_holiday, FrequencySpec};
use serde::Serialize;
use serde_json::{Map, Value};

/// Accumulates validation messages under the current rule's prefix
#[derive(Debug, Default)]
pub struct ErrorReporter {
    list: String,
    prefix: String,
}

impl ErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the prefix for subsequent messages; empty clears it
    pub fn set_prefix(&mut self, prefix: impl Into<String>) {
        self.prefix = prefix.into();
    }

    pub fn add(&mut self, error: &str) {
        if !self.prefix.is_empty() {
            self.list.push_str(&self.prefix);
            self.list.push_str(": ");
        }
        self.list.push_str(error);
        self.list.push('\n');
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn into_list(self) -> String {
        self.list
    }
}

/// Outcome of validating a rule set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub ok: bool,
    /// One line per violation; empty when `ok`
    pub diagnostics: String,
}

impl Validation {
    /// Number of reported violations
    pub fn error_count(&self) -> usize {
        self.diagnostics.lines().count()
    }
}

/// Validate a rule set
///
/// `rules` must be an array of tables. The subject prefixes bound the
/// length of each rule's alert issue.
pub fn validate(rules: &Value, prefixes: &KindText) -> Validation {
    let mut errors = ErrorReporter::new();

    match rules.as_array() {
        None => errors.add("error: monitoring views not specified as an array"),
        Some(views) => {
            for (index, view) in views.iter().enumerate() {
                match view.as_object() {
                    Some(record) => validate_record(index, record, prefixes, &mut errors),
                    None => {
                        errors.set_prefix("");
                        errors.add(&format!("error: spec {} not specified as a table", index));
                    }
                }
            }
        }
    }

    let diagnostics = errors.into_list();
    if diagnostics.is_empty() {
        log::debug!("Monitoring rules passed validation");
    } else {
        log::debug!("Monitoring rules failed validation:\n{}", diagnostics);
    }

    Validation {
        ok: diagnostics.is_empty(),
        diagnostics,
    }
}

fn int_list_within(value: &Value, max: i64) -> bool {
    value.as_array().is_some_and(|items| {
        items
            .iter()
            .all(|v| v.as_i64().is_some_and(|n| (0..=max).contains(&n)))
    })
}

fn validate_record(
    index: usize,
    view: &Map<String, Value>,
    prefixes: &KindText,
    errors: &mut ErrorReporter,
) {
    let field = |key: &str| view.get(key).filter(|v| !v.is_null());

    let issue = field("alert_issue").and_then(Value::as_str);
    errors.set_prefix(format!(
        "error in spec {}, for '{}'",
        index,
        issue.unwrap_or_default()
    ));

    let kind = field("type");
    let is_report = kind.and_then(Value::as_str) == Some("report");
    let is_event = kind.is_none() || kind.and_then(Value::as_str) == Some("event");

    if !field("view_id").is_some_and(|v| v.as_u64().is_some()) {
        errors.add("view_id must be specified as a non-negative integer");
    }

    match issue {
        None => errors.add("alert issue must be specified"),
        Some(issue) => {
            let prefix = prefixes.for_report(is_report);
            if prefix.chars().count() + issue.chars().count() > MAX_SUBJECT_LEN {
                let which = if is_report { "report" } else { "event" };
                errors.add(&format!(
                    "{}_subject_prefix + alert issue cannot be longer than {} characters total",
                    which, MAX_SUBJECT_LEN
                ));
            }
        }
    }

    let recipients_ok = match field("to") {
        Some(Value::String(address)) => is_valid_address(address),
        Some(Value::Array(addresses)) => {
            !addresses.is_empty()
                && addresses
                    .iter()
                    .all(|a| a.as_str().is_some_and(is_valid_address))
        }
        _ => false,
    };
    if !recipients_ok {
        errors.add("to address not properly specified");
    }

    let days_wk = field("days_wk");
    if days_wk.is_some_and(|d| !int_list_within(d, 6)) {
        errors.add(
            "days_wk should be specified as an array with integer elements from 0 (Sunday) to 6 (Saturday)",
        );
    }

    if field("hours_day").is_some_and(|h| !int_list_within(h, 23)) {
        errors.add("hours_day should be specified as an array with integer elements 0 to 23");
    }

    if let Some(holidays) = field("holidays") {
        let well_formed = holidays.as_array().is_some_and(|days| {
            days.iter()
                .all(|d| d.as_str().and_then(parse_holiday).is_some())
        });
        if !well_formed {
            errors.add("holidays should be specified as an array of strings of the form 2016-01-02");
        }
    }

    if !(is_report || is_event) {
        errors.add("type can only be omitted (defaults to event), event, or report");
    }

    let threshold = field("threshold");
    let compare = field("compare");
    if is_report && (threshold.is_some() || compare.is_some()) {
        errors.add("threshold and compare irrelevant to report type");
    }
    if is_event {
        if threshold.is_none() || compare.is_none() {
            errors.add("threshold and compare must be included in event spec");
        }
        if threshold.is_some_and(|t| t.as_i64().is_none()) {
            errors.add("threshold must be an integer");
        }
        if compare.is_some_and(|c| !matches!(c.as_str(), Some("gte") | Some("lte"))) {
            errors.add("compare must be gte or lte");
        }
    }

    let freq_ok = field("freq")
        .and_then(Value::as_str)
        .is_some_and(|f| FrequencySpec::parse(f, days_wk.is_some()).is_ok());
    if !freq_ok {
        errors.add("freq missing or incorrectly specified");
    }

    if field("offset").is_some_and(|o| !o.as_i64().is_some_and(|n| (0..=23).contains(&n))) {
        errors.add("offset must be number (of hours) between 0 and 23");
    }
}
