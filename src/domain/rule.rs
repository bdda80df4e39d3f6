//! Monitoring rule domain types
//!
//! `RuleRecord` is the loosely-typed shape rules arrive in; `MonitoringRule`
//! is the validated, read-only form the engine works with.

use super::frequency::FrequencySpec;
use crate::error::DomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Format of holiday dates in rule files
pub const HOLIDAY_FORMAT: &str = "%Y-%m-%d";

/// Parse a holiday date, accepting only the zero-padded form
///
/// Holidays are matched against the formatted date of the evaluation
/// instant, so `2024-1-2` would never match and is rejected.
pub fn parse_holiday(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, HOLIDAY_FORMAT)
        .ok()
        .filter(|date| date.format(HOLIDAY_FORMAT).to_string() == s)
}

/// Identifier of a counted view in the datasource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Threshold comparison for event rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Value greater than or equal to threshold
    Gte,
    /// Value less than or equal to threshold
    Lte,
}

impl Comparison {
    /// Parse from the rule-file spelling
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        match s {
            "gte" => Ok(Self::Gte),
            "lte" => Ok(Self::Lte),
            other => Err(DomainError::InvalidComparison(other.to_string())),
        }
    }

    /// Evaluate comparison of `value` against `threshold`
    pub fn evaluate(&self, value: i64, threshold: i64) -> bool {
        match self {
            Self::Gte => value >= threshold,
            Self::Lte => value <= threshold,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gte => write!(f, "gte"),
            Self::Lte => write!(f, "lte"),
        }
    }
}

/// What a rule does once its view count is fresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RuleKind {
    /// Alert when the comparison against the threshold holds
    Event {
        comparison: Comparison,
        threshold: i64,
    },
    /// Always send the count
    Report,
}

impl RuleKind {
    /// Whether this is a report rule
    pub fn is_report(&self) -> bool {
        matches!(self, Self::Report)
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Event {
                comparison,
                threshold,
            } => write!(f, "event ({} {})", comparison, threshold),
            Self::Report => write!(f, "report"),
        }
    }
}

/// Check that a recipient looks like a mail address
pub fn is_valid_address(address: &str) -> bool {
    !address.is_empty()
        && !address.chars().any(char::is_whitespace)
        && address
            .split_once('@')
            .map(|(local, domain)| !local.is_empty() && !domain.is_empty())
            .unwrap_or(false)
}

/// Recipients as written in rule files: one address or a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Recipients {
    One(String),
    Many(Vec<String>),
}

impl Recipients {
    /// Canonical list form
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(address) => vec![address],
            Self::Many(addresses) => addresses,
        }
    }
}

/// Rule as it appears in a rule file, before validation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub view_id: Option<u64>,
    pub alert_issue: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub compare: Option<String>,
    pub threshold: Option<i64>,
    pub freq: Option<String>,
    pub offset: Option<i64>,
    pub days_wk: Option<Vec<i64>>,
    pub hours_day: Option<Vec<i64>>,
    pub holidays: Option<Vec<String>>,
    pub to: Option<Recipients>,
}

/// A validated monitoring rule
///
/// Immutable once built; per-cycle evaluation state lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonitoringRule {
    pub view_id: ViewId,
    pub alert_issue: String,
    pub kind: RuleKind,
    /// Frequency string as written
    pub freq: String,
    pub frequency: FrequencySpec,
    pub offset: Option<u8>,
    pub weekdays: Option<Vec<u8>>,
    pub hours: Option<Vec<u8>>,
    pub holidays: Option<Vec<NaiveDate>>,
    pub recipients: Vec<String>,
}

impl MonitoringRule {
    /// Create an hourly event rule with no calendar filters
    pub fn event(
        view_id: u64,
        alert_issue: impl Into<String>,
        comparison: Comparison,
        threshold: i64,
        recipients: Vec<String>,
    ) -> Self {
        Self {
            view_id: ViewId(view_id),
            alert_issue: alert_issue.into(),
            kind: RuleKind::Event {
                comparison,
                threshold,
            },
            freq: "hourly".to_string(),
            frequency: FrequencySpec::HOURLY,
            offset: None,
            weekdays: None,
            hours: None,
            holidays: None,
            recipients,
        }
    }

    /// Create an hourly report rule with no calendar filters
    pub fn report(view_id: u64, alert_issue: impl Into<String>, recipients: Vec<String>) -> Self {
        Self {
            kind: RuleKind::Report,
            ..Self::event(view_id, alert_issue, Comparison::Gte, 0, recipients)
        }
    }

    /// Builder: set frequency string (re-resolved against the weekday list)
    pub fn with_freq(mut self, freq: &str) -> Result<Self, DomainError> {
        self.frequency = FrequencySpec::parse(freq, self.weekdays.is_some())?;
        self.freq = freq.to_string();
        Ok(self)
    }

    /// Builder: set hour offset
    pub fn with_offset(mut self, offset: u8) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Builder: set weekday whitelist (0 = Sunday)
    pub fn with_weekdays(mut self, days: Vec<u8>) -> Self {
        self.weekdays = Some(days);
        if let Ok(frequency) = FrequencySpec::parse(&self.freq, true) {
            self.frequency = frequency;
        }
        self
    }

    /// Builder: set hour-of-day whitelist
    pub fn with_hours(mut self, hours: Vec<u8>) -> Self {
        self.hours = Some(hours);
        self
    }

    /// Builder: set holiday exclusions
    pub fn with_holidays(mut self, holidays: Vec<NaiveDate>) -> Self {
        self.holidays = Some(holidays);
        self
    }
}

fn bounded(values: Vec<i64>, max: i64, err: fn(i64) -> DomainError) -> Result<Vec<u8>, DomainError> {
    values
        .into_iter()
        .map(|v| {
            if (0..=max).contains(&v) {
                Ok(v as u8)
            } else {
                Err(err(v))
            }
        })
        .collect()
}

impl TryFrom<RuleRecord> for MonitoringRule {
    type Error = DomainError;

    fn try_from(record: RuleRecord) -> Result<Self, Self::Error> {
        let view_id = ViewId(record.view_id.ok_or(DomainError::MissingField("view_id"))?);
        let alert_issue = record
            .alert_issue
            .ok_or(DomainError::MissingField("alert_issue"))?;

        let kind = match record.kind.as_deref() {
            None | Some("event") => {
                let compare = record
                    .compare
                    .as_deref()
                    .ok_or(DomainError::MissingField("compare"))?;
                RuleKind::Event {
                    comparison: Comparison::parse(compare)?,
                    threshold: record
                        .threshold
                        .ok_or(DomainError::MissingField("threshold"))?,
                }
            }
            Some("report") => {
                if record.threshold.is_some() {
                    return Err(DomainError::UnexpectedField("threshold"));
                }
                if record.compare.is_some() {
                    return Err(DomainError::UnexpectedField("compare"));
                }
                RuleKind::Report
            }
            Some(other) => return Err(DomainError::InvalidKind(other.to_string())),
        };

        let weekdays = record
            .days_wk
            .map(|d| bounded(d, 6, DomainError::InvalidWeekday))
            .transpose()?;
        let hours = record
            .hours_day
            .map(|h| bounded(h, 23, DomainError::InvalidHour))
            .transpose()?;
        let offset = match record.offset {
            Some(o) if !(0..=23).contains(&o) => return Err(DomainError::InvalidOffset(o)),
            Some(o) => Some(o as u8),
            None => None,
        };
        let holidays = record
            .holidays
            .map(|days| {
                days.into_iter()
                    .map(|d| parse_holiday(&d).ok_or(DomainError::InvalidHoliday(d)))
                    .collect::<Result<Vec<_>, _>>()
            })
            .transpose()?;

        let freq = record.freq.ok_or(DomainError::MissingField("freq"))?;
        let frequency = FrequencySpec::parse(&freq, weekdays.is_some())?;

        let recipients = record
            .to
            .ok_or(DomainError::MissingField("to"))?
            .into_vec();
        if recipients.is_empty() {
            return Err(DomainError::MissingField("to"));
        }
        if let Some(bad) = recipients.iter().find(|r| !is_valid_address(r)) {
            return Err(DomainError::InvalidRecipient(bad.clone()));
        }

        Ok(Self {
            view_id,
            alert_issue,
            kind,
            freq,
            frequency,
            offset,
            weekdays,
            hours,
            holidays,
            recipients,
        })
    }
}
