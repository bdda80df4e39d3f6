//! Rule scheduler
//!
//! Pure selection of the rules due at a given wall-clock instant. Only the
//! date and hour of the instant are consulted.

use crate::domain::{FrequencyUnit, MonitoringRule};
use chrono::{Datelike, NaiveDateTime, Timelike};

/// Whether a single rule is due at `now`
pub fn is_due(rule: &MonitoringRule, now: &NaiveDateTime) -> bool {
    let hour = now.hour() as i64;
    let offset = rule.offset.unwrap_or(0) as i64;
    let interval = rule.frequency.interval.max(1) as i64;
    let hour_matches = (hour - offset).rem_euclid(interval) == 0;

    let on_cadence = match rule.frequency.unit {
        FrequencyUnit::Hour => hour_matches,
        FrequencyUnit::Day => (now.ordinal() as i64) % interval == 0 && hour_matches,
    };
    if !on_cadence {
        return false;
    }

    if let Some(days) = &rule.weekdays {
        let weekday = now.weekday().num_days_from_sunday() as u8;
        if !days.contains(&weekday) {
            return false;
        }
    }

    if let Some(hours) = &rule.hours {
        if !hours.contains(&(now.hour() as u8)) {
            return false;
        }
    }

    if let Some(holidays) = &rule.holidays {
        if holidays.contains(&now.date()) {
            return false;
        }
    }

    true
}

/// Select the rules due at `now`, preserving rule order
pub fn select_due<'a>(rules: &'a [MonitoringRule], now: &NaiveDateTime) -> Vec<&'a MonitoringRule> {
    rules.iter().filter(|rule| is_due(rule, now)).collect()
}
