//! Frequency domain types
//!
//! Resolves a rule's frequency string into a canonical `(unit, interval)` pair.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Granularity of a frequency interval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyUnit {
    Hour,
    Day,
}

impl fmt::Display for FrequencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hour => write!(f, "hour"),
            Self::Day => write!(f, "day"),
        }
    }
}

/// Canonical frequency: every `interval` units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrequencySpec {
    pub unit: FrequencyUnit,
    pub interval: u32,
}

impl FrequencySpec {
    /// Create a new frequency spec
    ///
    /// # Errors
    /// Returns `DomainError::InvalidFrequency` for a zero interval
    pub fn new(unit: FrequencyUnit, interval: u32) -> Result<Self, DomainError> {
        if interval == 0 {
            return Err(DomainError::InvalidFrequency(format!("{}-0", unit)));
        }
        Ok(Self { unit, interval })
    }

    /// Every hour
    pub const HOURLY: Self = Self {
        unit: FrequencyUnit::Hour,
        interval: 1,
    };

    /// Every 24 hours
    pub const DAILY: Self = Self {
        unit: FrequencyUnit::Hour,
        interval: 24,
    };

    /// Every 7 days
    pub const WEEKLY: Self = Self {
        unit: FrequencyUnit::Day,
        interval: 7,
    };

    /// Parse a frequency string
    ///
    /// `weekly` combined with an explicit weekday list runs on the listed
    /// days, so it resolves to the daily cadence. No other frequency is
    /// affected by the weekday list.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidFrequency` if the string is not one of
    /// `hourly`, `daily`, `weekly`, `hour-N` or `day-N` with N >= 1.
    pub fn parse(freq: &str, has_weekdays: bool) -> Result<Self, DomainError> {
        match freq {
            "hourly" => Ok(Self::HOURLY),
            "daily" => Ok(Self::DAILY),
            "weekly" if has_weekdays => Ok(Self::DAILY),
            "weekly" => Ok(Self::WEEKLY),
            other => {
                let invalid = || DomainError::InvalidFrequency(other.to_string());
                let (unit, count) = other.split_once('-').ok_or_else(invalid)?;
                let unit = match unit {
                    "hour" => FrequencyUnit::Hour,
                    "day" => FrequencyUnit::Day,
                    _ => return Err(invalid()),
                };
                if count.is_empty() || !count.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(invalid());
                }
                let interval: u32 = count.parse().map_err(|_| invalid())?;
                Self::new(unit, interval).map_err(|_| invalid())
            }
        }
    }
}

impl fmt::Display for FrequencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {} {}(s)", self.interval, self.unit)
    }
}
