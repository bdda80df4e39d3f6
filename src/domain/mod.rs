//! Domain models for countwatch
//!
//! This module contains all domain types with validation.
//! Rules are validated on construction (fail-fast pattern).

pub mod frequency;
pub mod rule;
pub mod state;

pub use frequency::{FrequencySpec, FrequencyUnit};
pub use rule::{
    is_valid_address, parse_holiday, Comparison, MonitoringRule, Recipients, RuleKind, RuleRecord,
    ViewId,
};
pub use state::{CycleState, RuleState, ViewCount};
