//! Per-cycle evaluation state
//!
//! One `RuleState` per due rule, held in a side table indexed by the rule's
//! position in the due list. Nothing here outlives a single cycle.

use super::rule::ViewId;
use serde::{Deserialize, Serialize};

/// A count returned by the datasource for one view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewCount {
    pub view_id: ViewId,
    pub value: i64,
    /// Asserted by the datasource, never inferred locally
    pub fresh: bool,
}

impl ViewCount {
    pub fn fresh(view_id: u64, value: i64) -> Self {
        Self {
            view_id: ViewId(view_id),
            value,
            fresh: true,
        }
    }

    pub fn stale(view_id: u64, value: i64) -> Self {
        Self {
            view_id: ViewId(view_id),
            value,
            fresh: false,
        }
    }
}

/// Evaluation state of one rule within one cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RuleState {
    pub fresh: bool,
    pub value: Option<i64>,
    pub alerted: bool,
}

impl RuleState {
    /// Merge an incoming count
    ///
    /// Freshness only ever moves from stale to fresh. The value is taken
    /// only from fresh counts.
    pub fn absorb(&mut self, count: &ViewCount) {
        self.fresh |= count.fresh;
        if count.fresh {
            self.value = Some(count.value);
        }
    }
}

/// Side table of rule states for one cycle
#[derive(Debug, Clone, Default)]
pub struct CycleState {
    states: Vec<RuleState>,
}

impl CycleState {
    /// Fresh table with `len` pending entries
    pub fn new(len: usize) -> Self {
        Self {
            states: vec![RuleState::default(); len],
        }
    }

    pub fn get(&self, index: usize) -> Option<&RuleState> {
        self.states.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut RuleState> {
        self.states.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuleState> {
        self.states.iter()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Number of entries not yet fresh
    pub fn pending_count(&self) -> usize {
        self.states.iter().filter(|s| !s.fresh).count()
    }
}
