//! Trait definitions for count fetching

use crate::domain::{ViewCount, ViewId};
use crate::error::DatasourceError;
use std::collections::BTreeSet;

/// Source of view counts
///
/// Implementations must tolerate repeated calls within one cycle. An `Err`
/// is a hard failure that ends the cycle; a view that is merely not ready
/// comes back with `fresh == false`.
pub trait Datasource: Send + Sync {
    /// Fetch counts for all `ids` in one batched request
    fn fetch(&self, ids: &BTreeSet<ViewId>) -> Result<Vec<ViewCount>, DatasourceError>;

    /// Datasource name for logging
    fn name(&self) -> &str;
}
