//! File-backed datasource
//!
//! Reads counts from a JSON document shaped like the upstream count API.
//! The file is re-read on every fetch so an external process can update it
//! between retries.

use super::traits::Datasource;
use crate::domain::{ViewCount, ViewId};
use crate::error::DatasourceError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Body of a count API response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountResponse {
    Counts { view_counts: Vec<ViewCount> },
    Error { error: String },
}

impl CountResponse {
    /// Parse a response body
    ///
    /// A body that is not a count document is treated as an error message,
    /// the way the upstream reports authentication failures as plain text.
    pub fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self::Error {
            error: body.trim().to_string(),
        })
    }

    /// Counts for the requested ids, or the upstream error
    pub fn into_counts(self, ids: &BTreeSet<ViewId>) -> Result<Vec<ViewCount>, DatasourceError> {
        match self {
            Self::Counts { view_counts } => Ok(view_counts
                .into_iter()
                .filter(|c| ids.contains(&c.view_id))
                .collect()),
            Self::Error { error } => Err(DatasourceError::Rejected(error)),
        }
    }
}

/// Datasource reading a JSON count document from disk
#[derive(Debug, Clone)]
pub struct FileDatasource {
    path: PathBuf,
}

impl FileDatasource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl Datasource for FileDatasource {
    fn fetch(&self, ids: &BTreeSet<ViewId>) -> Result<Vec<ViewCount>, DatasourceError> {
        let body = std::fs::read_to_string(&self.path).map_err(|e| {
            DatasourceError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        log::debug!(
            "Read {} bytes of counts from {} for {} view(s)",
            body.len(),
            self.path.display(),
            ids.len()
        );
        CountResponse::parse(&body).into_counts(ids)
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ids(values: &[u64]) -> BTreeSet<ViewId> {
        values.iter().copied().map(ViewId).collect()
    }

    #[test]
    fn test_parse_counts() {
        let body = r#"{"view_counts": [
            {"view_id": 1, "value": 600, "fresh": true},
            {"view_id": 2, "value": 10, "fresh": false}
        ]}"#;
        let counts = CountResponse::parse(body).into_counts(&ids(&[1, 2])).unwrap();
        assert_eq!(counts, vec![ViewCount::fresh(1, 600), ViewCount::stale(2, 10)]);
    }

    #[test]
    fn test_counts_filtered_to_requested_ids() {
        let body = r#"{"view_counts": [
            {"view_id": 1, "value": 600, "fresh": true},
            {"view_id": 9, "value": 1, "fresh": true}
        ]}"#;
        let counts = CountResponse::parse(body).into_counts(&ids(&[1])).unwrap();
        assert_eq!(counts.len(), 1);
    }

    #[test]
    fn test_error_document() {
        let result = CountResponse::parse(r#"{"error": "auth failed"}"#).into_counts(&ids(&[1]));
        match result {
            Err(DatasourceError::Rejected(msg)) => assert_eq!(msg, "auth failed"),
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_non_json_body_is_error() {
        let response = CountResponse::parse("Couldn't authenticate you\n");
        assert_eq!(
            response,
            CountResponse::Error {
                error: "Couldn't authenticate you".to_string()
            }
        );
    }

    #[test]
    fn test_file_datasource_reads_each_call() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"view_counts": [{{"view_id": 5, "value": 3, "fresh": true}}]}}"#
        )
        .unwrap();

        let source = FileDatasource::new(file.path());
        assert_eq!(source.name(), "file");
        let first = source.fetch(&ids(&[5])).unwrap();
        let second = source.fetch(&ids(&[5])).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[0].value, 3);
    }

    #[test]
    fn test_missing_file_is_hard_error() {
        let source = FileDatasource::new("/nonexistent/counts.json");
        assert!(matches!(
            source.fetch(&ids(&[1])),
            Err(DatasourceError::Unavailable(_))
        ));
    }
}
