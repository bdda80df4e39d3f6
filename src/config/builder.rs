//! Configuration builder
//!
//! Merges configuration from files and CLI arguments.

use crate::config::{Config, ConfigFile};
use crate::error::ConfigError;
use std::path::PathBuf;

/// Builder for merging configuration sources
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Load configuration from a file, or from default locations
    ///
    /// An explicitly named file must load; default locations are optional.
    pub fn with_file(mut self, path: Option<&str>) -> Result<Self, ConfigError> {
        let file_config = match path {
            Some(path) => Some(ConfigFile::load(path)?),
            None => ConfigFile::load_default(),
        };

        if let Some(cfg) = file_config {
            self.config = cfg;
        }

        Ok(self)
    }

    /// Override with CLI retry count
    pub fn with_retry_count(mut self, retries: Option<u32>) -> Self {
        if let Some(r) = retries {
            self.config.monitor.retry_count = r;
        }
        self
    }

    /// Override with CLI backoff
    pub fn with_backoff_seconds(mut self, backoff: Option<u64>) -> Self {
        if let Some(b) = backoff {
            self.config.monitor.backoff_seconds = b;
        }
        self
    }

    /// Override with CLI counts file
    pub fn with_counts_file(mut self, path: Option<PathBuf>) -> Self {
        if let Some(p) = path {
            self.config.datasource.counts_file = Some(p);
        }
        self
    }

    /// Override with CLI sender address
    pub fn with_sender(mut self, from: Option<String>) -> Self {
        if let Some(f) = from {
            self.config.mailer.from = Some(f);
        }
        self
    }

    /// Build the final configuration
    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
