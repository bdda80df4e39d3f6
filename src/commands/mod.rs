//! Command handlers
//!
//! Each command handler orchestrates the execution of a CLI command.

pub mod check;
pub mod due;
pub mod rules;
pub mod test_alert;
pub mod validate;

pub use check::run_check;
pub use due::run_due;
pub use rules::run_rules;
pub use test_alert::run_test_alert;
pub use validate::run_validate;

use crate::config::{load_rules, Config, ConfigBuilder, RulesFile};
use crate::domain::MonitoringRule;
use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from the named file or the default locations
fn load_config(config_path: Option<&str>) -> Result<Config> {
    Ok(ConfigBuilder::new().with_file(config_path)?.build())
}

/// Read, validate and type a rule file
fn read_rules(path: &Path, config: &Config) -> Result<Vec<MonitoringRule>> {
    let document = RulesFile::load(path)?;
    let rules = load_rules(&document, &config.monitor_settings().subject_prefixes)?;
    log::debug!("Loaded {} rule(s) from {}", rules.len(), path.display());
    Ok(rules)
}

/// Count document for the file datasource, required by commands that fetch
fn counts_file(config: &Config) -> Result<PathBuf> {
    config.datasource.counts_file.clone().ok_or_else(|| {
        ConfigError::InvalidValue {
            key: "datasource.counts_file".to_string(),
            message: "no count source; pass --counts or set it in the config file".to_string(),
        }
        .into()
    })
}
