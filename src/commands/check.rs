//! Check command implementation
//!
//! Runs one monitoring cycle against the file datasource and prints the
//! cycle summary. Alerts go to the terminal mailer.

use crate::alerts::TerminalMailer;
use crate::cli::args::{CheckArgs, OutputFormat};
use crate::cli::output::{print_output, CycleReport};
use crate::commands::{counts_file, read_rules};
use crate::config::ConfigBuilder;
use crate::datasource::FileDatasource;
use crate::error::Result;
use crate::services::Monitor;

use chrono::Local;

/// Execute the check command
pub fn run_check(args: &CheckArgs, format: OutputFormat, config_path: Option<&str>) -> Result<()> {
    let config = ConfigBuilder::new()
        .with_file(config_path)?
        .with_retry_count(args.retries)
        .with_backoff_seconds(args.backoff)
        .with_counts_file(args.counts.clone())
        .build();

    let rules = read_rules(&args.rules.rules, &config)?;

    let counts_file = counts_file(&config)?;

    // Keep stdout clean for machine-readable output
    let mailer = match format {
        OutputFormat::Json => TerminalMailer::stderr(config.mailer.from.clone()),
        _ => TerminalMailer::new(config.mailer.from.clone()),
    };

    let monitor = Monitor::new(
        FileDatasource::new(counts_file),
        mailer,
        config.monitor_settings(),
    );

    let at = args.at.unwrap_or_else(|| Local::now().naive_local());
    let outcome = monitor.check(&rules, Some(at));

    if outcome.aborted {
        log::warn!("Cycle aborted after {} attempt(s)", outcome.attempts);
    }

    let report = CycleReport {
        at: at.format("%Y-%m-%d %H:%M").to_string(),
        outcome,
    };
    print_output(&report, format)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::args::RulesArgs;
    use crate::error::{AppError, ConfigError};
    use std::io::Write;

    #[test]
    fn test_check_requires_count_source() {
        let mut rules = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(rules, "[]").unwrap();
        let config = tempfile::NamedTempFile::new().unwrap();

        let args = CheckArgs {
            rules: RulesArgs {
                rules: rules.path().to_path_buf(),
            },
            at: None,
            counts: None,
            retries: None,
            backoff: Some(0),
        };

        let result = run_check(&args, OutputFormat::Compact, config.path().to_str());
        assert!(matches!(
            result,
            Err(AppError::Config(ConfigError::InvalidValue { .. }))
        ));
    }
}
