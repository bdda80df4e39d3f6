//! Validate command implementation
//!
//! Checks a rule file and prints every violation found.

use crate::cli::args::{OutputFormat, RulesArgs};
use crate::cli::output::{print_output, ValidationReport};
use crate::commands::load_config;
use crate::config::RulesFile;
use crate::error::Result;
use crate::services::validate;

/// Execute the validate command
///
/// Returns whether the rule file is valid.
pub fn run_validate(args: &RulesArgs, format: OutputFormat, config_path: Option<&str>) -> Result<bool> {
    let config = load_config(config_path)?;
    let document = RulesFile::load(&args.rules)?;

    let validation = validate(&document, &config.monitor_settings().subject_prefixes);
    if !validation.ok {
        log::warn!(
            "{} failed validation with {} error(s)",
            args.rules.display(),
            validation.error_count()
        );
    }

    let report = ValidationReport::new(args.rules.display().to_string(), &validation);
    print_output(&report, format)?;

    Ok(validation.ok)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn rules_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_validate_good_file() {
        let file = rules_file(
            "[[views]]\nview_id = 1\nalert_issue = \"hourly totals\"\ntype = \"report\"\nfreq = \"hourly\"\nto = \"a@example.com\"\n",
        );
        let args = RulesArgs {
            rules: file.path().to_path_buf(),
        };
        let config = tempfile::NamedTempFile::new().unwrap();
        let config_path = config.path().to_str().unwrap();
        assert!(run_validate(&args, OutputFormat::Compact, Some(config_path)).unwrap());
    }

    #[test]
    fn test_validate_bad_file() {
        let file = rules_file("[[views]]\nview_id = 1\nfreq = \"sometimes\"\n");
        let args = RulesArgs {
            rules: file.path().to_path_buf(),
        };
        let config = tempfile::NamedTempFile::new().unwrap();
        let config_path = config.path().to_str().unwrap();
        assert!(!run_validate(&args, OutputFormat::Compact, Some(config_path)).unwrap());
    }
}
