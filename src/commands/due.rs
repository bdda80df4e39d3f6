//! Due command implementation
//!
//! Shows which rules the scheduler selects at a given instant.

use crate::cli::args::{DueArgs, OutputFormat};
use crate::cli::output::{print_output, RuleList};
use crate::commands::{load_config, read_rules};
use crate::error::Result;
use crate::services::select_due;

use chrono::Local;

/// Execute the due command
pub fn run_due(args: &DueArgs, format: OutputFormat, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let rules = read_rules(&args.rules.rules, &config)?;

    let at = args.at.unwrap_or_else(|| Local::now().naive_local());
    let due = select_due(&rules, &at);

    let list = RuleList::due(at.format("%Y-%m-%d %H:%M").to_string(), rules.len(), &due);
    print_output(&list, format)?;

    Ok(())
}
