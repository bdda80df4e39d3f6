//! Rules command implementation
//!
//! Lists the validated rules in a rule file.

use crate::cli::args::{OutputFormat, RulesArgs};
use crate::cli::output::{print_output, RuleList};
use crate::commands::{load_config, read_rules};
use crate::error::Result;

/// Execute the rules command
pub fn run_rules(args: &RulesArgs, format: OutputFormat, config_path: Option<&str>) -> Result<()> {
    let config = load_config(config_path)?;
    let rules = read_rules(&args.rules, &config)?;

    print_output(&RuleList::all(&rules), format)?;

    Ok(())
}
