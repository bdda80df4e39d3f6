//! CLI argument definitions using clap derive
//!
//! Defines all command-line arguments and subcommands.

use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

/// Rule-driven count monitor
///
/// Polls counted views against monitoring rules and sends threshold,
/// report and staleness alerts.
#[derive(Parser, Debug)]
#[command(name = "countwatch")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "COUNTWATCH_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate a rule file
    Validate(RulesArgs),

    /// Run one monitoring cycle
    Check(CheckArgs),

    /// Show which rules are due at an instant
    Due(DueArgs),

    /// List the rules in a rule file
    Rules(RulesArgs),

    /// Send a sample alert through the mailer
    TestAlert(TestAlertArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Arguments naming a rule file
#[derive(Parser, Debug)]
pub struct RulesArgs {
    /// Rule file (TOML with [[views]], or JSON)
    #[arg(short, long, env = "COUNTWATCH_RULES")]
    pub rules: PathBuf,
}

/// Arguments for the check command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub rules: RulesArgs,

    /// Evaluate as if at this local time (YYYY-MM-DDTHH:MM)
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<chrono::NaiveDateTime>,

    /// JSON count document for the file datasource
    #[arg(long)]
    pub counts: Option<PathBuf>,

    /// Maximum fetch attempts
    #[arg(long)]
    pub retries: Option<u32>,

    /// Seconds between fetch attempts
    #[arg(long)]
    pub backoff: Option<u64>,
}

/// Arguments for the due command
#[derive(Parser, Debug)]
pub struct DueArgs {
    #[command(flatten)]
    pub rules: RulesArgs,

    /// Local time to evaluate (YYYY-MM-DDTHH:MM), defaults to now
    #[arg(long, value_parser = parse_instant)]
    pub at: Option<chrono::NaiveDateTime>,
}

/// Arguments for the test-alert command
#[derive(Parser, Debug)]
pub struct TestAlertArgs {
    /// Recipient of the sample alert (defaults to the admin recipients)
    #[arg(long)]
    pub to: Option<String>,

    /// Sender address (overrides the configured one)
    #[arg(long)]
    pub from: Option<String>,

    /// Also check that every view in this rule file has a count
    #[arg(short, long)]
    pub rules: Option<PathBuf>,

    /// JSON count document for the file datasource
    #[arg(long, requires = "rules")]
    pub counts: Option<PathBuf>,
}

/// Output format
#[derive(ValueEnum, Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable table format
    #[default]
    Table,
    /// JSON format for machine parsing
    Json,
    /// Compact single-line format
    Compact,
}

/// Parse a local instant given to the minute or second
pub fn parse_instant(s: &str) -> Result<chrono::NaiveDateTime, String> {
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
        .iter()
        .find_map(|fmt| chrono::NaiveDateTime::parse_from_str(s, fmt).ok())
        .ok_or_else(|| format!("invalid time '{}', expected YYYY-MM-DDTHH:MM", s))
}

/// Generate shell completions and print to stdout
pub fn generate_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_cli_parse_validate() {
        let args = Cli::try_parse_from(["countwatch", "validate", "--rules", "r.toml"]).unwrap();
        if let Commands::Validate(v) = args.command {
            assert_eq!(v.rules, PathBuf::from("r.toml"));
        } else {
            panic!("Expected Validate command");
        }
    }

    #[test]
    fn test_cli_parse_verbose() {
        let args = Cli::try_parse_from(["countwatch", "-v", "rules", "-r", "r.toml"]).unwrap();
        assert!(args.verbose);
    }

    #[test]
    fn test_cli_parse_check_args() {
        let args = Cli::try_parse_from([
            "countwatch",
            "check",
            "--rules",
            "r.toml",
            "--at",
            "2024-03-05T10:30",
            "--counts",
            "counts.json",
            "--retries",
            "5",
            "--backoff",
            "0",
        ])
        .unwrap();

        if let Commands::Check(check) = args.command {
            assert_eq!(check.at.unwrap().hour(), 10);
            assert_eq!(check.counts, Some(PathBuf::from("counts.json")));
            assert_eq!(check.retries, Some(5));
            assert_eq!(check.backoff, Some(0));
        } else {
            panic!("Expected Check command");
        }
    }

    #[test]
    fn test_cli_rejects_bad_instant() {
        let result = Cli::try_parse_from([
            "countwatch",
            "due",
            "--rules",
            "r.toml",
            "--at",
            "tomorrow",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_test_alert() {
        let args = Cli::try_parse_from([
            "countwatch",
            "test-alert",
            "--to",
            "a@example.com",
            "--rules",
            "r.toml",
            "--counts",
            "counts.json",
        ])
        .unwrap();

        if let Commands::TestAlert(t) = args.command {
            assert_eq!(t.to.as_deref(), Some("a@example.com"));
            assert_eq!(t.rules, Some(PathBuf::from("r.toml")));
            assert_eq!(t.counts, Some(PathBuf::from("counts.json")));
        } else {
            panic!("Expected TestAlert command");
        }

        // counts alone has nothing to check against
        assert!(Cli::try_parse_from(["countwatch", "test-alert", "--counts", "c.json"]).is_err());
    }

    #[test]
    fn test_parse_instant_formats() {
        assert!(parse_instant("2024-03-05T10:30:15").is_ok());
        assert!(parse_instant("2024-03-05 10:30").is_ok());
        assert!(parse_instant("2024-03-05").is_err());
    }
}
