//! countwatch - rule-driven count monitor
//!
//! A command-line tool for checking counted views against monitoring rules
//! and sending threshold, report and staleness alerts.

use clap::Parser;
use countwatch::cli::args::{generate_completions, Cli, Commands};
use countwatch::commands::{run_check, run_due, run_rules, run_test_alert, run_validate};
use countwatch::error::{AppError, ConfigError, MailerError};

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Set log level based on verbose flag
    if cli.verbose {
        log::set_max_level(log::LevelFilter::Debug);
    }

    match run(&cli) {
        Ok(true) => {}
        // Report already printed
        Ok(false) => std::process::exit(1),
        Err(e) => {
            log::error!("{}", e);
            print_error(&e);
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<bool, AppError> {
    let config = cli.config.as_deref();

    match &cli.command {
        Commands::Validate(args) => run_validate(args, cli.format, config),

        Commands::Check(args) => run_check(args, cli.format, config).map(|_| true),

        Commands::Due(args) => run_due(args, cli.format, config).map(|_| true),

        Commands::Rules(args) => run_rules(args, cli.format, config).map(|_| true),

        Commands::TestAlert(args) => run_test_alert(args, cli.format, config).map(|_| true),

        Commands::Completions { shell } => {
            generate_completions(*shell);
            Ok(true)
        }
    }
}

fn print_error(err: &AppError) {
    eprintln!("Error: {}", err);

    // Print helpful hints for common errors
    match err {
        AppError::Config(ConfigError::FileNotFound(_)) => {
            eprintln!();
            eprintln!("Hint: Check the path, or unset COUNTWATCH_CONFIG to use the");
            eprintln!("      default locations.");
        }
        AppError::Validation(_) => {
            eprintln!();
            eprintln!("Hint: 'countwatch validate --rules <file>' checks a rule file on its own.");
        }
        AppError::Mailer(MailerError::MissingSender(_)) => {
            eprintln!();
            eprintln!("Hint: Set 'from' under [mailer] in the config file, or pass --from.");
        }
        _ => {}
    }
}
