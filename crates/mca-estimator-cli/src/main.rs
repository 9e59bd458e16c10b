mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::mca::{BracketsArgs, QuoteArgs, ValidateArgs};

/// Merchant cash advance quote estimates
#[derive(Parser)]
#[command(
    name = "mca",
    version,
    about = "Merchant cash advance quote estimates",
    long_about = "Estimate a merchant cash advance from revenue, credit-score and \
                  time-in-business brackets: risk tier, factor rate, repayment \
                  schedule across daily/weekly/bi-weekly/monthly collections, and a \
                  simplified APR equivalent."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log filter used when RUST_LOG is unset (e.g. "debug", "mca_estimator_core=trace")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Price a merchant cash advance quote
    Quote(QuoteArgs),
    /// Check a quote request and report per-field errors without pricing it
    Validate(ValidateArgs),
    /// List the accepted bracket options and advance range
    Brackets(BracketsArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(2);
    }

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Quote(args) => commands::mca::run_quote(args),
        Commands::Validate(args) => commands::mca::run_validate(args),
        Commands::Brackets(args) => commands::mca::run_brackets(args),
        Commands::Version => {
            println!("mca {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
