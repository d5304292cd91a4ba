//! Bento CLI
//!
//! Command-line interface for the bento meta-linter.

mod commands;

use clap::Parser;
use std::path::PathBuf;
use tracing::error;

#[derive(Parser)]
#[command(name = "bento")]
#[command(about = "Meta-linter orchestrator: one configuration, many analysis tools")]
#[command(version = bento_core::VERSION)]
struct Cli {
    /// Files or directories to check
    #[arg(default_value = ".")]
    paths: Vec<PathBuf>,

    /// Configuration file path (discovered upward from the current directory
    /// when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Severity ceiling: off, fatal, error, warn, or info
    #[arg(short, long)]
    level: Option<String>,

    /// Output formatter, replacing the configured reporters
    #[arg(short, long)]
    formatter: Option<String>,

    /// Let linters apply automatic fixes
    #[arg(long)]
    fix: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        bento_core::init_tracing_with("bento=debug");
    } else {
        bento_core::init_tracing();
    }

    let result = commands::check(commands::CheckArgs {
        paths: cli.paths,
        config: cli.config,
        level: cli.level,
        formatter: cli.formatter,
        fix: cli.fix,
    })
    .await;

    match result {
        Ok(overall) => std::process::exit(commands::exit_code(overall)),
        Err(e) => {
            error!("{e:#}");
            // distinct from the "findings were reported" exit codes
            std::process::exit(3);
        }
    }
}
