//! # sgate CLI entry point
//!
//! Parses command-line arguments, initializes logging, loads the config,
//! and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use sgate_cli::authorize::{run_authorize, AuthorizeArgs};
use sgate_cli::config::SgateConfig;
use sgate_cli::demo::{run_demo, DemoArgs};
use sgate_cli::rules::{run_rules, RulesArgs};
use sgate_cli::run::{run_run, RunArgs};
use sgate_cli::verify::{run_verify_chain, VerifyChainArgs};

/// Policy-gated authorization ledger for autonomous-agent actions.
///
/// Every proposed command is checked against a fixed rule set; only
/// compliant commands are recorded, in an append-only SHA-256 hash chain.
#[derive(Parser, Debug)]
#[command(name = "sgate", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate and record a single proposal.
    Authorize(AuthorizeArgs),

    /// Replay a YAML/JSON list of proposals through one ledger.
    Run(RunArgs),

    /// Replay the reference scenarios.
    Demo(DemoArgs),

    /// Verify an exported chain offline.
    VerifyChain(VerifyChainArgs),

    /// Print the effective rule set.
    Rules(RulesArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG applies only when no -v flag is given.
    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    match cli.log_format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init(),
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "sgate CLI starting");

    let config = match SgateConfig::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("{e:#}");
            return ExitCode::from(1);
        }
    };

    let result = match cli.command {
        Commands::Authorize(args) => run_authorize(&args, &config),
        Commands::Run(args) => run_run(&args, &config),
        Commands::Demo(args) => run_demo(&args, &config),
        Commands::VerifyChain(args) => run_verify_chain(&args),
        Commands::Rules(args) => run_rules(&args, &config),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
