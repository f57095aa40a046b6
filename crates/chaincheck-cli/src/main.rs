//! chaincheck CLI.
//!
//! Judges the traces a ledger testbed recorded for each replica.
//!
//! # Quick Start
//!
//! ```bash
//! # Safety: common prefix across expt/1.chain .. expt/3.chain
//! chaincheck chain 3
//!
//! # Liveness: throughput and uniqueness of expt/0.trx .. expt/2.trx
//! chaincheck trx 3 --window-minutes 5
//! ```
//!
//! The report goes to stdout and ends with `test = PASS` or `test = FAIL`.
//! Exit status: 0 pass, 1 fail, 2 unreadable input or configuration,
//! 3 the traces break an accounting invariant.

mod commands;
mod style;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use chaincheck::CheckError;
use chaincheck_config::{ChaincheckConfig, ConfigLoader};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

/// chaincheck - cross-replica safety and throughput oracle for ledger traces.
#[derive(Parser)]
#[command(name = "chaincheck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Directory searched for chaincheck.toml and chaincheck.local.toml.
    #[arg(long, global = true, default_value = ".")]
    project_dir: PathBuf,

    /// Disable colored diagnostics.
    #[arg(long, global = true)]
    no_color: bool,

    /// Log per-replica details to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// Check structural chains (<i>.chain, numbered from 1) for a common prefix.
    Chain {
        /// Number of replicas to compare.
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        replicas: Option<u32>,

        /// Fixture directory (overrides [fixtures] dir).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Check transactional traces (<i>.trx and <i>.trx_count, numbered from 0).
    Trx {
        /// Number of replicas to compare.
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        replicas: Option<u32>,

        /// Fixture directory (overrides [fixtures] dir).
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Observation window in minutes (overrides [transactional] window_minutes).
        #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
        window_minutes: Option<u64>,
    },

    /// Print the effective configuration as TOML.
    Config,
}

/// Exit status for a FAIL verdict.
pub(crate) const EXIT_FAIL: u8 = 1;
/// Exit status when fixtures or configuration cannot be read.
const EXIT_UNUSABLE_INPUT: u8 = 2;
/// Exit status when the traces break an accounting invariant.
const EXIT_INVARIANT_VIOLATION: u8 = 3;

fn main() -> ExitCode {
    let cli = Cli::parse();
    style::set_no_color(cli.no_color);

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            style::print_error(&format!("{err:#}"));
            ExitCode::from(exit_status(&err))
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let Cli {
        project_dir,
        verbose,
        command,
        ..
    } = cli;

    let Some(command) = command else {
        return Ok(commands::check::usage(&["chain", "trx"]));
    };

    match command {
        Commands::Version => {
            commands::version::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Chain { replicas: None, .. } => Ok(commands::check::usage(&["chain"])),
        Commands::Chain {
            replicas: Some(replicas),
            dir,
        } => commands::check::chain(&load_config(&project_dir, verbose)?, replicas, dir),
        Commands::Trx { replicas: None, .. } => Ok(commands::check::usage(&["trx"])),
        Commands::Trx {
            replicas: Some(replicas),
            dir,
            window_minutes,
        } => commands::check::trx(
            &load_config(&project_dir, verbose)?,
            replicas,
            dir,
            window_minutes,
        ),
        Commands::Config => {
            commands::config::show(&load_config(&project_dir, verbose)?)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Loads the merged configuration, then starts logging with its color
/// setting applied.
fn load_config(project_dir: &Path, verbose: bool) -> Result<ChaincheckConfig> {
    let config = ConfigLoader::new().with_project_dir(project_dir).load()?;
    if !config.output.color {
        style::set_no_color(true);
    }
    init_logging(verbose);
    Ok(config)
}

/// Logs go to stderr; stdout is reserved for the report. `RUST_LOG` wins
/// over the default level unless `--verbose` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::builder()
            .with_default_directive(LevelFilter::WARN.into())
            .from_env_lossy()
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(!style::no_color() && std::io::stderr().is_terminal())
        .init();
}

/// Maps an aborted run to its exit status.
fn exit_status(err: &anyhow::Error) -> u8 {
    match err.chain().find_map(|cause| cause.downcast_ref::<CheckError>()) {
        Some(check) if check.is_invariant_violation() => EXIT_INVARIANT_VIOLATION,
        _ => EXIT_UNUSABLE_INPUT,
    }
}
