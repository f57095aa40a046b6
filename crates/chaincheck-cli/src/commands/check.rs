//! Trace checking commands.

use std::fmt::Display;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chaincheck::{
    FixtureStore, Report, StructuralCheck, TransactionalCheck, TransactionalThresholds, run_check,
};
use chaincheck_config::ChaincheckConfig;

use crate::style::{self, colors::SemanticStyle};

/// Prints running instructions when the replica count is missing.
pub fn usage(subcommands: &[&str]) -> ExitCode {
    println!("Running instructions:");
    for subcommand in subcommands {
        println!("  chaincheck {subcommand} <replicas>");
    }
    ExitCode::SUCCESS
}

/// Checks `<i>.chain` fixtures for a common prefix.
pub fn chain(config: &ChaincheckConfig, replicas: u32, dir: Option<PathBuf>) -> Result<ExitCode> {
    let store = fixture_store(config, dir);
    let check = StructuralCheck::new(config.structural.clone());

    let report = run_check(&check, &store, replicas)
        .with_context(|| format!("structural check over {}", store.root().display()))?;

    Ok(finish(&report))
}

/// Checks `<i>.trx` and `<i>.trx_count` fixtures for throughput and
/// uniqueness.
pub fn trx(
    config: &ChaincheckConfig,
    replicas: u32,
    dir: Option<PathBuf>,
    window_minutes: Option<u64>,
) -> Result<ExitCode> {
    let store = fixture_store(config, dir);
    let thresholds = TransactionalThresholds {
        window_minutes: window_minutes.unwrap_or(config.transactional.window_minutes),
        ..config.transactional.clone()
    };
    let check = TransactionalCheck::new(thresholds);

    let report = run_check(&check, &store, replicas)
        .with_context(|| format!("transactional check over {}", store.root().display()))?;

    Ok(finish(&report))
}

fn fixture_store(config: &ChaincheckConfig, dir: Option<PathBuf>) -> FixtureStore {
    let root = dir.unwrap_or_else(|| config.fixtures.dir.clone());
    tracing::debug!(root = %root.display(), "reading fixtures");
    FixtureStore::new(root)
}

/// Prints the report on stdout and failed thresholds on stderr.
fn finish<M: Display>(report: &Report<M>) -> ExitCode {
    print!("{report}");

    let verdict = report.verdict();
    if verdict.is_pass() {
        return ExitCode::SUCCESS;
    }

    for failure in report.assessment.failures() {
        style::print_warn(&format!("{}: {}", failure.name.header(), failure.detail));
    }
    ExitCode::from(crate::EXIT_FAIL)
}
