//! End-to-end checks over on-disk fixture directories.

use std::fs;
use std::path::Path;

use chaincheck::{
    CheckError, FixtureStore, StructuralCheck, TransactionalCheck, Verdict, run_check,
};
use tempfile::TempDir;

// ============================================================================
// Fixture Writers
// ============================================================================

fn write_chain(dir: &Path, replica: u32, digests: &[String]) {
    let json = serde_json::to_string(digests).expect("Failed to encode chain");
    fs::write(dir.join(format!("{replica}.chain")), json).expect("Failed to write chain");
}

fn write_trx(dir: &Path, replica: u32, blocks: &[Vec<String>], count: &str) {
    let json = serde_json::to_string(blocks).expect("Failed to encode trx");
    fs::write(dir.join(format!("{replica}.trx")), json).expect("Failed to write trx");
    fs::write(dir.join(format!("{replica}.trx_count")), count).expect("Failed to write count");
}

fn digests(len: usize, diverge_at: usize, tag: &str) -> Vec<String> {
    (0..len)
        .map(|i| {
            if i < diverge_at {
                format!("{i:064x}")
            } else {
                format!("{tag}{i:060x}")
            }
        })
        .collect()
}

fn trx_blocks(blocks: usize, per_block: usize) -> Vec<Vec<String>> {
    let mut layout = vec![Vec::new()];
    layout.extend(
        (0..blocks).map(|b| (0..per_block).map(|t| format!("{b:04x}{t:060x}")).collect()),
    );
    layout
}

// ============================================================================
// Structural Chains
// ============================================================================

#[test]
fn three_replicas_with_shallow_fork_pass() {
    let dir = TempDir::new().unwrap();
    write_chain(dir.path(), 1, &digests(60, 58, "aaaa"));
    write_chain(dir.path(), 2, &digests(61, 58, "bbbb"));
    write_chain(dir.path(), 3, &digests(60, 58, "cccc"));

    let report =
        run_check(&StructuralCheck::default(), &FixtureStore::new(dir.path()), 3).unwrap();

    assert_eq!(
        report.to_string(),
        "number of chains = 3\n\
         min chain length = 60\n\
         max chain length = 61\n\
         length difference = 1\n\
         common prefix = 58\n\
         test = PASS\n"
    );
}

#[test]
fn forty_block_chains_fail() {
    let dir = TempDir::new().unwrap();
    for replica in 1..=3 {
        write_chain(dir.path(), replica, &digests(40, 40, ""));
    }

    let report =
        run_check(&StructuralCheck::default(), &FixtureStore::new(dir.path()), 3).unwrap();

    assert_eq!(report.metrics.common_prefix, 40);
    assert_eq!(report.verdict(), Verdict::Fail);
}

#[test]
fn missing_replica_file_aborts() {
    let dir = TempDir::new().unwrap();
    write_chain(dir.path(), 1, &digests(60, 60, ""));

    let err =
        run_check(&StructuralCheck::default(), &FixtureStore::new(dir.path()), 2).unwrap_err();

    assert!(matches!(err, CheckError::MalformedTrace { .. }));
    assert!(err.to_string().contains("2.chain"));
}

// ============================================================================
// Transactional Traces
// ============================================================================

#[test]
fn single_replica_trace_passes() {
    let dir = TempDir::new().unwrap();
    write_trx(dir.path(), 0, &trx_blocks(5, 120), "\"600\"");

    let report =
        run_check(&TransactionalCheck::default(), &FixtureStore::new(dir.path()), 1).unwrap();

    assert_eq!(
        report.to_string(),
        "number of chains = 1\n\
         min trx throughput = 600\n\
         min trx per block = 120\n\
         fraction of unique trx = 1\n\
         common prefix = true\n\
         test = PASS\n"
    );
}

#[test]
fn recorded_total_mismatch_is_an_invariant_violation() {
    let dir = TempDir::new().unwrap();
    write_trx(dir.path(), 0, &trx_blocks(4, 12), "50");

    let err =
        run_check(&TransactionalCheck::default(), &FixtureStore::new(dir.path()), 1).unwrap_err();

    assert!(err.is_invariant_violation());
    assert!(err.to_string().contains("replica 0"));
}

#[test]
fn starved_blocks_fail() {
    let dir = TempDir::new().unwrap();
    for replica in 0..2 {
        write_trx(dir.path(), replica, &trx_blocks(100, 5), "500");
    }

    let report =
        run_check(&TransactionalCheck::default(), &FixtureStore::new(dir.path()), 2).unwrap();

    let failed: Vec<_> = report.assessment.failures().map(|c| c.name).collect();
    assert_eq!(failed, vec!["trx_per_block"]);
}
