//! Metrics aggregation.
//!
//! Folds per-replica scalars into run-wide minima and maxima. For
//! transactional traces each replica is first tallied, and the tally checks
//! two invariants of the traced run itself:
//!
//! - the recorded transaction total equals the number of transactions in
//!   the replica's blocks;
//! - the fraction of distinct transactions is at least the configured floor.
//!
//! Either violation is fatal and is returned as an error rather than scored.

use std::fmt;

use crate::comparator;
use crate::error::{CheckError, Result};
use crate::trace::{ReplicaId, Trace};

// ============================================================================
// Length Statistics
// ============================================================================

/// Shortest and longest trace length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LengthStats {
    pub min: usize,
    pub max: usize,
}

impl LengthStats {
    /// Returns `None` for an empty slice.
    pub fn of(traces: &[Trace]) -> Option<Self> {
        let min = traces.iter().map(Trace::len).min()?;
        let max = traces.iter().map(Trace::len).max()?;
        Some(Self { min, max })
    }
}

// ============================================================================
// Structural Metrics
// ============================================================================

/// Aggregate metrics for structural chains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralMetrics {
    pub replicas: usize,
    pub min_length: usize,
    pub max_length: usize,
    pub common_prefix: usize,
}

impl StructuralMetrics {
    pub fn length_spread(&self) -> usize {
        self.max_length.saturating_sub(self.min_length)
    }

    /// Blocks by which the shortest chain extends past the common prefix.
    pub fn prefix_lag(&self) -> usize {
        self.min_length.saturating_sub(self.common_prefix)
    }
}

impl fmt::Display for StructuralMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "number of chains = {}", self.replicas)?;
        writeln!(f, "min chain length = {}", self.min_length)?;
        writeln!(f, "max chain length = {}", self.max_length)?;
        writeln!(f, "length difference = {}", self.length_spread())?;
        writeln!(f, "common prefix = {}", self.common_prefix)
    }
}

/// Aggregates structural chains using whole-block equality.
pub fn aggregate_structural(traces: &[Trace]) -> Result<StructuralMetrics> {
    let lengths = LengthStats::of(traces).ok_or(CheckError::NoReplicas)?;
    let common_prefix = comparator::common_block_prefix(traces);

    let metrics = StructuralMetrics {
        replicas: traces.len(),
        min_length: lengths.min,
        max_length: lengths.max,
        common_prefix,
    };

    tracing::info!(
        replicas = metrics.replicas,
        min_length = metrics.min_length,
        max_length = metrics.max_length,
        common_prefix = metrics.common_prefix,
        "aggregated structural chains"
    );
    Ok(metrics)
}

// ============================================================================
// Transactional Metrics
// ============================================================================

/// A transactional trace with the total its replica recorded.
#[derive(Debug, Clone)]
pub struct TransactionalRecord {
    pub trace: Trace,
    pub recorded_total: u64,
}

/// Per-replica accounting for a transactional trace.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicaTally {
    pub replica: ReplicaId,
    pub blocks: usize,
    pub recorded_total: u64,
    pub unique: u64,
    pub trx_per_block: f64,
    pub unique_fraction: f64,
}

/// Transactions per committed block, excluding genesis.
///
/// A genesis-only (or empty) trace has committed nothing and yields 0.
pub fn trx_per_block(recorded_total: u64, trace_len: usize) -> f64 {
    if trace_len <= 1 {
        0.0
    } else {
        recorded_total as f64 / (trace_len - 1) as f64
    }
}

/// Tallies one replica and enforces its accounting invariants.
pub fn tally(record: &TransactionalRecord, unique_floor: f64) -> Result<ReplicaTally> {
    let trace = &record.trace;
    let replica = trace.replica();
    let counted = trace.transaction_count();

    if counted != record.recorded_total {
        return Err(CheckError::InconsistentCount {
            replica,
            recorded: record.recorded_total,
            counted,
        });
    }

    let unique = trace.unique_transaction_count();
    // Nothing committed means nothing duplicated.
    let unique_fraction = if record.recorded_total == 0 {
        1.0
    } else {
        unique as f64 / record.recorded_total as f64
    };

    if unique_fraction < unique_floor {
        return Err(CheckError::DuplicateTransactions {
            replica,
            fraction: unique_fraction,
            floor: unique_floor,
        });
    }

    let tally = ReplicaTally {
        replica,
        blocks: trace.len(),
        recorded_total: record.recorded_total,
        unique,
        trx_per_block: trx_per_block(record.recorded_total, trace.len()),
        unique_fraction,
    };

    tracing::debug!(
        %replica,
        blocks = tally.blocks,
        total = tally.recorded_total,
        unique = tally.unique,
        trx_per_block = tally.trx_per_block,
        "tallied replica"
    );
    Ok(tally)
}

/// Aggregate metrics for transactional traces.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionalMetrics {
    pub replicas: usize,
    pub min_length: usize,
    pub min_throughput: u64,
    pub min_trx_per_block: f64,
    pub min_unique_fraction: f64,
    pub anchors_agree: bool,
}

impl fmt::Display for TransactionalMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "number of chains = {}", self.replicas)?;
        writeln!(f, "min trx throughput = {}", self.min_throughput)?;
        writeln!(f, "min trx per block = {}", self.min_trx_per_block)?;
        writeln!(f, "fraction of unique trx = {}", self.min_unique_fraction)?;
        writeln!(f, "common prefix = {}", self.anchors_agree)
    }
}

/// Aggregates transactional traces, failing on the first replica that
/// breaks an accounting invariant.
pub fn aggregate_transactional(
    records: &[TransactionalRecord],
    unique_floor: f64,
) -> Result<TransactionalMetrics> {
    if records.is_empty() {
        return Err(CheckError::NoReplicas);
    }

    let tallies = records
        .iter()
        .map(|record| tally(record, unique_floor))
        .collect::<Result<Vec<_>>>()?;

    let traces: Vec<&Trace> = records.iter().map(|r| &r.trace).collect();

    let metrics = TransactionalMetrics {
        replicas: records.len(),
        min_length: tallies.iter().map(|t| t.blocks).min().unwrap_or(0),
        min_throughput: tallies
            .iter()
            .map(|t| t.recorded_total)
            .min()
            .unwrap_or(0),
        min_trx_per_block: tallies
            .iter()
            .map(|t| t.trx_per_block)
            .fold(f64::INFINITY, f64::min),
        min_unique_fraction: tallies
            .iter()
            .map(|t| t.unique_fraction)
            .fold(1.0, f64::min),
        anchors_agree: comparator::anchors_agree(&traces),
    };

    tracing::info!(
        replicas = metrics.replicas,
        min_throughput = metrics.min_throughput,
        min_trx_per_block = metrics.min_trx_per_block,
        min_unique_fraction = metrics.min_unique_fraction,
        anchors_agree = metrics.anchors_agree,
        "aggregated transactional traces"
    );
    Ok(metrics)
}
