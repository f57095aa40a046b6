//! # chaincheck
//!
//! Correctness oracle for replicated ledger traces.
//!
//! Several replicas of the same protocol each record the chain they
//! committed. This crate loads those traces and judges them against fixed
//! thresholds:
//!
//! - **Structural check** (safety): replicas share a long common prefix and
//!   only diverge in the last few blocks.
//! - **Transactional check** (liveness): enough transactions are committed
//!   in the observation window, blocks are neither starved nor over-batched,
//!   transactions are not re-included, and replicas agree on the first
//!   committed transaction.
//!
//! ## Pipeline
//!
//! Both checks share one pipeline, parameterised by [`ReplicaCheck`]:
//!
//! ```text
//! TraceSource ──load──▶ records ──aggregate──▶ metrics ──assess──▶ Report
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use chaincheck::{run_check, FixtureStore, StructuralCheck};
//!
//! let store = FixtureStore::new("expt");
//! let report = run_check(&StructuralCheck::default(), &store, 3)?;
//! print!("{report}");
//! # Ok::<(), chaincheck::CheckError>(())
//! ```
//!
//! A failed threshold yields a `FAIL` verdict. Unreadable fixtures and
//! broken accounting invariants are errors: they mean the traces cannot be
//! judged at all.

mod comparator;
mod error;
mod loader;
mod metrics;
mod oracle;
mod report;
mod trace;


pub use comparator::{anchors_agree, common_block_prefix, common_prefix_len};
pub use error::{CheckError, Result};
pub use loader::{FixtureKind, FixtureStore, MemorySource, TraceSource};
pub use metrics::{
    LengthStats, ReplicaTally, StructuralMetrics, TransactionalMetrics, TransactionalRecord,
    aggregate_structural, aggregate_transactional, tally, trx_per_block,
};
pub use oracle::{
    Assessment, StructuralThresholds, ThresholdCheck, TransactionalThresholds, Verdict,
    assess_structural, assess_transactional,
};
pub use report::Report;
pub use trace::{Block, ReplicaId, Trace, TxId};

// ============================================================================
// Replica Check Trait
// ============================================================================

/// One kind of cross-replica check.
///
/// Implementations decide what is loaded per replica, how records are
/// compared and folded into metrics, and how metrics are judged.
pub trait ReplicaCheck {
    /// Per-replica input.
    type Record;
    /// Run-wide aggregate.
    type Metrics;

    /// Short name for logs.
    const NAME: &'static str;

    /// Fixture index of the first replica.
    const FIRST_REPLICA: u32;

    fn load(&self, source: &dyn TraceSource, replica: ReplicaId) -> Result<Self::Record>;

    fn aggregate(&self, records: &[Self::Record]) -> Result<Self::Metrics>;

    fn assess(&self, metrics: &Self::Metrics) -> Assessment;
}

/// Loads `replicas` traces from `source`, aggregates and judges them.
pub fn run_check<C: ReplicaCheck>(
    check: &C,
    source: &dyn TraceSource,
    replicas: u32,
) -> Result<Report<C::Metrics>> {
    if replicas == 0 {
        return Err(CheckError::NoReplicas);
    }

    tracing::info!(check = C::NAME, replicas, "starting check");

    let records = (0..replicas)
        .map(|offset| ReplicaId::new(C::FIRST_REPLICA.saturating_add(offset)))
        .map(|replica| check.load(source, replica))
        .collect::<Result<Vec<_>>>()?;

    let metrics = check.aggregate(&records)?;
    let assessment = check.assess(&metrics);

    for failure in assessment.failures() {
        tracing::info!(check = C::NAME, property = failure.name, "{}", failure.detail);
    }

    Ok(Report {
        metrics,
        assessment,
    })
}

// ============================================================================
// Structural Check
// ============================================================================

/// Safety check over structural chains (`<i>.chain`, numbered from 1).
#[derive(Debug, Clone, Default)]
pub struct StructuralCheck {
    pub thresholds: StructuralThresholds,
}

impl StructuralCheck {
    pub fn new(thresholds: StructuralThresholds) -> Self {
        Self { thresholds }
    }
}

impl ReplicaCheck for StructuralCheck {
    type Record = Trace;
    type Metrics = StructuralMetrics;

    const NAME: &'static str = "structural";
    const FIRST_REPLICA: u32 = 1;

    fn load(&self, source: &dyn TraceSource, replica: ReplicaId) -> Result<Trace> {
        source.chain(replica)
    }

    fn aggregate(&self, records: &[Trace]) -> Result<StructuralMetrics> {
        aggregate_structural(records)
    }

    fn assess(&self, metrics: &StructuralMetrics) -> Assessment {
        assess_structural(metrics, &self.thresholds)
    }
}

// ============================================================================
// Transactional Check
// ============================================================================

/// Liveness and throughput check over transactional traces (`<i>.trx` and
/// `<i>.trx_count`, numbered from 0).
#[derive(Debug, Clone, Default)]
pub struct TransactionalCheck {
    pub thresholds: TransactionalThresholds,
}

impl TransactionalCheck {
    pub fn new(thresholds: TransactionalThresholds) -> Self {
        Self { thresholds }
    }
}

impl ReplicaCheck for TransactionalCheck {
    type Record = TransactionalRecord;
    type Metrics = TransactionalMetrics;

    const NAME: &'static str = "transactional";
    const FIRST_REPLICA: u32 = 0;

    fn load(&self, source: &dyn TraceSource, replica: ReplicaId) -> Result<TransactionalRecord> {
        Ok(TransactionalRecord {
            trace: source.transactions(replica)?,
            recorded_total: source.transaction_count(replica)?,
        })
    }

    fn aggregate(&self, records: &[TransactionalRecord]) -> Result<TransactionalMetrics> {
        aggregate_transactional(records, self.thresholds.min_unique_fraction)
    }

    fn assess(&self, metrics: &TransactionalMetrics) -> Assessment {
        assess_transactional(metrics, &self.thresholds)
    }
}
