//! Threshold oracle.
//!
//! Turns aggregate metrics into a PASS/FAIL [`Verdict`]. Each property is a
//! named [`ThresholdCheck`]; the verdict passes only if all of them do.
//! Thresholds are plain configuration structures with documented defaults
//! so harnesses can override them per scenario.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::metrics::{StructuralMetrics, TransactionalMetrics};

// ============================================================================
// Thresholds
// ============================================================================

/// Safety thresholds for structural chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructuralThresholds {
    /// Minimum length of the shortest chain (confirmed history).
    pub min_length: usize,

    /// Maximum difference between the longest and shortest chain.
    pub max_length_spread: usize,

    /// Maximum number of blocks by which the shortest chain may extend
    /// past the common prefix.
    pub max_prefix_lag: usize,
}

impl Default for StructuralThresholds {
    fn default() -> Self {
        Self {
            min_length: 50,
            max_length_spread: 3,
            max_prefix_lag: 3,
        }
    }
}

/// Liveness and throughput thresholds for transactional traces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionalThresholds {
    /// Observation window length in minutes.
    pub window_minutes: u64,

    /// Minimum committed transactions per minute of window.
    pub min_throughput_per_minute: u64,

    /// Lower bound on transactions per committed block.
    pub min_trx_per_block: f64,

    /// Upper bound on transactions per committed block, per minute of window.
    pub max_trx_per_block_per_minute: u64,

    /// Minimum fraction of distinct transactions per replica. Falling below
    /// it aborts the run.
    pub min_unique_fraction: f64,
}

impl Default for TransactionalThresholds {
    fn default() -> Self {
        Self {
            window_minutes: 5,
            min_throughput_per_minute: 100,
            min_trx_per_block: 10.0,
            max_trx_per_block_per_minute: 100,
            min_unique_fraction: 0.9,
        }
    }
}

impl TransactionalThresholds {
    /// Minimum throughput over the whole window.
    pub fn min_throughput(&self) -> u64 {
        self.min_throughput_per_minute
            .saturating_mul(self.window_minutes)
    }

    /// Upper bound on transactions per block over the whole window.
    pub fn max_trx_per_block(&self) -> f64 {
        self.max_trx_per_block_per_minute
            .saturating_mul(self.window_minutes) as f64
    }
}

// ============================================================================
// Assessment
// ============================================================================

/// Final judgement of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    pub fn is_pass(self) -> bool {
        self == Verdict::Pass
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Pass => "PASS",
            Verdict::Fail => "FAIL",
        })
    }
}

/// Outcome of one threshold.
#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdCheck {
    /// Short property name, e.g. `min_length`.
    pub name: &'static str,
    /// What was observed and what was required.
    pub detail: String,
    pub passed: bool,
}

impl ThresholdCheck {
    fn new(name: &'static str, passed: bool, detail: String) -> Self {
        Self {
            name,
            detail,
            passed,
        }
    }
}

/// All threshold checks for a run.
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    checks: Vec<ThresholdCheck>,
}

impl Assessment {
    pub fn new(checks: Vec<ThresholdCheck>) -> Self {
        Self { checks }
    }

    pub fn checks(&self) -> &[ThresholdCheck] {
        &self.checks
    }

    pub fn failures(&self) -> impl Iterator<Item = &ThresholdCheck> {
        self.checks.iter().filter(|c| !c.passed)
    }

    pub fn verdict(&self) -> Verdict {
        if self.checks.iter().all(|c| c.passed) {
            Verdict::Pass
        } else {
            Verdict::Fail
        }
    }
}

// ============================================================================
// Judges
// ============================================================================

/// Judges structural chain metrics.
pub fn assess_structural(metrics: &StructuralMetrics, thresholds: &StructuralThresholds) -> Assessment {
    let spread = metrics.length_spread();
    let lag = metrics.prefix_lag();

    Assessment::new(vec![
        ThresholdCheck::new(
            "min_length",
            metrics.min_length >= thresholds.min_length,
            format!(
                "shortest chain has {} blocks, need at least {}",
                metrics.min_length, thresholds.min_length
            ),
        ),
        ThresholdCheck::new(
            "length_spread",
            spread <= thresholds.max_length_spread,
            format!(
                "chain lengths differ by {spread}, allowed at most {}",
                thresholds.max_length_spread
            ),
        ),
        ThresholdCheck::new(
            "prefix_lag",
            lag <= thresholds.max_prefix_lag,
            format!(
                "shortest chain extends {lag} blocks past the common prefix, allowed at most {}",
                thresholds.max_prefix_lag
            ),
        ),
    ])
}

/// Judges transactional trace metrics.
pub fn assess_transactional(
    metrics: &TransactionalMetrics,
    thresholds: &TransactionalThresholds,
) -> Assessment {
    let min_throughput = thresholds.min_throughput();
    let max_per_block = thresholds.max_trx_per_block();
    let per_block = metrics.min_trx_per_block;

    Assessment::new(vec![
        ThresholdCheck::new(
            "min_throughput",
            metrics.min_throughput >= min_throughput,
            format!(
                "lowest throughput is {} transactions, need at least {min_throughput}",
                metrics.min_throughput
            ),
        ),
        ThresholdCheck::new(
            "trx_per_block",
            per_block >= thresholds.min_trx_per_block && per_block <= max_per_block,
            format!(
                "lowest density is {per_block} transactions per block, need [{}, {max_per_block}]",
                thresholds.min_trx_per_block
            ),
        ),
        ThresholdCheck::new(
            "unique_fraction",
            metrics.min_unique_fraction >= thresholds.min_unique_fraction,
            format!(
                "lowest unique fraction is {}, need at least {}",
                metrics.min_unique_fraction, thresholds.min_unique_fraction
            ),
        ),
        ThresholdCheck::new(
            "anchor_agreement",
            metrics.anchors_agree,
            "replicas must agree on the first committed transaction".to_string(),
        ),
    ])
}
