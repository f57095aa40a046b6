//! Trace loading.
//!
//! [`TraceSource`] is the seam between the checking pipeline and wherever
//! recorded traces live. [`FixtureStore`] reads the testbed's JSON fixture
//! directory; [`MemorySource`] serves traces a harness already holds.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::{CheckError, Result};
use crate::trace::{Block, ReplicaId, Trace};

// ============================================================================
// Trace Source Trait
// ============================================================================

/// Read-only access to recorded replica state.
pub trait TraceSource {
    /// Loads the block listing of a structural chain.
    fn chain(&self, replica: ReplicaId) -> Result<Trace>;

    /// Loads the per-block transaction listing of a transactional trace.
    fn transactions(&self, replica: ReplicaId) -> Result<Trace>;

    /// Loads the replica's self-reported committed transaction total.
    fn transaction_count(&self, replica: ReplicaId) -> Result<u64>;
}

// ============================================================================
// Fixture Store
// ============================================================================

/// Kinds of fixture file written per replica.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureKind {
    /// `<i>.chain`: block listing.
    Chain,
    /// `<i>.trx`: transactions per block.
    Transactions,
    /// `<i>.trx_count`: recorded transaction total.
    TransactionCount,
}

impl FixtureKind {
    pub fn extension(self) -> &'static str {
        match self {
            FixtureKind::Chain => "chain",
            FixtureKind::Transactions => "trx",
            FixtureKind::TransactionCount => "trx_count",
        }
    }
}

/// Fixture directory on disk.
#[derive(Debug, Clone)]
pub struct FixtureStore {
    root: PathBuf,
}

impl FixtureStore {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the fixture of `kind` for `replica`.
    pub fn path(&self, replica: ReplicaId, kind: FixtureKind) -> PathBuf {
        self.root
            .join(format!("{}.{}", replica.as_u32(), kind.extension()))
    }

    fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let raw = fs::read_to_string(path).map_err(|e| CheckError::malformed(path, e))?;
        serde_json::from_str(&raw).map_err(|e| CheckError::malformed(path, e))
    }

    fn read_trace(&self, replica: ReplicaId, kind: FixtureKind) -> Result<Trace> {
        let path = self.path(replica, kind);
        let blocks: Vec<Block> = self.read_json(&path)?;

        tracing::debug!(
            %replica,
            path = %path.display(),
            blocks = blocks.len(),
            "loaded trace fixture"
        );

        Ok(Trace::new(replica, blocks))
    }
}

impl TraceSource for FixtureStore {
    fn chain(&self, replica: ReplicaId) -> Result<Trace> {
        self.read_trace(replica, FixtureKind::Chain)
    }

    fn transactions(&self, replica: ReplicaId) -> Result<Trace> {
        self.read_trace(replica, FixtureKind::Transactions)
    }

    fn transaction_count(&self, replica: ReplicaId) -> Result<u64> {
        let path = self.path(replica, FixtureKind::TransactionCount);
        let count = match self.read_json::<CountRepr>(&path)? {
            CountRepr::Integer(n) => n,
            CountRepr::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| CheckError::malformed(&path, format!("not an integer: {text:?}")))?,
        };

        tracing::debug!(%replica, count, "loaded transaction count");
        Ok(count)
    }
}

/// The testbed writes the count as a JSON string; a bare integer is
/// accepted too.
#[derive(Deserialize)]
#[serde(untagged)]
enum CountRepr {
    Integer(u64),
    Text(String),
}

// ============================================================================
// Memory Source
// ============================================================================

/// Traces held in memory, keyed by replica.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    chains: HashMap<ReplicaId, Vec<Block>>,
    transactions: HashMap<ReplicaId, (Vec<Block>, u64)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a structural chain for `replica`.
    pub fn with_chain(mut self, replica: ReplicaId, blocks: Vec<Block>) -> Self {
        self.chains.insert(replica, blocks);
        self
    }

    /// Adds a transactional trace and its recorded total for `replica`.
    pub fn with_transactions(mut self, replica: ReplicaId, blocks: Vec<Block>, count: u64) -> Self {
        self.transactions.insert(replica, (blocks, count));
        self
    }

    fn missing(replica: ReplicaId, kind: FixtureKind) -> CheckError {
        CheckError::malformed(
            format!("<memory>/{}.{}", replica.as_u32(), kind.extension()),
            "no such trace",
        )
    }
}

impl TraceSource for MemorySource {
    fn chain(&self, replica: ReplicaId) -> Result<Trace> {
        self.chains
            .get(&replica)
            .map(|blocks| Trace::new(replica, blocks.clone()))
            .ok_or_else(|| Self::missing(replica, FixtureKind::Chain))
    }

    fn transactions(&self, replica: ReplicaId) -> Result<Trace> {
        self.transactions
            .get(&replica)
            .map(|(blocks, _)| Trace::new(replica, blocks.clone()))
            .ok_or_else(|| Self::missing(replica, FixtureKind::Transactions))
    }

    fn transaction_count(&self, replica: ReplicaId) -> Result<u64> {
        self.transactions
            .get(&replica)
            .map(|(_, count)| *count)
            .ok_or_else(|| Self::missing(replica, FixtureKind::TransactionCount))
    }
}
