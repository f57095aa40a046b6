//! Replica trace model.
//!
//! A [`Trace`] is the ordered list of blocks one replica committed, genesis
//! first. Traces are built once by a [`TraceSource`](crate::TraceSource) and
//! only read afterwards.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Replica Identifier
// ============================================================================

/// Fixture index of a replica.
///
/// Structural chains are numbered from 1, transactional traces from 0; the
/// id always carries the number used in the fixture file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReplicaId(u32);

impl ReplicaId {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ReplicaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "replica {}", self.0)
    }
}

// ============================================================================
// Transaction Identifier
// ============================================================================

/// Opaque transaction identifier.
///
/// Fixtures normally carry hex digests as strings. Integer tokens are
/// accepted as well and stay distinct from their decimal text, so `7` and
/// `"7"` are different transactions.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TxId {
    Text(String),
    Integer(u64),
}

impl TxId {
    pub fn new(token: impl Into<String>) -> Self {
        Self::Text(token.into())
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for TxId {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<u64> for TxId {
    fn from(token: u64) -> Self {
        Self::Integer(token)
    }
}

// ============================================================================
// Block
// ============================================================================

/// Transactions committed together, in commit order.
///
/// Equality is whole-block: same identifiers in the same order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Block(Vec<TxId>);

impl Block {
    pub fn new(transactions: Vec<TxId>) -> Self {
        Self(transactions)
    }

    pub fn transactions(&self) -> &[TxId] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&TxId> {
        self.0.first()
    }
}

impl<T: Into<TxId>> FromIterator<T> for Block {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A block is either a list of transaction tokens or, in block-hash
/// listings, a single digest token.
#[derive(Deserialize)]
#[serde(untagged)]
enum BlockRepr {
    Transactions(Vec<TxId>),
    Digest(TxId),
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match BlockRepr::deserialize(deserializer)? {
            BlockRepr::Transactions(transactions) => Self(transactions),
            BlockRepr::Digest(digest) => Self(vec![digest]),
        })
    }
}

// ============================================================================
// Trace
// ============================================================================

/// One replica's committed history, genesis block first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trace {
    replica: ReplicaId,
    blocks: Vec<Block>,
}

impl Trace {
    pub fn new(replica: ReplicaId, blocks: Vec<Block>) -> Self {
        Self { replica, blocks }
    }

    pub fn replica(&self) -> ReplicaId {
        self.replica
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks after genesis.
    pub fn committed_blocks(&self) -> usize {
        self.blocks.len().saturating_sub(1)
    }

    /// Sum of per-block transaction counts.
    pub fn transaction_count(&self) -> u64 {
        self.blocks.iter().map(|block| block.len() as u64).sum()
    }

    /// Number of distinct transaction identifiers across all blocks.
    pub fn unique_transaction_count(&self) -> u64 {
        let unique: HashSet<&TxId> = self
            .blocks
            .iter()
            .flat_map(|block| block.transactions())
            .collect();
        unique.len() as u64
    }

    /// First transaction of the first post-genesis block.
    pub fn anchor(&self) -> Option<&TxId> {
        self.blocks.get(1).and_then(Block::first)
    }
}
