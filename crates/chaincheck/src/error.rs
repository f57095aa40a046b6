//! Error types for trace checking.

use std::path::PathBuf;

use thiserror::Error;

use crate::trace::ReplicaId;

/// Errors that abort a check before a verdict is produced.
///
/// A failed threshold is never an error; it is reported as a `FAIL`
/// verdict. These variants mean the input itself cannot be judged.
#[derive(Debug, Error)]
pub enum CheckError {
    /// The run was asked to check zero replicas.
    #[error("no replicas to check")]
    NoReplicas,

    /// A fixture is missing or does not have the expected shape.
    #[error("malformed trace fixture {}: {reason}", path.display())]
    MalformedTrace { path: PathBuf, reason: String },

    /// The replica's recorded total disagrees with its block contents.
    #[error(
        "{replica}: recorded transaction count {recorded} does not match the {counted} transactions in its blocks"
    )]
    InconsistentCount {
        replica: ReplicaId,
        recorded: u64,
        counted: u64,
    },

    /// Too many transactions were included more than once.
    #[error("{replica}: unique transaction fraction {fraction:.3} is below the floor of {floor}")]
    DuplicateTransactions {
        replica: ReplicaId,
        fraction: f64,
        floor: f64,
    },
}

impl CheckError {
    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::MalformedTrace {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Returns true if the traced run broke an internal invariant, as
    /// opposed to the fixtures being unreadable.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::InconsistentCount { .. } | Self::DuplicateTransactions { .. }
        )
    }
}

pub type Result<T, E = CheckError> = std::result::Result<T, E>;
