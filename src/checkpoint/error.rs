//! Checkpoint error types.

use crate::checkpoint::validation::SnapshotViolation;
use thiserror::Error;

/// Errors that can occur during checkpoint operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckpointError {
    /// Serialization to JSON or binary format failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON or binary format failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot decoded but describes an impossible match
    #[error("Snapshot failed validation with {} violation(s)", .violations.len())]
    CorruptSnapshot { violations: Vec<SnapshotViolation> },

    /// The key-value store refused a read or write
    #[error("Storage failed: {0}")]
    Storage(String),
}
