//! Cross-cutting error types for Allot.
//!
//! Analytics failures are not raised through this type; they are captured at
//! stage boundaries and reported as [`crate::StageStatus`] entries. `CoreError`
//! covers malformed input snapshots, which the loader is expected to reject
//! before a run starts.

use thiserror::Error;

/// Errors that can be raised while constructing core types.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Data failed validation (shape, labels, constraints).
    #[error("Validation error: {0}")]
    Validation(String),

    /// A named bundle key does not exist.
    #[error("Unknown result bundle key: {0}")]
    UnknownKey(String),

    /// Serializing a bundle entry failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
