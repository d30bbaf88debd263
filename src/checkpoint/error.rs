//! Checkpoint error types.

use crate::runtime::EngineError;
use thiserror::Error;

/// Errors that can occur while taking or restoring a snapshot.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// Serialization to JSON failed
    #[error("Serialization failed: {0}")]
    SerializationFailed(String),

    /// Deserialization from JSON failed
    #[error("Deserialization failed: {0}")]
    DeserializationFailed(String),

    /// Snapshot version is not supported by this version
    #[error("Unsupported snapshot version {found}, supported: {supported}")]
    UnsupportedVersion { found: u32, supported: u32 },

    /// Snapshot was taken from a different model
    #[error("Snapshot was taken from model '{found}', not '{expected}'")]
    ModelMismatch { expected: String, found: String },

    /// Snapshot names an element the model does not have
    #[error("Snapshot names '{path}', which is not part of the model")]
    UnknownElement { path: String },

    /// Loading the restored configuration failed
    #[error(transparent)]
    Engine(#[from] EngineError),
}
