//! # Generator Error Types
//!
//! Placement itself never fails. These errors come from the layers around it:
//! settings files and entity lookups.

use thiserror::Error;

/// Errors that can occur outside the placement passes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeneratorError {
    /// Settings file could not be read.
    #[error("failed to read settings file {path}: {reason}")]
    Io {
        /// The path that was read.
        path: String,
        /// Underlying I/O error message.
        reason: String,
    },

    /// Settings text is not valid TOML for the settings schema.
    #[error("failed to parse settings: {0}")]
    Parse(String),

    /// A settings value is unusable even after clamping.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// No path with this id exists in the scene.
    #[error("unknown parkour path: {0}")]
    UnknownPath(usize),

    /// No play area with this id exists in the scene.
    #[error("unknown play area: {0}")]
    UnknownArea(usize),
}

/// Result type for generator operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;
