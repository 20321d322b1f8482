//! Unified error types for Grain.
//!
//! Engine errors (`Validation`, `NothingToUndo`, `Inconsistent`) never leave
//! state half-mutated. Persistence errors propagate to the command, which
//! aborts without saving.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for Grain operations.
#[derive(Error, Debug)]
pub enum GrainError {
    /// I/O errors from data, config, or backup file operations.
    #[error("storage error at {path}: {source}")]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// JSON or TOML parsing/serialization errors.
    #[error("serialization error: {message}")]
    Serde { message: String },

    /// Configuration loading errors.
    #[error("config error: {message}")]
    Config { message: String },

    /// Rejected input: non-positive amount, Sunday logging, bad filters.
    #[error("{message}")]
    Validation { message: String },

    /// The undo stack is empty.
    #[error("no actions to undo")]
    NothingToUndo,

    /// A break spend exceeds the credits available this week.
    #[error("not enough break credits (need {needed}, have {available})")]
    InsufficientBreaks { needed: u32, available: u32 },

    /// Persisted state contradicts itself (e.g. undo target missing).
    #[error("internal error: {message}")]
    Inconsistent { message: String },
}

/// A specialized Result type for Grain operations.
pub type Result<T> = std::result::Result<T, GrainError>;

impl GrainError {
    /// Create a storage error from an I/O error.
    pub fn storage(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Storage {
            path: path.into(),
            source,
        }
    }

    /// Create a serialization error.
    pub fn serde(message: impl Into<String>) -> Self {
        Self::Serde {
            message: message.into(),
        }
    }

    /// Create a config error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an internal consistency error.
    pub fn inconsistent(message: impl Into<String>) -> Self {
        Self::Inconsistent {
            message: message.into(),
        }
    }

    /// Whether data integrity can no longer be assumed after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Inconsistent { .. })
    }
}

impl From<io::Error> for GrainError {
    fn from(err: io::Error) -> Self {
        Self::Storage {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for GrainError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde {
            message: err.to_string(),
        }
    }
}

/// Exit codes for the Grain CLI.
pub mod exit_codes {
    /// The command completed.
    pub const SUCCESS: i32 = 0;

    /// The command was rejected or failed.
    pub const FAILURE: i32 = 1;

    /// The process panicked.
    pub const CRASH: i32 = 2;
}
