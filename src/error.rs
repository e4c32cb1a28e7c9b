//! Error types for level loading and storage.
//!
//! None of these are fatal to a running game: a failed level load leaves the
//! state machine where it was (or falls back to a full grid on the first
//! load), and a failed storage write only loses persistence.

use std::fmt;

/// Failure to produce a level layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelError {
    /// The campaign index is out of range or the custom level name is unknown.
    NoSuchLevel {
        /// Human-readable level identifier.
        level: String,
    },

    /// Fetching the level file failed (network error, non-2xx status).
    Fetch {
        /// Path that was requested.
        path: String,
        /// Description from the transport layer.
        reason: String,
    },
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelError::NoSuchLevel { level } => write!(f, "no such level: {}", level),
            LevelError::Fetch { path, reason } => {
                write!(f, "failed to load level {}: {}", path, reason)
            }
        }
    }
}

impl std::error::Error for LevelError {}

/// Failure of the key/value storage backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// No storage backend is available (private browsing, no window).
    Unavailable,

    /// The backend rejected the write (quota exceeded, security error).
    Write {
        /// Key that was being written.
        key: String,
    },

    /// Stored JSON did not round-trip.
    Serialize {
        /// Key that was being written or read.
        key: String,
        /// serde_json error text.
        reason: String,
    },
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Unavailable => write!(f, "storage backend unavailable"),
            StorageError::Write { key } => write!(f, "storage rejected write to '{}'", key),
            StorageError::Serialize { key, reason } => {
                write!(f, "could not serialize '{}': {}", key, reason)
            }
        }
    }
}

impl std::error::Error for StorageError {}
