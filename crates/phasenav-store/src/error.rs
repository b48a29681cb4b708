//! Error types for persistence adapters
//!
//! Every adapter failure maps onto one [`ErrorClass`]; callers above the
//! store decide how to degrade from the class alone.

use phasenav_model::ScopeKey;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Coarse classification of adapter failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorClass {
    /// Document or folder does not exist
    NotFound,
    /// Read failed, a later read may succeed
    TransientReadFailure,
    /// Write was not acknowledged
    WriteFailure,
    /// Stored data could not be decoded
    MalformedInput,
}

/// Errors raised by document stores, file storage and session caches
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("read failed for {key}: {message}")]
    Read { key: String, message: String },

    #[error("write failed for {key}: {message}")]
    Write { key: String, message: String },

    #[error("malformed document at {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("partial document for {0} must be a JSON object")]
    NotAnObject(String),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("subscription to {0} closed")]
    SubscriptionClosed(String),
}

impl StoreError {
    /// Create read error for a key
    pub fn read(key: impl ToString, message: impl Into<String>) -> Self {
        Self::Read {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Create write error for a key
    pub fn write(key: impl ToString, message: impl Into<String>) -> Self {
        Self::Write {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Create malformed-document error for a key
    pub fn malformed(key: &ScopeKey, source: serde_json::Error) -> Self {
        Self::Malformed {
            key: key.storage_path(),
            source,
        }
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Failure class
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::NotFound(_) => ErrorClass::NotFound,
            Self::Read { .. } | Self::SubscriptionClosed(_) => ErrorClass::TransientReadFailure,
            Self::Write { .. } => ErrorClass::WriteFailure,
            Self::Malformed { .. } | Self::NotAnObject(_) => ErrorClass::MalformedInput,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound => ErrorClass::NotFound,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::InvalidData => ErrorClass::MalformedInput,
            Self::Io { .. } => ErrorClass::TransientReadFailure,
        }
    }

    /// Whether a retry of the same read could succeed
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        self.class() == ErrorClass::TransientReadFailure
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
