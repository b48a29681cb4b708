//! Error types for phasenav Core
//!
//! Service methods that the UI calls directly degrade instead of failing
//! (defaults on a failed read, `false` on a failed write). [`CoreError`]
//! is returned only where a caller must act: setting up handles and
//! subscriptions.

use crate::config::ConfigError;
use phasenav_model::ModelError;
use phasenav_store::{ErrorClass, StoreError};

/// Main core error type
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// Adapter failure
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Invalid scope or identifier
    #[error("invalid input: {0}")]
    Model(#[from] ModelError),

    /// Section id not present in the navigation
    #[error("unknown section '{section}' in phase {phase}")]
    UnknownSection { section: String, phase: String },
}

impl CoreError {
    /// Create unknown-section error
    pub fn unknown_section(section: impl Into<String>, phase: impl ToString) -> Self {
        Self::UnknownSection {
            section: section.into(),
            phase: phase.to_string(),
        }
    }

    /// Failure class, for errors that originate in an adapter
    #[must_use]
    pub fn class(&self) -> ErrorClass {
        match self {
            Self::Store(e) => e.class(),
            Self::UnknownSection { .. } => ErrorClass::NotFound,
            Self::Config(_) | Self::Model(_) => ErrorClass::MalformedInput,
        }
    }
}

/// Result type alias for core operations
pub type CoreResult<T> = Result<T, CoreError>;
