//! Error types for the impact engine.
//!
//! Calculations return plain values (NaN propagates rather than throwing).
//! Only two situations are true exceptions: a composition key missing from
//! the static table, and a Monte Carlo run that lost more than half of its
//! samples. Everything else is either a boundary rejection of raw input or
//! a per-item failure that validators catch and report.

use thiserror::Error;

/// Result type alias for engine operations.
pub type ImpactResult<T> = Result<T, ImpactError>;

/// Unified error type for all engine operations.
#[derive(Debug, Error)]
pub enum ImpactError {
    // ===== True exceptions =====
    /// Requested composition key is not present in the composition table.
    #[error("unknown composition type '{key}'")]
    UnknownComposition {
        /// The key that failed to resolve.
        key: String,
    },

    /// Monte Carlo propagation kept too few valid samples.
    #[error("Monte Carlo: only {valid} of {requested} samples were valid")]
    InsufficientSamples {
        /// Samples for which the model returned a finite value.
        valid: usize,
        /// Samples requested.
        requested: usize,
    },

    // ===== Input errors =====
    /// Raw input rejected at the normalization boundary.
    #[error("invalid input '{field}': {reason}")]
    InvalidInput {
        /// Offending field.
        field: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A model function asked for a sample variable that was never declared.
    #[error("no sampled variable named '{name}'")]
    MissingVariable {
        /// Requested variable name.
        name: String,
    },

    /// Correlation matrix is inconsistent.
    #[error("correlation error: {0}")]
    Correlation(String),

    // ===== Per-item failures =====
    /// A calculation produced NaN or infinity.
    #[error("non-finite value detected at {location}")]
    NonFiniteValue {
        /// Where the value was produced.
        location: String,
    },

    /// Injected ephemeris source failed.
    #[error("ephemeris error: {0}")]
    Ephemeris(String),

    // ===== Configuration errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ImpactError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an input rejection for a named field.
    #[must_use]
    pub fn invalid_input(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create a non-finite value error.
    #[must_use]
    pub fn non_finite(location: impl Into<String>) -> Self {
        Self::NonFiniteValue {
            location: location.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Check whether this error must abort the caller rather than be
    /// recorded and skipped.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnknownComposition { .. } | Self::InsufficientSamples { .. }
        )
    }
}
