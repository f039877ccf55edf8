//! Error types for the FS Cockpit diagnostics core.
//!
//! The classification path (classifier, scorer, section aggregator, view
//! model) is total and never returns these. They surface only at the
//! fallible edges: configuration, parsing of request parameters and
//! lookups by name.

use thiserror::Error;

/// Result type alias for FS Cockpit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the FS Cockpit core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ═══════════════════════════════════════════════════════════════════
    // Configuration Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Configuration file could not be read or written
    #[error("Configuration IO error: {0}")]
    ConfigIo(String),

    /// Configuration file is not valid JSON for the expected shape
    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    /// Configuration values are inconsistent
    #[error("Invalid configuration: {0}")]
    ConfigValidation(String),

    // ═══════════════════════════════════════════════════════════════════
    // Validation Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Invalid input parameter
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Monitored service name not recognised
    #[error("Unknown service: {0}")]
    UnknownService(String),

    // ═══════════════════════════════════════════════════════════════════
    // Serialization Errors
    // ═══════════════════════════════════════════════════════════════════

    /// Serialization failed
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Deserialization failed
    #[error("Deserialization error: {0}")]
    Deserialization(String),
}

impl Error {
    /// Returns true if the caller can fix the input and retry
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameter { .. } | Error::UnknownService(_) | Error::ConfigValidation(_)
        )
    }

    /// Returns the error code for external systems
    pub fn code(&self) -> u32 {
        match self {
            // Configuration errors: 1xxx
            Error::ConfigIo(_) => 1001,
            Error::ConfigParse(_) => 1002,
            Error::ConfigValidation(_) => 1003,

            // Validation errors: 2xxx
            Error::InvalidParameter { .. } => 2001,
            Error::UnknownService(_) => 2002,

            // Serialization errors: 7xxx
            Error::Serialization(_) => 7001,
            Error::Deserialization(_) => 7002,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Deserialization(err.to_string())
    }
}
