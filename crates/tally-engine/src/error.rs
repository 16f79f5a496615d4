//! # Engine Error Types
//!
//! Errors returned by the till-review and reconciliation services.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Engine Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Not Found     │  │   Validation    │  │    Configuration        │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  ClosingSession │  │  Validation     │  │  InvalidConfig          │ │
//! │  │  Reconciliation │  │  (before write) │  │  ConfigLoad/SaveFailed  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐                              │
//! │  │    Gateway      │  │    Database     │                              │
//! │  │  (uninterpreted)│  │  (DbError)      │                              │
//! │  └─────────────────┘  └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use thiserror::Error;

use crate::gateway::GatewayError;
use tally_core::{CoreError, ValidationError};
use tally_db::DbError;

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    // =========================================================================
    // Not Found
    // =========================================================================
    /// The POS has no closed session for this till on this date.
    #[error("No closing session for till '{till}' on {date}")]
    ClosingSessionNotFound { till: String, date: NaiveDate },

    /// No reconciliation with this id.
    #[error("Reconciliation not found: {0}")]
    ReconciliationNotFound(String),

    // =========================================================================
    // Input
    // =========================================================================
    /// Input rejected before anything was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // =========================================================================
    // Collaborators
    // =========================================================================
    /// The POS gateway failed. Not retried.
    #[error("POS gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Database error: {0}")]
    Database(#[from] DbError),

    // =========================================================================
    // Configuration
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(inner) => EngineError::Validation(inner),
            other => EngineError::InvalidConfig(other.to_string()),
        }
    }
}

impl From<std::io::Error> for EngineError {
    fn from(err: std::io::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for EngineError {
    fn from(err: toml::de::Error) -> Self {
        EngineError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for EngineError {
    fn from(err: toml::ser::Error) -> Self {
        EngineError::ConfigSaveFailed(err.to_string())
    }
}

// =============================================================================
// Categorization
// =============================================================================

impl EngineError {
    /// True when the requested session or reconciliation does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::ClosingSessionNotFound { .. }
                | EngineError::ReconciliationNotFound(_)
                | EngineError::Database(DbError::NotFound { .. })
        )
    }

    /// True for configuration problems.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidConfig(_)
                | EngineError::ConfigLoadFailed(_)
                | EngineError::ConfigSaveFailed(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_errors() {
        let err = EngineError::ClosingSessionNotFound {
            till: "TILL-1".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        };
        assert!(err.is_not_found());
        assert!(err.to_string().contains("TILL-1"));
        assert!(err.to_string().contains("2024-03-01"));

        assert!(EngineError::from(DbError::not_found("Reconciliation", "x")).is_not_found());
        assert!(!EngineError::InvalidConfig("bad".into()).is_not_found());
    }

    #[test]
    fn test_core_errors_map() {
        let err: EngineError = CoreError::InvalidTimeZone("Mars/Olympus".into()).into();
        assert!(err.is_config_error());

        let err: EngineError = CoreError::Validation(ValidationError::Required {
            field: "date".into(),
        })
        .into();
        assert!(matches!(err, EngineError::Validation(_)));
    }
}
