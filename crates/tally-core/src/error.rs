//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  tally-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  tally-engine errors                                                   │
//! │  └── EngineError      - What callers of the services see               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError / EngineError → caller              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A transaction type label that is not receipt/drawer/removed.
    #[error("Unknown transaction type: {0}")]
    UnknownTransactionType(String),

    /// A configured time zone that is not an IANA name such as `Europe/Dublin`.
    #[error("Unknown time zone: {0}")]
    InvalidTimeZone(String),

    /// A cached transaction payload that no longer deserializes.
    #[error("Malformed transaction payload: {0}")]
    MalformedPayload(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any write so a rejected save leaves the stored
/// reconciliation untouched.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Value is above the largest amount or count accepted.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., a time that is not HH:MM).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A lower bound exceeds its upper bound.
    #[error("{low} must not exceed {high}")]
    InvertedRange { low: String, high: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::MAX_RECONCILED_AMOUNT;

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::TooLong {
            field: "notes".to_string(),
            max: 1000,
        };
        assert_eq!(err.to_string(), "notes must be at most 1000 characters");

        let err = ValidationError::MustNotBeNegative {
            field: "cash_50".to_string(),
        };
        assert_eq!(err.to_string(), "cash_50 must not be negative");

        let err = ValidationError::TooLarge {
            field: "card".to_string(),
            max: MAX_RECONCILED_AMOUNT.to_string(),
        };
        assert_eq!(err.to_string(), "card must not exceed €10000000.00");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::Required {
            field: "till".to_string(),
        }
        .into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
