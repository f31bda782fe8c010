//! # Error Types
//!
//! Domain-specific error types for steerway-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  steerway-core errors (this file)                                      │
//! │  ├── CoreError        - Pricing/rating domain errors                   │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  steerway-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  steerway-booking errors (service layer)                               │
//! │  └── BookingError     - What callers see (code + message)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BookingError → Caller             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, reason, value)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent pricing/rating rule violations. They should be
/// caught by the service layer and translated to caller-facing errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A date, time, or duration-class input could not be interpreted.
    ///
    /// ## When This Occurs
    /// - Malformed date (not `YYYY-MM-DD`)
    /// - Malformed time (not `H:mm` / `HH:mm`)
    /// - Unknown duration class string at a parse boundary
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A car's pricing sheet is unusable.
    ///
    /// ## When This Occurs
    /// - A rate or surcharge on the sheet is negative
    ///
    /// Missing or non-numeric rates are unrepresentable here: the sheet
    /// is fully typed and every amount is integer cents.
    #[error("Invalid pricing configuration: {0}")]
    InvalidConfiguration(String),

    /// Cost arithmetic produced an out-of-range result.
    ///
    /// A guard after the arithmetic, not a substitute for sheet
    /// validation: a non-negative sheet and non-negative multipliers
    /// cannot produce this.
    #[error("Invalid cost result: {0}")]
    InvalidResult(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before business logic runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid date, invalid time-of-day).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidInput("bad time '25:00'".to_string());
        assert_eq!(err.to_string(), "Invalid input: bad time '25:00'");

        let err = CoreError::InvalidConfiguration("hourlyRate is negative".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid pricing configuration: hourlyRate is negative"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "startTime".to_string(),
        };
        assert_eq!(err.to_string(), "startTime is required");

        let err = ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: 1,
            max: 5,
        };
        assert_eq!(err.to_string(), "rating must be between 1 and 5");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "endDate".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
