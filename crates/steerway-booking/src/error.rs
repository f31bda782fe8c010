//! # Service Error Type
//!
//! Unified error type for the booking/payment/review services.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  Error Flow in SteerAway                                │
//! │                                                                         │
//! │  Caller                       Service Layer                             │
//! │  ──────                       ─────────────                             │
//! │                                                                         │
//! │  create_booking(...)                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Service Function                                                │  │
//! │  │  Result<T, BookingError>                                         │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Core error?    ── CoreError::InvalidInput ─────────┐           │  │
//! │  │  Storage error? ── DbError::UniqueViolation ──┐     │           │  │
//! │  │  Gateway error? ── GatewayError ────────┐     │     │           │  │
//! │  │         │                               ▼     ▼     ▼           │  │
//! │  │  Success ─────────────────────────► BookingError (code+msg) ───►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Every failure carries ONE machine-readable code and ONE               │
//! │  human-readable message; nothing is swallowed into a success.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::gateway::GatewayError;
use steerway_core::CoreError;
use steerway_db::DbError;

/// Machine-readable error codes for service failures.
///
/// Each [`BookingError`] maps to exactly one code, so transport layers
/// can pick status codes and clients can branch without string
/// matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Missing User/Car/Booking (404)
    NotFound,

    /// Car unavailable / lost race on booking creation (409)
    Conflict,

    /// Business-rule rejection, e.g. self-cancelling an approved booking (403)
    Forbidden,

    /// Malformed duration, date, or request field (400)
    InvalidInput,

    /// Unusable pricing sheet (400)
    InvalidConfiguration,

    /// Operation attempted from the wrong booking status (400)
    InvalidState,

    /// Second review for the same (user, car) pair (400)
    DuplicateReview,

    /// External payment processor failure (502)
    PaymentGateway,

    /// Storage-level atomic operation failed and was rolled back (500)
    TransactionAborted,
}

/// Error returned from every service operation.
#[derive(Debug, Error)]
pub enum BookingError {
    /// A referenced User/Car/Booking does not exist (or is soft-deleted).
    #[error("{0}")]
    NotFound(String),

    /// The car's availability gate rejected the operation.
    #[error("{0}")]
    Conflict(String),

    /// A business rule forbids this caller from performing the operation.
    #[error("{0}")]
    Forbidden(String),

    /// The booking is in the wrong lifecycle state for this operation.
    #[error("{0}")]
    InvalidState(String),

    /// This user has already reviewed this car.
    #[error("You have already reviewed this car")]
    DuplicateReview,

    /// Pricing/validation failure from the core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// External payment processor failure.
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Storage failure; any staged writes were rolled back first.
    #[error(transparent)]
    Db(#[from] DbError),
}

impl BookingError {
    /// The machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::NotFound(_) => ErrorCode::NotFound,
            BookingError::Conflict(_) => ErrorCode::Conflict,
            BookingError::Forbidden(_) => ErrorCode::Forbidden,
            BookingError::InvalidState(_) => ErrorCode::InvalidState,
            BookingError::DuplicateReview => ErrorCode::DuplicateReview,

            BookingError::Core(CoreError::InvalidConfiguration(_)) => {
                ErrorCode::InvalidConfiguration
            }
            BookingError::Core(_) => ErrorCode::InvalidInput,

            BookingError::Gateway(_) => ErrorCode::PaymentGateway,

            BookingError::Db(DbError::NotFound { .. }) => ErrorCode::NotFound,
            BookingError::Db(DbError::UniqueViolation { .. }) => ErrorCode::Conflict,
            BookingError::Db(_) => ErrorCode::TransactionAborted,
        }
    }
}

/// Result type for service operations.
pub type ServiceResult<T> = Result<T, BookingError>;

// =============================================================================
// Unit Tests
// =============================================================================
