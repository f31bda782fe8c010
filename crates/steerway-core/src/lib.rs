//! # steerway-core: Pure Business Logic for SteerAway
//!
//! This crate is the **heart** of the SteerAway rental backend. It contains
//! all business logic as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SteerAway Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Caller (HTTP layer, jobs, CLI)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                steerway-booking (Services)                      │   │
//! │  │    create_booking, return_car, request_payment, record_review  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ steerway-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  pricing  │  │  rating   │  │   │
//! │  │   │    Car    │  │   Money   │  │ durations │  │   folds   │  │   │
//! │  │   │  Booking  │  │           │  │   costs   │  │ averages  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  steerway-db (Database Layer)                   │   │
//! │  │            SQLite queries, migrations, repositories             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Car, Booking, Review, etc.)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Rental duration and cost calculation
//! - [`rating`] - Review rating aggregation
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod pricing;
pub mod rating;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use steerway_core::Money` instead of
// `use steerway_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Lowest star value a review may carry.
pub const MIN_RATING: u8 = 1;

/// Highest star value a review may carry.
///
/// ## Note
/// The rating distribution has exactly the buckets 1..=5. There is no
/// zero bucket: an unrated car is represented by `total_ratings == 0`.
pub const MAX_RATING: u8 = 5;

/// Days per billing week for the weekly duration class.
pub const DAYS_PER_WEEK: i64 = 7;

/// Days per billing month for the monthly duration class.
///
/// Billing months are a flat 30 days; calendar month lengths are
/// deliberately not consulted.
pub const DAYS_PER_MONTH: i64 = 30;
