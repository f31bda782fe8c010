//! # steerway-db: Database Layer for SteerAway
//!
//! This crate provides database access for the SteerAway rental backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      SteerAway Data Flow                                │
//! │                                                                         │
//! │  Service call (create_booking, return_car, ...)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    steerway-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │ (car,booking, │    │  (embedded)  │  │   │
//! │  │   │               │    │  user,review) │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ tx-threaded   │    │ 001_init.sql │  │   │
//! │  │   │ Transactions  │    │ mutations     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite database (file in production, :memory: in tests)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Transaction Discipline
//!
//! Every lifecycle transition writes two entities (a Booking and its
//! Car) and must be all-or-nothing. Mutating repository methods
//! therefore take `&mut SqliteConnection`, so the service layer opens
//! one [`sqlx::Transaction`] and threads it through several
//! repositories before committing:
//!
//! ```rust,ignore
//! let mut tx = db.pool().begin().await?;
//! let claimed = db.cars().claim_available(&mut tx, &car_id).await?;
//! db.bookings().insert(&mut tx, &booking).await?;
//! tx.commit().await?;
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations (car, booking, user, review)

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::booking::BookingRepository;
pub use repository::car::CarRepository;
pub use repository::review::ReviewRepository;
pub use repository::user::UserRepository;
