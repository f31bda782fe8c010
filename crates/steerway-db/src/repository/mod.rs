//! # Repository Implementations
//!
//! One repository per aggregate:
//!
//! - [`car`] - catalog rows, the availability CAS, rating-stats writes
//! - [`booking`] - booking rows and lifecycle column updates
//! - [`user`] - existence/soft-delete lookups and contact fields
//! - [`review`] - review inserts and duplicate detection
//!
//! ## Two Kinds of Methods
//!
//! Plain reads run against the pool. Mutations that belong to a
//! lifecycle transition take `&mut SqliteConnection` instead, so the
//! service layer can thread a single transaction through several
//! repositories and commit (or roll back) the whole unit at once.
//! A mutation that never pairs with another write (e.g. catalog
//! updates) runs against the pool directly.

pub mod booking;
pub mod car;
pub mod review;
pub mod user;
