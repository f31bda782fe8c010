//! # Service Implementations
//!
//! - [`booking`] - booking lifecycle transitions (create, decide,
//!   self-cancel, return)
//! - [`payment`] - payment correlation with the external gateway
//! - [`review`] - review recording + rating aggregation
//!
//! Every transition that touches both a Booking and its Car runs as one
//! transaction: the service opens it, threads it through the
//! repositories, and commits - or rolls back and surfaces the error.

pub mod booking;
pub mod payment;
pub mod review;

// =============================================================================
// Shared Test Support
// =============================================================================
