//! # steerway-booking: Booking & Payment Services for SteerAway
//!
//! The orchestration layer callers embed. It drives the booking
//! lifecycle state machine over [`steerway_db`], prices transitions
//! with [`steerway_core`], and correlates payments with the external
//! processor behind the [`gateway::PaymentGateway`] seam.
//!
//! ## Surface
//!
//! | Operation | Service |
//! |---|---|
//! | `create_booking(email, request)` | [`services::booking::BookingService`] |
//! | `update_booking_status(id, decision)` | [`services::booking::BookingService`] |
//! | `cancel_own_booking(id)` | [`services::booking::BookingService`] |
//! | `return_car(request)` | [`services::booking::BookingService`] |
//! | `list_bookings` / `list_user_bookings` | [`services::booking::BookingService`] |
//! | `request_payment(id)` | [`services::payment::PaymentService`] |
//! | `confirm_payment(callback)` | [`services::payment::PaymentService`] |
//! | `record_review(data)` / `reviews_for_car` | [`services::review::ReviewService`] |
//!
//! Every operation returns a typed result or a [`error::BookingError`]
//! carrying one fixed [`error::ErrorCode`]; no operation returns a
//! partially-applied mutation.
//!
//! ## Wiring Example
//!
//! ```rust,ignore
//! let db = Database::new(DbConfig::new("./steerway.db")).await?;
//! let gateway = Arc::new(HttpPaymentGateway::new(GatewayConfig::load()?)?);
//!
//! let bookings = BookingService::new(db.clone());
//! let payments = PaymentService::new(db.clone(), gateway);
//! let reviews = ReviewService::new(db);
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod services;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, GatewayConfig};
pub use error::{BookingError, ErrorCode, ServiceResult};
pub use gateway::{
    GatewayError, GatewayRedirect, HttpPaymentGateway, PaymentGateway, PaymentRequest,
    VerificationOutcome,
};
pub use services::booking::{
    BookingDecision, BookingService, BookingTransition, CreateBookingRequest, ReturnRequest,
};
pub use services::payment::{PaymentConfirmation, PaymentService, PaymentVerification};
pub use services::review::{NewReview, ReviewService};
