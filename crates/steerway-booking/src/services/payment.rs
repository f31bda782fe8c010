//! # Payment Service
//!
//! Correlates bookings with the external payment processor.
//!
//! ```text
//! Returned booking ──► request_payment ──► TXN id persisted ──► gateway
//!                                                                  │
//!      customer pays (or doesn't), processor redirects back        │
//!                                                                  ▼
//! confirm_payment ◄── callback {transactionId, bookingId, status, ...}
//!      │
//!      ├── re-verify with gateway (errors propagate, never swallowed)
//!      ├── success: paymentStatus=Paid, paidAt=now   (one transaction)
//!      └── failure: status=Cancelled, payment untouched
//! ```

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{BookingError, ServiceResult};
use crate::gateway::{GatewayRedirect, PaymentGateway, PaymentRequest};
use steerway_core::BookingStatus;
use steerway_db::{Database, DbError};

// =============================================================================
// DTOs
// =============================================================================

/// Callback query the processor redirects the customer back with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub transaction_id: String,
    pub booking_id: String,

    /// Outcome flag set by the redirect URL: `success` or `failed`.
    pub status: String,

    pub customer_name: String,

    /// Display amount, echoed through for the confirmation payload.
    pub total_price: String,
}

/// Confirmation payload handed back to the caller.
///
/// Rendering (HTML result pages etc.) is outside the core; this is the
/// data those templates interpolate.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfirmation {
    pub transaction_id: String,
    pub customer_name: String,
    pub amount: String,
    pub succeeded: bool,
}

// =============================================================================
// Service
// =============================================================================

/// Payment correlation service.
#[derive(Clone)]
pub struct PaymentService {
    db: Database,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    /// Creates a new PaymentService.
    pub fn new(db: Database, gateway: Arc<dyn PaymentGateway>) -> Self {
        PaymentService { db, gateway }
    }

    /// Requests payment for a returned booking.
    ///
    /// Generates one transaction id, persists it on the booking, and
    /// hands the same id to the processor - so the verification
    /// callback can be correlated. Only `Returned` bookings are
    /// payable.
    pub async fn request_payment(&self, booking_id: &str) -> ServiceResult<GatewayRedirect> {
        debug!(booking_id = %booking_id, "request_payment");

        let booking = self
            .db
            .bookings()
            .get_by_id(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

        let user = self
            .db
            .users()
            .get_by_id(&booking.user_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("User not found".to_string()))?;

        if booking.status != BookingStatus::Returned {
            return Err(BookingError::InvalidState(
                "Car not returned yet".to_string(),
            ));
        }

        let transaction_id = format!("TXN-{}", Uuid::new_v4().simple());
        self.db
            .bookings()
            .set_transaction_id(&booking.id, &transaction_id)
            .await?;

        let request = PaymentRequest {
            transaction_id: transaction_id.clone(),
            amount: booking.total_cost,
            customer_name: user.name,
            customer_email: user.email,
            customer_phone: user.phone,
            customer_address: user.address,
            booking_id: booking.id.clone(),
        };

        let redirect = self.gateway.initiate(&request).await?;

        info!(
            booking_id = %booking.id,
            transaction_id = %transaction_id,
            amount = %booking.total_cost,
            "Payment session initiated"
        );

        Ok(redirect)
    }

    /// Reconciles a verification callback onto the booking.
    ///
    /// The transaction is re-verified with the processor first; gateway
    /// failures propagate and leave the booking untouched. Then, in one
    /// transaction: success marks the booking paid with a timestamp,
    /// failure cancels the booking and leaves `payment_status` alone.
    pub async fn confirm_payment(
        &self,
        query: PaymentVerification,
    ) -> ServiceResult<PaymentConfirmation> {
        debug!(
            booking_id = %query.booking_id,
            transaction_id = %query.transaction_id,
            status = %query.status,
            "confirm_payment"
        );

        let booking = self
            .db
            .bookings()
            .get_by_id(&query.booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

        // Network call stays outside the write transaction
        let outcome = self.gateway.verify(&query.transaction_id).await?;
        debug!(settled = outcome.settled(), "Gateway verification response");

        let succeeded = query.status == "success";

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let write = if succeeded {
            self.db
                .bookings()
                .mark_paid(&mut tx, &booking.id, &query.transaction_id, Utc::now())
                .await
        } else {
            self.db
                .bookings()
                .set_status(&mut tx, &booking.id, BookingStatus::Cancelled)
                .await
        };

        match write {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            }
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err.into());
            }
        }

        info!(
            booking_id = %booking.id,
            transaction_id = %query.transaction_id,
            succeeded,
            "Payment verification reconciled"
        );

        Ok(PaymentConfirmation {
            transaction_id: query.transaction_id,
            customer_name: query.customer_name,
            amount: query.total_price,
            succeeded,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::booking::{BookingService, CreateBookingRequest, ReturnRequest};
    use crate::services::support::*;
    use steerway_core::{AdditionalFeatures, DurationClass, PaymentStatus};

    async fn returned_booking(db: &steerway_db::Database) -> steerway_core::Booking {
        let car = seed_car(db, &format!("Pay-{}", uuid::Uuid::new_v4().simple())).await;
        let user = seed_user(db, &format!("{}@example.com", uuid::Uuid::new_v4().simple())).await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(
                &user.email,
                CreateBookingRequest {
                    car_id: car.id.clone(),
                    date: "2024-01-01".to_string(),
                    start_time: "09:00".to_string(),
                    duration: DurationClass::Daily,
                    additional_features: AdditionalFeatures::default(),
                    nid_or_passport: "A1234567".to_string(),
                    driving_license: "DL-998877".to_string(),
                },
            )
            .await
            .unwrap();

        service
            .return_car(ReturnRequest {
                booking_id: booking.id.clone(),
                end_date: "2024-01-03".to_string(),
                end_time: "11:00".to_string(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_request_payment_persists_the_id_it_hands_off() {
        let db = test_db().await;
        let booking = returned_booking(&db).await;

        let gateway = Arc::new(FakeGateway::new());
        let service = PaymentService::new(db.clone(), gateway.clone());

        let redirect = service.request_payment(&booking.id).await.unwrap();
        assert!(redirect.payment_url.starts_with("https://"));

        let stored = db.bookings().get_by_id(&booking.id).await.unwrap().unwrap();
        let persisted_txn = stored.transaction_id.unwrap();
        assert!(persisted_txn.starts_with("TXN-"));

        // The gateway saw exactly the persisted id and the cached total
        let initiated = gateway.initiated.lock().unwrap();
        assert_eq!(initiated.len(), 1);
        assert_eq!(initiated[0].transaction_id, persisted_txn);
        assert_eq!(initiated[0].amount, stored.total_cost);
        assert_eq!(initiated[0].booking_id, booking.id);
    }

    #[tokio::test]
    async fn test_request_payment_before_return_is_invalid_state() {
        let db = test_db().await;
        let car = seed_car(&db, "Pay-early").await;
        let user = seed_user(&db, "early@example.com").await;
        let booking_service = BookingService::new(db.clone());

        let booking = booking_service
            .create_booking(
                &user.email,
                CreateBookingRequest {
                    car_id: car.id.clone(),
                    date: "2024-01-01".to_string(),
                    start_time: "09:00".to_string(),
                    duration: DurationClass::Daily,
                    additional_features: AdditionalFeatures::default(),
                    nid_or_passport: "A1234567".to_string(),
                    driving_license: "DL-998877".to_string(),
                },
            )
            .await
            .unwrap();

        let gateway = Arc::new(FakeGateway::new());
        let service = PaymentService::new(db.clone(), gateway.clone());

        let err = service.request_payment(&booking.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidState);
        assert_eq!(err.to_string(), "Car not returned yet");

        // Gateway was never contacted
        assert!(gateway.initiated.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_confirm_success_marks_paid_with_timestamp() {
        let db = test_db().await;
        let booking = returned_booking(&db).await;

        let gateway = Arc::new(FakeGateway::new());
        let service = PaymentService::new(db.clone(), gateway.clone());
        service.request_payment(&booking.id).await.unwrap();

        let txn = db
            .bookings()
            .get_by_id(&booking.id)
            .await
            .unwrap()
            .unwrap()
            .transaction_id
            .unwrap();

        let confirmation = service
            .confirm_payment(PaymentVerification {
                transaction_id: txn.clone(),
                booking_id: booking.id.clone(),
                status: "success".to_string(),
                customer_name: "Jamie Renter".to_string(),
                total_price: "300.00".to_string(),
            })
            .await
            .unwrap();

        assert!(confirmation.succeeded);
        assert_eq!(confirmation.transaction_id, txn);

        let stored = db.bookings().get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Paid);
        assert!(stored.paid_at.is_some());

        // Verification went through the gateway with the same id
        assert_eq!(*gateway.verified.lock().unwrap(), vec![txn]);
    }

    #[tokio::test]
    async fn test_confirm_failure_cancels_but_leaves_payment_pending() {
        let db = test_db().await;
        let booking = returned_booking(&db).await;

        let gateway = Arc::new(FakeGateway::new());
        let service = PaymentService::new(db.clone(), gateway.clone());
        service.request_payment(&booking.id).await.unwrap();

        let confirmation = service
            .confirm_payment(PaymentVerification {
                transaction_id: "TXN-deadbeef".to_string(),
                booking_id: booking.id.clone(),
                status: "failed".to_string(),
                customer_name: "Jamie Renter".to_string(),
                total_price: "300.00".to_string(),
            })
            .await
            .unwrap();

        assert!(!confirmation.succeeded);

        let stored = db.bookings().get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, steerway_core::BookingStatus::Cancelled);
        assert_eq!(stored.payment_status, PaymentStatus::Pending);
        assert!(stored.paid_at.is_none());
    }

    #[tokio::test]
    async fn test_gateway_failure_propagates_and_leaves_booking_untouched() {
        let db = test_db().await;
        let booking = returned_booking(&db).await;

        let service = PaymentService::new(db.clone(), Arc::new(FakeGateway::failing()));

        let err = service.request_payment(&booking.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentGateway);

        let err = service
            .confirm_payment(PaymentVerification {
                transaction_id: "TXN-deadbeef".to_string(),
                booking_id: booking.id.clone(),
                status: "success".to_string(),
                customer_name: "Jamie Renter".to_string(),
                total_price: "300.00".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::PaymentGateway);

        // A failed verification never marks anything paid
        let stored = db.bookings().get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.payment_status, PaymentStatus::Pending);
        assert_eq!(stored.status, steerway_core::BookingStatus::Returned);
    }
}
