//! # Booking Service
//!
//! Owns the booking lifecycle state machine:
//!
//! ```text
//! Pending ──► Approved ──► Returned   (terminal)
//!    │            │
//!    └────────────┴──────► Cancelled  (terminal)
//! ```
//!
//! Every transition pairs a Booking write with a Car availability write
//! and runs as one transaction. Creation claims the car with a
//! compare-and-swap, so two racing creates cannot both commit.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{BookingError, ServiceResult};
use steerway_core::pricing;
use steerway_core::validation::validate_required;
use steerway_core::{
    AdditionalFeatures, Booking, BookingStatus, Car, CarStatus, CoreError, DurationClass,
    PaymentStatus,
};
use steerway_db::{Database, DbError};

// =============================================================================
// DTOs
// =============================================================================

/// Request payload for creating a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub car_id: String,

    /// Rental start date, `YYYY-MM-DD`.
    pub date: String,

    /// Rental start time of day, `HH:mm`.
    pub start_time: String,

    pub duration: DurationClass,

    #[serde(default)]
    pub additional_features: AdditionalFeatures,

    pub nid_or_passport: String,
    pub driving_license: String,
}

/// Request payload for returning a car.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnRequest {
    pub booking_id: String,

    /// Actual return date, `YYYY-MM-DD`.
    pub end_date: String,

    /// Actual return time of day, `HH:mm`.
    pub end_time: String,
}

/// Admin decision on a pending booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingDecision {
    Approved,
    Cancelled,
}

/// A committed transition: the booking and its car, as stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingTransition {
    pub car: Car,
    pub booking: Booking,
}

// =============================================================================
// Service
// =============================================================================

/// Booking lifecycle service.
#[derive(Debug, Clone)]
pub struct BookingService {
    db: Database,
}

impl BookingService {
    /// Creates a new BookingService.
    pub fn new(db: Database) -> Self {
        BookingService { db }
    }

    /// Creates a booking for the user identified by `email`.
    ///
    /// Preconditions: the car is available and the user exists and is
    /// not soft-deleted. Costs are quoted from the car's pricing sheet
    /// and cached on the booking. The car claim and the booking insert
    /// commit together; losing the claim race fails with a conflict and
    /// leaves the winner's state untouched.
    pub async fn create_booking(
        &self,
        email: &str,
        request: CreateBookingRequest,
    ) -> ServiceResult<Booking> {
        debug!(car_id = %request.car_id, email = %email, "create_booking");

        validate_required("date", &request.date).map_err(CoreError::from)?;
        validate_required("startTime", &request.start_time).map_err(CoreError::from)?;
        validate_required("nidOrPassport", &request.nid_or_passport).map_err(CoreError::from)?;
        validate_required("drivingLicense", &request.driving_license).map_err(CoreError::from)?;

        let car = self
            .db
            .cars()
            .get_by_id(&request.car_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Car not found".to_string()))?;

        if car.status != CarStatus::Available {
            return Err(BookingError::Conflict("Car is unavailable".to_string()));
        }

        let user = match self.db.users().find_by_email(email).await? {
            Some(user) if !user.is_deleted => user,
            _ => {
                return Err(BookingError::NotFound(
                    "User not found or deleted".to_string(),
                ))
            }
        };

        // Creation-time quote; the return transition recomputes from
        // the actual elapsed time
        let costs = pricing::creation_quote(
            request.duration,
            &request.additional_features,
            &car.pricing,
        )?;

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            user_id: user.id.clone(),
            car_id: car.id.clone(),
            date: request.date,
            start_time: request.start_time,
            end_date: None,
            end_time: None,
            duration: request.duration,
            additional_features: request.additional_features,
            base_cost: costs.base_cost,
            additional_costs: costs.additional_costs,
            total_cost: costs.total_cost,
            payment_status: PaymentStatus::Pending,
            transaction_id: None,
            paid_at: None,
            nid_or_passport: request.nid_or_passport,
            driving_license: request.driving_license,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        match self.create_in_tx(&mut tx, &booking).await {
            Ok(()) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
            }
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err);
            }
        }

        info!(
            booking_id = %booking.id,
            car_id = %booking.car_id,
            total_cost = %booking.total_cost,
            "Booking created"
        );

        Ok(booking)
    }

    /// Claim + insert, inside the caller's transaction.
    async fn create_in_tx(
        &self,
        conn: &mut SqliteConnection,
        booking: &Booking,
    ) -> ServiceResult<()> {
        // Compare-and-swap claim: only flips available → booked. Zero
        // rows means another transaction won since our read.
        let claimed = self.db.cars().claim_available(&mut *conn, &booking.car_id).await?;
        if !claimed {
            return Err(BookingError::Conflict("Car is unavailable".to_string()));
        }

        self.db.bookings().insert(&mut *conn, booking).await?;
        Ok(())
    }

    /// Approves or cancels a booking (admin path).
    ///
    /// Approval keeps the car booked; cancellation releases it. Both
    /// fail with invalid-state once the booking is terminal.
    pub async fn update_booking_status(
        &self,
        booking_id: &str,
        decision: BookingDecision,
    ) -> ServiceResult<BookingTransition> {
        debug!(booking_id = %booking_id, ?decision, "update_booking_status");

        let booking = self
            .db
            .bookings()
            .get_by_id(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

        if booking.status.is_terminal() {
            return Err(BookingError::InvalidState(format!(
                "Booking is already {}",
                booking.status
            )));
        }

        let (car_status, booking_status) = match decision {
            BookingDecision::Approved => (CarStatus::Booked, BookingStatus::Approved),
            BookingDecision::Cancelled => (CarStatus::Available, BookingStatus::Cancelled),
        };

        let transition = self
            .transition(&booking, car_status, booking_status)
            .await?;

        info!(
            booking_id = %booking_id,
            status = %transition.booking.status,
            "Booking decision applied"
        );

        Ok(transition)
    }

    /// Cancels the caller's own booking (self-service path).
    ///
    /// An approved booking cannot be self-cancelled; that path is
    /// forbidden and the admin decision must be used instead.
    pub async fn cancel_own_booking(&self, booking_id: &str) -> ServiceResult<BookingTransition> {
        debug!(booking_id = %booking_id, "cancel_own_booking");

        let booking = self
            .db
            .bookings()
            .get_by_id(booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

        if booking.status == BookingStatus::Approved {
            return Err(BookingError::Forbidden(
                "Approved booking cannot be cancelled".to_string(),
            ));
        }

        if booking.status.is_terminal() {
            return Err(BookingError::InvalidState(format!(
                "Booking is already {}",
                booking.status
            )));
        }

        let transition = self
            .transition(&booking, CarStatus::Available, BookingStatus::Cancelled)
            .await?;

        info!(booking_id = %booking_id, "Booking cancelled by owner");

        Ok(transition)
    }

    /// Records a car return.
    ///
    /// Recomputes every cached cost from the actual elapsed time,
    /// stores the end instant, releases the car, and moves the booking
    /// to Returned - atomically.
    pub async fn return_car(&self, request: ReturnRequest) -> ServiceResult<Booking> {
        debug!(booking_id = %request.booking_id, "return_car");

        validate_required("endDate", &request.end_date).map_err(CoreError::from)?;
        validate_required("endTime", &request.end_time).map_err(CoreError::from)?;

        let booking = self
            .db
            .bookings()
            .get_by_id(&request.booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

        let car = self
            .db
            .cars()
            .get_by_id(&booking.car_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Car not found".to_string()))?;

        if booking.status == BookingStatus::Returned {
            return Err(BookingError::InvalidState(
                "Car has already been returned".to_string(),
            ));
        }

        if booking.status == BookingStatus::Cancelled {
            return Err(BookingError::InvalidState(
                "Cannot return a cancelled booking".to_string(),
            ));
        }

        // All rounding rules live in the pricing module; this is the
        // same math the creation quote is a degenerate case of
        let costs = pricing::return_breakdown(
            &booking.date,
            &booking.start_time,
            &request.end_date,
            &request.end_time,
            booking.duration,
            &booking.additional_features,
            &car.pricing,
        )?;

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let updated = match self
            .return_in_tx(&mut tx, &booking.id, &booking.car_id, &request, &costs)
            .await
        {
            Ok(updated) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                updated
            }
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err);
            }
        };

        info!(
            booking_id = %updated.id,
            total_cost = %updated.total_cost,
            "Car returned"
        );

        Ok(updated)
    }

    async fn return_in_tx(
        &self,
        conn: &mut SqliteConnection,
        booking_id: &str,
        car_id: &str,
        request: &ReturnRequest,
        costs: &pricing::CostBreakdown,
    ) -> ServiceResult<Booking> {
        self.db
            .cars()
            .set_status(&mut *conn, car_id, CarStatus::Available)
            .await?;

        self.db
            .bookings()
            .record_return(
                &mut *conn,
                booking_id,
                &request.end_date,
                &request.end_time,
                costs,
            )
            .await?;

        let updated = self
            .db
            .bookings()
            .get_by_id_tx(&mut *conn, booking_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

        Ok(updated)
    }

    /// Lists all bookings, optionally narrowed to one status.
    pub async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> ServiceResult<Vec<Booking>> {
        Ok(self.db.bookings().list_all(status).await?)
    }

    /// Lists the bookings of the user identified by `email`.
    pub async fn list_user_bookings(&self, email: &str) -> ServiceResult<Vec<Booking>> {
        let user = match self.db.users().find_by_email(email).await? {
            Some(user) if !user.is_deleted => user,
            _ => {
                return Err(BookingError::NotFound(
                    "User not found or deleted".to_string(),
                ))
            }
        };

        Ok(self.db.bookings().list_for_user(&user.id).await?)
    }

    /// Applies one paired car+booking status write atomically and
    /// returns both records as committed.
    async fn transition(
        &self,
        booking: &Booking,
        car_status: CarStatus,
        booking_status: BookingStatus,
    ) -> ServiceResult<BookingTransition> {
        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let result = self
            .transition_in_tx(&mut tx, booking, car_status, booking_status)
            .await;

        match result {
            Ok(transition) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                Ok(transition)
            }
            Err(err) => {
                let _ = tx.rollback().await;
                Err(err)
            }
        }
    }

    async fn transition_in_tx(
        &self,
        conn: &mut SqliteConnection,
        booking: &Booking,
        car_status: CarStatus,
        booking_status: BookingStatus,
    ) -> ServiceResult<BookingTransition> {
        self.db
            .cars()
            .set_status(&mut *conn, &booking.car_id, car_status)
            .await?;

        self.db
            .bookings()
            .set_status(&mut *conn, &booking.id, booking_status)
            .await?;

        let car = self
            .db
            .cars()
            .get_by_id_tx(&mut *conn, &booking.car_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Car not found".to_string()))?;

        let booking = self
            .db
            .bookings()
            .get_by_id_tx(&mut *conn, &booking.id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Booking not found".to_string()))?;

        Ok(BookingTransition { car, booking })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::support::*;

    fn request_for(car_id: &str) -> CreateBookingRequest {
        CreateBookingRequest {
            car_id: car_id.to_string(),
            date: "2024-01-01".to_string(),
            start_time: "09:00".to_string(),
            duration: DurationClass::Daily,
            additional_features: AdditionalFeatures {
                insurance: true,
                gps: false,
                child_seat: false,
            },
            nid_or_passport: "A1234567".to_string(),
            driving_license: "DL-998877".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_booking_claims_car_and_caches_costs() {
        let db = test_db().await;
        let car = seed_car(&db, "Create-1").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();

        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.payment_status, PaymentStatus::Pending);
        // Daily quote: flat daily rate + insurance surcharge
        assert_eq!(booking.base_cost.cents(), 10_000);
        assert_eq!(booking.additional_costs.insurance_cost.cents(), 5_000);
        assert_eq!(booking.total_cost.cents(), 15_000);

        let car = db.cars().get_by_id(&car.id).await.unwrap().unwrap();
        assert_eq!(car.status, CarStatus::Booked);

        // Persisted identically
        let stored = db.bookings().get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.total_cost, booking.total_cost);
        assert_eq!(stored.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_double_booking_conflicts_and_leaves_car_untouched() {
        let db = test_db().await;
        let car = seed_car(&db, "Create-2").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();

        let err = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::Conflict);

        // Winner's claim stands
        let car = db.cars().get_by_id(&car.id).await.unwrap().unwrap();
        assert_eq!(car.status, CarStatus::Booked);

        // Only one booking row exists
        let bookings = service.list_bookings(None).await.unwrap();
        assert_eq!(bookings.len(), 1);
    }

    #[tokio::test]
    async fn test_create_booking_unknown_car_or_deleted_user() {
        let db = test_db().await;
        let car = seed_car(&db, "Create-3").await;
        let service = BookingService::new(db.clone());

        let err = service
            .create_booking("jamie@example.com", request_for("no-such-car"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        // Deleted user cannot book
        let mut user = sample_user("ghost@example.com");
        user.is_deleted = true;
        db.users().insert(&user).await.unwrap();

        let err = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);

        // Failed attempts never claim the car
        let car = db.cars().get_by_id(&car.id).await.unwrap().unwrap();
        assert_eq!(car.status, CarStatus::Available);
    }

    #[tokio::test]
    async fn test_blank_required_field_rejected_before_any_write() {
        let db = test_db().await;
        let car = seed_car(&db, "Create-4").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let mut request = request_for(&car.id);
        request.nid_or_passport = "  ".to_string();

        let err = service
            .create_booking(&user.email, request)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        assert!(service.list_bookings(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_approve_keeps_car_booked() {
        let db = test_db().await;
        let car = seed_car(&db, "Approve-1").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();

        let transition = service
            .update_booking_status(&booking.id, BookingDecision::Approved)
            .await
            .unwrap();

        assert_eq!(transition.booking.status, BookingStatus::Approved);
        assert_eq!(transition.car.status, CarStatus::Booked);
    }

    #[tokio::test]
    async fn test_admin_cancel_releases_car_even_when_approved() {
        let db = test_db().await;
        let car = seed_car(&db, "Cancel-1").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();
        service
            .update_booking_status(&booking.id, BookingDecision::Approved)
            .await
            .unwrap();

        let transition = service
            .update_booking_status(&booking.id, BookingDecision::Cancelled)
            .await
            .unwrap();

        assert_eq!(transition.booking.status, BookingStatus::Cancelled);
        assert_eq!(transition.car.status, CarStatus::Available);
    }

    #[tokio::test]
    async fn test_self_cancel_of_approved_booking_is_forbidden() {
        let db = test_db().await;
        let car = seed_car(&db, "Cancel-2").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();
        service
            .update_booking_status(&booking.id, BookingDecision::Approved)
            .await
            .unwrap();

        let err = service.cancel_own_booking(&booking.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::Forbidden);

        // Nothing moved
        let car = db.cars().get_by_id(&car.id).await.unwrap().unwrap();
        assert_eq!(car.status, CarStatus::Booked);
        let stored = db.bookings().get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Approved);
    }

    #[tokio::test]
    async fn test_self_cancel_of_pending_booking_releases_car() {
        let db = test_db().await;
        let car = seed_car(&db, "Cancel-3").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();

        let transition = service.cancel_own_booking(&booking.id).await.unwrap();
        assert_eq!(transition.booking.status, BookingStatus::Cancelled);
        assert_eq!(transition.car.status, CarStatus::Available);

        // Terminal now: a second cancel is invalid-state
        let err = service.cancel_own_booking(&booking.id).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidState);
    }

    #[tokio::test]
    async fn test_decision_on_terminal_booking_is_invalid_state() {
        let db = test_db().await;
        let car = seed_car(&db, "Decide-1").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();
        service
            .update_booking_status(&booking.id, BookingDecision::Cancelled)
            .await
            .unwrap();

        let err = service
            .update_booking_status(&booking.id, BookingDecision::Approved)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidState);
    }

    #[tokio::test]
    async fn test_return_recomputes_costs_from_actual_elapsed_time() {
        let db = test_db().await;
        let car = seed_car(&db, "Return-1").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();
        service
            .update_booking_status(&booking.id, BookingDecision::Approved)
            .await
            .unwrap();

        // 2 days 2 hours daily → 3 billed days at $100 + $50 insurance
        let returned = service
            .return_car(ReturnRequest {
                booking_id: booking.id.clone(),
                end_date: "2024-01-03".to_string(),
                end_time: "11:00".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(returned.status, BookingStatus::Returned);
        assert_eq!(returned.base_cost.cents(), 30_000);
        assert_eq!(returned.total_cost.cents(), 35_000);
        assert_eq!(returned.end_date.as_deref(), Some("2024-01-03"));
        assert_eq!(returned.end_time.as_deref(), Some("11:00"));

        let car = db.cars().get_by_id(&car.id).await.unwrap().unwrap();
        assert_eq!(car.status, CarStatus::Available);
    }

    #[tokio::test]
    async fn test_double_return_is_invalid_state() {
        let db = test_db().await;
        let car = seed_car(&db, "Return-2").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();

        let request = ReturnRequest {
            booking_id: booking.id.clone(),
            end_date: "2024-01-02".to_string(),
            end_time: "09:00".to_string(),
        };
        service.return_car(request.clone()).await.unwrap();

        let err = service.return_car(request).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidState);
        assert_eq!(err.to_string(), "Car has already been returned");

        // Car stays available after the failed second return
        let car = db.cars().get_by_id(&car.id).await.unwrap().unwrap();
        assert_eq!(car.status, CarStatus::Available);
    }

    #[tokio::test]
    async fn test_return_of_cancelled_booking_is_invalid_state() {
        let db = test_db().await;
        let car = seed_car(&db, "Return-3").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();
        service.cancel_own_booking(&booking.id).await.unwrap();

        let err = service
            .return_car(ReturnRequest {
                booking_id: booking.id.clone(),
                end_date: "2024-01-02".to_string(),
                end_time: "09:00".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidState);
    }

    #[tokio::test]
    async fn test_return_with_malformed_end_time_changes_nothing() {
        let db = test_db().await;
        let car = seed_car(&db, "Return-4").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let service = BookingService::new(db.clone());

        let booking = service
            .create_booking(&user.email, request_for(&car.id))
            .await
            .unwrap();

        let err = service
            .return_car(ReturnRequest {
                booking_id: booking.id.clone(),
                end_date: "2024-01-02".to_string(),
                end_time: "late afternoon".to_string(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidInput);

        let stored = db.bookings().get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(stored.status, BookingStatus::Pending);
        let car = db.cars().get_by_id(&car.id).await.unwrap().unwrap();
        assert_eq!(car.status, CarStatus::Booked);
    }

    #[tokio::test]
    async fn test_list_user_bookings() {
        let db = test_db().await;
        let car_a = seed_car(&db, "List-1").await;
        let car_b = seed_car(&db, "List-2").await;
        let user = seed_user(&db, "jamie@example.com").await;
        let other = seed_user(&db, "other@example.com").await;
        let service = BookingService::new(db.clone());

        service
            .create_booking(&user.email, request_for(&car_a.id))
            .await
            .unwrap();
        service
            .create_booking(&other.email, request_for(&car_b.id))
            .await
            .unwrap();

        let mine = service.list_user_bookings(&user.email).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].car_id, car_a.id);

        let pending = service
            .list_bookings(Some(BookingStatus::Pending))
            .await
            .unwrap();
        assert_eq!(pending.len(), 2);
    }
}
