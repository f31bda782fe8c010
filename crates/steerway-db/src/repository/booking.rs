//! # Booking Repository
//!
//! Database operations for bookings.
//!
//! ## Booking Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Booking Lifecycle                                  │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── insert() → Booking { status: Pending }                         │
//! │         (same transaction claims the car: available → booked)          │
//! │                                                                         │
//! │  2. DECIDE                                                             │
//! │     └── set_status(Approved)  → car stays booked                       │
//! │     └── set_status(Cancelled) → car released to available              │
//! │                                                                         │
//! │  3. RETURN                                                             │
//! │     └── record_return() → costs recomputed from actual elapsed         │
//! │         time, status Returned, car released                            │
//! │                                                                         │
//! │  4. PAY                                                                │
//! │     └── set_transaction_id() → gateway hand-off                        │
//! │     └── mark_paid() → paymentStatus Paid + paidAt                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Status guards live in the service layer; this module performs the
//! writes it is told to, inside the caller's transaction.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use steerway_core::pricing::CostBreakdown;
use steerway_core::{
    AdditionalCosts, AdditionalFeatures, Booking, BookingStatus, DurationClass, Money,
    PaymentStatus,
};

/// Flat row shape for the `bookings` table.
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: String,
    user_id: String,
    car_id: String,
    date: String,
    start_time: String,
    end_date: Option<String>,
    end_time: Option<String>,
    duration: DurationClass,
    insurance: bool,
    gps: bool,
    child_seat: bool,
    base_cost_cents: i64,
    insurance_cost_cents: i64,
    gps_cost_cents: i64,
    child_seat_cost_cents: i64,
    total_cost_cents: i64,
    payment_status: PaymentStatus,
    transaction_id: Option<String>,
    paid_at: Option<DateTime<Utc>>,
    nid_or_passport: String,
    driving_license: String,
    status: BookingStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            user_id: row.user_id,
            car_id: row.car_id,
            date: row.date,
            start_time: row.start_time,
            end_date: row.end_date,
            end_time: row.end_time,
            duration: row.duration,
            additional_features: AdditionalFeatures {
                insurance: row.insurance,
                gps: row.gps,
                child_seat: row.child_seat,
            },
            base_cost: Money::from_cents(row.base_cost_cents),
            additional_costs: AdditionalCosts {
                insurance_cost: Money::from_cents(row.insurance_cost_cents),
                gps_cost: Money::from_cents(row.gps_cost_cents),
                child_seat_cost: Money::from_cents(row.child_seat_cost_cents),
            },
            total_cost: Money::from_cents(row.total_cost_cents),
            payment_status: row.payment_status,
            transaction_id: row.transaction_id,
            paid_at: row.paid_at,
            nid_or_passport: row.nid_or_passport,
            driving_license: row.driving_license,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const BOOKING_COLUMNS: &str = "id, user_id, car_id, date, start_time, end_date, end_time, \
     duration, insurance, gps, child_seat, base_cost_cents, insurance_cost_cents, \
     gps_cost_cents, child_seat_cost_cents, total_cost_cents, payment_status, \
     transaction_id, paid_at, nid_or_passport, driving_license, status, \
     created_at, updated_at";

/// Repository for booking database operations.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Inserts a booking inside a live transaction.
    ///
    /// Paired with the car claim that precedes it; the two commit or
    /// roll back together.
    pub async fn insert(&self, conn: &mut SqliteConnection, booking: &Booking) -> DbResult<()> {
        debug!(id = %booking.id, car_id = %booking.car_id, "Inserting booking");

        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, user_id, car_id, date, start_time, end_date, end_time,
                duration, insurance, gps, child_seat,
                base_cost_cents, insurance_cost_cents, gps_cost_cents,
                child_seat_cost_cents, total_cost_cents,
                payment_status, transaction_id, paid_at,
                nid_or_passport, driving_license, status,
                created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7,
                ?8, ?9, ?10, ?11,
                ?12, ?13, ?14,
                ?15, ?16,
                ?17, ?18, ?19,
                ?20, ?21, ?22,
                ?23, ?24
            )
            "#,
        )
        .bind(&booking.id)
        .bind(&booking.user_id)
        .bind(&booking.car_id)
        .bind(&booking.date)
        .bind(&booking.start_time)
        .bind(&booking.end_date)
        .bind(&booking.end_time)
        .bind(booking.duration)
        .bind(booking.additional_features.insurance)
        .bind(booking.additional_features.gps)
        .bind(booking.additional_features.child_seat)
        .bind(booking.base_cost.cents())
        .bind(booking.additional_costs.insurance_cost.cents())
        .bind(booking.additional_costs.gps_cost.cents())
        .bind(booking.additional_costs.child_seat_cost.cents())
        .bind(booking.total_cost.cents())
        .bind(booking.payment_status)
        .bind(&booking.transaction_id)
        .bind(booking.paid_at)
        .bind(&booking.nid_or_passport)
        .bind(&booking.driving_license)
        .bind(booking.status)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Gets a booking by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Booking::from))
    }

    /// Gets a booking by ID inside a live transaction.
    pub async fn get_by_id_tx(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = ?1"))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;

        Ok(row.map(Booking::from))
    }

    /// Sets a booking's lifecycle status inside a live transaction.
    pub async fn set_status(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        status: BookingStatus,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE bookings SET status = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }

    /// Records a car return inside a live transaction.
    ///
    /// Stores the actual end instant, replaces every cached cost with
    /// the recomputed breakdown, and moves the booking to Returned.
    pub async fn record_return(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        end_date: &str,
        end_time: &str,
        costs: &CostBreakdown,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                end_date = ?2,
                end_time = ?3,
                base_cost_cents = ?4,
                insurance_cost_cents = ?5,
                gps_cost_cents = ?6,
                child_seat_cost_cents = ?7,
                total_cost_cents = ?8,
                status = 'Returned',
                updated_at = ?9
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(end_date)
        .bind(end_time)
        .bind(costs.base_cost.cents())
        .bind(costs.additional_costs.insurance_cost.cents())
        .bind(costs.additional_costs.gps_cost.cents())
        .bind(costs.additional_costs.child_seat_cost.cents())
        .bind(costs.total_cost.cents())
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }

    /// Stores the gateway correlation id for a booking.
    ///
    /// Single-row write; no paired entity, so it runs on the pool.
    pub async fn set_transaction_id(&self, id: &str, transaction_id: &str) -> DbResult<()> {
        debug!(id = %id, transaction_id = %transaction_id, "Setting transaction id");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE bookings SET transaction_id = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(transaction_id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }

    /// Marks a booking paid inside a live transaction.
    pub async fn mark_paid(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        transaction_id: &str,
        paid_at: DateTime<Utc>,
    ) -> DbResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                payment_status = 'Paid',
                transaction_id = ?2,
                paid_at = ?3,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(transaction_id)
        .bind(paid_at)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Booking", id));
        }

        Ok(())
    }

    /// Lists all bookings, optionally narrowed to one lifecycle status,
    /// newest first.
    pub async fn list_all(&self, status: Option<BookingStatus>) -> DbResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = match status {
            Some(status) => {
                sqlx::query_as(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings WHERE status = ?1 \
                     ORDER BY created_at DESC"
                ))
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    /// Lists one user's bookings, newest first.
    pub async fn list_for_user(&self, user_id: &str) -> DbResult<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = ?1 \
             ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }
}
