//! # Car Repository
//!
//! Database operations for the car catalog.
//!
//! ## The Availability CAS
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Two concurrent create-booking calls, same car:                         │
//! │                                                                         │
//! │  tx A: UPDATE cars SET status='booked'                                  │
//! │        WHERE id=? AND status='available'     → 1 row   (wins)           │
//! │  tx B: UPDATE cars SET status='booked'                                  │
//! │        WHERE id=? AND status='available'     → 0 rows  (loses)          │
//! │                                                                         │
//! │  The loser rolls back and surfaces a conflict; the winner's             │
//! │  status stands. No read-then-write window exists.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use steerway_core::{
    Car, CarStatus, FuelType, Money, PricingSheet, RatingDistribution, RatingStats,
    Specifications, Transmission,
};

/// Flat row shape for the `cars` table.
///
/// The domain type nests the pricing sheet and rating aggregate;
/// SQLite stores them as inline columns. Conversion happens in
/// `From<CarRow> for Car`.
#[derive(Debug, sqlx::FromRow)]
struct CarRow {
    id: String,
    name: String,
    brand: String,
    model: String,
    year: String,
    description: String,
    color: String,
    is_electric: bool,
    status: CarStatus,
    features: String,
    transmission: Transmission,
    fuel_type: FuelType,
    seating_capacity: i64,
    mileage: i64,
    base_price_cents: i64,
    hourly_rate_cents: i64,
    daily_rate_cents: i64,
    weekly_rate_cents: i64,
    monthly_rate_cents: i64,
    insurance_price_cents: i64,
    child_seat_price_cents: i64,
    gps_price_cents: i64,
    average_rating: f64,
    total_ratings: i64,
    rating_count_1: i64,
    rating_count_2: i64,
    rating_count_3: i64,
    rating_count_4: i64,
    rating_count_5: i64,
    is_deleted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CarRow> for Car {
    fn from(row: CarRow) -> Self {
        Car {
            id: row.id,
            name: row.name,
            brand: row.brand,
            model: row.model,
            year: row.year,
            description: row.description,
            color: row.color,
            is_electric: row.is_electric,
            status: row.status,
            features: serde_json::from_str(&row.features).unwrap_or_default(),
            specifications: Specifications {
                transmission: row.transmission,
                fuel_type: row.fuel_type,
                seating_capacity: row.seating_capacity,
                mileage: row.mileage,
            },
            pricing: PricingSheet {
                base_price: Money::from_cents(row.base_price_cents),
                hourly_rate: Money::from_cents(row.hourly_rate_cents),
                daily_rate: Money::from_cents(row.daily_rate_cents),
                weekly_rate: Money::from_cents(row.weekly_rate_cents),
                monthly_rate: Money::from_cents(row.monthly_rate_cents),
                insurance_price: Money::from_cents(row.insurance_price_cents),
                child_seat_price: Money::from_cents(row.child_seat_price_cents),
                gps_price: Money::from_cents(row.gps_price_cents),
            },
            rating_stats: RatingStats {
                average_rating: row.average_rating,
                total_ratings: row.total_ratings,
                distribution: RatingDistribution {
                    one: row.rating_count_1,
                    two: row.rating_count_2,
                    three: row.rating_count_3,
                    four: row.rating_count_4,
                    five: row.rating_count_5,
                },
            },
            is_deleted: row.is_deleted,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const CAR_COLUMNS: &str = "id, name, brand, model, year, description, color, is_electric, \
     status, features, transmission, fuel_type, seating_capacity, mileage, \
     base_price_cents, hourly_rate_cents, daily_rate_cents, weekly_rate_cents, \
     monthly_rate_cents, insurance_price_cents, child_seat_price_cents, gps_price_cents, \
     average_rating, total_ratings, rating_count_1, rating_count_2, rating_count_3, \
     rating_count_4, rating_count_5, is_deleted, created_at, updated_at";

/// Repository for car database operations.
#[derive(Debug, Clone)]
pub struct CarRepository {
    pool: SqlitePool,
}

impl CarRepository {
    /// Creates a new CarRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CarRepository { pool }
    }

    /// Gets a car by ID. Soft-deleted cars are invisible here.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Car>> {
        let row: Option<CarRow> = sqlx::query_as(&format!(
            "SELECT {CAR_COLUMNS} FROM cars WHERE id = ?1 AND is_deleted = 0"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Car::from))
    }

    /// Gets a car by ID inside a live transaction.
    pub async fn get_by_id_tx(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<Option<Car>> {
        let row: Option<CarRow> = sqlx::query_as(&format!(
            "SELECT {CAR_COLUMNS} FROM cars WHERE id = ?1 AND is_deleted = 0"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(row.map(Car::from))
    }

    /// Inserts a complete car record.
    pub async fn insert(&self, car: &Car) -> DbResult<()> {
        debug!(id = %car.id, name = %car.name, "Inserting car");

        let features = serde_json::to_string(&car.features)
            .map_err(|e| DbError::Internal(e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO cars (
                id, name, brand, model, year, description, color, is_electric,
                status, features, transmission, fuel_type, seating_capacity, mileage,
                base_price_cents, hourly_rate_cents, daily_rate_cents, weekly_rate_cents,
                monthly_rate_cents, insurance_price_cents, child_seat_price_cents, gps_price_cents,
                average_rating, total_ratings, rating_count_1, rating_count_2, rating_count_3,
                rating_count_4, rating_count_5, is_deleted, created_at, updated_at
            ) VALUES (
                ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8,
                ?9, ?10, ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18,
                ?19, ?20, ?21, ?22,
                ?23, ?24, ?25, ?26, ?27,
                ?28, ?29, ?30, ?31, ?32
            )
            "#,
        )
        .bind(&car.id)
        .bind(&car.name)
        .bind(&car.brand)
        .bind(&car.model)
        .bind(&car.year)
        .bind(&car.description)
        .bind(&car.color)
        .bind(car.is_electric)
        .bind(car.status)
        .bind(features)
        .bind(car.specifications.transmission)
        .bind(car.specifications.fuel_type)
        .bind(car.specifications.seating_capacity)
        .bind(car.specifications.mileage)
        .bind(car.pricing.base_price.cents())
        .bind(car.pricing.hourly_rate.cents())
        .bind(car.pricing.daily_rate.cents())
        .bind(car.pricing.weekly_rate.cents())
        .bind(car.pricing.monthly_rate.cents())
        .bind(car.pricing.insurance_price.cents())
        .bind(car.pricing.child_seat_price.cents())
        .bind(car.pricing.gps_price.cents())
        .bind(car.rating_stats.average_rating)
        .bind(car.rating_stats.total_ratings)
        .bind(car.rating_stats.distribution.one)
        .bind(car.rating_stats.distribution.two)
        .bind(car.rating_stats.distribution.three)
        .bind(car.rating_stats.distribution.four)
        .bind(car.rating_stats.distribution.five)
        .bind(car.is_deleted)
        .bind(car.created_at)
        .bind(car.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Claims an available car for a new booking.
    ///
    /// Compare-and-swap: flips `available → booked` only if the car is
    /// still available (and not soft-deleted) at execution time.
    ///
    /// ## Returns
    /// * `true` - this transaction won the claim
    /// * `false` - the car was already reserved/booked/deleted (lost race)
    pub async fn claim_available(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
    ) -> DbResult<bool> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cars SET
                status = 'booked',
                updated_at = ?2
            WHERE id = ?1 AND status = 'available' AND is_deleted = 0
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Sets a car's availability status inside a live transaction.
    pub async fn set_status(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        status: CarStatus,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cars SET
                status = ?2,
                updated_at = ?3
            WHERE id = ?1 AND is_deleted = 0
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", id));
        }

        Ok(())
    }

    /// Replaces a car's pricing sheet.
    pub async fn update_pricing(&self, id: &str, pricing: &PricingSheet) -> DbResult<()> {
        debug!(id = %id, "Updating car pricing sheet");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cars SET
                base_price_cents = ?2,
                hourly_rate_cents = ?3,
                daily_rate_cents = ?4,
                weekly_rate_cents = ?5,
                monthly_rate_cents = ?6,
                insurance_price_cents = ?7,
                child_seat_price_cents = ?8,
                gps_price_cents = ?9,
                updated_at = ?10
            WHERE id = ?1 AND is_deleted = 0
            "#,
        )
        .bind(id)
        .bind(pricing.base_price.cents())
        .bind(pricing.hourly_rate.cents())
        .bind(pricing.daily_rate.cents())
        .bind(pricing.weekly_rate.cents())
        .bind(pricing.monthly_rate.cents())
        .bind(pricing.insurance_price.cents())
        .bind(pricing.child_seat_price.cents())
        .bind(pricing.gps_price.cents())
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", id));
        }

        Ok(())
    }

    /// Replaces a car's rating aggregate inside a live transaction.
    ///
    /// Must run in the same transaction as the review insert that
    /// produced the new aggregate, or the two can diverge.
    pub async fn update_rating_stats(
        &self,
        conn: &mut SqliteConnection,
        id: &str,
        stats: &RatingStats,
    ) -> DbResult<()> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE cars SET
                average_rating = ?2,
                total_ratings = ?3,
                rating_count_1 = ?4,
                rating_count_2 = ?5,
                rating_count_3 = ?6,
                rating_count_4 = ?7,
                rating_count_5 = ?8,
                updated_at = ?9
            WHERE id = ?1 AND is_deleted = 0
            "#,
        )
        .bind(id)
        .bind(stats.average_rating)
        .bind(stats.total_ratings)
        .bind(stats.distribution.one)
        .bind(stats.distribution.two)
        .bind(stats.distribution.three)
        .bind(stats.distribution.four)
        .bind(stats.distribution.five)
        .bind(now)
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", id));
        }

        Ok(())
    }

    /// Soft-deletes a car. The row stays for referential integrity;
    /// every read path filters it out.
    pub async fn soft_delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Soft-deleting car");

        let now = Utc::now();

        let result = sqlx::query(
            "UPDATE cars SET is_deleted = 1, updated_at = ?2 WHERE id = ?1 AND is_deleted = 0",
        )
        .bind(id)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Car", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::pool::{Database, DbConfig};
    use steerway_core::*;

    fn sample_car(name: &str) -> Car {
        let now = chrono::Utc::now();
        Car {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            brand: "Toyota".to_string(),
            model: "Corolla".to_string(),
            year: "2022".to_string(),
            description: "Compact sedan".to_string(),
            color: "white".to_string(),
            is_electric: false,
            status: CarStatus::Available,
            features: vec!["Bluetooth".to_string(), "AC".to_string()],
            specifications: Specifications {
                transmission: Transmission::Automatic,
                fuel_type: FuelType::Petrol,
                seating_capacity: 5,
                mileage: 14,
            },
            pricing: PricingSheet {
                base_price: Money::from_cents(8_000),
                hourly_rate: Money::from_cents(1_000),
                daily_rate: Money::from_cents(10_000),
                weekly_rate: Money::from_cents(60_000),
                monthly_rate: Money::from_cents(200_000),
                insurance_price: Money::from_cents(5_000),
                child_seat_price: Money::from_cents(2_000),
                gps_price: Money::from_cents(3_000),
            },
            rating_stats: RatingStats::default(),
            is_deleted: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let car = sample_car("RT-1");

        db.cars().insert(&car).await.unwrap();

        let loaded = db.cars().get_by_id(&car.id).await.unwrap().unwrap();
        assert_eq!(loaded.name, "RT-1");
        assert_eq!(loaded.status, CarStatus::Available);
        assert_eq!(loaded.features, car.features);
        assert_eq!(loaded.pricing, car.pricing);
        assert_eq!(loaded.rating_stats.total_ratings, 0);
    }

    #[tokio::test]
    async fn test_claim_available_is_a_cas() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let car = sample_car("CAS-1");
        db.cars().insert(&car).await.unwrap();

        let mut tx = db.pool().begin().await.unwrap();
        assert!(db.cars().claim_available(&mut tx, &car.id).await.unwrap());
        // Second claim inside the same transaction sees 'booked' and loses
        assert!(!db.cars().claim_available(&mut tx, &car.id).await.unwrap());
        tx.commit().await.unwrap();

        let loaded = db.cars().get_by_id(&car.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, CarStatus::Booked);
    }

    #[tokio::test]
    async fn test_update_pricing_replaces_the_sheet() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let car = sample_car("Price-1");
        db.cars().insert(&car).await.unwrap();

        let mut pricing = car.pricing;
        pricing.daily_rate = Money::from_cents(12_500);
        pricing.gps_price = Money::from_cents(0);

        db.cars().update_pricing(&car.id, &pricing).await.unwrap();

        let loaded = db.cars().get_by_id(&car.id).await.unwrap().unwrap();
        assert_eq!(loaded.pricing, pricing);

        let err = db
            .cars()
            .update_pricing("no-such-car", &pricing)
            .await
            .unwrap_err();
        assert!(matches!(err, crate::error::DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_soft_delete_hides_car() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let car = sample_car("DEL-1");
        db.cars().insert(&car).await.unwrap();

        db.cars().soft_delete(&car.id).await.unwrap();
        assert!(db.cars().get_by_id(&car.id).await.unwrap().is_none());

        // Deleted cars cannot be claimed either
        let mut tx = db.pool().begin().await.unwrap();
        assert!(!db.cars().claim_available(&mut tx, &car.id).await.unwrap());
        tx.rollback().await.unwrap();
    }
}
