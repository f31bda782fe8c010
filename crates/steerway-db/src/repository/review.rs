//! # Review Repository
//!
//! Database operations for reviews.
//!
//! A review insert always travels inside the same transaction as the
//! car's rating-aggregate update. The UNIQUE (user_id, car_id) index
//! backs up the service-level duplicate pre-check against races.

use chrono::{DateTime, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use steerway_core::Review;

#[derive(Debug, sqlx::FromRow)]
struct ReviewRow {
    id: String,
    user_id: String,
    car_id: String,
    rating: i64,
    comment: String,
    created_at: DateTime<Utc>,
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            user_id: row.user_id,
            car_id: row.car_id,
            rating: row.rating as u8,
            comment: row.comment,
            created_at: row.created_at,
        }
    }
}

const REVIEW_COLUMNS: &str = "id, user_id, car_id, rating, comment, created_at";

/// Repository for review database operations.
#[derive(Debug, Clone)]
pub struct ReviewRepository {
    pool: SqlitePool,
}

impl ReviewRepository {
    /// Creates a new ReviewRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReviewRepository { pool }
    }

    /// Inserts a review inside a live transaction.
    ///
    /// A racing duplicate surfaces as a unique violation from the
    /// (user_id, car_id) index.
    pub async fn insert(&self, conn: &mut SqliteConnection, review: &Review) -> DbResult<()> {
        debug!(id = %review.id, car_id = %review.car_id, rating = review.rating, "Inserting review");

        sqlx::query(
            r#"
            INSERT INTO reviews (id, user_id, car_id, rating, comment, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&review.id)
        .bind(&review.user_id)
        .bind(&review.car_id)
        .bind(review.rating as i64)
        .bind(&review.comment)
        .bind(review.created_at)
        .execute(&mut *conn)
        .await?;

        Ok(())
    }

    /// Checks for an existing review by this user for this car, inside
    /// a live transaction.
    pub async fn exists_for(
        &self,
        conn: &mut SqliteConnection,
        user_id: &str,
        car_id: &str,
    ) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar(
            "SELECT 1 FROM reviews WHERE user_id = ?1 AND car_id = ?2",
        )
        .bind(user_id)
        .bind(car_id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(found.is_some())
    }

    /// Lists a car's reviews, newest first.
    pub async fn list_for_car(&self, car_id: &str) -> DbResult<Vec<Review>> {
        let rows: Vec<ReviewRow> = sqlx::query_as(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews WHERE car_id = ?1 ORDER BY created_at DESC"
        ))
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Review::from).collect())
    }
}
