//! # Review Service
//!
//! Records reviews and keeps the car's rating aggregate in lockstep.
//!
//! The review insert and the aggregate write share one transaction, so
//! `sum(distribution) == total_ratings` holds even under concurrent
//! reviewers: the storage engine serializes writers to the same car
//! row, and a racing duplicate dies on the UNIQUE (user, car) index.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::SqliteConnection;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{BookingError, ServiceResult};
use steerway_core::rating::fold_rating;
use steerway_core::validation::validate_rating;
use steerway_core::{CoreError, Review};
use steerway_db::{Database, DbError};

// =============================================================================
// DTOs
// =============================================================================

/// Request payload for recording a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub user_id: String,
    pub car_id: String,

    /// Star value, 1..=5.
    pub rating: u8,

    #[serde(default)]
    pub comment: String,
}

// =============================================================================
// Service
// =============================================================================

/// Review recording service.
#[derive(Debug, Clone)]
pub struct ReviewService {
    db: Database,
}

impl ReviewService {
    /// Creates a new ReviewService.
    pub fn new(db: Database) -> Self {
        ReviewService { db }
    }

    /// Records a review and folds its rating into the car's aggregate.
    ///
    /// At most one review per (user, car): a duplicate fails before any
    /// aggregate mutation. All checks and both writes share one
    /// transaction.
    pub async fn record_review(&self, data: NewReview) -> ServiceResult<Review> {
        debug!(car_id = %data.car_id, user_id = %data.user_id, rating = data.rating, "record_review");

        validate_rating(data.rating).map_err(CoreError::from)?;

        let mut tx = self.db.pool().begin().await.map_err(DbError::from)?;

        let review = match self.record_in_tx(&mut tx, &data).await {
            Ok(review) => {
                tx.commit()
                    .await
                    .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
                review
            }
            Err(err) => {
                let _ = tx.rollback().await;
                return Err(err);
            }
        };

        info!(
            review_id = %review.id,
            car_id = %review.car_id,
            rating = review.rating,
            "Review recorded"
        );

        Ok(review)
    }

    async fn record_in_tx(
        &self,
        conn: &mut SqliteConnection,
        data: &NewReview,
    ) -> ServiceResult<Review> {
        let car = self
            .db
            .cars()
            .get_by_id_tx(&mut *conn, &data.car_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("Car not found".to_string()))?;

        let _user = self
            .db
            .users()
            .get_by_id_tx(&mut *conn, &data.user_id)
            .await?
            .ok_or_else(|| BookingError::NotFound("User not found".to_string()))?;

        if self
            .db
            .reviews()
            .exists_for(&mut *conn, &data.user_id, &data.car_id)
            .await?
        {
            return Err(BookingError::DuplicateReview);
        }

        let review = Review {
            id: Uuid::new_v4().to_string(),
            user_id: data.user_id.clone(),
            car_id: data.car_id.clone(),
            rating: data.rating,
            comment: data.comment.clone(),
            created_at: Utc::now(),
        };

        // The pre-check above can still race; the UNIQUE index is the
        // backstop and maps onto the same duplicate error
        self.db
            .reviews()
            .insert(&mut *conn, &review)
            .await
            .map_err(|err| match err {
                DbError::UniqueViolation { .. } => BookingError::DuplicateReview,
                other => other.into(),
            })?;

        let folded = fold_rating(&car.rating_stats, data.rating)?;
        self.db
            .cars()
            .update_rating_stats(&mut *conn, &car.id, &folded)
            .await?;

        Ok(review)
    }

    /// Lists a car's reviews, newest first.
    pub async fn reviews_for_car(&self, car_id: &str) -> ServiceResult<Vec<Review>> {
        Ok(self.db.reviews().list_for_car(car_id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
