//! # Rating Module
//!
//! Incremental review-rating aggregation.
//!
//! A car carries a running [`RatingStats`] aggregate instead of
//! recomputing its average from every review row on read. Creating a
//! review folds exactly one new rating into that aggregate; the caller
//! writes the fold result back in the same transaction as the review
//! insert, so the two can never diverge.
//!
//! ```text
//! RatingStats { avg: 4.0, total: 3, dist: {4:1, 5:1, 3:1} }
//!      │
//!      ▼  fold_rating(stats, 5)
//! RatingStats { avg: 4.3, total: 4, dist: {4:1, 5:2, 3:1} }
//! ```

use crate::error::{CoreResult, ValidationError};
use crate::types::RatingStats;
use crate::{MAX_RATING, MIN_RATING};

/// Rounds to one decimal place, half away from zero (4.25 → 4.3).
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Folds one new rating into a car's running aggregate.
///
/// The input aggregate is untouched; the caller persists the returned
/// one atomically with the review insert. A rating outside 1..=5 is
/// rejected before any arithmetic.
///
/// ## Example
/// ```rust
/// use steerway_core::rating::fold_rating;
/// use steerway_core::types::{RatingDistribution, RatingStats};
///
/// let stats = RatingStats {
///     average_rating: 4.0,
///     total_ratings: 3,
///     distribution: RatingDistribution { one: 0, two: 0, three: 1, four: 1, five: 1 },
/// };
///
/// let folded = fold_rating(&stats, 5).unwrap();
/// assert_eq!(folded.total_ratings, 4);
/// assert_eq!(folded.average_rating, 4.3); // (4.0×3 + 5) / 4 = 4.25, half-up
/// ```
pub fn fold_rating(stats: &RatingStats, rating: u8) -> CoreResult<RatingStats> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING as i64,
            max: MAX_RATING as i64,
        }
        .into());
    }

    let mut distribution = stats.distribution;
    distribution.increment(rating);

    let new_total = stats.total_ratings + 1;
    let new_average = round_one_decimal(
        (stats.average_rating * stats.total_ratings as f64 + rating as f64) / new_total as f64,
    );

    Ok(RatingStats {
        average_rating: new_average,
        total_ratings: new_total,
        distribution,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
