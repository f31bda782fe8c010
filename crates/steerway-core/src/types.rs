//! # Domain Types
//!
//! Core domain types used throughout SteerAway.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Car        │   │    Booking      │   │     Review      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  status         │   │  status         │   │  user_id (FK)   │       │
//! │  │  pricing        │   │  duration       │   │  car_id (FK)    │       │
//! │  │  rating_stats   │   │  total_cost     │   │  rating 1..=5   │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   CarStatus     │   │  BookingStatus  │   │  DurationClass  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  available      │   │  Pending        │   │  hourly         │       │
//! │  │  reserved       │   │  Approved       │   │  daily          │       │
//! │  │  booked         │   │  Cancelled      │   │  weekly         │       │
//! │  └─────────────────┘   │  Returned       │   │  monthly        │       │
//! │                        └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Availability Gate
//! `Car.status` is the single source of truth for whether a car can be
//! booked. There is no reservation calendar: the booking lifecycle flips
//! this one field, and creation claims it with a compare-and-swap.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::money::Money;

// =============================================================================
// Car Status
// =============================================================================

/// Availability state of a car.
///
/// Only `Available` cars accept a new booking; `Reserved` and `Booked`
/// both gate creation. The booking lifecycle moves a car between
/// `Available` and `Booked`; `Reserved` is set manually from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum CarStatus {
    Available,
    Reserved,
    Booked,
}

impl CarStatus {
    /// Stable string form, matching the stored/wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Reserved => "reserved",
            CarStatus::Booked => "booked",
        }
    }
}

impl fmt::Display for CarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Booking Status
// =============================================================================

/// Lifecycle state of a booking.
///
/// ## State Machine
/// ```text
/// Pending ──► Approved ──► Returned   (terminal)
///    │            │
///    └────────────┴──────► Cancelled  (terminal)
/// ```
///
/// No transition leaves `Returned` or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum BookingStatus {
    Pending,
    Approved,
    Cancelled,
    Returned,
}

impl BookingStatus {
    /// Stable string form, matching the stored/wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Approved => "Approved",
            BookingStatus::Cancelled => "Cancelled",
            BookingStatus::Returned => "Returned",
        }
    }

    /// Whether this state admits no further transitions.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Returned)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Whether a booking has been paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Paid => "Paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Duration Class
// =============================================================================

/// Billing granularity for a booking.
///
/// The class decides which pricing-sheet rate applies and how elapsed
/// time rounds into billed units (see the pricing module).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum DurationClass {
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl DurationClass {
    /// Stable string form, matching the stored/wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            DurationClass::Hourly => "hourly",
            DurationClass::Daily => "daily",
            DurationClass::Weekly => "weekly",
            DurationClass::Monthly => "monthly",
        }
    }
}

impl fmt::Display for DurationClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parsing is the boundary where an unknown duration class is rejected;
/// past this point the class is a closed enum.
impl FromStr for DurationClass {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(DurationClass::Hourly),
            "daily" => Ok(DurationClass::Daily),
            "weekly" => Ok(DurationClass::Weekly),
            "monthly" => Ok(DurationClass::Monthly),
            other => Err(CoreError::InvalidInput(format!(
                "unknown duration class '{}'",
                other
            ))),
        }
    }
}

// =============================================================================
// Pricing Sheet
// =============================================================================

/// Per-car price list: one rate per duration class plus flat add-on
/// surcharges. All amounts are integer cents and must be non-negative
/// (see `validation::validate_pricing_sheet`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSheet {
    /// Fallback price when a duration class has no usable rate.
    pub base_price: Money,

    /// Rate per billed hour.
    pub hourly_rate: Money,

    /// Rate per billed day.
    pub daily_rate: Money,

    /// Rate per billed week (7 days).
    pub weekly_rate: Money,

    /// Rate per billed month (flat 30 days).
    pub monthly_rate: Money,

    /// Flat surcharge when insurance is selected.
    pub insurance_price: Money,

    /// Flat surcharge when a child seat is selected.
    pub child_seat_price: Money,

    /// Flat surcharge when GPS is selected.
    pub gps_price: Money,
}

// =============================================================================
// Rating Statistics
// =============================================================================

/// Count of reviews per star value.
///
/// The key domain is exactly 1..=5. There is no zero bucket: a car with
/// no reviews has all counters at zero and `total_ratings == 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RatingDistribution {
    #[serde(rename = "1")]
    pub one: i64,
    #[serde(rename = "2")]
    pub two: i64,
    #[serde(rename = "3")]
    pub three: i64,
    #[serde(rename = "4")]
    pub four: i64,
    #[serde(rename = "5")]
    pub five: i64,
}

impl RatingDistribution {
    /// Returns the count for one star value (must be 1..=5).
    pub fn count_for(&self, rating: u8) -> i64 {
        match rating {
            1 => self.one,
            2 => self.two,
            3 => self.three,
            4 => self.four,
            5 => self.five,
            _ => 0,
        }
    }

    /// Bumps the bucket for one star value (must be 1..=5).
    pub fn increment(&mut self, rating: u8) {
        match rating {
            1 => self.one += 1,
            2 => self.two += 1,
            3 => self.three += 1,
            4 => self.four += 1,
            5 => self.five += 1,
            _ => {}
        }
    }

    /// Total number of counted reviews across all buckets.
    pub fn total(&self) -> i64 {
        self.one + self.two + self.three + self.four + self.five
    }

    /// Sum of star values weighted by their counts.
    pub fn weighted_sum(&self) -> i64 {
        self.one + 2 * self.two + 3 * self.three + 4 * self.four + 5 * self.five
    }
}

/// Running rating aggregate for a car.
///
/// Invariants (maintained by the rating module, checked in its tests):
/// - `distribution.total() == total_ratings`
/// - `average_rating` equals the weighted mean of the distribution,
///   within one-decimal rounding tolerance
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingStats {
    /// Mean star value, rounded to one decimal place.
    pub average_rating: f64,

    /// Number of reviews folded into the aggregate.
    pub total_ratings: i64,

    /// Per-star counts backing the average.
    #[serde(rename = "ratingDistribution")]
    pub distribution: RatingDistribution,
}

// =============================================================================
// Car
// =============================================================================

/// Transmission kind of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum Transmission {
    Automatic,
    Manual,
}

/// Fuel kind of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum FuelType {
    Petrol,
    Diesel,
    Electric,
    Hybrid,
}

/// Mechanical specification block of a car.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Specifications {
    pub transmission: Transmission,
    pub fuel_type: FuelType,
    pub seating_capacity: i64,
    pub mileage: i64,
}

/// A car in the rental catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name (unique in the catalog).
    pub name: String,

    pub brand: String,
    pub model: String,
    pub year: String,
    pub description: String,
    pub color: String,
    pub is_electric: bool,

    /// Availability gate for the booking lifecycle.
    pub status: CarStatus,

    /// Marketing feature labels ("Bluetooth", "Sunroof", ...).
    pub features: Vec<String>,

    pub specifications: Specifications,

    /// Rates and surcharges used by the pricing calculator.
    pub pricing: PricingSheet,

    /// Running review aggregate; mutated only together with a review
    /// insert, in the same transaction.
    pub rating_stats: RatingStats,

    /// Soft-delete flag. Deleted cars are hidden from every read path.
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Booking
// =============================================================================

/// Optional add-ons selected for one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalFeatures {
    pub insurance: bool,
    pub gps: bool,
    pub child_seat: bool,
}

/// Surcharge amounts attached to one booking, one per add-on.
///
/// A deselected add-on costs zero, so `total()` is always safe to add
/// onto the base cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalCosts {
    pub insurance_cost: Money,
    pub gps_cost: Money,
    pub child_seat_cost: Money,
}

impl AdditionalCosts {
    /// Sum of all surcharges.
    pub fn total(&self) -> Money {
        self.insurance_cost + self.gps_cost + self.child_seat_cost
    }
}

/// A rental booking.
///
/// Costs are derived values cached at creation/return time; they are
/// never recomputed on read. Bookings are never physically deleted -
/// cancellation is a status transition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owning user; immutable after creation.
    pub user_id: String,

    /// Booked car; immutable after creation.
    pub car_id: String,

    /// Rental start date, `YYYY-MM-DD`.
    pub date: String,

    /// Rental start time of day, `HH:mm`.
    pub start_time: String,

    /// Actual return date, set by the return transition.
    pub end_date: Option<String>,

    /// Actual return time of day, set by the return transition.
    pub end_time: Option<String>,

    /// Billing granularity for cost calculation.
    pub duration: DurationClass,

    pub additional_features: AdditionalFeatures,

    /// Rental cost before surcharges. Quoted at creation, recomputed
    /// from actual elapsed time at return.
    pub base_cost: Money,

    pub additional_costs: AdditionalCosts,

    /// `base_cost` plus all surcharges; cached, not recomputed on read.
    pub total_cost: Money,

    pub payment_status: PaymentStatus,

    /// Gateway correlation id, set when payment is requested.
    pub transaction_id: Option<String>,

    /// Set when a successful payment verification lands.
    pub paid_at: Option<DateTime<Utc>>,

    /// National id or passport number of the renter.
    pub nid_or_passport: String,

    /// Driving license number of the renter.
    pub driving_license: String,

    pub status: BookingStatus,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Review
// =============================================================================

/// A customer review of a car.
///
/// At most one review exists per (user, car) pair; a review is immutable
/// once created. Creating one also folds its rating into the car's
/// aggregate, in the same transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub user_id: String,
    pub car_id: String,

    /// Star value, 1..=5.
    pub rating: u8,

    pub comment: String,

    pub created_at: DateTime<Utc>,
}

// =============================================================================
// User
// =============================================================================

/// Role of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
pub enum UserRole {
    User,
    Admin,
}

/// A user account, as far as the booking core needs one: existence,
/// soft-delete state, and the contact fields handed to the payment
/// gateway. Credentials and token issuance live elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub role: UserRole,

    /// Soft-delete flag; deleted users cannot book.
    pub is_deleted: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
