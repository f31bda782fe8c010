//! # Validation Module
//!
//! Input validation utilities for SteerAway.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Service boundary (steerway-booking)                          │
//! │  ├── Required request fields, typed enums via serde                    │
//! │  └── THIS MODULE: field-level rules, before any repository call        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Core math (pricing, rating)                                  │
//! │  └── Sheet shape + range guards before arithmetic                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  ├── UNIQUE constraints (one review per user+car)                      │
//! │  └── Foreign key constraints                                           │
//! │                                                                         │
//! │  Defense in depth: Multiple layers catch different errors              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, ValidationError};
use crate::types::PricingSheet;
use crate::{MAX_RATING, MIN_RATING};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Validates that a required string field is present and non-blank.
///
/// ## Example
/// ```rust
/// use steerway_core::validation::validate_required;
///
/// assert!(validate_required("nidOrPassport", "A1234567").is_ok());
/// assert!(validate_required("nidOrPassport", "   ").is_err());
/// ```
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a review star value.
///
/// ## Rules
/// - Must be in 1..=5; the distribution has no zero bucket
pub fn validate_rating(rating: u8) -> ValidationResult<()> {
    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: MIN_RATING as i64,
            max: MAX_RATING as i64,
        });
    }
    Ok(())
}

// =============================================================================
// Pricing Sheet Validation
// =============================================================================

/// Validates a car's pricing sheet before any cost arithmetic.
///
/// Every rate and surcharge must be non-negative. Missing or
/// non-numeric amounts are unrepresentable: the sheet is fully typed
/// and every amount is integer cents.
pub fn validate_pricing_sheet(pricing: &PricingSheet) -> Result<(), CoreError> {
    let fields = [
        ("basePrice", pricing.base_price),
        ("hourlyRate", pricing.hourly_rate),
        ("dailyRate", pricing.daily_rate),
        ("weeklyRate", pricing.weekly_rate),
        ("monthlyRate", pricing.monthly_rate),
        ("insurancePrice", pricing.insurance_price),
        ("childSeatPrice", pricing.child_seat_price),
        ("gpsPrice", pricing.gps_price),
    ];

    for (name, amount) in fields {
        if amount.is_negative() {
            return Err(CoreError::InvalidConfiguration(format!(
                "{} must not be negative",
                name
            )));
        }
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    fn sheet() -> PricingSheet {
        PricingSheet {
            base_price: Money::from_cents(8_000),
            hourly_rate: Money::from_cents(1_000),
            daily_rate: Money::from_cents(10_000),
            weekly_rate: Money::from_cents(60_000),
            monthly_rate: Money::from_cents(200_000),
            insurance_price: Money::from_cents(5_000),
            child_seat_price: Money::from_cents(2_000),
            gps_price: Money::from_cents(3_000),
        }
    }

    #[test]
    fn test_required_rejects_blank() {
        assert!(validate_required("date", "2024-01-01").is_ok());
        assert!(validate_required("date", "").is_err());
        assert!(validate_required("date", "  \t").is_err());
    }

    #[test]
    fn test_rating_bounds() {
        for ok in 1..=5u8 {
            assert!(validate_rating(ok).is_ok());
        }
        assert!(validate_rating(0).is_err());
        assert!(validate_rating(6).is_err());
    }

    #[test]
    fn test_valid_sheet_passes() {
        assert!(validate_pricing_sheet(&sheet()).is_ok());
    }

    #[test]
    fn test_zero_rates_are_allowed() {
        // A zero rate is a fallback signal, not a configuration error
        let mut s = sheet();
        s.hourly_rate = Money::zero();
        assert!(validate_pricing_sheet(&s).is_ok());
    }

    #[test]
    fn test_negative_surcharge_is_rejected() {
        let mut s = sheet();
        s.gps_price = Money::from_cents(-100);
        let err = validate_pricing_sheet(&s).unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("gpsPrice"));
    }
}
