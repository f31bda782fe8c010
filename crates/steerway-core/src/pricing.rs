//! # Pricing Module
//!
//! Rental duration and cost calculation.
//!
//! ## Why One Module?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cost Calculation Call Sites                          │
//! │                                                                         │
//! │  Booking creation                     Car return                        │
//! │       │                                    │                            │
//! │       ▼                                    ▼                            │
//! │  creation_quote()                    return_breakdown()                 │
//! │  (no end instant yet:                (actual end known:                 │
//! │   flat per-class rate)                elapsed-scaled cost)              │
//! │       │                                    │                            │
//! │       └──────────────┬─────────────────────┘                            │
//! │                      ▼                                                  │
//! │        ONE set of rounding rules (this module)                         │
//! │                                                                         │
//! │  Every ceil/floor decision lives here so that creation-time and        │
//! │  return-time cost math can never drift apart.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Billing Rules
//!
//! Elapsed time is split into whole days plus a ceiling of the remaining
//! hours. Each duration class then rounds in the renter-unfavorable
//! direction and bills at least one unit:
//!
//! - `hourly`:  max(1, days×24 + hours) × hourly_rate
//! - `daily`:   max(1, days + (hours>0 ? 1 : 0)) × daily_rate
//! - `weekly`:  max(1, ceil(billed_days / 7)) × weekly_rate
//! - `monthly`: max(1, ceil(billed_days / 30)) × monthly_rate

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{AdditionalCosts, AdditionalFeatures, DurationClass, PricingSheet};
use crate::validation::validate_pricing_sheet;
use crate::{DAYS_PER_MONTH, DAYS_PER_WEEK};

const MINUTES_PER_HOUR: i64 = 60;
const MINUTES_PER_DAY: i64 = 24 * 60;

// =============================================================================
// Elapsed Time
// =============================================================================

/// Elapsed rental time, already split the way billing wants it:
/// whole days plus a ceiling of the leftover hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedTime {
    /// Whole elapsed days (floor).
    pub days: i64,

    /// Remaining hours past the last whole day (ceiling, 0..=24).
    pub hours: i64,
}

impl ElapsedTime {
    /// Elapsed time expressed in billed hours.
    pub const fn total_hours(&self) -> i64 {
        self.days * 24 + self.hours
    }

    /// Elapsed time expressed in billed days: any partial day counts
    /// as a full one.
    pub const fn billed_days(&self) -> i64 {
        if self.hours > 0 {
            self.days + 1
        } else {
            self.days
        }
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a time-of-day string, tolerating non-zero-padded components
/// ("9:5" means 09:05).
fn parse_time_of_day(time: &str) -> CoreResult<NaiveTime> {
    let mut parts = time.trim().splitn(2, ':');
    let (hours, minutes) = match (parts.next(), parts.next()) {
        (Some(h), Some(m)) => (h.trim(), m.trim()),
        _ => {
            return Err(CoreError::InvalidInput(format!(
                "invalid time '{}': expected HH:mm",
                time
            )))
        }
    };

    let hours: u32 = hours
        .parse()
        .map_err(|_| CoreError::InvalidInput(format!("invalid time '{}': expected HH:mm", time)))?;
    let minutes: u32 = minutes
        .parse()
        .map_err(|_| CoreError::InvalidInput(format!("invalid time '{}': expected HH:mm", time)))?;

    NaiveTime::from_hms_opt(hours, minutes, 0).ok_or_else(|| {
        CoreError::InvalidInput(format!("invalid time '{}': out of range", time))
    })
}

/// Combines a `YYYY-MM-DD` date and an `HH:mm` time into one instant.
fn parse_instant(date: &str, time: &str) -> CoreResult<NaiveDateTime> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        CoreError::InvalidInput(format!("invalid date '{}': expected YYYY-MM-DD", date))
    })?;
    let time = parse_time_of_day(time)?;
    Ok(date.and_time(time))
}

/// Computes the elapsed time between two date+time pairs.
///
/// An end instant earlier than the start clamps to zero elapsed time
/// rather than erroring; the per-class minimum of one billed unit then
/// applies. Callers that want to reject reversed ranges outright should
/// do so before pricing.
///
/// ## Example
/// ```rust
/// use steerway_core::pricing::elapsed_between;
///
/// let elapsed = elapsed_between("2024-01-01", "09:00", "2024-01-03", "11:00").unwrap();
/// assert_eq!(elapsed.days, 2);
/// assert_eq!(elapsed.hours, 2);
/// ```
pub fn elapsed_between(
    start_date: &str,
    start_time: &str,
    end_date: &str,
    end_time: &str,
) -> CoreResult<ElapsedTime> {
    let start = parse_instant(start_date, start_time)?;
    let end = parse_instant(end_date, end_time)?;

    let minutes = (end - start).num_minutes().max(0);

    let days = minutes / MINUTES_PER_DAY;
    let leftover = minutes % MINUTES_PER_DAY;
    // Ceiling: a started hour bills as a whole hour
    let hours = (leftover + MINUTES_PER_HOUR - 1) / MINUTES_PER_HOUR;

    Ok(ElapsedTime { days, hours })
}

// =============================================================================
// Cost Calculation
// =============================================================================

/// Full cost breakdown for one booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostBreakdown {
    /// Rental cost before surcharges.
    pub base_cost: Money,

    /// Per-add-on surcharges.
    pub additional_costs: AdditionalCosts,

    /// `base_cost` plus all surcharges.
    pub total_cost: Money,
}

/// Number of billed units for one duration class.
fn billed_units(class: DurationClass, elapsed: ElapsedTime) -> i64 {
    match class {
        DurationClass::Hourly => elapsed.total_hours().max(1),
        DurationClass::Daily => elapsed.billed_days().max(1),
        DurationClass::Weekly => {
            let weeks = (elapsed.billed_days() + DAYS_PER_WEEK - 1) / DAYS_PER_WEEK;
            weeks.max(1)
        }
        DurationClass::Monthly => {
            let months = (elapsed.billed_days() + DAYS_PER_MONTH - 1) / DAYS_PER_MONTH;
            months.max(1)
        }
    }
}

/// The sheet rate that applies to one duration class.
fn class_rate(class: DurationClass, pricing: &PricingSheet) -> Money {
    match class {
        DurationClass::Hourly => pricing.hourly_rate,
        DurationClass::Daily => pricing.daily_rate,
        DurationClass::Weekly => pricing.weekly_rate,
        DurationClass::Monthly => pricing.monthly_rate,
    }
}

/// Computes the elapsed-scaled rental cost for a completed interval.
///
/// Used by the return transition, where the actual end instant is known.
pub fn rental_cost(
    start_date: &str,
    start_time: &str,
    end_date: &str,
    end_time: &str,
    class: DurationClass,
    pricing: &PricingSheet,
) -> CoreResult<Money> {
    validate_pricing_sheet(pricing)?;

    let elapsed = elapsed_between(start_date, start_time, end_date, end_time)?;
    let cost = class_rate(class, pricing).multiply_units(billed_units(class, elapsed));

    if cost.is_negative() {
        return Err(CoreError::InvalidResult(format!(
            "rental cost {} is negative",
            cost
        )));
    }

    Ok(cost)
}

/// Computes the surcharge amounts for the selected add-ons.
pub fn additional_costs(
    features: &AdditionalFeatures,
    pricing: &PricingSheet,
) -> AdditionalCosts {
    AdditionalCosts {
        insurance_cost: if features.insurance {
            pricing.insurance_price
        } else {
            Money::zero()
        },
        gps_cost: if features.gps {
            pricing.gps_price
        } else {
            Money::zero()
        },
        child_seat_cost: if features.child_seat {
            pricing.child_seat_price
        } else {
            Money::zero()
        },
    }
}

/// Assembles a breakdown from a base cost and the selected add-ons,
/// with a defensive range check after the arithmetic.
fn assemble(base_cost: Money, features: &AdditionalFeatures, pricing: &PricingSheet) -> CoreResult<CostBreakdown> {
    let additional = additional_costs(features, pricing);
    let total_cost = base_cost + additional.total();

    if total_cost.is_negative() {
        return Err(CoreError::InvalidResult(format!(
            "total cost {} is negative",
            total_cost
        )));
    }

    Ok(CostBreakdown {
        base_cost,
        additional_costs: additional,
        total_cost,
    })
}

/// Creation-time quote.
///
/// The end instant is unknown when a booking is created, so the base
/// cost is the flat per-class rate; a zero class rate falls back to the
/// sheet's base price. The return transition replaces this quote with
/// the elapsed-scaled cost.
pub fn creation_quote(
    class: DurationClass,
    features: &AdditionalFeatures,
    pricing: &PricingSheet,
) -> CoreResult<CostBreakdown> {
    validate_pricing_sheet(pricing)?;

    let rate = class_rate(class, pricing);
    let base_cost = if rate.is_zero() {
        pricing.base_price
    } else {
        rate
    };

    assemble(base_cost, features, pricing)
}

/// Return-time breakdown: elapsed-scaled rental cost plus surcharges.
pub fn return_breakdown(
    start_date: &str,
    start_time: &str,
    end_date: &str,
    end_time: &str,
    class: DurationClass,
    features: &AdditionalFeatures,
    pricing: &PricingSheet,
) -> CoreResult<CostBreakdown> {
    let base_cost = rental_cost(start_date, start_time, end_date, end_time, class, pricing)?;
    assemble(base_cost, features, pricing)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_time_parsing_tolerates_missing_zero_padding() {
        let a = elapsed_between("2024-01-01", "9:5", "2024-01-01", "10:05").unwrap();
        assert_eq!(a, ElapsedTime { days: 0, hours: 1 });
    }

    #[test]
    fn test_bad_time_rejected() {
        let err = elapsed_between("2024-01-01", "25:00", "2024-01-02", "10:00").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));

        let err = elapsed_between("2024-01-01", "nine", "2024-01-02", "10:00").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_bad_date_rejected() {
        let err = elapsed_between("01/01/2024", "09:00", "2024-01-02", "10:00").unwrap_err();
        assert!(matches!(err, CoreError::InvalidInput(_)));
    }

    #[test]
    fn test_elapsed_splits_days_and_hours() {
        // 2 days 2 hours
        let elapsed = elapsed_between("2024-01-01", "09:00", "2024-01-03", "11:00").unwrap();
        assert_eq!(elapsed, ElapsedTime { days: 2, hours: 2 });

        // Exactly one day: no leftover hours
        let elapsed = elapsed_between("2024-01-01", "09:00", "2024-01-02", "09:00").unwrap();
        assert_eq!(elapsed, ElapsedTime { days: 1, hours: 0 });

        // A started hour bills as a whole hour
        let elapsed = elapsed_between("2024-01-01", "09:00", "2024-01-01", "09:01").unwrap();
        assert_eq!(elapsed, ElapsedTime { days: 0, hours: 1 });
    }

    #[test]
    fn test_end_before_start_clamps_to_zero() {
        let elapsed = elapsed_between("2024-01-05", "09:00", "2024-01-01", "09:00").unwrap();
        assert_eq!(elapsed, ElapsedTime { days: 0, hours: 0 });

        // Still bills the one-unit minimum
        let cost = rental_cost(
            "2024-01-05",
            "09:00",
            "2024-01-01",
            "09:00",
            DurationClass::Daily,
            &sheet(),
        )
        .unwrap();
        assert_eq!(cost.cents(), 10_000);
    }

    #[test]
    fn test_hourly_cost() {
        // 26 billed hours
        let cost = rental_cost(
            "2024-01-01",
            "09:00",
            "2024-01-02",
            "11:00",
            DurationClass::Hourly,
            &sheet(),
        )
        .unwrap();
        assert_eq!(cost.cents(), 26 * 1_000);

        // Zero elapsed still bills one hour
        let cost = rental_cost(
            "2024-01-01",
            "09:00",
            "2024-01-01",
            "09:00",
            DurationClass::Hourly,
            &sheet(),
        )
        .unwrap();
        assert_eq!(cost.cents(), 1_000);
    }

    /// 2 days 2 hours at $100/day rounds up to 3 billed days = $300.
    #[test]
    fn test_daily_partial_day_rounds_up() {
        let cost = rental_cost(
            "2024-01-01",
            "09:00",
            "2024-01-03",
            "11:00",
            DurationClass::Daily,
            &sheet(),
        )
        .unwrap();
        assert_eq!(cost.cents(), 30_000);
    }

    /// Daily cost never decreases as the rental runs longer.
    #[test]
    fn test_daily_cost_is_monotone_in_elapsed_time() {
        let ends = [
            ("2024-01-01", "10:00"),
            ("2024-01-01", "23:59"),
            ("2024-01-02", "09:00"),
            ("2024-01-02", "09:01"),
            ("2024-01-04", "12:00"),
            ("2024-01-09", "00:00"),
        ];

        let mut last = 0;
        for (end_date, end_time) in ends {
            let cost = rental_cost(
                "2024-01-01",
                "09:00",
                end_date,
                end_time,
                DurationClass::Daily,
                &sheet(),
            )
            .unwrap();
            assert!(
                cost.cents() >= last,
                "cost regressed at {} {}",
                end_date,
                end_time
            );
            last = cost.cents();
        }
    }

    #[test]
    fn test_weekly_cost_rounds_up_to_whole_weeks() {
        // 8 billed days -> 2 weeks
        let cost = rental_cost(
            "2024-01-01",
            "09:00",
            "2024-01-09",
            "09:00",
            DurationClass::Weekly,
            &sheet(),
        )
        .unwrap();
        assert_eq!(cost.cents(), 2 * 60_000);

        // 3 billed days -> still 1 week minimum
        let cost = rental_cost(
            "2024-01-01",
            "09:00",
            "2024-01-04",
            "09:00",
            DurationClass::Weekly,
            &sheet(),
        )
        .unwrap();
        assert_eq!(cost.cents(), 60_000);
    }

    #[test]
    fn test_monthly_cost_rounds_up_to_whole_months() {
        // 31 billed days -> 2 flat 30-day months
        let cost = rental_cost(
            "2024-01-01",
            "09:00",
            "2024-02-01",
            "09:00",
            DurationClass::Monthly,
            &sheet(),
        )
        .unwrap();
        assert_eq!(cost.cents(), 2 * 200_000);
    }

    #[test]
    fn test_negative_rate_is_invalid_configuration() {
        let mut bad = sheet();
        bad.daily_rate = Money::from_cents(-1);

        let err = rental_cost(
            "2024-01-01",
            "09:00",
            "2024-01-02",
            "09:00",
            DurationClass::Daily,
            &bad,
        )
        .unwrap_err();
        assert!(matches!(err, CoreError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_additional_costs_follow_selected_flags() {
        let features = AdditionalFeatures {
            insurance: true,
            gps: false,
            child_seat: true,
        };
        let costs = additional_costs(&features, &sheet());
        assert_eq!(costs.insurance_cost.cents(), 5_000);
        assert_eq!(costs.gps_cost.cents(), 0);
        assert_eq!(costs.child_seat_cost.cents(), 2_000);
    }

    #[test]
    fn test_breakdown_total_is_base_plus_surcharges() {
        let features = AdditionalFeatures {
            insurance: true,
            gps: true,
            child_seat: true,
        };
        let breakdown = return_breakdown(
            "2024-01-01",
            "09:00",
            "2024-01-03",
            "11:00",
            DurationClass::Daily,
            &features,
            &sheet(),
        )
        .unwrap();

        assert_eq!(breakdown.base_cost.cents(), 30_000);
        assert_eq!(
            breakdown.total_cost,
            breakdown.base_cost + breakdown.additional_costs.total()
        );
        assert!(breakdown.total_cost >= breakdown.base_cost);
        assert_eq!(breakdown.total_cost.cents(), 30_000 + 5_000 + 3_000 + 2_000);
    }

    #[test]
    fn test_creation_quote_uses_flat_class_rate() {
        let quote = creation_quote(
            DurationClass::Daily,
            &AdditionalFeatures::default(),
            &sheet(),
        )
        .unwrap();
        assert_eq!(quote.base_cost.cents(), 10_000);
        assert_eq!(quote.total_cost.cents(), 10_000);
    }

    #[test]
    fn test_creation_quote_zero_rate_falls_back_to_base_price() {
        let mut zero_hourly = sheet();
        zero_hourly.hourly_rate = Money::zero();

        let quote = creation_quote(
            DurationClass::Hourly,
            &AdditionalFeatures::default(),
            &zero_hourly,
        )
        .unwrap();
        assert_eq!(quote.base_cost, zero_hourly.base_price);
    }
}
