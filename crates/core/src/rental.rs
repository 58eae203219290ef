//! Rental booking rules: status transitions and server-side pricing.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::listing::{DURATION_DAILY, DURATION_HOURLY, DURATION_MONTHLY, DURATION_WEEKLY};
use crate::types::Timestamp;

const SECS_PER_HOUR: i64 = 3_600;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// A billing month is a flat 30 days.
const DAYS_PER_MONTH: i64 = 30;

/// Status of a rental booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentalStatus {
    Active,
    Completed,
    Cancelled,
}

impl RentalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RentalStatus::Active => "active",
            RentalStatus::Completed => "completed",
            RentalStatus::Cancelled => "cancelled",
        }
    }

    /// Only active rentals move, and only to a closed state.
    pub fn can_transition_to(self, next: RentalStatus) -> bool {
        self == RentalStatus::Active && next != RentalStatus::Active
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RentalStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(RentalStatus::Active),
            "completed" => Ok(RentalStatus::Completed),
            "cancelled" => Ok(RentalStatus::Cancelled),
            other => Err(format!("Unknown rental status '{other}'")),
        }
    }
}

/// The end of a rental must come strictly after its start.
pub fn validate_date_range(start: Timestamp, end: Timestamp) -> Result<(), String> {
    if end <= start {
        return Err("Rental end date must be after the start date".to_string());
    }
    Ok(())
}

/// Number of billing periods a date range spans for the given listing
/// duration. Partial periods round up; the minimum is one.
pub fn billable_units(duration: &str, start: Timestamp, end: Timestamp) -> Result<i64, String> {
    validate_date_range(start, end)?;

    let period_secs = match duration {
        DURATION_HOURLY => SECS_PER_HOUR,
        DURATION_DAILY => SECS_PER_DAY,
        DURATION_WEEKLY => 7 * SECS_PER_DAY,
        DURATION_MONTHLY => DAYS_PER_MONTH * SECS_PER_DAY,
        other => return Err(format!("Invalid duration '{other}'")),
    };

    let span_secs = (end - start).num_seconds();
    Ok(((span_secs + period_secs - 1) / period_secs).max(1))
}

/// Total cost of renting at `price` per period over the date range.
pub fn rental_total(
    price: Decimal,
    duration: &str,
    start: Timestamp,
    end: Timestamp,
) -> Result<Decimal, String> {
    let units = billable_units(duration, start, end)?;
    price
        .checked_mul(Decimal::from(units))
        .ok_or_else(|| "Rental total is too large".to_string())
}
