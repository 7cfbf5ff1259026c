//! Overlap and pricing rules
//!
//! All monetary calculations are done using `Decimal` internally, then
//! converted to `f64` for storage/serialization.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use thiserror::Error;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Errors produced by the booking rules
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BookingError {
    #[error("check-out must be at least one night after check-in")]
    InvalidDuration,

    #[error("room is already booked from {check_in} to {check_out}")]
    Conflict {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
}

/// A validated half-open stay interval [check_in, check_out)
///
/// Construction guarantees at least one night. Two back-to-back stays
/// (one checking out the morning the other checks in) do not overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    /// Build a stay range, rejecting empty or inverted intervals
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, BookingError> {
        if check_out <= check_in {
            return Err(BookingError::InvalidDuration);
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    pub fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights; always >= 1 by construction
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).num_days()
    }

    /// Half-open interval overlap: [a1,a2) and [b1,b2) overlap iff
    /// a1 < b2 && b1 < a2
    pub fn overlaps(&self, other: &StayRange) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }

    /// First existing stay that conflicts with the requested one, if any
    pub fn find_conflict<'a>(&self, existing: &'a [StayRange]) -> Option<&'a StayRange> {
        existing.iter().find(|stay| self.overlaps(stay))
    }
}

/// Total price for a stay: nightly rate times nights, rounded to cents
pub fn quote_total(nightly_rate: Decimal, nights: i64) -> Decimal {
    (nightly_rate * Decimal::from(nights)).round_dp(DECIMAL_PLACES)
}

/// Convert an f64 price from the wire/storage into a Decimal
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert a Decimal back to f64 for storage/serialization
pub fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
