//! Booking interval checks and rental cost calculation.
//!
//! Dates are calendar days; every range here is inclusive on both ends.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Share of the daily price added to the deposit for every day after the first.
pub fn deposit_daily_rate() -> Decimal {
    Decimal::new(15, 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn overlaps(&self, other: &DateRange) -> bool {
        self.start <= other.end && self.end >= other.start
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CostBreakdown {
    pub days: i64,
    pub price: Decimal,
    pub deposit: Decimal,
    pub total: Decimal,
}

/// A candidate range is valid when it is ordered and touches no booked range.
pub fn is_date_range_valid(start: NaiveDate, end: NaiveDate, booked: &[DateRange]) -> bool {
    if start > end {
        return false;
    }
    let candidate = DateRange::new(start, end);
    !booked.iter().any(|period| candidate.overlaps(period))
}

/// Billable days between two dates; a same-day rental is billed as one day.
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}

pub fn calculate_total_cost(days: i64, price_per_day: Decimal, base_deposit: Decimal) -> CostBreakdown {
    let days = days.max(0);
    let price = price_per_day * Decimal::from(days);
    let extra_days = Decimal::from((days - 1).max(0));
    let deposit = base_deposit + deposit_daily_rate() * price_per_day * extra_days;
    CostBreakdown {
        days,
        price,
        deposit,
        total: price + deposit,
    }
}

/// Charge for returning a car after the expected end date.
pub fn late_fee(expected_end: NaiveDate, actual_end: NaiveDate, price_per_day: Decimal) -> Decimal {
    let overdue = (actual_end - expected_end).num_days();
    if overdue <= 0 {
        return Decimal::ZERO;
    }
    price_per_day * Decimal::from(overdue)
}

pub fn occupancy_rate(rented: i64, total: i64) -> f64 {
    if total <= 0 {
        return 0.0;
    }
    (rented.max(0) as f64 / total as f64).min(1.0)
}
