use car_rental_api::pricing::{
    DateRange, calculate_total_cost, duration_days, is_date_range_valid, late_fee, occupancy_rate,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn booked_jan_10_15() -> Vec<DateRange> {
    vec![DateRange::new(date(2024, 1, 10), date(2024, 1, 15))]
}

#[test]
fn single_day_has_no_deposit_increment() {
    let cost = calculate_total_cost(1, Decimal::from(500), Decimal::from(1000));
    assert_eq!(cost.days, 1);
    assert_eq!(cost.price, Decimal::from(500));
    assert_eq!(cost.deposit, Decimal::from(1000));
    assert_eq!(cost.total, Decimal::from(1500));
}

#[test]
fn deposit_grows_by_fifteen_percent_per_extra_day() {
    let cost = calculate_total_cost(3, Decimal::from(500), Decimal::from(1000));
    assert_eq!(cost.price, Decimal::from(1500));
    assert_eq!(cost.deposit, Decimal::from(1150));
    assert_eq!(cost.total, Decimal::from(2650));
}

#[test]
fn total_is_price_plus_deposit() {
    let cost = calculate_total_cost(7, Decimal::new(249_99, 2), Decimal::from(300));
    assert_eq!(cost.total, cost.price + cost.deposit);
}

#[test]
fn ranges_before_and_after_a_booking_are_free() {
    let booked = booked_jan_10_15();
    assert!(is_date_range_valid(date(2024, 1, 1), date(2024, 1, 9), &booked));
    assert!(is_date_range_valid(date(2024, 1, 16), date(2024, 1, 20), &booked));
}

#[test]
fn touching_or_covering_a_booking_conflicts() {
    let booked = booked_jan_10_15();
    // Shared boundary days count as overlap.
    assert!(!is_date_range_valid(date(2024, 1, 5), date(2024, 1, 10), &booked));
    assert!(!is_date_range_valid(date(2024, 1, 15), date(2024, 1, 18), &booked));
    assert!(!is_date_range_valid(date(2024, 1, 12), date(2024, 1, 13), &booked));
    assert!(!is_date_range_valid(date(2024, 1, 1), date(2024, 1, 31), &booked));
}

#[test]
fn reversed_range_is_invalid_even_without_bookings() {
    assert!(!is_date_range_valid(date(2024, 2, 10), date(2024, 2, 1), &[]));
    assert!(is_date_range_valid(date(2024, 2, 1), date(2024, 2, 1), &[]));
}

#[test]
fn overlap_is_symmetric() {
    let a = DateRange::new(date(2024, 3, 1), date(2024, 3, 5));
    let b = DateRange::new(date(2024, 3, 5), date(2024, 3, 9));
    let c = DateRange::new(date(2024, 3, 6), date(2024, 3, 9));
    assert!(a.overlaps(&b) && b.overlaps(&a));
    assert!(!a.overlaps(&c) && !c.overlaps(&a));
}

#[test]
fn same_day_rental_bills_one_day() {
    assert_eq!(duration_days(date(2024, 1, 10), date(2024, 1, 10)), 1);
    assert_eq!(duration_days(date(2024, 1, 10), date(2024, 1, 11)), 1);
    assert_eq!(duration_days(date(2024, 1, 10), date(2024, 1, 13)), 3);
}

#[test]
fn late_fee_charges_daily_price_per_overdue_day() {
    let ppd = Decimal::from(500);
    assert_eq!(late_fee(date(2024, 1, 15), date(2024, 1, 15), ppd), Decimal::ZERO);
    assert_eq!(late_fee(date(2024, 1, 15), date(2024, 1, 12), ppd), Decimal::ZERO);
    assert_eq!(late_fee(date(2024, 1, 15), date(2024, 1, 17), ppd), Decimal::from(1000));
}

#[test]
fn occupancy_rate_handles_empty_fleet() {
    assert_eq!(occupancy_rate(0, 0), 0.0);
    assert_eq!(occupancy_rate(2, 8), 0.25);
    assert_eq!(occupancy_rate(9, 8), 1.0);
}
