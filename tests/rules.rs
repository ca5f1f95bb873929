use car_rental_api::{
    entity::cars,
    error::AppError,
    middleware::auth::{AuthUser, decode_token, ensure_admin, ensure_manager, ensure_staff},
    models::{Role, User},
    pricing::DateRange,
    routes::params::{Pagination, PeriodQuery, SearchQuery},
    services::{
        auth_service::{hash_password, issue_token, verify_password},
        contains_pattern,
        penalty_service::validate_penalty_amount,
        rental_service::plan_rental,
        report_service::window_days,
        upload_service::image_extension,
    },
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn car_model(status: &str) -> cars::Model {
    cars::Model {
        id: Uuid::new_v4(),
        brand: "Skoda".into(),
        model: "Octavia".into(),
        year: 2021,
        car_type: "business".into(),
        price_per_day: Decimal::from(500),
        deposit: Decimal::from(1000),
        status: status.into(),
        body_type: None,
        drive_type: None,
        transmission: None,
        engine: None,
        fuel_type: None,
        seats: None,
        mileage: None,
        color: None,
        features: None,
        image_url: None,
        image_urls: None,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

fn auth(role: Role) -> AuthUser {
    AuthUser {
        user_id: Uuid::new_v4(),
        username: "tester".into(),
        role,
    }
}

#[test]
fn plan_rental_prices_free_range() {
    let booked = [DateRange::new(date(2024, 1, 10), date(2024, 1, 15))];
    let cost = plan_rental(&car_model("available"), date(2024, 1, 16), date(2024, 1, 19), &booked)
        .expect("range is free");
    assert_eq!(cost.days, 3);
    assert_eq!(cost.total, Decimal::from(2650));
}

#[test]
fn plan_rental_rejects_overlap_maintenance_and_reversed_dates() {
    let booked = [DateRange::new(date(2024, 1, 10), date(2024, 1, 15))];
    let available = car_model("available");

    let overlap = plan_rental(&available, date(2024, 1, 14), date(2024, 1, 20), &booked);
    assert!(matches!(overlap, Err(AppError::Conflict(_))));

    let reversed = plan_rental(&available, date(2024, 1, 20), date(2024, 1, 18), &[]);
    assert!(matches!(reversed, Err(AppError::BadRequest(_))));

    let maintenance = plan_rental(&car_model("maintenance"), date(2024, 2, 1), date(2024, 2, 3), &[]);
    assert!(matches!(maintenance, Err(AppError::Conflict(_))));
}

#[test]
fn penalty_amount_bounds() {
    let max = Decimal::from(1_000);
    assert!(validate_penalty_amount(Decimal::new(1, 2), max).is_ok());
    assert!(validate_penalty_amount(max, max).is_ok());
    assert!(validate_penalty_amount(Decimal::ZERO, max).is_err());
    assert!(validate_penalty_amount(Decimal::from(-5), max).is_err());
    assert!(validate_penalty_amount(Decimal::from(1_001), max).is_err());
}

#[test]
fn only_image_extensions_are_accepted() {
    assert_eq!(image_extension("photo.JPG").expect("jpg"), "jpg");
    assert_eq!(image_extension("car.front.webp").expect("webp"), "webp");
    assert!(image_extension("notes.txt").is_err());
    assert!(image_extension("README").is_err());
}

#[test]
fn report_window_is_inclusive() {
    assert_eq!(window_days(date(2024, 1, 1), date(2024, 1, 1)), 1);
    assert_eq!(window_days(date(2024, 1, 1), date(2024, 12, 31)), 366);
}

#[test]
fn pagination_is_clamped() {
    assert_eq!(Pagination::new(None, None).normalize(), (1, 20, 0));
    assert_eq!(Pagination::new(Some(3), Some(10)).normalize(), (3, 10, 20));
    assert_eq!(Pagination::new(Some(0), Some(500)).normalize(), (1, 100, 0));

    let (page, per_page, offset) = Pagination::new(Some(i64::MAX), Some(100)).normalize();
    assert_eq!((page, per_page), (i64::MAX, 100));
    assert_eq!(offset, i64::MAX);
}

#[test]
fn search_terms_escape_like_wildcards() {
    assert_eq!(contains_pattern("bmw"), "%bmw%");
    assert_eq!(contains_pattern("_"), "%\\_%");
    assert_eq!(contains_pattern("50%"), "%50\\%%");
    assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
}

#[test]
fn period_bounds_are_ordered() {
    let query = PeriodQuery {
        from: Some(date(2024, 6, 30)),
        to: Some(date(2024, 1, 1)),
    };
    assert_eq!(query.resolve(), (date(2024, 1, 1), date(2024, 6, 30)));

    let (from, to) = PeriodQuery::default().resolve();
    assert!(from <= to);
}

#[test]
fn search_limit_is_clamped() {
    let query = SearchQuery {
        q: Some("bmw".into()),
        limit: Some(1_000),
    };
    assert_eq!(query.limit(), 50);
    assert_eq!(SearchQuery::default().limit(), 10);
}

#[test]
fn role_guards() {
    assert!(ensure_staff(&auth(Role::Employee)).is_ok());
    assert!(matches!(ensure_staff(&auth(Role::User)), Err(AppError::Forbidden)));
    assert!(ensure_manager(&auth(Role::Admin)).is_ok());
    assert!(matches!(ensure_manager(&auth(Role::Employee)), Err(AppError::Forbidden)));
    assert!(matches!(ensure_admin(&auth(Role::Manager)), Err(AppError::Forbidden)));
}

#[test]
fn passwords_hash_and_verify() {
    let hash = hash_password("s3cret-pass").expect("hash");
    assert!(verify_password("s3cret-pass", &hash).expect("verify"));
    assert!(!verify_password("wrong-pass", &hash).expect("verify"));
}

#[test]
fn issued_token_decodes_to_same_user() {
    let user = User {
        id: Uuid::new_v4(),
        username: "manager".into(),
        email: "manager@example.com".into(),
        role: Role::Manager,
        full_name: None,
        phone: None,
        is_active: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let token = issue_token(&user, "test-secret", 1).expect("token");

    let decoded = decode_token(&token, "test-secret").expect("decode");
    assert_eq!(decoded.user_id, user.id);
    assert_eq!(decoded.username, "manager");
    assert_eq!(decoded.role, Role::Manager);

    assert!(matches!(
        decode_token(&token, "other-secret"),
        Err(AppError::Unauthorized(_))
    ));
}
