use car_rental_api::models::{
    Car, CarStatus, CarType, RentalStatus, Role, encode_image_urls, parse_image_urls,
};
use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

fn car(image_url: Option<&str>, image_urls: Option<&str>) -> Car {
    Car {
        id: Uuid::new_v4(),
        brand: "Toyota".into(),
        model: "Corolla".into(),
        year: 2022,
        car_type: CarType::Economy,
        price_per_day: Decimal::from(2500),
        deposit: Decimal::from(10000),
        status: CarStatus::Available,
        body_type: None,
        drive_type: None,
        transmission: None,
        engine: None,
        fuel_type: None,
        seats: Some(5),
        mileage: None,
        color: None,
        features: None,
        image_url: image_url.map(str::to_string),
        image_urls: image_urls.map(str::to_string),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[test]
fn image_list_survives_storage() {
    let urls = vec!["/uploads/a.jpg".to_string(), "/uploads/b.png".to_string()];
    let stored = encode_image_urls(&urls);
    assert_eq!(parse_image_urls(&car(None, Some(&stored))), urls);
}

#[test]
fn blank_image_list_falls_back_to_main_image() {
    assert_eq!(
        parse_image_urls(&car(Some("/uploads/main.jpg"), Some("  "))),
        vec!["/uploads/main.jpg".to_string()]
    );
    assert!(parse_image_urls(&car(None, None)).is_empty());
}

#[test]
fn non_json_image_list_is_a_single_url() {
    assert_eq!(
        parse_image_urls(&car(None, Some("https://cdn.example.com/x.jpg"))),
        vec!["https://cdn.example.com/x.jpg".to_string()]
    );
}

#[test]
fn roles_are_ranked() {
    assert!(Role::Admin.at_least(Role::Manager));
    assert!(Role::Manager.at_least(Role::Employee));
    assert!(Role::Employee.at_least(Role::Employee));
    assert!(!Role::Employee.at_least(Role::Manager));
    assert!(!Role::User.at_least(Role::Employee));
}

#[test]
fn rentals_only_leave_active() {
    assert!(RentalStatus::Active.can_transition_to(RentalStatus::Completed));
    assert!(RentalStatus::Active.can_transition_to(RentalStatus::Cancelled));
    assert!(!RentalStatus::Completed.can_transition_to(RentalStatus::Active));
    assert!(!RentalStatus::Cancelled.can_transition_to(RentalStatus::Completed));
    assert!(!RentalStatus::Active.can_transition_to(RentalStatus::Active));
}

#[test]
fn enums_parse_stored_strings() {
    assert_eq!("Manager".parse::<Role>(), Ok(Role::Manager));
    assert_eq!("premium".parse::<CarType>(), Ok(CarType::Premium));
    assert_eq!(" maintenance ".parse::<CarStatus>(), Ok(CarStatus::Maintenance));
    assert_eq!("cancelled".parse::<RentalStatus>(), Ok(RentalStatus::Cancelled));
    assert!("sports".parse::<CarType>().is_err());
}

#[test]
fn car_serializes_type_and_camel_case() {
    let value = serde_json::to_value(car(None, None)).expect("serialize car");
    assert_eq!(value["type"], "economy");
    assert_eq!(value["status"], "available");
    assert!(value.get("pricePerDay").is_some());
}
