use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{cars, clients, penalties, rentals, users};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Employee,
    #[default]
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CarType {
    #[default]
    Economy,
    Business,
    Premium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CarStatus {
    #[default]
    Available,
    Rented,
    Maintenance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RentalStatus {
    #[default]
    Active,
    Completed,
    Cancelled,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Employee => "employee",
            Role::User => "user",
        }
    }
}

impl CarType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarType::Economy => "economy",
            CarType::Business => "business",
            CarType::Premium => "premium",
        }
    }
}

impl CarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Available => "available",
            CarStatus::Rented => "rented",
            CarStatus::Maintenance => "maintenance",
        }
    }
}

impl RentalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RentalStatus::Active => "active",
            RentalStatus::Completed => "completed",
            RentalStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "employee" => Ok(Role::Employee),
            "user" => Ok(Role::User),
            other => Err(format!("invalid role: {other}")),
        }
    }
}

impl FromStr for CarType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "economy" => Ok(CarType::Economy),
            "business" => Ok(CarType::Business),
            "premium" => Ok(CarType::Premium),
            other => Err(format!("invalid car type: {other}")),
        }
    }
}

impl FromStr for CarStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(CarStatus::Available),
            "rented" => Ok(CarStatus::Rented),
            "maintenance" => Ok(CarStatus::Maintenance),
            other => Err(format!("invalid car status: {other}")),
        }
    }
}

impl FromStr for RentalStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(RentalStatus::Active),
            "completed" => Ok(RentalStatus::Completed),
            "cancelled" => Ok(RentalStatus::Cancelled),
            other => Err(format!("invalid rental status: {other}")),
        }
    }
}

impl RentalStatus {
    /// Rentals only leave `active`, and only towards `completed` or `cancelled`.
    pub fn can_transition_to(&self, next: RentalStatus) -> bool {
        matches!(
            (self, next),
            (RentalStatus::Active, RentalStatus::Completed)
                | (RentalStatus::Active, RentalStatus::Cancelled)
        )
    }
}

impl fmt::Display for RentalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Role {
    /// Privilege level used for "at least" checks.
    pub fn rank(&self) -> u8 {
        match self {
            Role::User => 0,
            Role::Employee => 1,
            Role::Manager => 2,
            Role::Admin => 3,
        }
    }

    pub fn at_least(&self, other: Role) -> bool {
        self.rank() >= other.rank()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    pub id: Uuid,
    pub brand: String,
    pub model: String,
    pub year: i32,
    #[serde(rename = "type")]
    pub car_type: CarType,
    pub price_per_day: Decimal,
    pub deposit: Decimal,
    pub status: CarStatus,
    pub body_type: Option<String>,
    pub drive_type: Option<String>,
    pub transmission: Option<String>,
    pub engine: Option<String>,
    pub fuel_type: Option<String>,
    pub seats: Option<i32>,
    pub mileage: Option<i32>,
    pub color: Option<String>,
    pub features: Option<String>,
    pub image_url: Option<String>,
    /// JSON-encoded list of image URLs, as stored.
    pub image_urls: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: Uuid,
    pub full_name: String,
    pub address: String,
    pub phone: String,
    pub email: Option<String>,
    pub registration_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Rental {
    pub id: Uuid,
    pub client_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub expected_end_date: NaiveDate,
    pub actual_end_date: Option<NaiveDate>,
    pub deposit_amount: Decimal,
    pub total_cost: Decimal,
    pub penalty_amount: Decimal,
    pub status: RentalStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Penalty {
    pub id: Uuid,
    pub rental_id: Uuid,
    pub amount: Decimal,
    pub reason: String,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Decode a car's stored image list.
///
/// Blank or missing text falls back to the single `image_url`; text that is not
/// a JSON list of strings is treated as one URL.
pub fn parse_image_urls(car: &Car) -> Vec<String> {
    let raw = car.image_urls.as_deref().map(str::trim).unwrap_or("");
    if raw.is_empty() {
        return car.image_url.iter().cloned().collect();
    }
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(urls) => urls,
        Err(_) => vec![raw.to_string()],
    }
}

pub fn encode_image_urls(urls: &[String]) -> String {
    serde_json::to_string(urls).unwrap_or_else(|_| "[]".to_string())
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            username: model.username,
            email: model.email,
            role: model.role.parse().unwrap_or_default(),
            full_name: model.full_name,
            phone: model.phone,
            is_active: model.is_active,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<cars::Model> for Car {
    fn from(model: cars::Model) -> Self {
        Self {
            id: model.id,
            brand: model.brand,
            model: model.model,
            year: model.year,
            car_type: model.car_type.parse().unwrap_or_default(),
            price_per_day: model.price_per_day,
            deposit: model.deposit,
            status: model.status.parse().unwrap_or_default(),
            body_type: model.body_type,
            drive_type: model.drive_type,
            transmission: model.transmission,
            engine: model.engine,
            fuel_type: model.fuel_type,
            seats: model.seats,
            mileage: model.mileage,
            color: model.color,
            features: model.features,
            image_url: model.image_url,
            image_urls: model.image_urls,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<clients::Model> for Client {
    fn from(model: clients::Model) -> Self {
        Self {
            id: model.id,
            full_name: model.full_name,
            address: model.address,
            phone: model.phone,
            email: model.email,
            registration_date: model.registration_date,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<rentals::Model> for Rental {
    fn from(model: rentals::Model) -> Self {
        Self {
            id: model.id,
            client_id: model.client_id,
            car_id: model.car_id,
            start_date: model.start_date,
            expected_end_date: model.expected_end_date,
            actual_end_date: model.actual_end_date,
            deposit_amount: model.deposit_amount,
            total_cost: model.total_cost,
            penalty_amount: model.penalty_amount,
            status: model.status.parse().unwrap_or_default(),
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<penalties::Model> for Penalty {
    fn from(model: penalties::Model) -> Self {
        Self {
            id: model.id,
            rental_id: model.rental_id,
            amount: model.amount,
            reason: model.reason,
            date: model.date,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}
