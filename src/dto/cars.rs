use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    models::{Car, CarStatus, CarType},
    pricing::DateRange,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand: String,
    #[validate(length(min = 1, max = 100))]
    pub model: String,
    #[validate(range(min = 1950, max = 2100))]
    pub year: i32,
    #[serde(rename = "type")]
    pub car_type: Option<CarType>,
    pub price_per_day: Decimal,
    pub deposit: Option<Decimal>,
    pub status: Option<CarStatus>,
    pub body_type: Option<String>,
    pub drive_type: Option<String>,
    pub transmission: Option<String>,
    pub engine: Option<String>,
    pub fuel_type: Option<String>,
    #[validate(range(min = 1, max = 60))]
    pub seats: Option<i32>,
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
    pub color: Option<String>,
    pub features: Option<String>,
    pub image_url: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub brand: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub model: Option<String>,
    #[validate(range(min = 1950, max = 2100))]
    pub year: Option<i32>,
    #[serde(rename = "type")]
    pub car_type: Option<CarType>,
    pub price_per_day: Option<Decimal>,
    pub deposit: Option<Decimal>,
    pub status: Option<CarStatus>,
    pub body_type: Option<String>,
    pub drive_type: Option<String>,
    pub transmission: Option<String>,
    pub engine: Option<String>,
    pub fuel_type: Option<String>,
    #[validate(range(min = 1, max = 60))]
    pub seats: Option<i32>,
    #[validate(range(min = 0))]
    pub mileage: Option<i32>,
    pub color: Option<String>,
    pub features: Option<String>,
    pub image_url: Option<String>,
    pub image_urls: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCarStatusRequest {
    pub status: CarStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CarList {
    #[schema(value_type = Vec<Car>)]
    pub items: Vec<Car>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookedPeriods {
    pub car_id: uuid::Uuid,
    pub periods: Vec<DateRange>,
}
