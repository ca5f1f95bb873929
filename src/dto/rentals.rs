use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    models::{Car, Client, Penalty, Rental},
    pricing::CostBreakdown,
};

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateRentalRequest {
    pub client_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub expected_end_date: NaiveDate,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRentalRequest {
    pub start_date: Option<NaiveDate>,
    pub expected_end_date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub expected_end_date: NaiveDate,
    /// Rental to ignore in the overlap check, used when editing dates.
    pub exclude_rental_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteResponse {
    pub available: bool,
    pub cost: CostBreakdown,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRentalRequest {
    pub actual_end_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct RentalList {
    #[schema(value_type = Vec<Rental>)]
    pub items: Vec<Rental>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RentalDetail {
    pub rental: Rental,
    pub client: Option<Client>,
    pub car: Option<Car>,
    pub penalties: Vec<Penalty>,
}
