use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{Client, Rental};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClientRequest {
    #[validate(length(min = 2, max = 255))]
    pub full_name: String,
    #[validate(length(min = 1))]
    pub address: String,
    #[validate(length(min = 5, max = 32))]
    pub phone: String,
    #[validate(email)]
    pub email: Option<String>,
    pub registration_date: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateClientRequest {
    #[validate(length(min = 2, max = 255))]
    pub full_name: Option<String>,
    #[validate(length(min = 1))]
    pub address: Option<String>,
    #[validate(length(min = 5, max = 32))]
    pub phone: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ClientList {
    #[schema(value_type = Vec<Client>)]
    pub items: Vec<Client>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ClientWithRentals {
    pub client: Client,
    pub rentals: Vec<Rental>,
}
