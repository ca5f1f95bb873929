use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::Penalty;

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePenaltyRequest {
    pub rental_id: Uuid,
    pub amount: Decimal,
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PenaltyList {
    #[schema(value_type = Vec<Penalty>)]
    pub items: Vec<Penalty>,
}
