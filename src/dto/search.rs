use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Car, Client};

#[derive(Debug, Serialize, ToSchema)]
pub struct GlobalSearchResult {
    pub cars: Vec<Car>,
    pub clients: Vec<Client>,
}
