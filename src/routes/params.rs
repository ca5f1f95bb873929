use chrono::{Datelike, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::models::{CarStatus, CarType, RentalStatus, Role};

// Query structs repeat page/perPage instead of flattening `Pagination`:
// serde_urlencoded cannot parse numbers through `#[serde(flatten)]`.

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn new(page: Option<i64>, per_page: Option<i64>) -> Self {
        Self { page, per_page }
    }

    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CarSortBy {
    CreatedAt,
    PricePerDay,
    Year,
    Brand,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct CarQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
    #[serde(rename = "type")]
    pub car_type: Option<CarType>,
    pub status: Option<CarStatus>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Only cars with no active rental overlapping `availableFrom..=availableTo`.
    pub available_from: Option<NaiveDate>,
    pub available_to: Option<NaiveDate>,
    pub sort_by: Option<CarSortBy>,
    pub sort_order: Option<SortOrder>,
}

impl CarQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct ClientQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub q: Option<String>,
}

impl ClientQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct RentalQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<RentalStatus>,
    pub client_id: Option<Uuid>,
    pub car_id: Option<Uuid>,
    pub sort_order: Option<SortOrder>,
}

impl RentalQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct PenaltyQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub rental_id: Option<Uuid>,
}

impl PenaltyQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct UserQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub role: Option<Role>,
    pub q: Option<String>,
}

impl UserQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }
}

/// Inclusive reporting window. Defaults to the current calendar year.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct PeriodQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl PeriodQuery {
    pub fn resolve(&self) -> (NaiveDate, NaiveDate) {
        let today = Local::now().date_naive();
        let year_start = NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today);
        let year_end = NaiveDate::from_ymd_opt(today.year(), 12, 31).unwrap_or(today);
        let from = self.from.unwrap_or(year_start);
        let to = self.to.unwrap_or(year_end);
        if from <= to { (from, to) } else { (to, from) }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct PopularCarsQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<i64>,
}

impl SearchQuery {
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(10).clamp(1, 50)
    }
}
