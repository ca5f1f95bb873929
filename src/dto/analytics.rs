use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FleetStatusCounts {
    pub total: i64,
    pub available: i64,
    pub rented: i64,
    pub maintenance: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub fleet: FleetStatusCounts,
    pub occupancy_rate: f64,
    pub active_rentals: i64,
    pub completed_rentals: i64,
    pub cancelled_rentals: i64,
    pub total_clients: i64,
    pub rental_revenue: Decimal,
    pub penalty_revenue: Decimal,
    pub total_revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    /// Calendar month, formatted `YYYY-MM`.
    pub period: String,
    pub rentals: i64,
    pub rental_revenue: Decimal,
    pub penalty_revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueSeries {
    pub points: Vec<RevenuePoint>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopularCar {
    pub car_id: Uuid,
    pub brand: String,
    pub model: String,
    pub rentals: i64,
    pub revenue: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PopularCarList {
    #[schema(value_type = Vec<PopularCar>)]
    pub items: Vec<PopularCar>,
}
