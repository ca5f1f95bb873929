use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalReportRow {
    pub rental_id: Uuid,
    pub client_name: String,
    pub car: String,
    pub start_date: NaiveDate,
    pub expected_end_date: NaiveDate,
    pub actual_end_date: Option<NaiveDate>,
    pub status: String,
    pub total_cost: Decimal,
    pub deposit_amount: Decimal,
    pub penalty_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RentalReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub rows: Vec<RentalReportRow>,
    pub total_rentals: i64,
    /// Rental charges of non-cancelled rentals, deposits excluded.
    pub total_revenue: Decimal,
    pub total_penalties: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FleetReportRow {
    pub car_id: Uuid,
    pub car: String,
    pub status: String,
    pub rentals: i64,
    pub days_rented: i64,
    pub revenue: Decimal,
    pub occupancy_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FleetReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub rows: Vec<FleetReportRow>,
    pub fleet_occupancy_rate: f64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientReportRow {
    pub client_id: Uuid,
    pub full_name: String,
    pub rentals: i64,
    pub total_spent: Decimal,
    pub total_penalties: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub rows: Vec<ClientReportRow>,
}
