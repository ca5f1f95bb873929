use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::reports::{ClientReport, FleetReport, RentalReport},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::PeriodQuery,
    services::report_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rentals", get(rentals_report))
        .route("/fleet", get(fleet_report))
        .route("/clients", get(clients_report))
}

#[utoipa::path(
    get,
    path = "/api/reports/rentals",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Rentals started in the period", body = ApiResponse<RentalReport>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn rentals_report(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<ApiResponse<RentalReport>>> {
    let resp = report_service::rentals_report(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/fleet",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Per-car utilisation for the period", body = ApiResponse<FleetReport>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn fleet_report(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<ApiResponse<FleetReport>>> {
    let resp = report_service::fleet_report(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reports/clients",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Per-client spend for the period", body = ApiResponse<ClientReport>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
pub async fn clients_report(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<ApiResponse<ClientReport>>> {
    let resp = report_service::clients_report(&state, &user, query).await?;
    Ok(Json(resp))
}
