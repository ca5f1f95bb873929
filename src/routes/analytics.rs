use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};

use crate::{
    dto::analytics::{AnalyticsSummary, PopularCarList, RevenueSeries},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::{PeriodQuery, PopularCarsQuery},
    services::analytics_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/summary", get(summary))
        .route("/revenue", get(revenue))
        .route("/popular-cars", get(popular_cars))
}

#[utoipa::path(
    get,
    path = "/api/analytics/summary",
    responses(
        (status = 200, description = "Fleet, rental and revenue totals", body = ApiResponse<AnalyticsSummary>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<AnalyticsSummary>>> {
    let resp = analytics_service::summary(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/revenue",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Monthly revenue", body = ApiResponse<RevenueSeries>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn revenue(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PeriodQuery>,
) -> AppResult<Json<ApiResponse<RevenueSeries>>> {
    let resp = analytics_service::revenue(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/analytics/popular-cars",
    params(PopularCarsQuery),
    responses(
        (status = 200, description = "Most rented cars", body = ApiResponse<PopularCarList>),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Analytics"
)]
pub async fn popular_cars(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<PopularCarsQuery>,
) -> AppResult<Json<ApiResponse<PopularCarList>>> {
    let resp = analytics_service::popular_cars(&state, &user, query).await?;
    Ok(Json(resp))
}
