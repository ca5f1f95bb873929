use axum::{Json, extract::State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(Serialize, ToSchema)]
pub struct HealthData {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, ToSchema)]
pub struct ReadinessData {
    pub status: String,
    pub database: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "OK", body = ApiResponse<HealthData>),
    ),
    security(()),
    tag = "Health"
)]
pub async fn health_check() -> Json<ApiResponse<HealthData>> {
    let data = HealthData {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    Json(ApiResponse::success(
        "Health check",
        data,
        Some(Meta::empty()),
    ))
}

#[utoipa::path(
    get,
    path = "/health/ready",
    responses(
        (status = 200, description = "Database reachable", body = ApiResponse<ReadinessData>),
        (status = 500, description = "Database unreachable"),
    ),
    security(()),
    tag = "Health"
)]
pub async fn readiness(State(state): State<AppState>) -> AppResult<Json<ApiResponse<ReadinessData>>> {
    sqlx::query("SELECT 1").execute(&state.pool).await?;
    Ok(Json(ApiResponse::ok(
        "Ready",
        ReadinessData {
            status: "ok".to_string(),
            database: "up".to_string(),
        },
    )))
}
