use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::penalties::{CreatePenaltyRequest, PenaltyList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Penalty,
    response::ApiResponse,
    routes::params::PenaltyQuery,
    services::penalty_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_penalties).post(create_penalty))
        .route("/{id}", get(get_penalty).delete(delete_penalty))
}

#[utoipa::path(
    get,
    path = "/api/penalties",
    params(PenaltyQuery),
    responses((status = 200, description = "List penalties", body = ApiResponse<PenaltyList>)),
    security(("bearer_auth" = [])),
    tag = "Penalties"
)]
pub async fn list_penalties(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<PenaltyQuery>,
) -> AppResult<Json<ApiResponse<PenaltyList>>> {
    let resp = penalty_service::list_penalties(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/penalties/{id}",
    params(("id" = Uuid, Path, description = "Penalty ID")),
    responses(
        (status = 200, description = "Get penalty", body = ApiResponse<Penalty>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Penalties"
)]
pub async fn get_penalty(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Penalty>>> {
    let resp = penalty_service::get_penalty(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/penalties",
    request_body = CreatePenaltyRequest,
    responses(
        (status = 200, description = "Create penalty", body = ApiResponse<Penalty>),
        (status = 400, description = "Invalid amount or rental")
    ),
    security(("bearer_auth" = [])),
    tag = "Penalties"
)]
pub async fn create_penalty(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePenaltyRequest>,
) -> AppResult<Json<ApiResponse<Penalty>>> {
    let resp = penalty_service::create_penalty(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/penalties/{id}",
    params(("id" = Uuid, Path, description = "Penalty ID")),
    responses(
        (status = 200, description = "Deleted penalty"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Penalties"
)]
pub async fn delete_penalty(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = penalty_service::delete_penalty(&state, &user, id).await?;
    Ok(Json(resp))
}
