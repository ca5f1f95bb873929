use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::rentals::{
        CompleteRentalRequest, CreateRentalRequest, QuoteRequest, QuoteResponse, RentalDetail,
        RentalList, UpdateRentalRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Rental,
    response::ApiResponse,
    routes::params::RentalQuery,
    services::rental_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_rentals).post(create_rental))
        .route("/quote", post(quote))
        .route("/{id}", get(get_rental).put(update_rental).delete(delete_rental))
        .route("/{id}/complete", post(complete_rental))
        .route("/{id}/cancel", post(cancel_rental))
}

#[utoipa::path(
    get,
    path = "/api/rentals",
    params(RentalQuery),
    responses((status = 200, description = "List rentals", body = ApiResponse<RentalList>)),
    security(("bearer_auth" = [])),
    tag = "Rentals"
)]
pub async fn list_rentals(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<RentalQuery>,
) -> AppResult<Json<ApiResponse<RentalList>>> {
    let resp = rental_service::list_rentals(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/rentals/quote",
    request_body = QuoteRequest,
    responses(
        (status = 200, description = "Price and availability for a date range", body = ApiResponse<QuoteResponse>),
        (status = 400, description = "Invalid date range"),
        (status = 404, description = "Car not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Rentals"
)]
pub async fn quote(
    State(state): State<AppState>,
    _user: AuthUser,
    Json(payload): Json<QuoteRequest>,
) -> AppResult<Json<ApiResponse<QuoteResponse>>> {
    let resp = rental_service::quote_rental(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/rentals/{id}",
    params(("id" = Uuid, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Rental with client, car and penalties", body = ApiResponse<RentalDetail>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Rentals"
)]
pub async fn get_rental(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<RentalDetail>>> {
    let resp = rental_service::get_rental(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/rentals",
    request_body = CreateRentalRequest,
    responses(
        (status = 200, description = "Create rental", body = ApiResponse<Rental>),
        (status = 400, description = "Invalid dates or unknown client/car"),
        (status = 409, description = "Car already booked or under maintenance")
    ),
    security(("bearer_auth" = [])),
    tag = "Rentals"
)]
pub async fn create_rental(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateRentalRequest>,
) -> AppResult<Json<ApiResponse<Rental>>> {
    let resp = rental_service::create_rental(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/rentals/{id}",
    params(("id" = Uuid, Path, description = "Rental ID")),
    request_body = UpdateRentalRequest,
    responses(
        (status = 200, description = "Updated rental", body = ApiResponse<Rental>),
        (status = 400, description = "Rental is not active"),
        (status = 409, description = "New dates overlap another rental")
    ),
    security(("bearer_auth" = [])),
    tag = "Rentals"
)]
pub async fn update_rental(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRentalRequest>,
) -> AppResult<Json<ApiResponse<Rental>>> {
    let resp = rental_service::update_rental(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/rentals/{id}/complete",
    params(("id" = Uuid, Path, description = "Rental ID")),
    request_body = CompleteRentalRequest,
    responses(
        (status = 200, description = "Rental completed", body = ApiResponse<Rental>),
        (status = 400, description = "Rental is not active")
    ),
    security(("bearer_auth" = [])),
    tag = "Rentals"
)]
pub async fn complete_rental(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    payload: Option<Json<CompleteRentalRequest>>,
) -> AppResult<Json<ApiResponse<Rental>>> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let resp = rental_service::complete_rental(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/rentals/{id}/cancel",
    params(("id" = Uuid, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Rental cancelled", body = ApiResponse<Rental>),
        (status = 400, description = "Rental is not active")
    ),
    security(("bearer_auth" = [])),
    tag = "Rentals"
)]
pub async fn cancel_rental(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Rental>>> {
    let resp = rental_service::cancel_rental(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/rentals/{id}",
    params(("id" = Uuid, Path, description = "Rental ID")),
    responses(
        (status = 200, description = "Deleted rental"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Rentals"
)]
pub async fn delete_rental(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = rental_service::delete_rental(&state, &user, id).await?;
    Ok(Json(resp))
}
