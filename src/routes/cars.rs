use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::cars::{BookedPeriods, CarList, CreateCarRequest, UpdateCarRequest, UpdateCarStatusRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Car,
    response::ApiResponse,
    routes::params::CarQuery,
    services::car_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_cars).post(create_car))
        .route("/{id}", get(get_car).put(update_car).delete(delete_car))
        .route("/{id}/status", patch(update_car_status))
        .route("/{id}/booked-periods", get(booked_periods))
}

#[utoipa::path(
    get,
    path = "/api/cars",
    params(CarQuery),
    responses(
        (status = 200, description = "List cars", body = ApiResponse<CarList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Cars"
)]
pub async fn list_cars(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<CarQuery>,
) -> AppResult<Json<ApiResponse<CarList>>> {
    let resp = car_service::list_cars(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cars/{id}",
    params(("id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Get car", body = ApiResponse<Car>),
        (status = 404, description = "Car not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cars"
)]
pub async fn get_car(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Car>>> {
    let resp = car_service::get_car(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cars",
    request_body = CreateCarRequest,
    responses(
        (status = 200, description = "Create car", body = ApiResponse<Car>),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Forbidden")
    ),
    security(("bearer_auth" = [])),
    tag = "Cars"
)]
pub async fn create_car(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateCarRequest>,
) -> AppResult<Json<ApiResponse<Car>>> {
    let resp = car_service::create_car(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/cars/{id}",
    params(("id" = Uuid, Path, description = "Car ID")),
    request_body = UpdateCarRequest,
    responses(
        (status = 200, description = "Updated car", body = ApiResponse<Car>),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Status change blocked by an ongoing rental")
    ),
    security(("bearer_auth" = [])),
    tag = "Cars"
)]
pub async fn update_car(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCarRequest>,
) -> AppResult<Json<ApiResponse<Car>>> {
    let resp = car_service::update_car(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/cars/{id}/status",
    params(("id" = Uuid, Path, description = "Car ID")),
    request_body = UpdateCarStatusRequest,
    responses(
        (status = 200, description = "Updated car status", body = ApiResponse<Car>),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Car has an ongoing rental")
    ),
    security(("bearer_auth" = [])),
    tag = "Cars"
)]
pub async fn update_car_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCarStatusRequest>,
) -> AppResult<Json<ApiResponse<Car>>> {
    let resp = car_service::update_car_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/cars/{id}",
    params(("id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Deleted car"),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Car has rentals")
    ),
    security(("bearer_auth" = [])),
    tag = "Cars"
)]
pub async fn delete_car(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = car_service::delete_car(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cars/{id}/booked-periods",
    params(("id" = Uuid, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Date ranges held by active rentals", body = ApiResponse<BookedPeriods>),
        (status = 404, description = "Car not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Cars"
)]
pub async fn booked_periods(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<BookedPeriods>>> {
    let resp = car_service::get_booked_periods(&state, id).await?;
    Ok(Json(resp))
}
