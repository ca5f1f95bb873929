use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, State},
    routing::post,
};
use uuid::Uuid;

use crate::{
    dto::upload::{ImageUploadForm, UploadList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Car,
    response::ApiResponse,
    services::upload_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/image", post(upload_image))
        .route("/cars/{id}/images", post(upload_car_images))
        .layer(DefaultBodyLimit::disable())
}

#[utoipa::path(
    post,
    path = "/api/upload/image",
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored images and their public URLs", body = ApiResponse<UploadList>),
        (status = 400, description = "Unsupported or oversized file")
    ),
    security(("bearer_auth" = [])),
    tag = "Upload"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadList>>> {
    let resp = upload_service::upload_images(&state, &user, multipart).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/upload/cars/{id}/images",
    params(("id" = Uuid, Path, description = "Car ID")),
    request_body(content = ImageUploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Images appended to the car", body = ApiResponse<Car>),
        (status = 404, description = "Car not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Upload"
)]
pub async fn upload_car_images(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Car>>> {
    let resp = upload_service::upload_car_images(&state, &user, id, multipart).await?;
    Ok(Json(resp))
}
