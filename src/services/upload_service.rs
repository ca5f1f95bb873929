use std::path::Path;

use axum::extract::Multipart;
use tokio::fs;
use uuid::Uuid;

use crate::{
    audit,
    dto::upload::{UploadList, UploadedFile},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::Car,
    response::ApiResponse,
    services::car_service,
    state::AppState,
};

pub const ALLOWED_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "webp", "gif"];
pub const PUBLIC_PREFIX: &str = "/uploads";

/// Lower-cased extension of an uploaded file name, if it is an accepted image type.
pub fn image_extension(filename: &str) -> AppResult<String> {
    let ext = Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .ok_or_else(|| AppError::BadRequest("File has no extension".into()))?;
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(AppError::BadRequest(format!("Unsupported file type: .{ext}")));
    }
    Ok(ext)
}

pub async fn save_image(state: &AppState, filename: &str, bytes: &[u8]) -> AppResult<UploadedFile> {
    let ext = image_extension(filename)?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("File is empty".into()));
    }
    if bytes.len() > state.config.max_upload_bytes {
        return Err(AppError::BadRequest(format!(
            "File exceeds {} bytes",
            state.config.max_upload_bytes
        )));
    }

    let dir = Path::new(&state.config.upload_dir);
    fs::create_dir_all(dir)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    let stored = format!("{}.{}", Uuid::new_v4(), ext);
    fs::write(dir.join(&stored), bytes)
        .await
        .map_err(|e| AppError::Internal(e.into()))?;

    tracing::debug!(file = %stored, size = bytes.len(), "image stored");
    Ok(UploadedFile {
        url: format!("{PUBLIC_PREFIX}/{stored}"),
        filename: stored,
        size: bytes.len(),
    })
}

/// Store every file part of a multipart body.
pub async fn save_multipart(state: &AppState, mut multipart: Multipart) -> AppResult<Vec<UploadedFile>> {
    let mut files = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        files.push(save_image(state, &filename, &bytes).await?);
    }

    if files.is_empty() {
        return Err(AppError::BadRequest("No files uploaded".into()));
    }
    Ok(files)
}

pub async fn upload_images(
    state: &AppState,
    user: &AuthUser,
    multipart: Multipart,
) -> AppResult<ApiResponse<UploadList>> {
    ensure_staff(user)?;
    let files = save_multipart(state, multipart).await?;

    audit::record(
        state,
        user.user_id,
        "image_upload",
        "upload",
        serde_json::json!({ "files": files.iter().map(|f| &f.filename).collect::<Vec<_>>() }),
    )
    .await;

    Ok(ApiResponse::ok("Uploaded", UploadList { files }))
}

pub async fn upload_car_images(
    state: &AppState,
    user: &AuthUser,
    car_id: Uuid,
    multipart: Multipart,
) -> AppResult<ApiResponse<Car>> {
    ensure_staff(user)?;
    car_service::find_car(state, car_id).await?;
    let files = save_multipart(state, multipart).await?;
    let urls = files.into_iter().map(|f| f.url).collect();
    let car = car_service::attach_images(state, user, car_id, urls).await?;
    Ok(ApiResponse::ok("Images attached", car))
}
