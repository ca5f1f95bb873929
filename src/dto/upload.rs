use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadedFile {
    pub url: String,
    pub filename: String,
    pub size: usize,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadList {
    pub files: Vec<UploadedFile>,
}

/// Schema for multipart image uploads.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct ImageUploadForm {
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<Vec<u8>>,
}
