//! Upload handler.

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use datavision::input::FileFormat;
use datavision::Dataset;
use serde::Serialize;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Response after a successful upload.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub dataset_id: String,
    pub data: Arc<Dataset>,
}

/// POST /api/upload
///
/// Expects a multipart body with the file in the `file` field.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = multipart?;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read upload: {}", e)))?;
        upload = Some((file_name, bytes));
        break;
    }

    let (file_name, bytes) =
        upload.ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

    if FileFormat::from_file_name(&file_name).is_none() {
        return Err(ApiError::BadRequest(format!(
            "Unsupported file type: {}",
            file_name
        )));
    }

    log::debug!("Received upload {} ({} bytes)", file_name, bytes.len());

    let service = state.service.clone();
    let (dataset_id, data) =
        tokio::task::spawn_blocking(move || service.upload(&bytes, &file_name))
            .await
            .map_err(|e| ApiError::Internal(format!("Upload task failed: {}", e)))??;

    Ok(Json(UploadResponse {
        success: true,
        dataset_id,
        data,
    }))
}
