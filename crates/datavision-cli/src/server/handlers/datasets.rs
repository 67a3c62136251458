//! Dataset listing, lookup and deletion handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use datavision::{Dataset, DatasetSummary};
use serde::Serialize;

use crate::server::error::ApiError;
use crate::server::state::AppState;

/// Response after a delete.
#[derive(Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// GET /api/datasets
pub async fn list_datasets(State(state): State<AppState>) -> Json<Vec<DatasetSummary>> {
    Json(state.service.list_datasets())
}

/// GET /api/datasets/:id
pub async fn get_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Arc<Dataset>>, ApiError> {
    Ok(Json(state.service.get_dataset(&id)?))
}

/// DELETE /api/datasets/:id
pub async fn delete_dataset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Json<DeleteResponse> {
    Json(DeleteResponse {
        success: state.service.delete_dataset(&id),
    })
}
