//! Liveness and banner handlers.

use axum::Json;
use chrono::Utc;
use serde::Serialize;

/// Response for the health endpoint.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// Response for paths outside the API.
#[derive(Serialize)]
pub struct BannerResponse {
    pub message: &'static str,
    pub version: &'static str,
}

/// GET /api/health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Fallback for every unrouted path.
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "Data Vision API Server",
        version: env!("CARGO_PKG_VERSION"),
    })
}
