//! Health check endpoint.

use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::config;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub vision_configured: bool,
    pub timestamp: String,
}

/// `GET /api/health` — connection check.
pub async fn check() -> Result<Json<HealthResponse>, ApiError> {
    Ok(Json(HealthResponse {
        status: "ok",
        version: config::APP_VERSION,
        vision_configured: config::vision_api_key().is_some(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
