//! Prescription photo analysis endpoint.
//!
//! `POST /api/analyze` — receives a photo as a base64 data URL, runs vision
//! extraction, builds reminders, and stores the resulting prescription.

use axum::extract::State;
use axum::Json;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;

use crate::api::endpoints::prescriptions::prescription_from_analysis;
use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::prescription::insert_prescription;
use crate::extraction;
use crate::models::enums::PrescriptionSource;
use crate::models::prescription::Prescription;

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    /// Base64 data URL (e.g., `data:image/jpeg;base64,/9j/...`)
    pub image: String,
}

/// `POST /api/analyze` — extract a prescription from a photo.
pub async fn analyze(
    State(ctx): State<ApiContext>,
    Json(payload): Json<AnalyzeRequest>,
) -> Result<Json<Prescription>, ApiError> {
    let image = decode_data_url(&payload.image)
        .map_err(|e| ApiError::BadRequest(format!("Invalid image data: {e}")))?;
    if image.is_empty() {
        return Err(ApiError::BadRequest("No image provided".into()));
    }

    // The vision client blocks on its HTTP call; keep it off the async workers.
    let vision = ctx.vision.clone();
    let analysis = tokio::task::spawn_blocking(move || {
        extraction::analyze_prescription_image(vision.as_ref(), &image)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("Analysis task failed: {e}")))??;

    let prescription =
        prescription_from_analysis(analysis, PrescriptionSource::ImageAnalysis, Utc::now());

    let conn = ctx.open_db()?;
    insert_prescription(&conn, &prescription)?;
    tracing::info!(
        id = %prescription.id,
        medications = prescription.medications.len(),
        reminders = prescription.reminders.len(),
        "Prescription analyzed and stored"
    );

    Ok(Json(prescription))
}

/// Decode a base64 data URL to raw bytes.
///
/// Handles both `data:image/jpeg;base64,...` and raw base64 strings.
fn decode_data_url(data_url: &str) -> Result<Vec<u8>, String> {
    let base64_data = match data_url.find(',') {
        Some(idx) => &data_url[idx + 1..],
        None => data_url,
    };

    base64::engine::general_purpose::STANDARD
        .decode(base64_data)
        .map_err(|e| format!("Base64 decode failed: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_data_url_jpeg() {
        let data = "data:image/jpeg;base64,/9j/4AAQ";
        let bytes = decode_data_url(data).unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(bytes[0], 0xFF); // JPEG magic byte
    }

    #[test]
    fn decode_data_url_raw_base64() {
        let raw = base64::engine::general_purpose::STANDARD.encode(b"hello");
        let bytes = decode_data_url(&raw).unwrap();
        assert_eq!(bytes, b"hello");
    }

    #[test]
    fn decode_data_url_invalid_base64() {
        let result = decode_data_url("not-valid-base64!!!");
        assert!(result.is_err());
    }
}
