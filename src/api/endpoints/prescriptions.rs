//! Prescription endpoints: sample creation, history, detail, dose tracking.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::adherence_log::append_taken_event;
use crate::db::repository::prescription::{
    get_prescription, insert_prescription, list_recent_prescriptions,
};
use crate::extraction::{sample_analysis, PrescriptionAnalysis};
use crate::models::enums::PrescriptionSource;
use crate::models::prescription::Prescription;
use crate::schedule::build_all;

/// History sidebar size.
const RECENT_LIMIT: u32 = 10;

/// Assemble a storable prescription from an analysis result.
pub(crate) fn prescription_from_analysis(
    analysis: PrescriptionAnalysis,
    source: PrescriptionSource,
    created_at: DateTime<Utc>,
) -> Prescription {
    let reminders = build_all(&analysis.medications, &analysis.raw_reminders);
    Prescription {
        id: Uuid::new_v4().to_string(),
        patient_name: analysis.patient_name,
        doctor: analysis.doctor,
        diagnosis: analysis.diagnosis,
        notes: analysis.notes,
        source,
        created_at,
        medications: analysis.medications,
        reminders,
    }
}

/// `POST /api/sample` — store the canned sample prescription.
///
/// Runs the same build-and-persist path as `/api/analyze`, minus the
/// vision call. Useful for demos and for clients without an API key.
pub async fn create_sample(
    State(ctx): State<ApiContext>,
) -> Result<Json<Prescription>, ApiError> {
    let prescription =
        prescription_from_analysis(sample_analysis(), PrescriptionSource::Sample, Utc::now());

    let conn = ctx.open_db()?;
    insert_prescription(&conn, &prescription)?;
    tracing::info!(id = %prescription.id, "Sample prescription stored");

    Ok(Json(prescription))
}

#[derive(Serialize)]
pub struct PrescriptionSummary {
    pub id: String,
    pub diagnosis: Option<String>,
    pub medicines: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct PrescriptionsResponse {
    pub prescriptions: Vec<PrescriptionSummary>,
}

/// `GET /api/prescriptions` — the ten most recent prescriptions, newest first.
pub async fn list(
    State(ctx): State<ApiContext>,
) -> Result<Json<PrescriptionsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let prescriptions = list_recent_prescriptions(&conn, RECENT_LIMIT)?
        .into_iter()
        .map(|p| PrescriptionSummary {
            medicines: p.medications.iter().map(|m| m.name.clone()).collect(),
            id: p.id,
            diagnosis: p.diagnosis,
            created_at: p.created_at,
        })
        .collect();

    Ok(Json(PrescriptionsResponse { prescriptions }))
}

/// `GET /api/prescriptions/:id` — full detail, 404 when unknown.
pub async fn detail(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<Prescription>, ApiError> {
    let conn = ctx.open_db()?;
    let prescription = get_prescription(&conn, &id)?;
    Ok(Json(prescription))
}

#[derive(Deserialize)]
pub struct TakenRequest {
    pub medicine: String,
    pub time: String,
}

#[derive(Serialize)]
pub struct TakenResponse {
    pub success: bool,
}

/// `POST /api/prescriptions/:id/taken` — record one taken dose.
///
/// `time` is stored exactly as sent; the adherence engine buckets by the
/// server-side `taken_at` timestamp, not by this label.
pub async fn mark_taken(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
    Json(payload): Json<TakenRequest>,
) -> Result<Json<TakenResponse>, ApiError> {
    let conn = ctx.open_db()?;
    // Unknown ids surface as 404, not as a foreign key violation.
    let prescription = get_prescription(&conn, &id)?;
    append_taken_event(
        &conn,
        &prescription.id,
        &payload.medicine,
        &payload.time,
        Utc::now(),
    )?;

    Ok(Json(TakenResponse { success: true }))
}
