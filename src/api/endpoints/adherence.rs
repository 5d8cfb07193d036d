//! Adherence endpoints: the raw dose log and the trailing 7-day summary.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::adherence_log::list_taken_events;
use crate::db::repository::prescription::get_prescription;
use crate::models::prescription::TakenEvent;
use crate::schedule::{compute_adherence, AdherenceSummary};

#[derive(Serialize)]
pub struct AdherenceEventsResponse {
    pub events: Vec<TakenEvent>,
}

/// `GET /api/prescriptions/:id/adherence` — raw taken-dose log in arrival order.
pub async fn events(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<AdherenceEventsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    // Unknown ids are a 404, not an empty log.
    get_prescription(&conn, &id)?;
    let events = list_taken_events(&conn, &id)?;

    Ok(Json(AdherenceEventsResponse { events }))
}

/// `GET /api/prescriptions/:id/adherence/summary` — 7-day adherence breakdown.
pub async fn summary(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<AdherenceSummary>, ApiError> {
    let conn = ctx.open_db()?;
    let prescription = get_prescription(&conn, &id)?;
    let events = list_taken_events(&conn, &id)?;

    let summary = compute_adherence(
        &prescription.reminders,
        prescription.created_at.date_naive(),
        &events,
        Utc::now().date_naive(),
    );

    Ok(Json(summary))
}
