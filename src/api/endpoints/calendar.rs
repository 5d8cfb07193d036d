//! Calendar export: JSON event list and downloadable ICS document.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::prescription::get_prescription;
use crate::schedule::calendar::CALENDAR_FILENAME;
use crate::schedule::{materialize_range, to_event_list, to_ics, CalendarEvent};

/// Upper bound on the exported range. Course durations come from free text
/// and can be absurd; the export stops at one year.
const EXPORT_HORIZON_DAYS: u32 = 366;

#[derive(Serialize)]
pub struct CalendarEventsResponse {
    pub events: Vec<CalendarEvent>,
}

/// `GET /api/prescriptions/:id/calendar` — the full schedule as JSON events.
pub async fn events(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<CalendarEventsResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let prescription = get_prescription(&conn, &id)?;

    let occurrences = materialize_range(
        &prescription.reminders,
        prescription.created_at.date_naive(),
        EXPORT_HORIZON_DAYS,
    );
    let events = to_event_list(&prescription.reminders, &occurrences);

    Ok(Json(CalendarEventsResponse { events }))
}

/// `GET /api/prescriptions/:id/calendar.ics` — ICS download.
pub async fn ics(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let conn = ctx.open_db()?;
    let prescription = get_prescription(&conn, &id)?;

    if prescription.reminders.is_empty() {
        return Err(ApiError::BadRequest(
            "No reminders available for calendar".into(),
        ));
    }

    let occurrences = materialize_range(
        &prescription.reminders,
        prescription.created_at.date_naive(),
        EXPORT_HORIZON_DAYS,
    );
    let document = to_ics(
        &prescription.id,
        &prescription.reminders,
        &occurrences,
        Utc::now(),
    );

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/calendar; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{CALENDAR_FILENAME}\""),
            ),
        ],
        document,
    )
        .into_response())
}
