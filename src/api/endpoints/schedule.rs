//! Today's dose schedule for live display.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::db::repository::prescription::get_prescription;
use crate::schedule::today_view;

#[derive(Serialize)]
pub struct TodayDose {
    pub medicine: String,
    /// `HH:MM`
    pub time: String,
    pub with_food: bool,
}

#[derive(Serialize)]
pub struct TodayScheduleResponse {
    pub date: NaiveDate,
    pub doses: Vec<TodayDose>,
}

/// `GET /api/prescriptions/:id/schedule/today` — every dose due today,
/// ordered by reminder then time.
pub async fn today(
    State(ctx): State<ApiContext>,
    Path(id): Path<String>,
) -> Result<Json<TodayScheduleResponse>, ApiError> {
    let conn = ctx.open_db()?;
    let prescription = get_prescription(&conn, &id)?;

    let today = Utc::now().date_naive();
    let doses = today_view(&prescription.reminders, today)
        .into_iter()
        .map(|o| {
            let with_food = prescription
                .reminders
                .get(o.reminder_index)
                .map(|r| r.with_food)
                .unwrap_or(false);
            TodayDose {
                medicine: o.medicine,
                time: o.time.format("%H:%M").to_string(),
                with_food,
            }
        })
        .collect();

    Ok(Json(TodayScheduleResponse { date: today, doses }))
}
