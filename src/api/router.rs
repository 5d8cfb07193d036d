//! HTTP API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`; all routes are CORS-permissive.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::types::ApiContext;

/// Build the API router.
///
/// Endpoint handlers use `State<ApiContext>` (provided via `with_state`).
///
/// NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
pub fn api_router(ctx: ApiContext) -> Router {
    let api = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/analyze", post(endpoints::analyze::analyze))
        .route("/sample", post(endpoints::prescriptions::create_sample))
        .route("/prescriptions", get(endpoints::prescriptions::list))
        .route("/prescriptions/:id", get(endpoints::prescriptions::detail))
        .route(
            "/prescriptions/:id/taken",
            post(endpoints::prescriptions::mark_taken),
        )
        .route(
            "/prescriptions/:id/adherence",
            get(endpoints::adherence::events),
        )
        .route(
            "/prescriptions/:id/adherence/summary",
            get(endpoints::adherence::summary),
        )
        .route(
            "/prescriptions/:id/schedule/today",
            get(endpoints::schedule::today),
        )
        .route(
            "/prescriptions/:id/calendar",
            get(endpoints::calendar::events),
        )
        .route(
            "/prescriptions/:id/calendar.ics",
            get(endpoints::calendar::ics),
        )
        .with_state(ctx);

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use base64::Engine;
    use chrono::{NaiveTime, TimeZone, Utc};
    use tower::ServiceExt;

    use crate::db::repository::prescription::insert_prescription;
    use crate::extraction::MockVisionClient;
    use crate::models::enums::{DoseFrequency, PrescriptionSource};
    use crate::models::prescription::{Prescription, Reminder};

    const MOCK_REPLY: &str = r#"```json
{
  "extractedData": {
    "patientInfo": { "name": "Jane Roe", "age": "34" },
    "doctorInfo": { "name": "Dr. R. Mehta", "clinic": "Harborview Neurology", "specialization": "Neurology" },
    "diagnosis": "Migraine",
    "medications": [
      {
        "name": "Sumatriptan",
        "dosage": "50mg",
        "frequency": "Once daily",
        "duration": "3 days",
        "instructions": "Take at onset"
      }
    ],
    "additionalNotes": "Avoid bright light"
  },
  "explanation": {
    "reminders": [
      { "medicine": "Sumatriptan", "times": ["07:30"], "withFood": false, "duration": "3" }
    ]
  }
}
```"#;

    fn test_app(dir: &tempfile::TempDir) -> Router {
        let ctx = ApiContext::new(
            dir.path().join("remedi.db"),
            Arc::new(MockVisionClient::new(MOCK_REPLY)),
        );
        api_router(ctx)
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn post_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn post_empty(uri: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn response_json(response: axum::http::Response<axum::body::Body>) -> serde_json::Value {
        let body = axum::body::to_bytes(response.into_body(), 65536)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    /// Store the sample prescription and return its id.
    async fn seed_sample(app: Router) -> String {
        let response = app.oneshot(post_empty("/api/sample")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        json["id"].as_str().unwrap().to_string()
    }

    /// A bare prescription for direct-store tests that need control over
    /// `created_at` or the reminder set.
    fn stored_prescription(id: &str) -> Prescription {
        Prescription {
            id: id.into(),
            patient_name: None,
            doctor: None,
            diagnosis: Some("Migraine".into()),
            notes: None,
            source: PrescriptionSource::ImageAnalysis,
            created_at: Utc::now(),
            medications: vec![],
            reminders: vec![],
        }
    }

    fn once_daily(medicine: &str, hour: u32, minute: u32, duration_days: u32) -> Reminder {
        Reminder {
            medicine: medicine.into(),
            times: vec![NaiveTime::from_hms_opt(hour, minute, 0).unwrap()],
            frequency: DoseFrequency::OnceDaily,
            with_food: false,
            duration_days,
        }
    }

    /// Write a prescription straight to the store, bypassing the analysis path.
    fn store(dir: &tempfile::TempDir, prescription: &Prescription) {
        let conn = crate::db::open_database(&dir.path().join("remedi.db")).unwrap();
        insert_prescription(&conn, prescription).unwrap();
    }

    #[tokio::test]
    async fn health_response_shape() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app.oneshot(get_request("/api/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["status"], "ok");
        assert!(!json["version"].as_str().unwrap().is_empty());
        assert!(json["vision_configured"].is_boolean());
        assert!(json["timestamp"].is_string());
    }

    #[tokio::test]
    async fn not_found_for_unknown_route() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app.oneshot(get_request("/api/nonexistent")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn sample_creates_full_prescription() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app.oneshot(post_empty("/api/sample")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert!(!json["id"].as_str().unwrap().is_empty());
        assert_eq!(json["source"], "Sample");
        assert_eq!(json["patient_name"], "John Smith");
        assert_eq!(json["doctor"]["clinic"], "City Medical Center");
        assert_eq!(json["medications"].as_array().unwrap().len(), 3);
        assert_eq!(json["reminders"].as_array().unwrap().len(), 3);
        assert_eq!(json["reminders"][0]["times"][0], "08:00");
    }

    #[tokio::test]
    async fn prescription_list_is_newest_first() {
        let tmp = tempfile::tempdir().unwrap();
        let first = seed_sample(test_app(&tmp)).await;
        let second = seed_sample(test_app(&tmp)).await;

        let app = test_app(&tmp);
        let response = app.oneshot(get_request("/api/prescriptions")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        let prescriptions = json["prescriptions"].as_array().unwrap();
        assert_eq!(prescriptions.len(), 2);
        assert_eq!(prescriptions[0]["id"], second.as_str());
        assert_eq!(prescriptions[1]["id"], first.as_str());
        assert_eq!(prescriptions[0]["medicines"].as_array().unwrap().len(), 3);
        assert!(prescriptions[0]["created_at"].is_string());
    }

    #[tokio::test]
    async fn prescription_detail_round_trips() {
        let tmp = tempfile::tempdir().unwrap();
        let id = seed_sample(test_app(&tmp)).await;

        let app = test_app(&tmp);
        let response = app
            .oneshot(get_request(&format!("/api/prescriptions/{id}")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["id"], id.as_str());
        assert_eq!(
            json["diagnosis"],
            "Upper Respiratory Tract Infection with Acute Bronchitis"
        );
        assert_eq!(json["reminders"][1]["medicine"], "Ibuprofen");
        assert_eq!(
            json["reminders"][1]["times"],
            serde_json::json!(["09:00", "21:00"])
        );
    }

    #[tokio::test]
    async fn unknown_prescription_returns_404() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app
            .oneshot(get_request("/api/prescriptions/no-such-id"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn taken_appends_to_adherence_log() {
        let tmp = tempfile::tempdir().unwrap();
        let id = seed_sample(test_app(&tmp)).await;

        let response = test_app(&tmp)
            .oneshot(post_request(
                &format!("/api/prescriptions/{id}/taken"),
                r#"{"medicine":"Paracetamol","time":"08:00"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = response_json(response).await;
        assert_eq!(json["success"], true);

        let response = test_app(&tmp)
            .oneshot(get_request(&format!("/api/prescriptions/{id}/adherence")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        let events = json["events"].as_array().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["medicine"], "Paracetamol");
        assert_eq!(events[0]["scheduled_time"], "08:00");
    }

    #[tokio::test]
    async fn taken_for_unknown_prescription_returns_404() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app
            .oneshot(post_request(
                "/api/prescriptions/no-such-id/taken",
                r#"{"medicine":"Paracetamol","time":"08:00"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn adherence_summary_counts_today() {
        let tmp = tempfile::tempdir().unwrap();
        let id = seed_sample(test_app(&tmp)).await;

        for _ in 0..2 {
            let response = test_app(&tmp)
                .oneshot(post_request(
                    &format!("/api/prescriptions/{id}/taken"),
                    r#"{"medicine":"Paracetamol","time":"08:00"}"#,
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = test_app(&tmp)
            .oneshot(get_request(&format!(
                "/api/prescriptions/{id}/adherence/summary"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Created today: only today's bucket is valid. The sample carries
        // three twice-daily reminders, so six doses are expected per day.
        let json = response_json(response).await;
        assert_eq!(json["days"].as_array().unwrap().len(), 7);
        assert_eq!(json["daily_expected"], 6);
        assert_eq!(json["total_expected"], 6);
        assert_eq!(json["total_taken"], 2);
        assert_eq!(json["rate"], 33);
    }

    #[tokio::test]
    async fn schedule_today_lists_every_dose() {
        let tmp = tempfile::tempdir().unwrap();
        let id = seed_sample(test_app(&tmp)).await;

        let response = test_app(&tmp)
            .oneshot(get_request(&format!(
                "/api/prescriptions/{id}/schedule/today"
            )))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert!(json["date"].is_string());
        let doses = json["doses"].as_array().unwrap();
        assert_eq!(doses.len(), 6);
        assert_eq!(doses[0]["medicine"], "Paracetamol");
        assert_eq!(doses[0]["time"], "08:00");
        assert_eq!(doses[0]["with_food"], true);
        assert_eq!(doses[4]["medicine"], "Oral Rehydration Solutions (ORS)");
    }

    #[tokio::test]
    async fn calendar_events_cover_the_whole_course() {
        let tmp = tempfile::tempdir().unwrap();
        let id = seed_sample(test_app(&tmp)).await;

        let response = test_app(&tmp)
            .oneshot(get_request(&format!("/api/prescriptions/{id}/calendar")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Paracetamol 2x5 + Ibuprofen 2x3 + ORS 2x3 = 22 events.
        let json = response_json(response).await;
        let events = json["events"].as_array().unwrap();
        assert_eq!(events.len(), 22);
        assert_eq!(events[0]["title"], "Take Paracetamol");
        assert!(events[0]["description"]
            .as_str()
            .unwrap()
            .contains("Day 1 of 5"));
    }

    #[tokio::test]
    async fn calendar_ics_downloads_with_headers() {
        let tmp = tempfile::tempdir().unwrap();
        let id = seed_sample(test_app(&tmp)).await;

        let response = test_app(&tmp)
            .oneshot(get_request(&format!("/api/prescriptions/{id}/calendar.ics")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "text/calendar; charset=utf-8"
        );
        assert_eq!(
            response.headers().get("Content-Disposition").unwrap(),
            "attachment; filename=\"remedi-medication-schedule.ics\""
        );

        let body = axum::body::to_bytes(response.into_body(), 65536)
            .await
            .unwrap();
        let document = String::from_utf8(body.to_vec()).unwrap();
        assert!(document.starts_with("BEGIN:VCALENDAR\r\n"));
        assert_eq!(document.matches("BEGIN:VEVENT").count(), 22);
        assert!(document.contains("SUMMARY:Take Paracetamol"));
    }

    #[tokio::test]
    async fn calendar_ics_unknown_prescription_returns_404() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app
            .oneshot(get_request("/api/prescriptions/no-such-id/calendar.ics"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn calendar_ics_without_reminders_returns_400() {
        let tmp = tempfile::tempdir().unwrap();
        // An illegible scan can persist with no medications and no reminders.
        store(&tmp, &stored_prescription("rx-empty"));

        let response = test_app(&tmp)
            .oneshot(get_request("/api/prescriptions/rx-empty/calendar.ics"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
        assert_eq!(
            json["error"]["message"],
            "No reminders available for calendar"
        );
    }

    #[tokio::test]
    async fn calendar_dates_anchor_at_the_creation_day() {
        let tmp = tempfile::tempdir().unwrap();
        let mut prescription = stored_prescription("rx-backdated");
        prescription.created_at = Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap();
        prescription.reminders = vec![once_daily("Sumatriptan", 7, 30, 3)];
        store(&tmp, &prescription);

        let response = test_app(&tmp)
            .oneshot(get_request("/api/prescriptions/rx-backdated/calendar"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Dates derive from the prescription's creation day, not from the
        // day the export is requested.
        let json = response_json(response).await;
        let events = json["events"].as_array().unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["start"], "2026-03-02T07:30:00");
        assert_eq!(events[2]["start"], "2026-03-04T07:30:00");
    }

    #[tokio::test]
    async fn calendar_export_stops_at_one_year() {
        let tmp = tempfile::tempdir().unwrap();
        let mut prescription = stored_prescription("rx-runaway");
        // Duration as misread from the free text on a scan.
        prescription.reminders = vec![once_daily("Levothyroxine", 8, 0, 1_000_000)];
        store(&tmp, &prescription);

        let response = test_app(&tmp)
            .oneshot(get_request("/api/prescriptions/rx-runaway/calendar"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4 << 20)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["events"].as_array().unwrap().len(), 366);

        let response = test_app(&tmp)
            .oneshot(get_request("/api/prescriptions/rx-runaway/calendar.ics"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 4 << 20)
            .await
            .unwrap();
        let document = String::from_utf8(body.to_vec()).unwrap();
        assert_eq!(document.matches("BEGIN:VEVENT").count(), 366);
    }

    #[tokio::test]
    async fn analyze_runs_extraction_and_stores() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let image = base64::engine::general_purpose::STANDARD.encode([0xFF, 0xD8, 0xFF, 0xD9]);
        let body = format!(r#"{{"image":"data:image/jpeg;base64,{image}"}}"#);
        let response = app
            .oneshot(post_request("/api/analyze", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = response_json(response).await;
        assert_eq!(json["source"], "ImageAnalysis");
        assert_eq!(json["patient_name"], "Jane Roe");
        assert_eq!(json["doctor"]["name"], "Dr. R. Mehta");
        assert_eq!(json["diagnosis"], "Migraine");
        assert_eq!(json["notes"], "Avoid bright light");
        assert_eq!(json["medications"].as_array().unwrap().len(), 1);
        assert_eq!(json["reminders"][0]["times"], serde_json::json!(["07:30"]));
        assert_eq!(json["reminders"][0]["with_food"], false);

        // The stored prescription is immediately listable.
        let response = test_app(&tmp)
            .oneshot(get_request("/api/prescriptions"))
            .await
            .unwrap();
        let json = response_json(response).await;
        assert_eq!(json["prescriptions"].as_array().unwrap().len(), 1);
        assert_eq!(json["prescriptions"][0]["medicines"][0], "Sumatriptan");
    }

    #[tokio::test]
    async fn analyze_rejects_undecodable_image() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app
            .oneshot(post_request(
                "/api/analyze",
                r#"{"image":"data:image/jpeg;base64,!!!not-base64!!!"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn analyze_with_empty_image_returns_400() {
        let tmp = tempfile::tempdir().unwrap();
        let app = test_app(&tmp);

        let response = app
            .oneshot(post_request(
                "/api/analyze",
                r#"{"image":"data:image/jpeg;base64,"}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = response_json(response).await;
        assert_eq!(json["error"]["message"], "No image provided");
    }
}
