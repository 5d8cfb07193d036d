//! Parses the vision model's free-text reply into a `PrescriptionAnalysis`.
//!
//! Models wrap JSON in markdown fences or chat around it, so the parser
//! strips fences and takes the widest `{..}` span before deserializing.
//! Array items are parsed leniently: a bad medication or reminder is
//! skipped, not fatal.

use serde::Deserialize;

use super::types::{AnalysisResponse, PrescriptionAnalysis, RawMedication, RawReminder};
use super::ExtractionError;
use crate::models::prescription::DoctorInfo;

/// Parse one full model reply.
pub fn parse_analysis_response(response: &str) -> Result<PrescriptionAnalysis, ExtractionError> {
    let json_str = extract_json_object(response)?;

    let parsed: AnalysisResponse = serde_json::from_str(&json_str)
        .map_err(|e| ExtractionError::JsonParsing(e.to_string()))?;

    let data = parsed.extracted_data;
    let reminders = parsed.explanation.and_then(|e| e.reminders);

    let (patient_name, doctor, diagnosis, notes, medications) = match data {
        Some(data) => (
            data.patient_info.and_then(|p| p.name),
            data.doctor_info.and_then(clean_doctor),
            data.diagnosis,
            data.additional_notes,
            parse_array_lenient::<RawMedication>(data.medications.as_deref()),
        ),
        None => (None, None, None, None, vec![]),
    };

    Ok(PrescriptionAnalysis {
        patient_name: non_blank(patient_name),
        doctor,
        diagnosis: non_blank(diagnosis),
        notes: non_blank(notes),
        medications: medications.into_iter().map(RawMedication::into_record).collect(),
        raw_reminders: parse_array_lenient::<RawReminder>(reminders.as_deref()),
    })
}

/// Blank-strip each prescriber field; an all-blank block collapses to `None`.
fn clean_doctor(doctor: DoctorInfo) -> Option<DoctorInfo> {
    let doctor = DoctorInfo {
        name: non_blank(doctor.name),
        clinic: non_blank(doctor.clinic),
        specialization: non_blank(doctor.specialization),
    };
    if doctor.name.is_none() && doctor.clinic.is_none() && doctor.specialization.is_none() {
        return None;
    }
    Some(doctor)
}

/// Strip markdown fences and cut the widest `{..}` span.
fn extract_json_object(response: &str) -> Result<String, ExtractionError> {
    let cleaned = response.replace("```json", "").replace("```", "");
    let start = cleaned.find('{');
    let end = cleaned.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(cleaned[start..=end].to_string()),
        _ => Err(ExtractionError::MalformedResponse(
            "no JSON object in model reply".into(),
        )),
    }
}

/// Parse an array leniently — skip items that fail to deserialize.
fn parse_array_lenient<T: for<'de> Deserialize<'de>>(
    items: Option<&[serde_json::Value]>,
) -> Vec<T> {
    match items {
        None => vec![],
        Some(arr) => arr
            .iter()
            .filter_map(|v| serde_json::from_value(v.clone()).ok())
            .collect(),
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
