//! Wire types for the vision provider's analysis JSON.
//!
//! The provider returns camelCase keys; everything is optional because
//! extraction quality varies with image quality. Unusable pieces are
//! dropped or defaulted downstream, never surfaced as errors.

use serde::Deserialize;

use crate::models::prescription::{DoctorInfo, MedicationRecord};

/// Top-level analysis document. Arrays stay as raw values here so that
/// one malformed item cannot sink the whole response.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisResponse {
    #[serde(rename = "extractedData")]
    pub extracted_data: Option<ExtractedData>,
    pub explanation: Option<Explanation>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedData {
    #[serde(rename = "doctorInfo")]
    pub doctor_info: Option<DoctorInfo>,
    #[serde(rename = "patientInfo")]
    pub patient_info: Option<PatientInfo>,
    pub diagnosis: Option<String>,
    pub medications: Option<Vec<serde_json::Value>>,
    #[serde(rename = "additionalNotes")]
    pub additional_notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatientInfo {
    pub name: Option<String>,
    pub age: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Explanation {
    pub reminders: Option<Vec<serde_json::Value>>,
}

/// One medication as the provider saw it on the image.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMedication {
    pub name: Option<String>,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
}

impl RawMedication {
    pub fn into_record(self) -> MedicationRecord {
        MedicationRecord {
            name: self.name.unwrap_or_default(),
            dosage: self.dosage,
            frequency: self.frequency,
            duration: self.duration,
            instructions: self.instructions,
        }
    }
}

/// A dosing suggestion the provider derived itself. When present these win
/// over re-deriving times from the medication text.
#[derive(Debug, Clone, Deserialize)]
pub struct RawReminder {
    pub medicine: Option<String>,
    #[serde(default)]
    pub times: Vec<String>,
    #[serde(rename = "withFood")]
    pub with_food: Option<bool>,
    pub duration: Option<String>,
}

/// Provider-independent result of one analysis, ready for reminder
/// building and persistence.
#[derive(Debug, Clone)]
pub struct PrescriptionAnalysis {
    pub patient_name: Option<String>,
    pub doctor: Option<DoctorInfo>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub medications: Vec<MedicationRecord>,
    pub raw_reminders: Vec<RawReminder>,
}
