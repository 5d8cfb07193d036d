//! Canned analysis used by the demo endpoint, so the full pipeline can be
//! exercised without an API key or a prescription photo.

use super::types::{PrescriptionAnalysis, RawReminder};
use crate::models::prescription::{DoctorInfo, MedicationRecord};

/// A realistic three-medication prescription for an upper respiratory
/// infection, shaped exactly like a real provider analysis.
pub fn sample_analysis() -> PrescriptionAnalysis {
    PrescriptionAnalysis {
        patient_name: Some("John Smith".into()),
        doctor: Some(DoctorInfo {
            name: Some("Dr. Sarah Johnson, MD".into()),
            clinic: Some("City Medical Center".into()),
            specialization: Some("General Practice".into()),
        }),
        diagnosis: Some("Upper Respiratory Tract Infection with Acute Bronchitis".into()),
        notes: Some("Rest well, increase fluid intake, return if symptoms worsen".into()),
        medications: vec![
            MedicationRecord {
                name: "Paracetamol".into(),
                dosage: Some("500mg".into()),
                frequency: Some("Twice daily".into()),
                duration: Some("5 days".into()),
                instructions: Some("Take with food".into()),
            },
            MedicationRecord {
                name: "Ibuprofen".into(),
                dosage: Some("400mg".into()),
                frequency: Some("Twice daily".into()),
                duration: Some("3 days".into()),
                instructions: Some("Take after meals".into()),
            },
            MedicationRecord {
                name: "Oral Rehydration Solutions (ORS)".into(),
                dosage: Some("1 sachet".into()),
                frequency: Some("Twice daily".into()),
                duration: Some("3 days".into()),
                instructions: Some("Mix with water".into()),
            },
        ],
        raw_reminders: vec![
            RawReminder {
                medicine: Some("Paracetamol".into()),
                times: vec!["08:00".into(), "20:00".into()],
                with_food: Some(true),
                duration: Some("5".into()),
            },
            RawReminder {
                medicine: Some("Ibuprofen".into()),
                times: vec!["09:00".into(), "21:00".into()],
                with_food: Some(true),
                duration: Some("3".into()),
            },
            RawReminder {
                medicine: Some("Oral Rehydration Solutions (ORS)".into()),
                times: vec!["10:00".into(), "18:00".into()],
                with_food: Some(false),
                duration: Some("3".into()),
            },
        ],
    }
}
