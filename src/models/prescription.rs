use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{DoseFrequency, PrescriptionSource};

/// Fallback course length when no day count can be read from the duration text.
pub const DEFAULT_DURATION_DAYS: u32 = 7;

/// Fallback dose time substituted whenever normalization yields no usable time.
pub fn default_dose_time() -> NaiveTime {
    NaiveTime::from_hms_opt(8, 0, 0).expect("valid clock time")
}

/// Prescriber block as printed on the letterhead. Scans crop or blur the
/// header routinely, so every part is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorInfo {
    pub name: Option<String>,
    pub clinic: Option<String>,
    pub specialization: Option<String>,
}

/// One medication as extracted from a prescription. Every field except the
/// name arrives as free text from the vision provider and may be absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicationRecord {
    pub name: String,
    pub dosage: Option<String>,
    pub frequency: Option<String>,
    pub duration: Option<String>,
    pub instructions: Option<String>,
}

/// Normalized per-medicine dosing rule. `times` is ascending, deduplicated,
/// and never empty; `duration_days` is always at least 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub medicine: String,
    #[serde(with = "hhmm_times")]
    pub times: Vec<NaiveTime>,
    pub frequency: DoseFrequency,
    pub with_food: bool,
    pub duration_days: u32,
}

impl Reminder {
    /// Render the dose times as a comma-joined `HH:MM` list for storage.
    pub fn times_csv(&self) -> String {
        self.times
            .iter()
            .map(|t| t.format("%H:%M").to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Parse a stored `HH:MM` list. Malformed entries are skipped; an empty
    /// result substitutes the default dose time so the invariant holds on
    /// read-back.
    pub fn times_from_csv(csv: &str) -> Vec<NaiveTime> {
        let mut times: Vec<NaiveTime> = csv
            .split(',')
            .filter_map(|t| NaiveTime::parse_from_str(t.trim(), "%H:%M").ok())
            .collect();
        times.sort_unstable();
        times.dedup();
        if times.is_empty() {
            times.push(default_dose_time());
        }
        times
    }
}

/// Immutable log entry recording that a dose was marked taken.
/// `scheduled_time` is stored exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TakenEvent {
    pub id: i64,
    pub prescription_id: String,
    pub medicine: String,
    pub scheduled_time: String,
    pub taken_at: DateTime<Utc>,
}

/// Persisted prescription aggregate: the analysis output plus the reminders
/// derived from it. Immutable once stored; re-analysis creates a new one.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prescription {
    pub id: String,
    pub patient_name: Option<String>,
    pub doctor: Option<DoctorInfo>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub source: PrescriptionSource,
    pub created_at: DateTime<Utc>,
    pub medications: Vec<MedicationRecord>,
    pub reminders: Vec<Reminder>,
}

/// Serde adapter for dose-time lists: `["08:00", "20:00"]` on the wire.
/// Unparseable entries are dropped on deserialization.
pub mod hhmm_times {
    use chrono::NaiveTime;
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(times: &[NaiveTime], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(times.len()))?;
        for time in times {
            seq.serialize_element(&time.format("%H:%M").to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Vec::<String>::deserialize(deserializer)?;
        Ok(raw
            .iter()
            .filter_map(|t| NaiveTime::parse_from_str(t.trim(), "%H:%M").ok())
            .collect())
    }
}
