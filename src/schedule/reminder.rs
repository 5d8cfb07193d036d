//! Reminder construction: a medication record (or a provider-suggested raw
//! reminder) plus normalizer output becomes a displayable `Reminder`.
//!
//! Deterministic: identical input always yields the identical reminder.

use regex::Regex;

use crate::extraction::types::RawReminder;
use crate::models::enums::DoseFrequency;
use crate::models::prescription::{MedicationRecord, Reminder, DEFAULT_DURATION_DAYS};
use crate::schedule::frequency;

/// Placeholder medicine name when the extraction left it blank.
const FALLBACK_MEDICINE: &str = "Medication";

/// Extract the first run of digits from a duration text.
/// Missing or unparseable input falls back to 7 days; the result is ≥ 1.
pub fn parse_duration_days(duration: Option<&str>) -> u32 {
    let digits = Regex::new(r"\d+").unwrap();
    duration
        .and_then(|text| digits.find(text))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(|days| days.max(1))
        .unwrap_or(DEFAULT_DURATION_DAYS)
}

fn display_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        FALLBACK_MEDICINE.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Build a reminder from an extracted medication record.
pub fn from_record(record: &MedicationRecord) -> Reminder {
    let plan = frequency::normalize(record.frequency.as_deref(), record.instructions.as_deref());
    Reminder {
        medicine: display_name(&record.name),
        times: plan.times,
        frequency: plan.frequency,
        with_food: plan.with_food,
        duration_days: parse_duration_days(record.duration.as_deref()),
    }
}

/// Build a reminder from a provider-suggested raw reminder. The provider's
/// explicit time list and food flag win over text sniffing; times that fail
/// to resolve fall back to the default dose time.
pub fn from_raw(raw: &RawReminder) -> Reminder {
    let times = frequency::normalize_time_list(&raw.times);
    Reminder {
        medicine: display_name(raw.medicine.as_deref().unwrap_or("")),
        times,
        frequency: DoseFrequency::Custom,
        with_food: raw.with_food.unwrap_or(false),
        duration_days: parse_duration_days(raw.duration.as_deref()),
    }
}

/// Build the reminder list for a prescription: provider-suggested reminders
/// are preferred when present, otherwise each medication record gets one.
pub fn build_all(records: &[MedicationRecord], raw: &[RawReminder]) -> Vec<Reminder> {
    if raw.is_empty() {
        records.iter().map(from_record).collect()
    } else {
        raw.iter().map(from_raw).collect()
    }
}
