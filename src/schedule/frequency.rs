//! Frequency normalization: free-text frequency and instruction fields
//! become a tagged `DoseFrequency`, concrete clock times, and a food flag.
//!
//! Matching is deliberately a small ordered rule set, not an NLP system.
//! Anything unrecognized degrades to once-daily rather than erroring, because
//! upstream extraction quality is inherently unreliable.

use chrono::NaiveTime;

use crate::models::enums::DoseFrequency;
use crate::models::prescription::default_dose_time;

/// Normalizer output: the frequency tag, its clock times, and food timing.
#[derive(Debug, Clone, PartialEq)]
pub struct DosePlan {
    pub frequency: DoseFrequency,
    pub times: Vec<NaiveTime>,
    pub with_food: bool,
}

fn hm(hours: u32, minutes: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hours, minutes, 0).expect("valid clock time")
}

/// Normalize a medication's frequency and instruction text.
/// Never fails: the times list is always non-empty.
pub fn normalize(frequency: Option<&str>, instructions: Option<&str>) -> DosePlan {
    let (tag, times) = dose_times(frequency);
    DosePlan {
        frequency: tag,
        times,
        with_food: wants_food(instructions),
    }
}

/// Map frequency text to a tag and its canonical times.
/// "twice" → 08:00/20:00, "three" → 08:00/14:00/20:00, anything else → 08:00.
pub fn dose_times(frequency: Option<&str>) -> (DoseFrequency, Vec<NaiveTime>) {
    let lower = frequency.unwrap_or("").to_lowercase();
    if lower.contains("twice") {
        (DoseFrequency::TwiceDaily, vec![hm(8, 0), hm(20, 0)])
    } else if lower.contains("three") {
        (
            DoseFrequency::ThreeTimesDaily,
            vec![hm(8, 0), hm(14, 0), hm(20, 0)],
        )
    } else {
        (DoseFrequency::OnceDaily, vec![default_dose_time()])
    }
}

/// True iff the instructions mention food, case-insensitively.
pub fn wants_food(instructions: Option<&str>) -> bool {
    instructions
        .map(|text| text.to_lowercase().contains("food"))
        .unwrap_or(false)
}

/// Resolve one provider-supplied time token. Named slots map to fixed clock
/// times; `HH:MM` parses as given; anything else is unusable.
pub fn parse_time_token(token: &str) -> Option<NaiveTime> {
    match token.trim().to_lowercase().as_str() {
        "morning" => Some(hm(8, 0)),
        "afternoon" => Some(hm(14, 0)),
        "evening" => Some(hm(18, 0)),
        "night" => Some(hm(20, 0)),
        other => NaiveTime::parse_from_str(other, "%H:%M").ok(),
    }
}

/// Normalize a provider-supplied time list: resolve each token (unusable
/// tokens fall back to the default dose time), sort ascending, deduplicate,
/// and substitute the default when nothing remains.
pub fn normalize_time_list(tokens: &[String]) -> Vec<NaiveTime> {
    let mut times: Vec<NaiveTime> = tokens
        .iter()
        .map(|token| parse_time_token(token).unwrap_or_else(default_dose_time))
        .collect();
    times.sort_unstable();
    times.dedup();
    if times.is_empty() {
        times.push(default_dose_time());
    }
    times
}
