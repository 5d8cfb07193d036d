//! Schedule materialization: expands reminders into concrete dated dose
//! occurrences, ordered by (reminder input order, day offset, time-of-day).
//!
//! Pure derivation — occurrences are recomputed on demand, never stored.

use chrono::{Days, NaiveDate, NaiveTime};

use crate::models::prescription::Reminder;

/// One concrete dated dose instance. The index fields identify the source
/// (reminder, time slot, course day) and stay stable across regeneration,
/// which is what keeps calendar UIDs reproducible.
#[derive(Debug, Clone, PartialEq)]
pub struct Occurrence {
    pub medicine: String,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub reminder_index: usize,
    pub time_index: usize,
    pub day_index: u32,
}

/// Expand reminders over `[start_date, start_date + range_days)`.
///
/// Each reminder contributes `min(duration_days, range_days)` days of
/// occurrences. A zero duration or zero range yields none.
pub fn materialize_range(
    reminders: &[Reminder],
    start_date: NaiveDate,
    range_days: u32,
) -> Vec<Occurrence> {
    let mut occurrences = Vec::new();
    for (reminder_index, reminder) in reminders.iter().enumerate() {
        let days = reminder.duration_days.min(range_days);
        for day_index in 0..days {
            let Some(date) = start_date.checked_add_days(Days::new(u64::from(day_index))) else {
                break;
            };
            for (time_index, &time) in reminder.times.iter().enumerate() {
                occurrences.push(Occurrence {
                    medicine: reminder.medicine.clone(),
                    date,
                    time,
                    reminder_index,
                    time_index,
                    day_index,
                });
            }
        }
    }
    occurrences
}

/// The live-display view: every reminder's doses for a single day.
pub fn today_view(reminders: &[Reminder], today: NaiveDate) -> Vec<Occurrence> {
    materialize_range(reminders, today, 1)
}
