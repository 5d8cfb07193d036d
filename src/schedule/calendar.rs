//! Calendar serializer: renders materialized occurrences as an iCalendar
//! document (RFC 5545) and as a plain JSON event list.
//!
//! UIDs are derived from the (prescription, reminder, time, day) index tuple,
//! so regenerating the document for unchanged input is byte-identical and a
//! re-imported file replaces rather than duplicates events.

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::prescription::Reminder;
use crate::schedule::materialize::Occurrence;

pub const PRODID: &str = "-//Remedi//Medication Reminders//EN";
pub const UID_DOMAIN: &str = "remedi.app";
pub const CALENDAR_FILENAME: &str = "remedi-medication-schedule.ics";

const SLOT_MINUTES: i64 = 15;

/// One entry of the JSON event-list variant. Start is a floating local
/// instant, matching the DTSTART values in the iCalendar document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: NaiveDateTime,
    pub description: String,
}

/// Render the full iCalendar document for one prescription.
///
/// `generated_at` feeds DTSTAMP only; event times are floating local times
/// with no zone designator, so doses land at the patient's wall-clock hour
/// wherever the calendar is imported.
pub fn to_ics(
    prescription_id: &str,
    reminders: &[Reminder],
    occurrences: &[Occurrence],
    generated_at: DateTime<Utc>,
) -> String {
    let stamp = generated_at.format("%Y%m%dT%H%M%SZ").to_string();

    let mut ics = String::new();
    ics.push_str("BEGIN:VCALENDAR\r\n");
    ics.push_str("VERSION:2.0\r\n");
    ics.push_str(&format!("PRODID:{PRODID}\r\n"));
    ics.push_str("CALSCALE:GREGORIAN\r\n");

    for occurrence in occurrences {
        let Some(reminder) = reminders.get(occurrence.reminder_index) else {
            continue;
        };
        let start = occurrence.date.and_time(occurrence.time);
        let end = start
            .checked_add_signed(Duration::minutes(SLOT_MINUTES))
            .unwrap_or(start);
        let medicine = escape_text(&occurrence.medicine);
        let food = if reminder.with_food { "Yes" } else { "No" };
        let day = occurrence.day_index + 1;

        ics.push_str("BEGIN:VEVENT\r\n");
        ics.push_str(&format!(
            "UID:{prescription_id}-{}-{}-{}@{UID_DOMAIN}\r\n",
            occurrence.reminder_index, occurrence.time_index, occurrence.day_index
        ));
        ics.push_str(&format!("DTSTAMP:{stamp}\r\n"));
        ics.push_str(&format!("DTSTART:{}\r\n", format_local(start)));
        ics.push_str(&format!("DTEND:{}\r\n", format_local(end)));
        ics.push_str(&format!("SUMMARY:Take {medicine}\r\n"));
        ics.push_str(&format!(
            "DESCRIPTION:Medication: {medicine}\\nDosage: Take as prescribed\\nWith food: {food}\\nDay {day} of {}\r\n",
            reminder.duration_days
        ));
        ics.push_str("LOCATION:Home\r\n");
        ics.push_str("STATUS:CONFIRMED\r\n");
        ics.push_str("TRANSP:OPAQUE\r\n");
        ics.push_str("BEGIN:VALARM\r\n");
        ics.push_str("TRIGGER:-PT15M\r\n");
        ics.push_str("ACTION:DISPLAY\r\n");
        ics.push_str(&format!("DESCRIPTION:Time to take {medicine}\r\n"));
        ics.push_str("END:VALARM\r\n");
        ics.push_str("END:VEVENT\r\n");
    }

    ics.push_str("END:VCALENDAR\r\n");
    ics
}

/// The same occurrences as plain JSON events for in-browser rendering.
/// Descriptions carry real newlines here, not iCalendar escapes.
pub fn to_event_list(reminders: &[Reminder], occurrences: &[Occurrence]) -> Vec<CalendarEvent> {
    occurrences
        .iter()
        .filter_map(|occurrence| {
            let reminder = reminders.get(occurrence.reminder_index)?;
            let food = if reminder.with_food { "Yes" } else { "No" };
            Some(CalendarEvent {
                title: format!("Take {}", occurrence.medicine),
                start: occurrence.date.and_time(occurrence.time),
                description: format!(
                    "Medication: {}\nWith food: {food}\nDay {} of {}",
                    occurrence.medicine,
                    occurrence.day_index + 1,
                    reminder.duration_days
                ),
            })
        })
        .collect()
}

fn format_local(instant: NaiveDateTime) -> String {
    instant.format("%Y%m%dT%H%M%S").to_string()
}

/// RFC 5545 TEXT escaping for values embedded in content lines.
fn escape_text(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}
