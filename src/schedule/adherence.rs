//! Adherence engine: expected-vs-taken dose counts over a trailing 7-day
//! window, plus an aggregate percentage.
//!
//! The engine is a pure function of (reminders, start date, taken-event log,
//! reference day). It never reads the clock and never touches storage.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::models::prescription::{Reminder, TakenEvent};

/// Length of the trailing evaluation window, in calendar days.
pub const WINDOW_DAYS: u32 = 7;

/// One cell of the 7-day adherence strip. `valid` is false for days before
/// the prescription started; those days carry expected = 0 and are excluded
/// from the totals, but their taken count is still reported for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceDay {
    pub date: NaiveDate,
    pub expected: u32,
    pub taken: u32,
    pub valid: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdherenceSummary {
    /// Oldest to newest, always `WINDOW_DAYS` entries.
    pub days: Vec<AdherenceDay>,
    pub daily_expected: u32,
    pub total_expected: u32,
    pub total_taken: u32,
    /// 0..=100. Zero whenever `total_expected` is zero.
    pub rate: u8,
}

/// Doses expected per calendar day: the sum of every reminder's time slots,
/// floored at 1 so an empty prescription never reads as 100% adherent.
pub fn daily_expected_doses(reminders: &[Reminder]) -> u32 {
    let total: usize = reminders.iter().map(|r| r.times.len()).sum();
    (total as u32).max(1)
}

/// Evaluate the trailing window ending at `today` (inclusive).
///
/// A day is valid when `start_date <= day <= today`. The expected count is
/// constant across valid days; it does not taper off after a course ends.
/// Any taken event whose timestamp falls on a valid day counts toward that
/// day, regardless of medicine or slot, and duplicates are not rejected (the
/// rate is clamped instead).
pub fn compute_adherence(
    reminders: &[Reminder],
    start_date: NaiveDate,
    events: &[TakenEvent],
    today: NaiveDate,
) -> AdherenceSummary {
    let daily_expected = daily_expected_doses(reminders);
    let mut days = Vec::with_capacity(WINDOW_DAYS as usize);
    let mut total_expected = 0u32;
    let mut total_taken = 0u32;

    for offset in (0..WINDOW_DAYS).rev() {
        let Some(date) = today.checked_sub_days(Days::new(u64::from(offset))) else {
            continue;
        };
        let valid = date >= start_date && date <= today;
        let taken = events
            .iter()
            .filter(|e| e.taken_at.date_naive() == date)
            .count() as u32;
        let expected = if valid { daily_expected } else { 0 };
        if valid {
            total_expected += expected;
            total_taken += taken;
        }
        days.push(AdherenceDay {
            date,
            expected,
            taken,
            valid,
        });
    }

    let rate = if total_expected == 0 {
        0
    } else {
        ((f64::from(total_taken) * 100.0) / f64::from(total_expected))
            .round()
            .clamp(0.0, 100.0) as u8
    };

    AdherenceSummary {
        days,
        daily_expected,
        total_expected,
        total_taken,
        rate,
    }
}
