//! Scheduling core: turns extracted medication records into normalized
//! reminders, expands them into dated occurrences, and derives adherence
//! and calendar views.
//!
//! Everything in here is a pure function of its inputs. The clock and the
//! database stay outside; callers pass `today`/`generated_at` explicitly.

pub mod adherence;
pub mod calendar;
pub mod frequency;
pub mod materialize;
pub mod reminder;

pub use adherence::{compute_adherence, AdherenceDay, AdherenceSummary};
pub use calendar::{to_event_list, to_ics, CalendarEvent};
pub use materialize::{materialize_range, today_view, Occurrence};
pub use reminder::build_all;
