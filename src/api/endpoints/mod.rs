//! API endpoint handlers.
//!
//! One module per resource. Handlers open a database connection per request
//! and delegate the actual logic to the schedule and extraction modules.

pub mod adherence;
pub mod analyze;
pub mod calendar;
pub mod health;
pub mod prescriptions;
pub mod schedule;
