//! Repository layer — entity-scoped database operations.
//!
//! Free functions over a borrowed `Connection`; callers open a connection
//! per request and pass it down. All public functions are re-exported here.

pub mod adherence_log;
pub mod prescription;

use chrono::{DateTime, Utc};

use super::DatabaseError;

pub use adherence_log::*;
pub use prescription::*;

/// Timestamps are stored as RFC 3339 text. A stored value that fails to
/// parse is reported as corruption, not silently defaulted.
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DatabaseError::ConstraintViolation(format!("Invalid timestamp: {e}")))
}
