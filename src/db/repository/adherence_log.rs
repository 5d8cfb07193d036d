use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use super::parse_timestamp;
use crate::db::DatabaseError;
use crate::models::prescription::TakenEvent;

/// Record one taken dose. The log is append-only; callers verify the
/// prescription exists before writing.
pub fn append_taken_event(
    conn: &Connection,
    prescription_id: &str,
    medicine: &str,
    scheduled_time: &str,
    taken_at: DateTime<Utc>,
) -> Result<TakenEvent, DatabaseError> {
    conn.execute(
        "INSERT INTO taken_events (prescription_id, medicine, scheduled_time, taken_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            prescription_id,
            medicine,
            scheduled_time,
            taken_at.to_rfc3339(),
        ],
    )?;

    Ok(TakenEvent {
        id: conn.last_insert_rowid(),
        prescription_id: prescription_id.to_string(),
        medicine: medicine.to_string(),
        scheduled_time: scheduled_time.to_string(),
        taken_at,
    })
}

/// All taken events for a prescription, in arrival order.
pub fn list_taken_events(
    conn: &Connection,
    prescription_id: &str,
) -> Result<Vec<TakenEvent>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, prescription_id, medicine, scheduled_time, taken_at
         FROM taken_events WHERE prescription_id = ?1 ORDER BY id",
    )?;

    let rows = stmt.query_map(params![prescription_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
        ))
    })?;

    let mut events = Vec::new();
    for row in rows {
        let (id, prescription_id, medicine, scheduled_time, taken_at) = row?;
        events.push(TakenEvent {
            id,
            prescription_id,
            medicine,
            scheduled_time,
            taken_at: parse_timestamp(&taken_at)?,
        });
    }
    Ok(events)
}
