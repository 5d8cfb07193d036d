use std::str::FromStr;

use rusqlite::{params, Connection};

use super::parse_timestamp;
use crate::db::DatabaseError;
use crate::models::enums::{DoseFrequency, PrescriptionSource};
use crate::models::prescription::{DoctorInfo, MedicationRecord, Prescription, Reminder};

/// Insert a prescription with its medications and reminders. Child rows
/// keep their input order via the position column.
pub fn insert_prescription(
    conn: &Connection,
    prescription: &Prescription,
) -> Result<(), DatabaseError> {
    let doctor = prescription.doctor.as_ref();
    conn.execute(
        "INSERT INTO prescriptions (id, patient_name, doctor_name, doctor_clinic,
                                    doctor_specialization, diagnosis, notes, source, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            prescription.id,
            prescription.patient_name,
            doctor.and_then(|d| d.name.as_deref()),
            doctor.and_then(|d| d.clinic.as_deref()),
            doctor.and_then(|d| d.specialization.as_deref()),
            prescription.diagnosis,
            prescription.notes,
            prescription.source.as_str(),
            prescription.created_at.to_rfc3339(),
        ],
    )?;

    for (position, record) in prescription.medications.iter().enumerate() {
        conn.execute(
            "INSERT INTO medications (prescription_id, position, name, dosage, frequency, duration, instructions)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                prescription.id,
                position as i64,
                record.name,
                record.dosage,
                record.frequency,
                record.duration,
                record.instructions,
            ],
        )?;
    }

    for (position, reminder) in prescription.reminders.iter().enumerate() {
        conn.execute(
            "INSERT INTO reminders (prescription_id, position, medicine, times, frequency, with_food, duration_days)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                prescription.id,
                position as i64,
                reminder.medicine,
                reminder.times_csv(),
                reminder.frequency.as_str(),
                reminder.with_food as i32,
                reminder.duration_days,
            ],
        )?;
    }

    Ok(())
}

/// Load a full prescription aggregate, or `NotFound`.
pub fn get_prescription(conn: &Connection, id: &str) -> Result<Prescription, DatabaseError> {
    let row = conn
        .query_row(
            "SELECT id, patient_name, doctor_name, doctor_clinic, doctor_specialization,
                    diagnosis, notes, source, created_at
             FROM prescriptions WHERE id = ?1",
            params![id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, Option<String>>(3)?,
                    row.get::<_, Option<String>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                    row.get::<_, String>(7)?,
                    row.get::<_, String>(8)?,
                ))
            },
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "Prescription".into(),
                id: id.to_string(),
            },
            other => DatabaseError::Sqlite(other),
        })?;

    let (id, patient_name, name, clinic, specialization, diagnosis, notes, source, created_at) =
        row;
    Ok(Prescription {
        medications: get_medications(conn, &id)?,
        reminders: get_reminders(conn, &id)?,
        id,
        patient_name,
        doctor: doctor_from_columns(name, clinic, specialization),
        diagnosis,
        notes,
        source: PrescriptionSource::from_str(&source)?,
        created_at: parse_timestamp(&created_at)?,
    })
}

/// Most recent prescriptions first, capped at `limit`, children included.
/// The history listing needs medicine names, so child rows come along.
pub fn list_recent_prescriptions(
    conn: &Connection,
    limit: u32,
) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, patient_name, doctor_name, doctor_clinic, doctor_specialization,
                diagnosis, notes, source, created_at
         FROM prescriptions ORDER BY created_at DESC LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, Option<String>>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, Option<String>>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
            row.get::<_, Option<String>>(6)?,
            row.get::<_, String>(7)?,
            row.get::<_, String>(8)?,
        ))
    })?;

    let mut prescriptions = Vec::new();
    for row in rows {
        let (id, patient_name, name, clinic, specialization, diagnosis, notes, source, created_at) =
            row?;
        prescriptions.push(Prescription {
            medications: get_medications(conn, &id)?,
            reminders: get_reminders(conn, &id)?,
            id,
            patient_name,
            doctor: doctor_from_columns(name, clinic, specialization),
            diagnosis,
            notes,
            source: PrescriptionSource::from_str(&source)?,
            created_at: parse_timestamp(&created_at)?,
        });
    }
    Ok(prescriptions)
}

/// Reassemble the prescriber block; all-NULL columns mean there was none.
fn doctor_from_columns(
    name: Option<String>,
    clinic: Option<String>,
    specialization: Option<String>,
) -> Option<DoctorInfo> {
    if name.is_none() && clinic.is_none() && specialization.is_none() {
        return None;
    }
    Some(DoctorInfo {
        name,
        clinic,
        specialization,
    })
}

fn get_medications(
    conn: &Connection,
    prescription_id: &str,
) -> Result<Vec<MedicationRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT name, dosage, frequency, duration, instructions
         FROM medications WHERE prescription_id = ?1 ORDER BY position",
    )?;

    let rows = stmt.query_map(params![prescription_id], |row| {
        Ok(MedicationRecord {
            name: row.get(0)?,
            dosage: row.get(1)?,
            frequency: row.get(2)?,
            duration: row.get(3)?,
            instructions: row.get(4)?,
        })
    })?;

    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

fn get_reminders(
    conn: &Connection,
    prescription_id: &str,
) -> Result<Vec<Reminder>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT medicine, times, frequency, with_food, duration_days
         FROM reminders WHERE prescription_id = ?1 ORDER BY position",
    )?;

    let rows = stmt.query_map(params![prescription_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, i32>(3)?,
            row.get::<_, i64>(4)?,
        ))
    })?;

    let mut reminders = Vec::new();
    for row in rows {
        let (medicine, times, frequency, with_food, duration_days) = row?;
        reminders.push(Reminder {
            medicine,
            times: Reminder::times_from_csv(&times),
            frequency: DoseFrequency::from_str(&frequency)?,
            with_food: with_food != 0,
            duration_days: duration_days.max(0) as u32,
        });
    }
    Ok(reminders)
}
