use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use serde::Serialize;

use crate::db::DatabaseError;
use crate::models::{Appointment, AppointmentStatus};

use super::parse_datetime;

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: i64,
    pub doctor_id: i64,
    pub appointment_time: NaiveDateTime,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
}

#[derive(Debug, Clone, Default)]
pub struct AppointmentUpdate {
    pub appointment_time: Option<NaiveDateTime>,
    pub reason: Option<String>,
    pub status: Option<AppointmentStatus>,
}

impl AppointmentUpdate {
    pub fn is_empty(&self) -> bool {
        self.appointment_time.is_none() && self.reason.is_none() && self.status.is_none()
    }
}

/// Appointment joined with the doctor's name, for patient-facing lists.
#[derive(Debug, Clone, Serialize)]
pub struct PatientAppointment {
    pub appointment_id: i64,
    pub appointment_time: NaiveDateTime,
    pub reason: Option<String>,
    pub status: AppointmentStatus,
    pub doctor_first_name: String,
    pub doctor_last_name: String,
}

const CANONICAL_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn insert_appointment(conn: &Connection, new: &NewAppointment) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO appointment (patient_id, doctor_id, appointment_time, reason, status)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            new.patient_id,
            new.doctor_id,
            new.appointment_time.format(CANONICAL_TIME_FORMAT).to_string(),
            new.reason,
            new.status.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_appointments(conn: &Connection) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT appointment_id, patient_id, doctor_id, appointment_time, reason, status
         FROM appointment ORDER BY appointment_time DESC",
    )?;

    let rows = stmt.query_map([], appointment_row)?;
    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(finish_row(row?)?);
    }
    Ok(appointments)
}

pub fn get_appointment(conn: &Connection, appointment_id: i64) -> Result<Appointment, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT appointment_id, patient_id, doctor_id, appointment_time, reason, status
         FROM appointment WHERE appointment_id = ?1",
    )?;

    let mut rows = stmt.query_map(params![appointment_id], appointment_row)?;
    let row = rows.next().ok_or(DatabaseError::NotFound {
        entity_type: "appointment".into(),
        id: appointment_id,
    })??;
    finish_row(row)
}

/// Plain appointment rows for one patient (no join); feeds the risk
/// synthesis bundle.
pub fn list_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT appointment_id, patient_id, doctor_id, appointment_time, reason, status
         FROM appointment WHERE patient_id = ?1 ORDER BY appointment_time DESC",
    )?;

    let rows = stmt.query_map(params![patient_id], appointment_row)?;
    let mut appointments = Vec::new();
    for row in rows {
        appointments.push(finish_row(row?)?);
    }
    Ok(appointments)
}

/// All appointments for one patient, most recent first, with doctor names.
pub fn fetch_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<PatientAppointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT a.appointment_id, a.appointment_time, a.reason, a.status,
                d.first_name, d.last_name
         FROM appointment a
         JOIN doctor d ON a.doctor_id = d.doctor_id
         WHERE a.patient_id = ?1
         ORDER BY a.appointment_time DESC",
    )?;

    let rows = stmt.query_map(params![patient_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, Option<String>>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut appointments = Vec::new();
    for row in rows {
        let (id, time, reason, status, doctor_first_name, doctor_last_name) = row?;
        appointments.push(PatientAppointment {
            appointment_id: id,
            appointment_time: parse_datetime(&time)?,
            reason,
            status: AppointmentStatus::from_db(&status),
            doctor_first_name,
            doctor_last_name,
        });
    }
    Ok(appointments)
}

pub fn update_appointment(
    conn: &Connection,
    appointment_id: i64,
    update: &AppointmentUpdate,
) -> Result<(), DatabaseError> {
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(v) = &update.appointment_time {
        sets.push("appointment_time = ?");
        values.push(Value::Text(v.format(CANONICAL_TIME_FORMAT).to_string()));
    }
    if let Some(v) = &update.reason {
        sets.push("reason = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = &update.status {
        sets.push("status = ?");
        values.push(Value::Text(v.as_str().to_string()));
    }

    if sets.is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "no fields provided for update".into(),
        ));
    }

    values.push(Value::Integer(appointment_id));
    let sql = format!(
        "UPDATE appointment SET {} WHERE appointment_id = ?",
        sets.join(", ")
    );

    let changed = conn.execute(&sql, params_from_iter(values))?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: appointment_id,
        });
    }
    Ok(())
}

pub fn delete_appointment(conn: &Connection, appointment_id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM appointment WHERE appointment_id = ?1",
        params![appointment_id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: appointment_id,
        });
    }
    Ok(())
}

type AppointmentRow = (i64, i64, i64, String, Option<String>, String);

fn appointment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AppointmentRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
    ))
}

fn finish_row(row: AppointmentRow) -> Result<Appointment, DatabaseError> {
    let (id, patient_id, doctor_id, time, reason, status) = row;
    Ok(Appointment {
        appointment_id: id,
        patient_id,
        doctor_id,
        appointment_time: parse_datetime(&time)?,
        reason,
        // Reads are total: junk statuses degrade to Other
        status: AppointmentStatus::from_db(&status),
    })
}
