use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use crate::db::DatabaseError;
use crate::models::Doctor;

#[derive(Debug, Clone)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub specialization: String,
    pub email: String,
}

#[derive(Debug, Clone, Default)]
pub struct DoctorUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub specialization: Option<String>,
    pub email: Option<String>,
}

impl DoctorUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.specialization.is_none()
            && self.email.is_none()
    }
}

pub fn insert_doctor(conn: &Connection, new: &NewDoctor) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO doctor (first_name, last_name, specialization, email)
         VALUES (?1, ?2, ?3, ?4)",
        params![new.first_name, new.last_name, new.specialization, new.email],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT doctor_id, first_name, last_name, specialization, email
         FROM doctor ORDER BY last_name ASC",
    )?;

    let rows = stmt.query_map([], |row| {
        Ok(Doctor {
            doctor_id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            specialization: row.get(3)?,
            email: row.get(4)?,
        })
    })?;

    let mut doctors = Vec::new();
    for row in rows {
        doctors.push(row?);
    }
    Ok(doctors)
}

pub fn get_doctor(conn: &Connection, doctor_id: i64) -> Result<Doctor, DatabaseError> {
    conn.query_row(
        "SELECT doctor_id, first_name, last_name, specialization, email
         FROM doctor WHERE doctor_id = ?1",
        params![doctor_id],
        |row| {
            Ok(Doctor {
                doctor_id: row.get(0)?,
                first_name: row.get(1)?,
                last_name: row.get(2)?,
                specialization: row.get(3)?,
                email: row.get(4)?,
            })
        },
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: doctor_id,
        },
        other => DatabaseError::Sqlite(other),
    })
}

pub fn update_doctor(
    conn: &Connection,
    doctor_id: i64,
    update: &DoctorUpdate,
) -> Result<(), DatabaseError> {
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(v) = &update.first_name {
        sets.push("first_name = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = &update.last_name {
        sets.push("last_name = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = &update.specialization {
        sets.push("specialization = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = &update.email {
        sets.push("email = ?");
        values.push(Value::Text(v.clone()));
    }

    if sets.is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "no fields provided for update".into(),
        ));
    }

    values.push(Value::Integer(doctor_id));
    let sql = format!("UPDATE doctor SET {} WHERE doctor_id = ?", sets.join(", "));

    let changed = conn.execute(&sql, params_from_iter(values))?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: doctor_id,
        });
    }
    Ok(())
}

pub fn delete_doctor(conn: &Connection, doctor_id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute("DELETE FROM doctor WHERE doctor_id = ?1", params![doctor_id])?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: doctor_id,
        });
    }
    Ok(())
}
