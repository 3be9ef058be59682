use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use serde::Serialize;

use crate::db::DatabaseError;
use crate::models::Patient;

use super::parse_date;

/// Fields for creating a patient.
#[derive(Debug, Clone)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

/// Partial update; only `Some` fields are written.
#[derive(Debug, Clone, Default)]
pub struct PatientUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
}

impl PatientUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.date_of_birth.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
    }
}

/// Listing row for the patient index (subset of columns).
#[derive(Debug, Clone, Serialize)]
pub struct PatientSummary {
    pub patient_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
}

pub fn insert_patient(conn: &Connection, new: &NewPatient) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO patient (first_name, last_name, date_of_birth, phone, email, address)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            new.first_name,
            new.last_name,
            new.date_of_birth.to_string(),
            new.phone,
            new.email,
            new.address,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// List patients, optionally filtered by a name substring, ordered by
/// last name.
pub fn list_patients(
    conn: &Connection,
    search: Option<&str>,
) -> Result<Vec<PatientSummary>, DatabaseError> {
    let mut sql =
        "SELECT patient_id, first_name, last_name, email FROM patient".to_string();
    let mut values: Vec<Value> = Vec::new();

    if let Some(term) = search {
        sql.push_str(" WHERE first_name LIKE ?1 OR last_name LIKE ?1");
        values.push(Value::Text(format!("%{term}%")));
    }
    sql.push_str(" ORDER BY last_name ASC");

    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(values), |row| {
        Ok(PatientSummary {
            patient_id: row.get(0)?,
            first_name: row.get(1)?,
            last_name: row.get(2)?,
            email: row.get(3)?,
        })
    })?;

    let mut patients = Vec::new();
    for row in rows {
        patients.push(row?);
    }
    Ok(patients)
}

pub fn get_patient(conn: &Connection, patient_id: i64) -> Result<Patient, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT patient_id, first_name, last_name, date_of_birth, phone, email, address
         FROM patient WHERE patient_id = ?1",
    )?;

    let mut rows = stmt.query_map(params![patient_id], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, Option<String>>(4)?,
            row.get::<_, Option<String>>(5)?,
            row.get::<_, Option<String>>(6)?,
        ))
    })?;

    let row = rows.next().ok_or(DatabaseError::NotFound {
        entity_type: "patient".into(),
        id: patient_id,
    })??;

    let (id, first_name, last_name, dob, phone, email, address) = row;
    Ok(Patient {
        patient_id: id,
        first_name,
        last_name,
        date_of_birth: parse_date(&dob)?,
        phone,
        email,
        address,
    })
}

pub fn update_patient(
    conn: &Connection,
    patient_id: i64,
    update: &PatientUpdate,
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
    if let Some(v) = &update.date_of_birth {
        sets.push("date_of_birth = ?");
        values.push(Value::Text(v.to_string()));
    }
    if let Some(v) = &update.phone {
        sets.push("phone = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = &update.email {
        sets.push("email = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = &update.address {
        sets.push("address = ?");
        values.push(Value::Text(v.clone()));
    }

    if sets.is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "no fields provided for update".into(),
        ));
    }

    values.push(Value::Integer(patient_id));
    let sql = format!(
        "UPDATE patient SET {} WHERE patient_id = ?",
        sets.join(", ")
    );

    let changed = conn.execute(&sql, params_from_iter(values))?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: patient_id,
        });
    }
    Ok(())
}

pub fn delete_patient(conn: &Connection, patient_id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM patient WHERE patient_id = ?1",
        params![patient_id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: patient_id,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::sqlite::open_memory_database;

    fn sample() -> NewPatient {
        NewPatient {
            first_name: "Ada".into(),
            last_name: "Osei".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 2, 1).unwrap(),
            phone: Some("555-0100".into()),
            email: Some("ada@example.test".into()),
            address: None,
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        let id = insert_patient(&conn, &sample()).unwrap();

        let patient = get_patient(&conn, id).unwrap();
        assert_eq!(patient.first_name, "Ada");
        assert_eq!(patient.date_of_birth.to_string(), "1980-02-01");
        assert_eq!(patient.phone.as_deref(), Some("555-0100"));
        assert!(patient.address.is_none());
    }

    #[test]
    fn get_missing_patient_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = get_patient(&conn, 99).unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn list_orders_by_last_name() {
        let conn = open_memory_database().unwrap();
        let mut a = sample();
        a.last_name = "Zhou".into();
        insert_patient(&conn, &a).unwrap();
        let mut b = sample();
        b.last_name = "Alvarez".into();
        insert_patient(&conn, &b).unwrap();

        let patients = list_patients(&conn, None).unwrap();
        assert_eq!(patients.len(), 2);
        assert_eq!(patients[0].last_name, "Alvarez");
        assert_eq!(patients[1].last_name, "Zhou");
    }

    #[test]
    fn list_search_matches_either_name() {
        let conn = open_memory_database().unwrap();
        insert_patient(&conn, &sample()).unwrap();
        let mut other = sample();
        other.first_name = "Noor".into();
        other.last_name = "Haddad".into();
        insert_patient(&conn, &other).unwrap();

        let hits = list_patients(&conn, Some("Had")).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].last_name, "Haddad");

        let hits = list_patients(&conn, Some("ada")).unwrap();
        assert_eq!(hits.len(), 2, "matches Ada and Haddad");
    }

    #[test]
    fn partial_update_touches_only_given_fields() {
        let conn = open_memory_database().unwrap();
        let id = insert_patient(&conn, &sample()).unwrap();

        update_patient(
            &conn,
            id,
            &PatientUpdate {
                phone: Some("555-0199".into()),
                ..PatientUpdate::default()
            },
        )
        .unwrap();

        let patient = get_patient(&conn, id).unwrap();
        assert_eq!(patient.phone.as_deref(), Some("555-0199"));
        assert_eq!(patient.first_name, "Ada");
    }

    #[test]
    fn empty_update_is_rejected() {
        let conn = open_memory_database().unwrap();
        let id = insert_patient(&conn, &sample()).unwrap();
        let err = update_patient(&conn, id, &PatientUpdate::default()).unwrap_err();
        assert!(matches!(err, DatabaseError::ConstraintViolation(_)));
    }

    #[test]
    fn update_missing_patient_is_not_found() {
        let conn = open_memory_database().unwrap();
        let err = update_patient(
            &conn,
            42,
            &PatientUpdate {
                phone: Some("x".into()),
                ..PatientUpdate::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
    }

    #[test]
    fn delete_removes_row() {
        let conn = open_memory_database().unwrap();
        let id = insert_patient(&conn, &sample()).unwrap();
        delete_patient(&conn, id).unwrap();
        assert!(get_patient(&conn, id).is_err());
        assert!(delete_patient(&conn, id).is_err());
    }
}
