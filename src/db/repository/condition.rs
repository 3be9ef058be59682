use chrono::NaiveDate;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use crate::db::DatabaseError;
use crate::models::{ConditionSeverity, MedicalCondition};

use super::parse_date;

#[derive(Debug, Clone)]
pub struct NewCondition {
    pub patient_id: i64,
    pub condition_name: String,
    pub diagnosis_date: Option<NaiveDate>,
    pub severity: ConditionSeverity,
}

#[derive(Debug, Clone, Default)]
pub struct ConditionUpdate {
    pub condition_name: Option<String>,
    pub diagnosis_date: Option<NaiveDate>,
    pub severity: Option<ConditionSeverity>,
}

impl ConditionUpdate {
    pub fn is_empty(&self) -> bool {
        self.condition_name.is_none() && self.diagnosis_date.is_none() && self.severity.is_none()
    }
}

pub fn insert_condition(conn: &Connection, new: &NewCondition) -> Result<i64, DatabaseError> {
    conn.execute(
        "INSERT INTO medical_condition (patient_id, condition_name, diagnosis_date, severity)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            new.patient_id,
            new.condition_name,
            new.diagnosis_date.map(|d| d.to_string()),
            new.severity.as_str(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn list_conditions(conn: &Connection) -> Result<Vec<MedicalCondition>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT condition_id, patient_id, condition_name, diagnosis_date, severity
         FROM medical_condition ORDER BY condition_id ASC",
    )?;

    let rows = stmt.query_map([], condition_row)?;
    let mut conditions = Vec::new();
    for row in rows {
        conditions.push(finish_row(row?)?);
    }
    Ok(conditions)
}

pub fn get_condition(conn: &Connection, condition_id: i64) -> Result<MedicalCondition, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT condition_id, patient_id, condition_name, diagnosis_date, severity
         FROM medical_condition WHERE condition_id = ?1",
    )?;

    let mut rows = stmt.query_map(params![condition_id], condition_row)?;
    let row = rows.next().ok_or(DatabaseError::NotFound {
        entity_type: "medical_condition".into(),
        id: condition_id,
    })??;
    finish_row(row)
}

/// All conditions for one patient.
pub fn fetch_for_patient(
    conn: &Connection,
    patient_id: i64,
) -> Result<Vec<MedicalCondition>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT condition_id, patient_id, condition_name, diagnosis_date, severity
         FROM medical_condition WHERE patient_id = ?1 ORDER BY condition_id ASC",
    )?;

    let rows = stmt.query_map(params![patient_id], condition_row)?;
    let mut conditions = Vec::new();
    for row in rows {
        conditions.push(finish_row(row?)?);
    }
    Ok(conditions)
}

pub fn update_condition(
    conn: &Connection,
    condition_id: i64,
    update: &ConditionUpdate,
) -> Result<(), DatabaseError> {
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(v) = &update.condition_name {
        sets.push("condition_name = ?");
        values.push(Value::Text(v.clone()));
    }
    if let Some(v) = &update.diagnosis_date {
        sets.push("diagnosis_date = ?");
        values.push(Value::Text(v.to_string()));
    }
    if let Some(v) = &update.severity {
        sets.push("severity = ?");
        values.push(Value::Text(v.as_str().to_string()));
    }

    if sets.is_empty() {
        return Err(DatabaseError::ConstraintViolation(
            "no fields provided for update".into(),
        ));
    }

    values.push(Value::Integer(condition_id));
    let sql = format!(
        "UPDATE medical_condition SET {} WHERE condition_id = ?",
        sets.join(", ")
    );

    let changed = conn.execute(&sql, params_from_iter(values))?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "medical_condition".into(),
            id: condition_id,
        });
    }
    Ok(())
}

pub fn delete_condition(conn: &Connection, condition_id: i64) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "DELETE FROM medical_condition WHERE condition_id = ?1",
        params![condition_id],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "medical_condition".into(),
            id: condition_id,
        });
    }
    Ok(())
}

type ConditionRow = (i64, i64, String, Option<String>, String);

fn condition_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ConditionRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
    ))
}

fn finish_row(row: ConditionRow) -> Result<MedicalCondition, DatabaseError> {
    let (id, patient_id, name, date, severity) = row;
    Ok(MedicalCondition {
        condition_id: id,
        patient_id,
        condition_name: name,
        diagnosis_date: match date {
            Some(d) => Some(parse_date(&d)?),
            None => None,
        },
        // Reads are total: junk severities degrade to Other
        severity: ConditionSeverity::from_db(&severity),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::patient::{insert_patient, NewPatient};
    use crate::db::sqlite::open_memory_database;

    fn seed_patient(conn: &Connection) -> i64 {
        insert_patient(
            conn,
            &NewPatient {
                first_name: "Ada".into(),
                last_name: "Osei".into(),
                date_of_birth: NaiveDate::from_ymd_opt(1980, 2, 1).unwrap(),
                phone: None,
                email: None,
                address: None,
            },
        )
        .unwrap()
    }

    fn hypertension(patient_id: i64) -> NewCondition {
        NewCondition {
            patient_id,
            condition_name: "Hypertension".into(),
            diagnosis_date: NaiveDate::from_ymd_opt(2024, 6, 15),
            severity: ConditionSeverity::Moderate,
        }
    }

    #[test]
    fn insert_and_get_round_trip() {
        let conn = open_memory_database().unwrap();
        let p = seed_patient(&conn);
        let id = insert_condition(&conn, &hypertension(p)).unwrap();

        let condition = get_condition(&conn, id).unwrap();
        assert_eq!(condition.condition_name, "Hypertension");
        assert_eq!(condition.severity, ConditionSeverity::Moderate);
        assert_eq!(
            condition.diagnosis_date.unwrap().to_string(),
            "2024-06-15"
        );
    }

    #[test]
    fn insert_with_unknown_patient_fails() {
        let conn = open_memory_database().unwrap();
        assert!(insert_condition(&conn, &hypertension(404)).is_err());
    }

    #[test]
    fn fetch_for_patient_filters_by_patient() {
        let conn = open_memory_database().unwrap();
        let p1 = seed_patient(&conn);
        let p2 = seed_patient(&conn);
        insert_condition(&conn, &hypertension(p1)).unwrap();
        insert_condition(&conn, &hypertension(p1)).unwrap();
        insert_condition(&conn, &hypertension(p2)).unwrap();

        assert_eq!(fetch_for_patient(&conn, p1).unwrap().len(), 2);
        assert_eq!(fetch_for_patient(&conn, p2).unwrap().len(), 1);
    }

    #[test]
    fn unrecognized_stored_severity_reads_as_other() {
        let conn = open_memory_database().unwrap();
        let p = seed_patient(&conn);
        conn.execute(
            "INSERT INTO medical_condition (patient_id, condition_name, severity)
             VALUES (?1, 'Migraine', 'critical')",
            params![p],
        )
        .unwrap();

        let conditions = fetch_for_patient(&conn, p).unwrap();
        assert_eq!(conditions[0].severity, ConditionSeverity::Other);
    }

    #[test]
    fn update_severity_and_delete() {
        let conn = open_memory_database().unwrap();
        let p = seed_patient(&conn);
        let id = insert_condition(&conn, &hypertension(p)).unwrap();

        update_condition(
            &conn,
            id,
            &ConditionUpdate {
                severity: Some(ConditionSeverity::Severe),
                ..ConditionUpdate::default()
            },
        )
        .unwrap();
        assert_eq!(
            get_condition(&conn, id).unwrap().severity,
            ConditionSeverity::Severe
        );

        delete_condition(&conn, id).unwrap();
        assert!(get_condition(&conn, id).is_err());
    }
}
