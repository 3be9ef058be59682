//! Assembles the per-patient history bundle the risk synthesis consumes.

use rusqlite::Connection;

use crate::db::DatabaseError;
use crate::synthesis::PatientHistoryBundle;

use super::{appointment, condition, patient};

/// Fetch one patient's demographic row, appointments and conditions as
/// a read-only snapshot. Errors with `NotFound` if the patient does not
/// exist; empty appointment/condition lists are fine.
pub fn fetch_patient_history(
    conn: &Connection,
    patient_id: i64,
) -> Result<PatientHistoryBundle, DatabaseError> {
    let patient = patient::get_patient(conn, patient_id)?;

    let appointments = appointment::list_for_patient(conn, patient_id)?;
    let conditions = condition::fetch_for_patient(conn, patient_id)?;

    Ok(PatientHistoryBundle {
        patient,
        appointments,
        conditions,
    })
}

/// All patient ids, for fleet-wide aggregation.
pub fn list_patient_ids(conn: &Connection) -> Result<Vec<i64>, DatabaseError> {
    let mut stmt = conn.prepare("SELECT patient_id FROM patient ORDER BY patient_id ASC")?;
    let rows = stmt.query_map([], |row| row.get::<_, i64>(0))?;

    let mut ids = Vec::new();
    for row in rows {
        ids.push(row?);
    }
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::appointment::{insert_appointment, NewAppointment};
    use crate::db::repository::condition::{insert_condition, NewCondition};
    use crate::db::repository::doctor::{insert_doctor, NewDoctor};
    use crate::db::repository::patient::{insert_patient, NewPatient};
    use crate::db::sqlite::open_memory_database;
    use crate::models::{AppointmentStatus, ConditionSeverity};
    use crate::synthesis;
    use chrono::{NaiveDate, NaiveDateTime};

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

    fn seed_doctor(conn: &Connection) -> i64 {
        insert_doctor(
            conn,
            &NewDoctor {
                first_name: "Lena".into(),
                last_name: "Vogel".into(),
                specialization: "Cardiology".into(),
                email: "lena@clinic.test".into(),
            },
        )
        .unwrap()
    }

    fn at(time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(time, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn missing_patient_is_not_found() {
        let conn = open_memory_database().unwrap();
        assert!(matches!(
            fetch_patient_history(&conn, 5).unwrap_err(),
            DatabaseError::NotFound { .. }
        ));
    }

    #[test]
    fn empty_history_is_a_valid_bundle() {
        let conn = open_memory_database().unwrap();
        let p = seed_patient(&conn);

        let bundle = fetch_patient_history(&conn, p).unwrap();
        assert!(bundle.appointments.is_empty());
        assert!(bundle.conditions.is_empty());
        assert_eq!(synthesis::compute_risk_score(&bundle), 0);
    }

    #[test]
    fn bundle_carries_full_history() {
        let conn = open_memory_database().unwrap();
        let p = seed_patient(&conn);
        let d = seed_doctor(&conn);

        insert_appointment(
            &conn,
            &NewAppointment {
                patient_id: p,
                doctor_id: d,
                appointment_time: at("2026-03-01 09:00:00"),
                reason: None,
                status: AppointmentStatus::Cancelled,
            },
        )
        .unwrap();
        insert_condition(
            &conn,
            &NewCondition {
                patient_id: p,
                condition_name: "Asthma".into(),
                diagnosis_date: None,
                severity: ConditionSeverity::Moderate,
            },
        )
        .unwrap();

        let bundle = fetch_patient_history(&conn, p).unwrap();
        assert_eq!(bundle.patient.patient_id, p);
        assert_eq!(bundle.appointments.len(), 1);
        assert_eq!(bundle.appointments[0].status, AppointmentStatus::Cancelled);
        assert_eq!(bundle.conditions.len(), 1);
        assert_eq!(bundle.conditions[0].severity, ConditionSeverity::Moderate);
    }

    #[test]
    fn list_patient_ids_in_order() {
        let conn = open_memory_database().unwrap();
        let a = seed_patient(&conn);
        let b = seed_patient(&conn);
        assert_eq!(list_patient_ids(&conn).unwrap(), vec![a, b]);
    }
}
