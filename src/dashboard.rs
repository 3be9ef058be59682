//! Dashboard summary — fleet-wide counts and the recent-activity feed.
//!
//! Every request recomputes each patient's risk score from current data
//! (scores are never cached): the high-risk count assembles a history
//! bundle per patient and runs the synthesis, and the activity feed
//! attaches the same freshly-computed score to each recent appointment.

use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection};
use serde::Serialize;

use crate::db::repository::history;
use crate::db::repository::parse_datetime;
use crate::db::DatabaseError;
use crate::synthesis::{self, RiskWeights};

/// Number of appointments in the recent-activity feed.
pub const RECENT_ACTIVITY_LIMIT: u32 = 5;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Aggregate counters for the dashboard header.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardCounts {
    pub total_patients: u32,
    pub total_doctors: u32,
    pub total_appointments_today: u32,
    pub total_appointments_upcoming: u32,
    pub high_risk_patients: u32,
}

/// One row of the recent-activity feed: a recent appointment joined
/// with display names and that patient's current risk score.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityRecord {
    pub appointment_id: i64,
    pub appointment_time: NaiveDateTime,
    pub patient_id: i64,
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub doctor_last_name: String,
    #[serde(rename = "riskScore")]
    pub risk_score: u8,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Compute the dashboard counters for the given calendar day.
pub fn fetch_dashboard_counts(
    conn: &Connection,
    today: NaiveDate,
    weights: &RiskWeights,
) -> Result<DashboardCounts, DatabaseError> {
    let total_patients: u32 =
        conn.query_row("SELECT COUNT(*) FROM patient", [], |row| row.get(0))?;

    let total_doctors: u32 =
        conn.query_row("SELECT COUNT(*) FROM doctor", [], |row| row.get(0))?;

    let today_str = today.to_string();

    let total_appointments_today: u32 = conn.query_row(
        "SELECT COUNT(*) FROM appointment
         WHERE date(appointment_time) = ?1 AND status = 'Scheduled'",
        params![today_str],
        |row| row.get(0),
    )?;

    let total_appointments_upcoming: u32 = conn.query_row(
        "SELECT COUNT(*) FROM appointment
         WHERE date(appointment_time) >= ?1 AND status = 'Scheduled'",
        params![today_str],
        |row| row.get(0),
    )?;

    let high_risk_patients = count_high_risk_patients(conn, weights)?;

    Ok(DashboardCounts {
        total_patients,
        total_doctors,
        total_appointments_today,
        total_appointments_upcoming,
        high_risk_patients,
    })
}

/// Count patients whose freshly-computed risk score meets the
/// high-risk threshold. One history fetch + synthesis per patient.
pub fn count_high_risk_patients(
    conn: &Connection,
    weights: &RiskWeights,
) -> Result<u32, DatabaseError> {
    let mut high_risk = 0u32;
    for patient_id in history::list_patient_ids(conn)? {
        let bundle = history::fetch_patient_history(conn, patient_id)?;
        let score = synthesis::compute_risk_score_with(&bundle, weights);
        if weights.is_high_risk(score) {
            high_risk += 1;
        }
    }
    Ok(high_risk)
}

/// The most recent appointments with patient/doctor display names and
/// each patient's current risk score.
pub fn fetch_recent_activity(
    conn: &Connection,
    limit: u32,
    weights: &RiskWeights,
) -> Result<Vec<ActivityRecord>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT a.appointment_id, a.appointment_time, p.patient_id,
                p.first_name, p.last_name, d.last_name
         FROM appointment a
         JOIN patient p ON a.patient_id = p.patient_id
         JOIN doctor d ON a.doctor_id = d.doctor_id
         ORDER BY a.appointment_time DESC
         LIMIT ?1",
    )?;

    let rows = stmt.query_map(params![limit], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, i64>(2)?,
            row.get::<_, String>(3)?,
            row.get::<_, String>(4)?,
            row.get::<_, String>(5)?,
        ))
    })?;

    let mut records = Vec::new();
    for row in rows {
        let (appointment_id, time, patient_id, patient_first_name, patient_last_name, doctor_last_name) =
            row?;

        let bundle = history::fetch_patient_history(conn, patient_id)?;
        let risk_score = synthesis::compute_risk_score_with(&bundle, weights);

        records.push(ActivityRecord {
            appointment_id,
            appointment_time: parse_datetime(&time)?,
            patient_id,
            patient_first_name,
            patient_last_name,
            doctor_last_name,
            risk_score,
        });
    }
    Ok(records)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
