//! Patient risk synthesis — pure scoring over an assembled history.
//!
//! Aggregates a patient's appointment and condition records into a
//! bounded 0-100 risk score and a categorical adherence status. No
//! I/O: callers assemble a [`PatientHistoryBundle`] from the database
//! (see `db::repository::history`) and both the patient-history
//! endpoint and the dashboard summary reuse the same computation.

use serde::{Deserialize, Serialize};

use crate::models::{Appointment, AppointmentStatus, ConditionSeverity, MedicalCondition, Patient};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Read-only snapshot of one patient's history, assembled per request.
#[derive(Debug, Clone)]
pub struct PatientHistoryBundle {
    pub patient: Patient,
    pub appointments: Vec<Appointment>,
    pub conditions: Vec<MedicalCondition>,
}

/// How reliably a patient keeps scheduled appointments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdherenceStatus {
    #[serde(rename = "Insufficient Data")]
    InsufficientData,
    Good,
    Moderate,
    Poor,
}

impl AdherenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InsufficientData => "Insufficient Data",
            Self::Good => "Good",
            Self::Moderate => "Moderate",
            Self::Poor => "Poor",
        }
    }
}

/// Both derived values under their stable wire names.
#[derive(Debug, Clone, Serialize)]
pub struct SynthesisResult {
    #[serde(rename = "riskScore")]
    pub risk_score: u8,
    #[serde(rename = "adherenceStatus")]
    pub adherence_status: AdherenceStatus,
}

/// Scoring weights, caps and thresholds in one tunable structure.
///
/// `Default` carries the production values. Sub-score caps sum to 100,
/// so the final clamp should never move a score; it stays in place to
/// keep the 0-100 contract independent of retuning.
#[derive(Debug, Clone)]
pub struct RiskWeights {
    /// Multiplier applied to the summed severity points.
    pub condition_severity_weight: f64,
    /// Upper bound of the severity sub-score.
    pub condition_severity_cap: f64,
    /// Multiplier applied to the missed-appointment penalty.
    pub adherence_weight: f64,
    /// Upper bound of the adherence penalty.
    pub adherence_cap: f64,
    /// Points per diagnosed condition.
    pub condition_count_weight: f64,
    /// Upper bound of the condition-count sub-score.
    pub condition_count_cap: f64,
    /// Scores at or above this count as high risk in fleet aggregation.
    pub high_risk_threshold: u8,
    /// Below this many appointments the adherence status is
    /// `Insufficient Data`.
    pub min_appointments_for_status: usize,
    /// Cancellation rates strictly below this are `Good`.
    pub good_cancellation_rate: f64,
    /// Cancellation rates strictly below this (but not `Good`) are
    /// `Moderate`; everything else is `Poor`.
    pub moderate_cancellation_rate: f64,
}

impl Default for RiskWeights {
    fn default() -> Self {
        Self {
            condition_severity_weight: 5.0,
            condition_severity_cap: 50.0,
            adherence_weight: 3.0,
            adherence_cap: 30.0,
            condition_count_weight: 4.0,
            condition_count_cap: 20.0,
            high_risk_threshold: 70,
            min_appointments_for_status: 3,
            good_cancellation_rate: 0.10,
            moderate_cancellation_rate: 0.30,
        }
    }
}

impl RiskWeights {
    pub fn is_high_risk(&self, score: u8) -> bool {
        score >= self.high_risk_threshold
    }
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Severity points per condition. Unrecognized tiers score like `Mild`.
fn severity_points(severity: ConditionSeverity) -> f64 {
    match severity {
        ConditionSeverity::Severe => 10.0,
        ConditionSeverity::Moderate => 5.0,
        ConditionSeverity::Mild | ConditionSeverity::Other => 1.0,
    }
}

fn cancelled_count(appointments: &[Appointment]) -> usize {
    appointments
        .iter()
        .filter(|a| a.status == AppointmentStatus::Cancelled)
        .count()
}

/// Compute the 0-100 risk score with the production weights.
pub fn compute_risk_score(bundle: &PatientHistoryBundle) -> u8 {
    compute_risk_score_with(bundle, &RiskWeights::default())
}

/// Compute the 0-100 risk score: three independently-capped sub-scores
/// (condition severity, appointment adherence, condition count), summed,
/// rounded, and clamped.
pub fn compute_risk_score_with(bundle: &PatientHistoryBundle, weights: &RiskWeights) -> u8 {
    // 1. Condition severity, capped
    let total_severity: f64 = bundle
        .conditions
        .iter()
        .map(|c| severity_points(c.severity))
        .sum();
    let condition_risk =
        (total_severity * weights.condition_severity_weight).min(weights.condition_severity_cap);

    // 2. Adherence penalty for cancelled appointments, capped.
    // No history counts as perfect adherence.
    let total_appts = bundle.appointments.len();
    let cancelled = cancelled_count(&bundle.appointments);
    let adherence_rate = if total_appts > 0 {
        (total_appts - cancelled) as f64 / total_appts as f64
    } else {
        1.0
    };
    let penalty = (100.0 * (1.0 - adherence_rate)).max(0.0);
    let adherence_penalty = (penalty * weights.adherence_weight).min(weights.adherence_cap);

    // 3. Condition count, capped
    let count_risk =
        (bundle.conditions.len() as f64 * weights.condition_count_weight).min(weights.condition_count_cap);

    let final_score = (condition_risk + adherence_penalty + count_risk).round();
    final_score.clamp(0.0, 100.0) as u8
}

/// Classify adherence with the production thresholds.
pub fn compute_adherence_status(bundle: &PatientHistoryBundle) -> AdherenceStatus {
    compute_adherence_status_with(bundle, &RiskWeights::default())
}

/// Classify adherence from the cancellation rate. Fewer than
/// `min_appointments_for_status` appointments is too small a sample and
/// takes precedence over every rate check.
pub fn compute_adherence_status_with(
    bundle: &PatientHistoryBundle,
    weights: &RiskWeights,
) -> AdherenceStatus {
    let total_appts = bundle.appointments.len();
    if total_appts < weights.min_appointments_for_status {
        return AdherenceStatus::InsufficientData;
    }

    let cancellation_rate = cancelled_count(&bundle.appointments) as f64 / total_appts as f64;

    if cancellation_rate < weights.good_cancellation_rate {
        AdherenceStatus::Good
    } else if cancellation_rate < weights.moderate_cancellation_rate {
        AdherenceStatus::Moderate
    } else {
        AdherenceStatus::Poor
    }
}

/// Run both computations over one bundle.
pub fn synthesize(bundle: &PatientHistoryBundle) -> SynthesisResult {
    synthesize_with(bundle, &RiskWeights::default())
}

pub fn synthesize_with(bundle: &PatientHistoryBundle, weights: &RiskWeights) -> SynthesisResult {
    SynthesisResult {
        risk_score: compute_risk_score_with(bundle, weights),
        adherence_status: compute_adherence_status_with(bundle, weights),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn test_patient() -> Patient {
        Patient {
            patient_id: 1,
            first_name: "Ada".into(),
            last_name: "Osei".into(),
            date_of_birth: NaiveDate::from_ymd_opt(1980, 2, 1).unwrap(),
            phone: None,
            email: None,
            address: None,
        }
    }

    fn appt(status: AppointmentStatus) -> Appointment {
        Appointment {
            appointment_id: 0,
            patient_id: 1,
            doctor_id: 1,
            appointment_time: NaiveDateTime::parse_from_str(
                "2026-03-01 09:00:00",
                "%Y-%m-%d %H:%M:%S",
            )
            .unwrap(),
            reason: None,
            status,
        }
    }

    fn cond(severity: ConditionSeverity) -> MedicalCondition {
        MedicalCondition {
            condition_id: 0,
            patient_id: 1,
            condition_name: "Hypertension".into(),
            diagnosis_date: None,
            severity,
        }
    }

    fn bundle(appointments: Vec<Appointment>, conditions: Vec<MedicalCondition>) -> PatientHistoryBundle {
        PatientHistoryBundle {
            patient: test_patient(),
            appointments,
            conditions,
        }
    }

    // -----------------------------------------------------------------------
    // compute_risk_score
    // -----------------------------------------------------------------------

    #[test]
    fn empty_history_scores_zero() {
        let b = bundle(vec![], vec![]);
        assert_eq!(compute_risk_score(&b), 0);
    }

    #[test]
    fn kept_appointments_and_no_conditions_score_zero() {
        let b = bundle(
            vec![
                appt(AppointmentStatus::Scheduled),
                appt(AppointmentStatus::Completed),
                appt(AppointmentStatus::Completed),
            ],
            vec![],
        );
        assert_eq!(compute_risk_score(&b), 0);
    }

    #[test]
    fn severity_sub_score_saturates_at_cap() {
        // 10 Severe conditions: severity 10*10*5 caps at 50,
        // count 10*4 caps at 20, no appointments -> 70 total.
        let b = bundle(vec![], (0..10).map(|_| cond(ConditionSeverity::Severe)).collect());
        assert_eq!(compute_risk_score(&b), 70);
    }

    #[test]
    fn adherence_penalty_saturates_at_cap() {
        // 10 appointments, 5 cancelled: rate 0.5, 100*0.5*3 caps at 30.
        let mut appts: Vec<_> = (0..5).map(|_| appt(AppointmentStatus::Cancelled)).collect();
        appts.extend((0..5).map(|_| appt(AppointmentStatus::Completed)));
        let b = bundle(appts, vec![]);
        assert_eq!(compute_risk_score(&b), 30);
    }

    #[test]
    fn condition_count_sub_score_saturates_at_cap() {
        // Zero out the other terms so the count term is observable on
        // its own: 10 conditions * 4 caps at 20.
        let weights = RiskWeights {
            condition_severity_weight: 0.0,
            adherence_weight: 0.0,
            ..RiskWeights::default()
        };
        let b = bundle(vec![], (0..10).map(|_| cond(ConditionSeverity::Mild)).collect());
        assert_eq!(compute_risk_score_with(&b, &weights), 20);
    }

    #[test]
    fn single_moderate_condition_no_appointments_scores_29() {
        // severity min(1*5*5, 50)=25, adherence 0 (empty -> rate 1),
        // count min(1*4, 20)=4 -> 29.
        let b = bundle(vec![], vec![cond(ConditionSeverity::Moderate)]);
        assert_eq!(compute_risk_score(&b), 29);
    }

    #[test]
    fn worst_case_saturates_all_caps_at_100() {
        let appts: Vec<_> = (0..10).map(|_| appt(AppointmentStatus::Cancelled)).collect();
        let conds: Vec<_> = (0..20).map(|_| cond(ConditionSeverity::Severe)).collect();
        let b = bundle(appts, conds);
        assert_eq!(compute_risk_score(&b), 100);
    }

    #[test]
    fn score_stays_in_bounds_for_varied_inputs() {
        for cancelled in 0..8usize {
            for severe in 0..15usize {
                let mut appts: Vec<_> =
                    (0..cancelled).map(|_| appt(AppointmentStatus::Cancelled)).collect();
                appts.push(appt(AppointmentStatus::Scheduled));
                let conds: Vec<_> =
                    (0..severe).map(|_| cond(ConditionSeverity::Severe)).collect();
                let score = compute_risk_score(&bundle(appts, conds));
                assert!(score <= 100);
            }
        }
    }

    #[test]
    fn unknown_severity_scores_like_mild() {
        let known = bundle(vec![], vec![cond(ConditionSeverity::Mild)]);
        let unknown = bundle(vec![], vec![cond(ConditionSeverity::Other)]);
        assert_eq!(compute_risk_score(&known), compute_risk_score(&unknown));
    }

    #[test]
    fn unknown_status_is_not_a_cancellation() {
        let b = bundle(
            vec![
                appt(AppointmentStatus::Other),
                appt(AppointmentStatus::Other),
                appt(AppointmentStatus::Other),
            ],
            vec![],
        );
        assert_eq!(compute_risk_score(&b), 0);
    }

    #[test]
    fn fractional_penalty_rounds_to_nearest() {
        // 30 appointments, 1 cancelled: penalty 100*(1/30)*3 = 10 after
        // rounding the float sum.
        let mut appts: Vec<_> = (0..29).map(|_| appt(AppointmentStatus::Completed)).collect();
        appts.push(appt(AppointmentStatus::Cancelled));
        let b = bundle(appts, vec![]);
        assert_eq!(compute_risk_score(&b), 10);
    }

    #[test]
    fn scoring_is_pure() {
        let b = bundle(
            vec![appt(AppointmentStatus::Cancelled), appt(AppointmentStatus::Completed)],
            vec![cond(ConditionSeverity::Severe)],
        );
        assert_eq!(compute_risk_score(&b), compute_risk_score(&b));
        assert_eq!(compute_adherence_status(&b), compute_adherence_status(&b));
    }

    // -----------------------------------------------------------------------
    // compute_adherence_status
    // -----------------------------------------------------------------------

    #[test]
    fn fewer_than_three_appointments_is_insufficient_data() {
        // Even 2-of-2 cancelled: the sample-size check takes precedence.
        let b = bundle(
            vec![appt(AppointmentStatus::Cancelled), appt(AppointmentStatus::Cancelled)],
            vec![],
        );
        assert_eq!(compute_adherence_status(&b), AdherenceStatus::InsufficientData);

        let empty = bundle(vec![], vec![]);
        assert_eq!(
            compute_adherence_status(&empty),
            AdherenceStatus::InsufficientData
        );
    }

    fn rate_bundle(total: usize, cancelled: usize) -> PatientHistoryBundle {
        let mut appts: Vec<_> = (0..cancelled).map(|_| appt(AppointmentStatus::Cancelled)).collect();
        appts.extend((cancelled..total).map(|_| appt(AppointmentStatus::Completed)));
        bundle(appts, vec![])
    }

    #[test]
    fn no_cancellations_is_good() {
        assert_eq!(compute_adherence_status(&rate_bundle(10, 0)), AdherenceStatus::Good);
    }

    #[test]
    fn twenty_percent_cancelled_is_moderate() {
        assert_eq!(
            compute_adherence_status(&rate_bundle(10, 2)),
            AdherenceStatus::Moderate
        );
    }

    #[test]
    fn forty_percent_cancelled_is_poor() {
        assert_eq!(compute_adherence_status(&rate_bundle(10, 4)), AdherenceStatus::Poor);
    }

    #[test]
    fn threshold_boundaries_are_exclusive() {
        // Exactly 10% is not Good, exactly 30% is not Moderate.
        assert_eq!(
            compute_adherence_status(&rate_bundle(10, 1)),
            AdherenceStatus::Moderate
        );
        assert_eq!(compute_adherence_status(&rate_bundle(10, 3)), AdherenceStatus::Poor);
    }

    #[test]
    fn adherence_status_serializes_with_spaces() {
        let json = serde_json::to_string(&AdherenceStatus::InsufficientData).unwrap();
        assert_eq!(json, "\"Insufficient Data\"");
        assert_eq!(AdherenceStatus::InsufficientData.as_str(), "Insufficient Data");
        assert_eq!(
            serde_json::to_string(&AdherenceStatus::Good).unwrap(),
            "\"Good\""
        );
    }

    #[test]
    fn synthesis_result_uses_stable_wire_names() {
        let b = bundle(vec![], vec![cond(ConditionSeverity::Moderate)]);
        let json = serde_json::to_value(synthesize(&b)).unwrap();
        assert_eq!(json["riskScore"], 29);
        assert_eq!(json["adherenceStatus"], "Insufficient Data");
        assert!(json.get("risk_score").is_none());
    }

    #[test]
    fn high_risk_threshold_is_inclusive() {
        let weights = RiskWeights::default();
        assert!(weights.is_high_risk(70));
        assert!(weights.is_high_risk(100));
        assert!(!weights.is_high_risk(69));
    }
}
