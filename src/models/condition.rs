use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::enums::ConditionSeverity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MedicalCondition {
    pub condition_id: i64,
    pub patient_id: i64,
    pub condition_name: String,
    pub diagnosis_date: Option<NaiveDate>,
    pub severity: ConditionSeverity,
}
