//! Clinical enumerations stored as TEXT columns.
//!
//! Writes go through the strict `FromStr` impls, so only the known
//! values reach the database. Reads use the total `from_db`
//! constructors: anything unrecognized maps to `Other`, which the risk
//! synthesis treats as the lowest-contribution tier.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::db::DatabaseError;

/// Appointment lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppointmentStatus {
    Scheduled,
    Completed,
    Cancelled,
    /// Unrecognized stored value; never accepted on write.
    Other,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
            Self::Other => "Other",
        }
    }

    /// Total mapping from a stored column value.
    pub fn from_db(s: &str) -> Self {
        match s {
            "Scheduled" => Self::Scheduled,
            "Completed" => Self::Completed,
            "Cancelled" => Self::Cancelled,
            _ => Self::Other,
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Scheduled" => Ok(Self::Scheduled),
            "Completed" => Ok(Self::Completed),
            "Cancelled" => Ok(Self::Cancelled),
            _ => Err(DatabaseError::InvalidEnum {
                field: "AppointmentStatus".into(),
                value: s.into(),
            }),
        }
    }
}

/// Diagnosed-condition severity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConditionSeverity {
    Severe,
    Moderate,
    Mild,
    /// Unrecognized stored value; scores like `Mild`.
    Other,
}

impl ConditionSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Severe => "Severe",
            Self::Moderate => "Moderate",
            Self::Mild => "Mild",
            Self::Other => "Other",
        }
    }

    /// Total mapping from a stored column value.
    pub fn from_db(s: &str) -> Self {
        match s {
            "Severe" => Self::Severe,
            "Moderate" => Self::Moderate,
            "Mild" => Self::Mild,
            _ => Self::Other,
        }
    }
}

impl FromStr for ConditionSeverity {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Severe" => Ok(Self::Severe),
            "Moderate" => Ok(Self::Moderate),
            "Mild" => Ok(Self::Mild),
            _ => Err(DatabaseError::InvalidEnum {
                field: "ConditionSeverity".into(),
                value: s.into(),
            }),
        }
    }
}
