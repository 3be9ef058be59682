pub mod appointments;
pub mod auth;
pub mod conditions;
pub mod dashboard;
pub mod doctors;
pub mod documents;
pub mod health;
pub mod patients;

use std::sync::OnceLock;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;

use crate::api::error::ApiError;

/// Loose email shape check, matching the original validator's intent.
pub(crate) fn valid_email(s: &str) -> bool {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL
        .get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static regex"))
        .is_match(s)
}

/// Parse a client-supplied timestamp (`YYYY-MM-DD HH:MM:SS` or ISO `T`).
pub(crate) fn parse_request_datetime(s: &str) -> Result<NaiveDateTime, ApiError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| {
            ApiError::BadRequest("Valid ISO date/time (YYYY-MM-DD HH:MM:SS) is required".into())
        })
}

/// Parse a client-supplied `YYYY-MM-DD` date.
pub(crate) fn parse_request_date(s: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest("Valid date is required (YYYY-MM-DD)".into()))
}
