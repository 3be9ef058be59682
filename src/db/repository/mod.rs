pub mod admin;
pub mod appointment;
pub mod condition;
pub mod doctor;
pub mod document;
pub mod history;
pub mod patient;

use chrono::{NaiveDate, NaiveDateTime};

use super::DatabaseError;

/// Parse a stored timestamp. Accepts the canonical `YYYY-MM-DD HH:MM:SS`
/// form and the ISO-8601 `T` separator clients send.
pub(crate) fn parse_datetime(s: &str) -> Result<NaiveDateTime, DatabaseError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| DatabaseError::ConstraintViolation(format!("invalid timestamp: {s}")))
}

/// Parse a stored `YYYY-MM-DD` date.
pub(crate) fn parse_date(s: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| DatabaseError::ConstraintViolation(format!("invalid date: {s}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_datetime_accepts_both_separators() {
        assert!(parse_datetime("2026-03-01 09:00:00").is_ok());
        assert!(parse_datetime("2026-03-01T09:00:00").is_ok());
        assert!(parse_datetime("March 1st").is_err());
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("1980-02-01").is_ok());
        assert!(parse_date("02/01/1980").is_err());
    }
}
