//! Operations a frontend calls. Each returns a user-facing message on failure.

pub mod auth;
pub mod schedule;
pub mod storage;
pub mod summary;

use chrono::{NaiveDate, NaiveTime};

use crate::database::StoreError;

pub(crate) fn user_message(error: StoreError) -> String {
    match error {
        StoreError::Sqlite(_) => "A database error occurred. Please try again.".to_string(),
        other => other.to_string(),
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", value))
}

pub fn parse_time(value: &str) -> Result<NaiveTime, String> {
    let value = value.trim();
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| format!("Invalid time '{}', expected HH:MM", value))
}
