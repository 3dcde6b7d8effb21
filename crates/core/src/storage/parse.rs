//! Database value parsing utilities
//!
//! Maps stored columns back into typed values, reporting bad data as
//! conversion failures rather than panicking.

use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Error as SqlError;
use serde::de::DeserializeOwned;
use tracing::warn;
use uuid::Uuid;

use crate::models::{CleaningStatus, Lecture, Occupancy, RoomStatus};

fn conversion_failure<E>(e: E) -> SqlError
where
    E: std::error::Error + Send + Sync + 'static,
{
    SqlError::FromSqlConversionFailure(0, Type::Text, Box::new(e))
}

#[derive(Debug)]
struct BadColumn(String);

impl std::fmt::Display for BadColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for BadColumn {}

/// Parse a UUID from a database string column
pub fn parse_uuid(s: &str) -> Result<Uuid, SqlError> {
    Uuid::parse_str(s).map_err(conversion_failure)
}

/// Parse a DateTime from an RFC3339 string
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, SqlError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(conversion_failure)
}

/// Parse an optional DateTime from an RFC3339 string
pub fn parse_datetime_opt(s: Option<String>) -> Result<Option<DateTime<Utc>>, SqlError> {
    s.map(|s| parse_datetime(&s)).transpose()
}

/// Parse a JSON column
pub fn parse_json<T: DeserializeOwned>(s: &str) -> Result<T, SqlError> {
    serde_json::from_str(s).map_err(conversion_failure)
}

/// Rebuild the occupancy group from its `status` and `current_lecture` columns
pub fn parse_occupancy(status: &str, lecture: Option<String>) -> Result<Occupancy, SqlError> {
    let status = RoomStatus::from_str(status)
        .ok_or_else(|| conversion_failure(BadColumn(format!("unknown room status {:?}", status))))?;
    match status {
        RoomStatus::Free => Ok(Occupancy::Free),
        RoomStatus::Cleaning => Ok(Occupancy::Cleaning),
        RoomStatus::Occupied => {
            let json = lecture.ok_or_else(|| {
                conversion_failure(BadColumn("occupied room without a current lecture".into()))
            })?;
            let lecture: Lecture = parse_json(&json)?;
            Ok(Occupancy::Occupied { lecture })
        }
    }
}

/// Rebuild the cleaning group from its four columns.
///
/// A row marked clean without a timestamp cannot be dated, so it reads as dirty.
pub fn parse_cleaning(
    is_clean: bool,
    cleaned_by: String,
    cleaned_at: Option<String>,
    employee_id: String,
) -> Result<CleaningStatus, SqlError> {
    match (is_clean, parse_datetime_opt(cleaned_at)?) {
        (true, Some(at)) => Ok(CleaningStatus::clean(cleaned_by, employee_id, at)),
        (true, None) => {
            warn!(cleaned_by = %cleaned_by, "Clean room has no cleaning time, reading as dirty");
            Ok(CleaningStatus::Dirty)
        }
        (false, _) => Ok(CleaningStatus::Dirty),
    }
}

/// Extension trait for converting rusqlite Results to Option
pub trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>, SqlError>;
}

impl<T> OptionalExt<T> for Result<T, SqlError> {
    fn optional(self) -> Result<Option<T>, SqlError> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(SqlError::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupied_requires_lecture() {
        assert!(parse_occupancy("occupied", None).is_err());
        assert!(parse_occupancy("vacant", None).is_err());
        assert_eq!(
            parse_occupancy("cleaning", Some("ignored".into())).unwrap(),
            Occupancy::Cleaning
        );
    }

    #[test]
    fn test_clean_without_time_reads_dirty() {
        let status = parse_cleaning(true, "Sam".into(), None, "E-1".into()).unwrap();
        assert_eq!(status, CleaningStatus::Dirty);

        let status = parse_cleaning(
            true,
            "Sam".into(),
            Some("2024-03-04T08:00:00+00:00".into()),
            "E-1".into(),
        )
        .unwrap();
        assert!(status.is_clean());
    }
}
