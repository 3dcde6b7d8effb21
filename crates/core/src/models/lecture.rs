//! Lecture and occupancy models

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Observable occupancy status of a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Free,
    Occupied,
    Cleaning,
}

impl RoomStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Free => "free",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Cleaning => "cleaning",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(RoomStatus::Free),
            "occupied" => Some(RoomStatus::Occupied),
            "cleaning" => Some(RoomStatus::Cleaning),
            _ => None,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            RoomStatus::Free => "Available",
            RoomStatus::Occupied => "Occupied",
            RoomStatus::Cleaning => "Cleaning",
        }
    }
}

impl std::fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lecture currently being held in a room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecture {
    pub name: String,
    pub lecturer: String,
    pub subject_codes: String,
    pub students_count: u32,
    pub duration_hours: f64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub is_scheduled_lecture: bool,
}

impl Lecture {
    /// Build a lecture whose end time is derived from start and duration.
    ///
    /// Fails when the end time would fall outside the representable range.
    pub fn new(
        name: String,
        lecturer: String,
        subject_codes: String,
        students_count: u32,
        duration_hours: f64,
        start_time: DateTime<Utc>,
        is_scheduled_lecture: bool,
    ) -> Result<Self> {
        let end_time = hours(duration_hours)
            .and_then(|d| start_time.checked_add_signed(d))
            .ok_or_else(|| Error::Validation("duration out of range".into()))?;
        Ok(Self {
            name,
            lecturer,
            subject_codes,
            students_count,
            duration_hours,
            start_time,
            end_time,
            is_scheduled_lecture,
        })
    }
}

/// Convert fractional hours to a millisecond-precision duration
pub fn hours(duration_hours: f64) -> Option<Duration> {
    let millis = (duration_hours * 3_600_000.0).round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    Duration::try_milliseconds(millis as i64)
}

/// Occupancy field group.
///
/// A lecture exists exactly when the room is occupied, so the status and the
/// current lecture cannot disagree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Occupancy {
    Free,
    Occupied { lecture: Lecture },
    Cleaning,
}

impl Occupancy {
    pub fn status(&self) -> RoomStatus {
        match self {
            Occupancy::Free => RoomStatus::Free,
            Occupancy::Occupied { .. } => RoomStatus::Occupied,
            Occupancy::Cleaning => RoomStatus::Cleaning,
        }
    }

    pub fn current_lecture(&self) -> Option<&Lecture> {
        match self {
            Occupancy::Occupied { lecture } => Some(lecture),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_end_time_from_fractional_duration() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        let lecture = Lecture::new(
            "Algorithms".into(),
            "Dr. X".into(),
            "CS201".into(),
            0,
            1.5,
            start,
            false,
        )
        .unwrap();
        assert_eq!(lecture.end_time, Utc.with_ymd_and_hms(2024, 3, 4, 10, 30, 0).unwrap());
    }

    #[test]
    fn test_unrepresentable_end_time_is_rejected() {
        let start = Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap();
        assert!(hours(f64::MAX).is_none());
        assert!(hours(1e12).is_some());
        let err = Lecture::new("L".into(), "D".into(), "C".into(), 0, 1e12, start, false).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_status_round_trip_names() {
        for status in [RoomStatus::Free, RoomStatus::Occupied, RoomStatus::Cleaning] {
            assert_eq!(RoomStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(RoomStatus::from_str("busy"), None);
    }

    #[test]
    fn test_occupancy_exposes_lecture_only_when_occupied() {
        assert!(Occupancy::Free.current_lecture().is_none());
        assert!(Occupancy::Cleaning.current_lecture().is_none());
        assert_eq!(Occupancy::Cleaning.status(), RoomStatus::Cleaning);
    }
}
