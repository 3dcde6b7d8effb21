//! Recurring weekly schedule entries

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lecture template attached to a schedule entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledLecture {
    pub name: String,
    pub lecturer: String,
    pub subject_codes: String,
    pub duration_hours: f64,
    /// Wall-clock start, "HH:MM"
    pub start_time: String,
}

impl ScheduledLecture {
    /// Parsed wall-clock start time, if well formed
    pub fn clock_time(&self) -> Option<NaiveTime> {
        parse_clock(&self.start_time)
    }

    /// Start time as minutes since midnight
    pub fn start_minutes(&self) -> Option<u32> {
        self.clock_time().map(|t| t.hour() * 60 + t.minute())
    }
}

/// A recurring weekly entry in a room's schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub schedule_id: Uuid,
    /// Monday-first, no duplicates
    pub days: Vec<Weekday>,
    pub lecture: ScheduledLecture,
}

impl ScheduleEntry {
    pub fn runs_on(&self, day: Weekday) -> bool {
        self.days.contains(&day)
    }

    pub fn days_label(&self) -> String {
        if self.days.is_empty() {
            return "No Days Set".to_string();
        }
        self.days
            .iter()
            .map(|d| weekday_name(*d))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Parse a wall-clock "HH:MM" time
pub fn parse_clock(s: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").ok()
}

/// Sort and deduplicate days in Monday-first order
pub fn normalize_days(days: &[Weekday]) -> Vec<Weekday> {
    let mut out: Vec<Weekday> = Vec::with_capacity(days.len());
    for day in days {
        if !out.contains(day) {
            out.push(*day);
        }
    }
    out.sort_by_key(|d| d.num_days_from_monday());
    out
}

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_clock() {
        assert_eq!(parse_clock("08:30"), NaiveTime::from_hms_opt(8, 30, 0));
        assert_eq!(parse_clock(" 17:05 "), NaiveTime::from_hms_opt(17, 5, 0));
        assert_eq!(parse_clock("25:00"), None);
        assert_eq!(parse_clock("soon"), None);
    }

    #[test]
    fn test_normalize_days() {
        let days = normalize_days(&[Weekday::Fri, Weekday::Mon, Weekday::Fri, Weekday::Sun]);
        assert_eq!(days, vec![Weekday::Mon, Weekday::Fri, Weekday::Sun]);
    }

    #[test]
    fn test_days_label() {
        let entry = ScheduleEntry {
            schedule_id: Uuid::new_v4(),
            days: vec![Weekday::Mon, Weekday::Wed],
            lecture: ScheduledLecture {
                name: "Algorithms".into(),
                lecturer: "Dr. X".into(),
                subject_codes: "CS201".into(),
                duration_hours: 2.0,
                start_time: "09:00".into(),
            },
        };
        assert_eq!(entry.days_label(), "Monday, Wednesday");
        assert_eq!(entry.lecture.start_minutes(), Some(540));
    }
}
