//! Weekly schedule editing

use chrono::Weekday;
use tracing::debug;
use uuid::Uuid;

use crate::command::RoomCommand;
use crate::error::{Error, Result};
use crate::models::{hours, normalize_days, parse_clock, Room, ScheduleEntry, ScheduledLecture};

/// Form input for a schedule entry
#[derive(Debug, Clone, Default)]
pub struct ScheduleInput {
    pub days: Vec<Weekday>,
    pub name: String,
    pub lecturer: String,
    pub subject_codes: String,
    pub duration_hours: f64,
    /// "HH:MM"
    pub start_time: String,
}

impl ScheduleInput {
    fn validate(&self) -> Result<(Vec<Weekday>, ScheduledLecture)> {
        let days = normalize_days(&self.days);
        if days.is_empty() {
            return Err(Error::Validation("select at least one day".into()));
        }

        let name = required(&self.name, "lecture name")?;
        let lecturer = required(&self.lecturer, "lecturer")?;
        let subject_codes = required(&self.subject_codes, "subject codes")?;

        if !(self.duration_hours.is_finite() && self.duration_hours > 0.0) {
            return Err(Error::Validation("duration must be greater than zero".into()));
        }
        if hours(self.duration_hours).is_none() {
            return Err(Error::Validation("duration out of range".into()));
        }
        let clock = parse_clock(&self.start_time).ok_or_else(|| {
            Error::Validation(format!("start time {:?} is not HH:MM", self.start_time))
        })?;

        Ok((
            days,
            ScheduledLecture {
                name,
                lecturer,
                subject_codes,
                duration_hours: self.duration_hours,
                start_time: clock.format("%H:%M").to_string(),
            },
        ))
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Add a new entry with a fresh id
pub fn add_entry(room: &Room, input: &ScheduleInput) -> Result<RoomCommand> {
    let (days, lecture) = input.validate()?;
    let entry = ScheduleEntry {
        schedule_id: Uuid::new_v4(),
        days,
        lecture,
    };
    debug!(room_id = %room.id, schedule_id = %entry.schedule_id, "Adding schedule entry");
    Ok(RoomCommand::AddScheduleEntry {
        room_id: room.id.clone(),
        entry,
    })
}

/// Replace an existing entry, keeping its id
pub fn update_entry(room: &Room, schedule_id: Uuid, input: &ScheduleInput) -> Result<RoomCommand> {
    if room.find_schedule_entry(schedule_id).is_none() {
        return Err(Error::NotFound(format!("schedule entry {}", schedule_id)));
    }
    let (days, lecture) = input.validate()?;
    Ok(RoomCommand::UpdateScheduleEntry {
        room_id: room.id.clone(),
        entry: ScheduleEntry {
            schedule_id,
            days,
            lecture,
        },
    })
}

pub fn delete_entry(room: &Room, schedule_id: Uuid) -> Result<RoomCommand> {
    if room.find_schedule_entry(schedule_id).is_none() {
        return Err(Error::NotFound(format!("schedule entry {}", schedule_id)));
    }
    Ok(RoomCommand::DeleteScheduleEntry {
        room_id: room.id.clone(),
        schedule_id,
    })
}

/// Parse a weekday from a full or abbreviated English name
pub fn parse_weekday(s: &str) -> Result<Weekday> {
    s.trim()
        .parse::<Weekday>()
        .map_err(|_| Error::Validation(format!("unknown day {:?}", s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Facilities;
    use chrono::Utc;

    fn room() -> Room {
        Room::new("LH-02".into(), "Hall 2".into(), Facilities::default(), Utc::now())
    }

    fn input() -> ScheduleInput {
        ScheduleInput {
            days: vec![Weekday::Wed, Weekday::Mon, Weekday::Wed],
            name: " Operating Systems ".into(),
            lecturer: "Dr. K".into(),
            subject_codes: "CS330".into(),
            duration_hours: 2.0,
            start_time: " 09:05 ".into(),
        }
    }

    #[test]
    fn test_add_normalizes() {
        let mut r = room();
        let cmd = add_entry(&r, &input()).unwrap();
        r.apply(&cmd).unwrap();
        let entry = &r.schedule[0];
        assert_eq!(entry.days, vec![Weekday::Mon, Weekday::Wed]);
        assert_eq!(entry.lecture.name, "Operating Systems");
        assert_eq!(entry.lecture.start_time, "09:05");
    }

    #[test]
    fn test_validation() {
        let r = room();
        let mut no_days = input();
        no_days.days.clear();
        assert!(matches!(add_entry(&r, &no_days), Err(Error::Validation(_))));

        let mut bad_time = input();
        bad_time.start_time = "half past nine".into();
        assert!(matches!(add_entry(&r, &bad_time), Err(Error::Validation(_))));

        let mut no_lecturer = input();
        no_lecturer.lecturer = " ".into();
        assert!(matches!(add_entry(&r, &no_lecturer), Err(Error::Validation(_))));

        let mut zero = input();
        zero.duration_hours = 0.0;
        assert!(matches!(add_entry(&r, &zero), Err(Error::Validation(_))));

        let mut huge = input();
        huge.duration_hours = 1e300;
        assert!(matches!(add_entry(&r, &huge), Err(Error::Validation(_))));
    }

    #[test]
    fn test_update_and_delete() {
        let mut r = room();
        r.apply(&add_entry(&r, &input()).unwrap()).unwrap();
        let id = r.schedule[0].schedule_id;

        let mut changed = input();
        changed.days = vec![Weekday::Fri];
        r.apply(&update_entry(&r, id, &changed).unwrap()).unwrap();
        assert_eq!(r.schedule[0].schedule_id, id);
        assert_eq!(r.schedule[0].days, vec![Weekday::Fri]);

        r.apply(&delete_entry(&r, id).unwrap()).unwrap();
        assert!(r.schedule.is_empty());
        assert!(matches!(delete_entry(&r, id), Err(Error::NotFound(_))));
        assert!(matches!(update_entry(&r, id, &changed), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_parse_weekday() {
        assert_eq!(parse_weekday("monday").unwrap(), Weekday::Mon);
        assert_eq!(parse_weekday("Fri").unwrap(), Weekday::Fri);
        assert!(parse_weekday("someday").is_err());
    }
}
