//! Commands produced by the engine and applied to the shared store
//!
//! Every command is a last-writer-wins partial update scoped to one field
//! group of one room. Engine operations never write; they return `Effects`
//! which the host applies as a single atomic batch.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{
    AttendanceRecord, AuditEvent, AuditRecord, CleaningStatus, Facilities, Lecture, Occupancy,
    RequestEntry, Room, ScheduleEntry,
};

/// Field group a command writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldGroup {
    Occupancy,
    Cleaning,
    Facilities,
    Schedule,
    Attendance,
}

/// Status a room is left in when its lecture is cleared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vacancy {
    Free,
    Cleaning,
}

impl From<Vacancy> for Occupancy {
    fn from(v: Vacancy) -> Self {
        match v {
            Vacancy::Free => Occupancy::Free,
            Vacancy::Cleaning => Occupancy::Cleaning,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum RoomCommand {
    SetCleaningStatus {
        room_id: String,
        status: CleaningStatus,
    },
    SetCurrentLecture {
        room_id: String,
        lecture: Lecture,
    },
    ClearCurrentLecture {
        room_id: String,
        vacancy: Vacancy,
    },
    SetFacilities {
        room_id: String,
        facilities: Facilities,
    },
    AddScheduleEntry {
        room_id: String,
        entry: ScheduleEntry,
    },
    UpdateScheduleEntry {
        room_id: String,
        entry: ScheduleEntry,
    },
    DeleteScheduleEntry {
        room_id: String,
        schedule_id: Uuid,
    },
    AppendAttendanceRecord {
        room_id: String,
        record: AttendanceRecord,
    },
}

impl RoomCommand {
    pub fn room_id(&self) -> &str {
        match self {
            RoomCommand::SetCleaningStatus { room_id, .. }
            | RoomCommand::SetCurrentLecture { room_id, .. }
            | RoomCommand::ClearCurrentLecture { room_id, .. }
            | RoomCommand::SetFacilities { room_id, .. }
            | RoomCommand::AddScheduleEntry { room_id, .. }
            | RoomCommand::UpdateScheduleEntry { room_id, .. }
            | RoomCommand::DeleteScheduleEntry { room_id, .. }
            | RoomCommand::AppendAttendanceRecord { room_id, .. } => room_id,
        }
    }

    pub fn field_group(&self) -> FieldGroup {
        match self {
            RoomCommand::SetCleaningStatus { .. } => FieldGroup::Cleaning,
            RoomCommand::SetCurrentLecture { .. } | RoomCommand::ClearCurrentLecture { .. } => {
                FieldGroup::Occupancy
            }
            RoomCommand::SetFacilities { .. } => FieldGroup::Facilities,
            RoomCommand::AddScheduleEntry { .. }
            | RoomCommand::UpdateScheduleEntry { .. }
            | RoomCommand::DeleteScheduleEntry { .. } => FieldGroup::Schedule,
            RoomCommand::AppendAttendanceRecord { .. } => FieldGroup::Attendance,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            RoomCommand::SetCleaningStatus { .. } => "set_cleaning_status",
            RoomCommand::SetCurrentLecture { .. } => "set_current_lecture",
            RoomCommand::ClearCurrentLecture { .. } => "clear_current_lecture",
            RoomCommand::SetFacilities { .. } => "set_facilities",
            RoomCommand::AddScheduleEntry { .. } => "add_schedule_entry",
            RoomCommand::UpdateScheduleEntry { .. } => "update_schedule_entry",
            RoomCommand::DeleteScheduleEntry { .. } => "delete_schedule_entry",
            RoomCommand::AppendAttendanceRecord { .. } => "append_attendance_record",
        }
    }
}

impl Room {
    /// Apply a command to this replica in place
    pub fn apply(&mut self, command: &RoomCommand) -> Result<()> {
        if command.room_id() != self.id {
            return Err(Error::InvalidOperation(format!(
                "{} for room {} applied to room {}",
                command.name(),
                command.room_id(),
                self.id
            )));
        }

        match command {
            RoomCommand::SetCleaningStatus { status, .. } => {
                self.cleaning_status = status.clone();
            }
            RoomCommand::SetCurrentLecture { lecture, .. } => {
                self.occupancy = Occupancy::Occupied {
                    lecture: lecture.clone(),
                };
            }
            RoomCommand::ClearCurrentLecture { vacancy, .. } => {
                self.occupancy = (*vacancy).into();
            }
            RoomCommand::SetFacilities { facilities, .. } => {
                self.facilities = facilities.clone();
            }
            RoomCommand::AddScheduleEntry { entry, .. } => {
                if self.find_schedule_entry(entry.schedule_id).is_some() {
                    return Err(Error::InvalidOperation(format!(
                        "schedule entry {} already exists",
                        entry.schedule_id
                    )));
                }
                self.schedule.push(entry.clone());
            }
            RoomCommand::UpdateScheduleEntry { entry, .. } => {
                let slot = self
                    .schedule
                    .iter_mut()
                    .find(|e| e.schedule_id == entry.schedule_id)
                    .ok_or_else(|| Error::NotFound(format!("schedule entry {}", entry.schedule_id)))?;
                *slot = entry.clone();
            }
            RoomCommand::DeleteScheduleEntry { schedule_id, .. } => {
                self.schedule.retain(|e| e.schedule_id != *schedule_id);
            }
            RoomCommand::AppendAttendanceRecord { record, .. } => {
                self.attendance_records.push(record.clone());
            }
        }
        Ok(())
    }
}

/// Everything an operation wants done, applied by the host as one batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Effects {
    pub commands: Vec<RoomCommand>,
    pub audit: Vec<AuditRecord>,
    pub requests: Vec<RequestEntry>,
}

impl Effects {
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.audit.is_empty() && self.requests.is_empty()
    }

    pub fn merge(mut self, other: Effects) -> Self {
        self.commands.extend(other.commands);
        self.audit.extend(other.audit);
        self.requests.extend(other.requests);
        self
    }

    /// The snapshot that results from applying these commands to `room`
    pub fn applied_to(&self, room: &Room) -> Result<Room> {
        let mut next = room.clone();
        for command in &self.commands {
            next.apply(command)?;
        }
        crate::invariants::assert_room_invariants(&next);
        Ok(next)
    }
}

/// Time and identity an operation runs under.
///
/// `now` carries the deployment timezone, so calendar dates and weekdays
/// are evaluated in local time.
#[derive(Debug, Clone, Copy)]
pub struct OpContext<'a> {
    pub now: DateTime<FixedOffset>,
    pub actor: &'a str,
}

impl<'a> OpContext<'a> {
    pub fn new(now: DateTime<FixedOffset>, actor: &'a str) -> Self {
        Self { now, actor }
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.now.with_timezone(&Utc)
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn weekday(&self) -> Weekday {
        self.now.weekday()
    }

    /// Build a validated audit record stamped with this context
    pub fn audit(&self, room: &Room, event: AuditEvent) -> Result<AuditRecord> {
        AuditRecord::new(&room.name, event, self.actor, self.now_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn room() -> Room {
        Room::new(
            "LH-01".into(),
            "Hall 1".into(),
            Facilities::default(),
            Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_apply_rejects_foreign_room() {
        let mut r = room();
        let cmd = RoomCommand::SetCleaningStatus {
            room_id: "LH-02".into(),
            status: CleaningStatus::Dirty,
        };
        assert!(matches!(r.apply(&cmd), Err(Error::InvalidOperation(_))));
        assert!(r.cleaning_status.is_clean());
    }

    #[test]
    fn test_clear_lecture_into_cleaning() {
        let mut r = room();
        r.apply(&RoomCommand::ClearCurrentLecture {
            room_id: "LH-01".into(),
            vacancy: Vacancy::Cleaning,
        })
        .unwrap();
        assert_eq!(r.occupancy, Occupancy::Cleaning);
    }

    #[test]
    fn test_field_groups() {
        let cmd = RoomCommand::DeleteScheduleEntry {
            room_id: "LH-01".into(),
            schedule_id: Uuid::new_v4(),
        };
        assert_eq!(cmd.field_group(), FieldGroup::Schedule);
        assert_eq!(cmd.name(), "delete_schedule_entry");
    }

    #[test]
    fn test_update_unknown_schedule_entry() {
        let mut r = room();
        let entry = ScheduleEntry {
            schedule_id: Uuid::new_v4(),
            days: vec![Weekday::Mon],
            lecture: crate::models::ScheduledLecture {
                name: "Physics".into(),
                lecturer: "Dr. Y".into(),
                subject_codes: "PH101".into(),
                duration_hours: 1.0,
                start_time: "10:00".into(),
            },
        };
        let cmd = RoomCommand::UpdateScheduleEntry {
            room_id: "LH-01".into(),
            entry,
        };
        assert!(matches!(r.apply(&cmd), Err(Error::NotFound(_))));
    }
}
