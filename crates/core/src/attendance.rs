//! Attendance logging

use crate::command::{Effects, OpContext, RoomCommand};
use crate::error::{Error, Result};
use crate::models::{AttendanceRecord, AuditEvent, Room};

/// Default author for attendance records
pub const DEFAULT_LOGGED_BY: &str = "Admin/Lecturer";

/// Append a head count to the room's attendance log
pub fn log_attendance(room: &Room, count: i64, logged_by: &str, ctx: &OpContext<'_>) -> Result<Effects> {
    let count = u32::try_from(count)
        .map_err(|_| Error::Validation(format!("attendance count must be a non-negative number, got {}", count)))?;
    let logged_by = match logged_by.trim() {
        "" => DEFAULT_LOGGED_BY,
        name => name,
    };

    Ok(Effects {
        commands: vec![RoomCommand::AppendAttendanceRecord {
            room_id: room.id.clone(),
            record: AttendanceRecord {
                timestamp: ctx.now_utc(),
                count,
                logged_by: logged_by.to_string(),
            },
        }],
        audit: vec![ctx.audit(room, AuditEvent::AttendanceLogged { count })?],
        requests: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Facilities;
    use chrono::{FixedOffset, TimeZone, Utc};

    fn ctx() -> OpContext<'static> {
        let now = FixedOffset::east_opt(3 * 3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 4, 11, 0, 0)
            .unwrap();
        OpContext::new(now, "tester")
    }

    fn room() -> Room {
        Room::new("LH-04".into(), "Hall 4".into(), Facilities::default(), Utc::now())
    }

    #[test]
    fn test_log_attendance() {
        let r = room();
        let effects = log_attendance(&r, 37, "", &ctx()).unwrap();
        let next = effects.applied_to(&r).unwrap();

        let record = &next.attendance_records[0];
        assert_eq!(record.count, 37);
        assert_eq!(record.logged_by, DEFAULT_LOGGED_BY);
        assert_eq!(record.timestamp, Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap());
        assert_eq!(effects.audit[0].message(), "Logged attendance: 37 students.");
    }

    #[test]
    fn test_zero_is_allowed_negative_is_not() {
        let r = room();
        assert!(log_attendance(&r, 0, "Dr. X", &ctx()).is_ok());
        assert!(matches!(
            log_attendance(&r, -1, "Dr. X", &ctx()),
            Err(Error::Validation(_))
        ));
    }
}
