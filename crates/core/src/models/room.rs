//! Room model - one snapshot of a physical hall

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{AttendanceRecord, CleaningStatus, Facilities, Lecture, Occupancy, RoomStatus, ScheduleEntry};

/// Immutable snapshot of one room as observed from the store.
///
/// Engine operations read a snapshot and return commands; they never mutate
/// the snapshot they were given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: String,
    pub name: String,
    pub occupancy: Occupancy,
    pub facilities: Facilities,
    pub cleaning_status: CleaningStatus,
    pub schedule: Vec<ScheduleEntry>,
    pub attendance_records: Vec<AttendanceRecord>,
}

impl Room {
    /// A freshly seeded room: free and clean as of `now`
    pub fn new(id: String, name: String, facilities: Facilities, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            occupancy: Occupancy::Free,
            facilities,
            cleaning_status: CleaningStatus::seeded(now),
            schedule: Vec::new(),
            attendance_records: Vec::new(),
        }
    }

    pub fn status(&self) -> RoomStatus {
        self.occupancy.status()
    }

    pub fn current_lecture(&self) -> Option<&Lecture> {
        self.occupancy.current_lecture()
    }

    pub fn find_schedule_entry(&self, schedule_id: Uuid) -> Option<&ScheduleEntry> {
        self.schedule.iter().find(|e| e.schedule_id == schedule_id)
    }

    /// Number embedded in the room name, used for display ordering
    pub fn hall_number(&self) -> Option<u32> {
        let digits: String = self
            .name
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    }

    /// Attendance records, most recent first
    pub fn attendance_most_recent_first(&self) -> Vec<&AttendanceRecord> {
        let mut records: Vec<&AttendanceRecord> = self.attendance_records.iter().collect();
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records
    }
}

/// Sort rooms for display by the number in their name; unnumbered rooms last
pub fn sort_for_display(rooms: &mut [Room]) {
    rooms.sort_by_key(|r| (r.hall_number().unwrap_or(u32::MAX), r.name.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn room(name: &str) -> Room {
        Room::new(
            name.to_lowercase(),
            name.to_string(),
            Facilities::default(),
            Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_new_room_is_free_and_clean() {
        let r = room("Hall 1");
        assert_eq!(r.status(), RoomStatus::Free);
        assert!(r.current_lecture().is_none());
        assert!(r.cleaning_status.is_clean());
    }

    #[test]
    fn test_display_order_is_numeric() {
        let mut rooms = vec![room("Hall 10"), room("Annex"), room("Hall 2"), room("Hall 1")];
        sort_for_display(&mut rooms);
        let names: Vec<&str> = rooms.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Hall 1", "Hall 2", "Hall 10", "Annex"]);
    }

    #[test]
    fn test_attendance_most_recent_first() {
        let mut r = room("Hall 3");
        for (hour, count) in [(9, 10), (11, 30), (10, 20)] {
            r.attendance_records.push(AttendanceRecord {
                timestamp: Utc.with_ymd_and_hms(2024, 3, 4, hour, 0, 0).unwrap(),
                count,
                logged_by: "Admin/Lecturer".into(),
            });
        }
        let counts: Vec<u32> = r.attendance_most_recent_first().iter().map(|a| a.count).collect();
        assert_eq!(counts, vec![30, 20, 10]);
    }
}
