//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use chrono::{DateTime, TimeZone};

use crate::models::{CleaningStatus, Room, RoomStatus};

/// Validate that a room snapshot is internally consistent
pub fn assert_room_invariants(room: &Room) {
    // Name and id must not be empty
    debug_assert!(!room.id.trim().is_empty(), "Room has empty id");
    debug_assert!(
        !room.name.trim().is_empty(),
        "Room {} has empty name",
        room.id
    );

    // A lecture exists exactly when occupied
    debug_assert_eq!(
        room.current_lecture().is_some(),
        room.status() == RoomStatus::Occupied,
        "Room {} status {} disagrees with current lecture",
        room.id,
        room.status()
    );

    if let Some(lecture) = room.current_lecture() {
        debug_assert!(
            lecture.end_time >= lecture.start_time,
            "Room {} lecture {:?} ends before it starts",
            room.id,
            lecture.name
        );
    }

    if let CleaningStatus::Clean {
        cleaned_by,
        employee_id,
        ..
    } = &room.cleaning_status
    {
        debug_assert!(
            !cleaned_by.trim().is_empty() && !employee_id.trim().is_empty(),
            "Room {} is clean without a cleaner identity",
            room.id
        );
    }

    debug_assert!(
        room.facilities.has_unique_ac_ids(),
        "Room {} has duplicate AC unit ids",
        room.id
    );

    // Schedule ids are unique within a room
    let mut ids: Vec<_> = room.schedule.iter().map(|e| e.schedule_id).collect();
    ids.sort();
    debug_assert!(
        ids.windows(2).all(|w| w[0] != w[1]),
        "Room {} has duplicate schedule ids",
        room.id
    );
}

/// Validate that a reconciled room is not still clean from an earlier day
pub fn assert_cleaning_current<Tz: TimeZone>(room: &Room, now: &DateTime<Tz>) {
    if let Some(cleaned_at) = room.cleaning_status.cleaned_at() {
        let cleaned_day = cleaned_at.with_timezone(&now.timezone()).date_naive();
        debug_assert!(
            cleaned_day == now.date_naive(),
            "Room {} is still clean from {} on {}",
            room.id,
            cleaned_day,
            now.date_naive()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AcUnit, Facilities};
    use chrono::Utc;

    fn room() -> Room {
        Room::new(
            "LH-01".into(),
            "Hall 1".into(),
            Facilities::default(),
            Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_seeded_room_passes() {
        assert_room_invariants(&room());
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "duplicate AC unit ids")]
    fn test_duplicate_ac_ids_panic() {
        let mut r = room();
        let unit = AcUnit::new();
        r.facilities.ac_units = vec![unit.clone(), unit];
        assert_room_invariants(&r);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "still clean")]
    fn test_stale_clean_panics() {
        let r = room();
        let next_day = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        assert_cleaning_current(&r, &next_day);
    }
}
