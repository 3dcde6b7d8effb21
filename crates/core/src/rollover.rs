//! Daily cleanliness rollover
//!
//! A room cleaned on an earlier calendar day is dirty today. The check is a
//! pure function of the snapshot and the current time, so any number of
//! observers may run it concurrently and re-running it is harmless. A failed
//! write is not retried here: the next observation detects the same stale
//! state and produces the same command again.

use chrono::{DateTime, TimeZone};
use tracing::debug;

use crate::command::RoomCommand;
use crate::invariants;
use crate::models::{CleaningStatus, Room};

/// Produce the dirty-reset command for `room` if its cleaning is stale.
///
/// Calendar dates are compared in the timezone carried by `now`.
pub fn reconcile<Tz: TimeZone>(room: &Room, now: &DateTime<Tz>) -> Option<RoomCommand> {
    let cleaned_at = room.cleaning_status.cleaned_at()?;
    let cleaned_day = cleaned_at.with_timezone(&now.timezone()).date_naive();
    if cleaned_day == now.date_naive() {
        invariants::assert_cleaning_current(room, now);
        return None;
    }

    debug!(room_id = %room.id, cleaned_day = %cleaned_day, "Cleaning is stale, resetting to dirty");
    Some(RoomCommand::SetCleaningStatus {
        room_id: room.id.clone(),
        status: CleaningStatus::Dirty,
    })
}

/// Reconcile every room in a snapshot set
pub fn reconcile_all<'r, Tz, I>(rooms: I, now: &DateTime<Tz>) -> Vec<RoomCommand>
where
    Tz: TimeZone,
    I: IntoIterator<Item = &'r Room>,
{
    rooms.into_iter().filter_map(|room| reconcile(room, now)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Facilities, Lecture, Occupancy, RoomStatus};
    use chrono::{Duration, FixedOffset, Utc};

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn room_cleaned_at(cleaned_at: DateTime<Utc>) -> Room {
        let mut room = Room::new("LH-01".into(), "Hall 1".into(), Facilities::default(), cleaned_at);
        room.cleaning_status = CleaningStatus::clean("Sam", "E-7", cleaned_at);
        room
    }

    fn apply(room: &Room, cmd: Option<RoomCommand>) -> Room {
        let mut next = room.clone();
        if let Some(cmd) = cmd {
            next.apply(&cmd).unwrap();
        }
        next
    }

    #[test]
    fn test_yesterday_becomes_dirty() {
        let now = tz().with_ymd_and_hms(2024, 3, 5, 7, 30, 0).unwrap();
        let room = room_cleaned_at(Utc.with_ymd_and_hms(2024, 3, 4, 16, 0, 0).unwrap());

        let next = apply(&room, reconcile(&room, &now));
        assert_eq!(next.status(), RoomStatus::Free);
        assert!(!next.cleaning_status.is_clean());
        assert_eq!(next.cleaning_status.cleaned_at(), None);
        assert_eq!(next.cleaning_status.cleaned_by(), "");
        assert_eq!(next.cleaning_status.employee_id(), "");
    }

    #[test]
    fn test_cleaned_today_untouched() {
        let now = tz().with_ymd_and_hms(2024, 3, 5, 18, 0, 0).unwrap();
        let room = room_cleaned_at(Utc.with_ymd_and_hms(2024, 3, 5, 0, 5, 0).unwrap());
        assert!(reconcile(&room, &now).is_none());
    }

    #[test]
    fn test_dirty_room_is_noop() {
        let now = tz().with_ymd_and_hms(2024, 3, 5, 7, 0, 0).unwrap();
        let mut room = room_cleaned_at(Utc::now());
        room.cleaning_status = CleaningStatus::Dirty;
        assert!(reconcile(&room, &now).is_none());
    }

    #[test]
    fn test_idempotent() {
        let now = tz().with_ymd_and_hms(2024, 3, 5, 7, 0, 0).unwrap();
        let room = room_cleaned_at(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());

        let once = apply(&room, reconcile(&room, &now));
        let twice = apply(&once, reconcile(&once, &now));
        assert_eq!(once, twice);
        assert!(reconcile(&once, &now).is_none());
    }

    #[test]
    fn test_date_compared_in_deployment_timezone() {
        // Cleaned 22:00 UTC on the 4th = 00:00 on the 5th in UTC+02:00
        let cleaned = Utc.with_ymd_and_hms(2024, 3, 4, 22, 0, 0).unwrap();
        let room = room_cleaned_at(cleaned);
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();
        let now_local = plus_two.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        assert!(reconcile(&room, &now_local).is_none());

        let now_utc = now_local.with_timezone(&Utc);
        assert!(reconcile(&room, &now_utc).is_some());
    }

    #[test]
    fn test_occupancy_is_never_touched() {
        let now = tz().with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        let mut room = room_cleaned_at(now.with_timezone(&Utc) - Duration::days(1));
        room.occupancy = Occupancy::Occupied {
            lecture: Lecture::new(
                "Algorithms".into(),
                "Dr. X".into(),
                "CS201".into(),
                20,
                2.0,
                now.with_timezone(&Utc),
                false,
            )
            .unwrap(),
        };
        let next = apply(&room, reconcile(&room, &now));
        assert_eq!(next.occupancy, room.occupancy);
        assert!(!next.cleaning_status.is_clean());
    }

    #[test]
    fn test_reconcile_all_only_stale_rooms() {
        let now = tz().with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        let fresh = room_cleaned_at(now.with_timezone(&Utc));
        let mut stale = room_cleaned_at(now.with_timezone(&Utc) - Duration::days(2));
        stale.id = "LH-02".into();
        let commands = reconcile_all([&fresh, &stale], &now);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].room_id(), "LH-02");
    }
}
