//! Schedule matching - which recurring entries apply today
//!
//! Pure lookups used to suggest an action. Nothing here changes state.

use chrono::{DateTime, Datelike, TimeZone};

use crate::models::{Room, ScheduleEntry};

/// Entries running on the weekday of `now`, earliest start first.
///
/// Entries whose start time cannot be parsed sort after all others; ties keep
/// their schedule order.
pub fn todays_entries<'r, Tz: TimeZone>(room: &'r Room, now: &DateTime<Tz>) -> Vec<&'r ScheduleEntry> {
    let today = now.weekday();
    let mut entries: Vec<&ScheduleEntry> = room.schedule.iter().filter(|e| e.runs_on(today)).collect();
    // sort_by_key is stable
    entries.sort_by_key(|e| match e.lecture.start_minutes() {
        Some(minutes) => (false, minutes),
        None => (true, 0),
    });
    entries
}

/// The earliest entry for today, if any
pub fn next_entry_today<'r, Tz: TimeZone>(room: &'r Room, now: &DateTime<Tz>) -> Option<&'r ScheduleEntry> {
    todays_entries(room, now).into_iter().next()
}

/// True when `entry` belongs to the room and runs today
pub fn matches_today<Tz: TimeZone>(room: &Room, entry: &ScheduleEntry, now: &DateTime<Tz>) -> bool {
    todays_entries(room, now)
        .iter()
        .any(|e| e.schedule_id == entry.schedule_id)
}
