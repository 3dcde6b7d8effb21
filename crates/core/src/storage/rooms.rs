//! Room storage operations
//!
//! Each command rewrites only the columns of its own field group, so
//! concurrent writers touching different groups never clobber each other.

use rusqlite::{params, Connection, Row};
use tracing::{debug, instrument};

use super::parse::{parse_cleaning, parse_datetime, parse_json, parse_occupancy, OptionalExt};
use crate::command::RoomCommand;
use crate::error::{Error, Result};
use crate::models::{sort_for_display, AttendanceRecord, Room, ScheduleEntry};

const ROOM_COLUMNS: &str = "id, name, status, current_lecture, is_clean, cleaned_by, cleaned_at, employee_id, facilities, schedule";

pub struct RoomStore<'a> {
    conn: &'a Connection,
}

impl<'a> RoomStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Insert a new room with its attendance history
    #[instrument(skip(self, room), fields(room_id = %room.id))]
    pub fn insert(&self, room: &Room) -> Result<()> {
        let lecture = room.current_lecture().map(serde_json::to_string).transpose()?;
        self.conn.execute(
            "INSERT INTO rooms (id, name, status, current_lecture, is_clean, cleaned_by, cleaned_at, employee_id, facilities, schedule)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                room.id,
                room.name,
                room.status().as_str(),
                lecture,
                room.cleaning_status.is_clean(),
                room.cleaning_status.cleaned_by(),
                room.cleaning_status.cleaned_at().map(|t| t.to_rfc3339()),
                room.cleaning_status.employee_id(),
                serde_json::to_string(&room.facilities)?,
                serde_json::to_string(&room.schedule)?,
            ],
        )?;
        for record in &room.attendance_records {
            append_attendance(self.conn, &room.id, record)?;
        }
        Ok(())
    }

    /// Find a room by id
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: &str) -> Result<Option<Room>> {
        let sql = format!("SELECT {} FROM rooms WHERE id = ?1", ROOM_COLUMNS);
        let room = self
            .conn
            .query_row(&sql, params![id], room_from_row)
            .optional()?;

        match room {
            Some(mut room) => {
                room.attendance_records = self.attendance_for(&room.id)?;
                Ok(Some(room))
            }
            None => Ok(None),
        }
    }

    /// Find a room by id or by display name
    #[instrument(skip(self))]
    pub fn find(&self, key: &str) -> Result<Option<Room>> {
        if let Some(room) = self.find_by_id(key)? {
            return Ok(Some(room));
        }
        let id: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM rooms WHERE name = ?1 COLLATE NOCASE",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match id {
            Some(id) => self.find_by_id(&id),
            None => Ok(None),
        }
    }

    /// All rooms, in display order
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<Room>> {
        let sql = format!("SELECT {} FROM rooms", ROOM_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let mut rooms = stmt
            .query_map([], room_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        for room in &mut rooms {
            room.attendance_records = self.attendance_for(&room.id)?;
        }
        sort_for_display(&mut rooms);
        Ok(rooms)
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM rooms", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Apply a batch of commands for one room as a single transaction
    #[instrument(skip(self, commands), fields(commands = commands.len()))]
    pub fn apply(&self, room_id: &str, commands: &[RoomCommand]) -> Result<()> {
        if let Some(stray) = commands.iter().find(|c| c.room_id() != room_id) {
            return Err(Error::InvalidOperation(format!(
                "{} for room {} in a batch for room {}",
                stray.name(),
                stray.room_id(),
                room_id
            )));
        }

        let tx = self.conn.unchecked_transaction()?;
        for command in commands {
            apply_command(&tx, command)?;
        }
        tx.commit()?;
        Ok(())
    }

    fn attendance_for(&self, room_id: &str) -> Result<Vec<AttendanceRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT timestamp, count, logged_by FROM attendance_records
             WHERE room_id = ?1 ORDER BY id",
        )?;
        let records = stmt
            .query_map(params![room_id], |row| {
                Ok(AttendanceRecord {
                    timestamp: parse_datetime(&row.get::<_, String>(0)?)?,
                    count: row.get(1)?,
                    logged_by: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }
}

fn room_from_row(row: &Row<'_>) -> rusqlite::Result<Room> {
    Ok(Room {
        id: row.get(0)?,
        name: row.get(1)?,
        occupancy: parse_occupancy(&row.get::<_, String>(2)?, row.get(3)?)?,
        cleaning_status: parse_cleaning(row.get(4)?, row.get(5)?, row.get(6)?, row.get(7)?)?,
        facilities: parse_json(&row.get::<_, String>(8)?)?,
        schedule: parse_json(&row.get::<_, String>(9)?)?,
        attendance_records: Vec::new(),
    })
}

/// Write one command. Callers own the surrounding transaction.
pub(crate) fn apply_command(conn: &Connection, command: &RoomCommand) -> Result<()> {
    let room_id = command.room_id();
    debug!(room_id, command = command.name(), "Applying command");

    let updated = match command {
        RoomCommand::SetCleaningStatus { status, .. } => conn.execute(
            "UPDATE rooms SET is_clean = ?1, cleaned_by = ?2, cleaned_at = ?3, employee_id = ?4 WHERE id = ?5",
            params![
                status.is_clean(),
                status.cleaned_by(),
                status.cleaned_at().map(|t| t.to_rfc3339()),
                status.employee_id(),
                room_id,
            ],
        )?,
        RoomCommand::SetCurrentLecture { lecture, .. } => conn.execute(
            "UPDATE rooms SET status = 'occupied', current_lecture = ?1 WHERE id = ?2",
            params![serde_json::to_string(lecture)?, room_id],
        )?,
        RoomCommand::ClearCurrentLecture { vacancy, .. } => {
            let status = crate::models::Occupancy::from(*vacancy).status();
            conn.execute(
                "UPDATE rooms SET status = ?1, current_lecture = NULL WHERE id = ?2",
                params![status.as_str(), room_id],
            )?
        }
        RoomCommand::SetFacilities { facilities, .. } => conn.execute(
            "UPDATE rooms SET facilities = ?1 WHERE id = ?2",
            params![serde_json::to_string(facilities)?, room_id],
        )?,
        RoomCommand::AddScheduleEntry { entry, .. } => {
            let mut schedule = load_schedule(conn, room_id)?;
            if schedule.iter().any(|e| e.schedule_id == entry.schedule_id) {
                return Err(Error::InvalidOperation(format!(
                    "schedule entry {} already exists",
                    entry.schedule_id
                )));
            }
            schedule.push(entry.clone());
            store_schedule(conn, room_id, &schedule)?
        }
        RoomCommand::UpdateScheduleEntry { entry, .. } => {
            let mut schedule = load_schedule(conn, room_id)?;
            let slot = schedule
                .iter_mut()
                .find(|e| e.schedule_id == entry.schedule_id)
                .ok_or_else(|| Error::NotFound(format!("schedule entry {}", entry.schedule_id)))?;
            *slot = entry.clone();
            store_schedule(conn, room_id, &schedule)?
        }
        RoomCommand::DeleteScheduleEntry { schedule_id, .. } => {
            let mut schedule = load_schedule(conn, room_id)?;
            schedule.retain(|e| e.schedule_id != *schedule_id);
            store_schedule(conn, room_id, &schedule)?
        }
        RoomCommand::AppendAttendanceRecord { record, .. } => {
            ensure_exists(conn, room_id)?;
            append_attendance(conn, room_id, record)?
        }
    };

    if updated == 0 {
        return Err(Error::NotFound(format!("room {}", room_id)));
    }
    Ok(())
}

fn ensure_exists(conn: &Connection, room_id: &str) -> Result<()> {
    let exists: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM rooms WHERE id = ?1)",
        params![room_id],
        |row| row.get(0),
    )?;
    if exists {
        Ok(())
    } else {
        Err(Error::NotFound(format!("room {}", room_id)))
    }
}

fn load_schedule(conn: &Connection, room_id: &str) -> Result<Vec<ScheduleEntry>> {
    let json: Option<String> = conn
        .query_row(
            "SELECT schedule FROM rooms WHERE id = ?1",
            params![room_id],
            |row| row.get(0),
        )
        .optional()?;
    let json = json.ok_or_else(|| Error::NotFound(format!("room {}", room_id)))?;
    Ok(serde_json::from_str(&json)?)
}

fn store_schedule(conn: &Connection, room_id: &str, schedule: &[ScheduleEntry]) -> Result<usize> {
    Ok(conn.execute(
        "UPDATE rooms SET schedule = ?1 WHERE id = ?2",
        params![serde_json::to_string(schedule)?, room_id],
    )?)
}

fn append_attendance(conn: &Connection, room_id: &str, record: &AttendanceRecord) -> Result<usize> {
    Ok(conn.execute(
        "INSERT INTO attendance_records (room_id, timestamp, count, logged_by) VALUES (?1, ?2, ?3, ?4)",
        params![
            room_id,
            record.timestamp.to_rfc3339(),
            record.count,
            record.logged_by,
        ],
    )?)
}
