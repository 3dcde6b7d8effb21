//! SQLite storage layer for hallkeep

mod announcements;
mod audit;
mod migrations;
mod parse;
mod rooms;
mod traits;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use std::path::Path;
use tracing::{info, instrument};

use crate::command::{Effects, RoomCommand};
use crate::error::{Error, Result};
use crate::models::{Announcement, AuditRecord, Room};
use crate::seed;

pub use announcements::AnnouncementStore;
pub use audit::AuditStore;
pub use rooms::RoomStore;
pub use traits::{AnnouncementRepository, AuditRepository, RoomRepository};

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    pub fn rooms(&self) -> RoomStore<'_> {
        RoomStore::new(&self.conn)
    }

    pub fn audit(&self) -> AuditStore<'_> {
        AuditStore::new(&self.conn)
    }

    pub fn announcements(&self) -> AnnouncementStore<'_> {
        AnnouncementStore::new(&self.conn)
    }

    /// Create the initial room collection and welcome announcement.
    ///
    /// Does nothing if any room exists. Returns whether seeding happened.
    #[instrument(skip(self))]
    pub fn seed_if_empty(&self, now: DateTime<Utc>, room_count: u32) -> Result<bool> {
        let tx = self.conn.unchecked_transaction()?;
        if RoomStore::new(&tx).count()? > 0 {
            return Ok(false);
        }

        let rooms = seed::seed_rooms(room_count, now, &mut rand::thread_rng());
        for room in &rooms {
            RoomStore::new(&tx).insert(room)?;
        }
        AnnouncementStore::new(&tx).create(&Announcement::welcome(now))?;
        tx.commit()?;

        info!(rooms = rooms.len(), "Seeded room collection");
        Ok(true)
    }

    /// Write an operation's commands and audit records in one transaction.
    ///
    /// Requests are not stored here; they belong to the caller's ledger and
    /// are already mirrored in the audit records.
    #[instrument(skip(self, effects), fields(commands = effects.commands.len(), audit = effects.audit.len()))]
    pub fn apply_effects(&self, effects: &Effects) -> Result<()> {
        let tx = self.conn.unchecked_transaction()?;
        for command in &effects.commands {
            rooms::apply_command(&tx, command)?;
        }
        let audit = AuditStore::new(&tx);
        for record in &effects.audit {
            audit.append(record)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Load a room or fail with `NotFound`
    pub fn require_room(&self, key: &str) -> Result<Room> {
        self.rooms()
            .find(key)?
            .ok_or_else(|| Error::NotFound(format!("room {}", key)))
    }
}

// Implement repository traits for Database

impl RoomRepository for Database {
    fn list_rooms(&self) -> Result<Vec<Room>> {
        self.rooms().list()
    }

    fn apply_commands(&self, room_id: &str, commands: &[RoomCommand]) -> Result<()> {
        self.rooms().apply(room_id, commands)
    }
}

impl AuditRepository for Database {
    fn recent_audit(&self, limit: u32) -> Result<Vec<AuditRecord>> {
        self.audit().recent(limit)
    }
}

impl AnnouncementRepository for Database {
    fn recent_announcements(&self, limit: u32) -> Result<Vec<Announcement>> {
        self.announcements().recent(limit)
    }
}
