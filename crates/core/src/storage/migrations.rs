//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Rooms: one column group per independently written field group
            CREATE TABLE IF NOT EXISTS rooms (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'free',
                current_lecture TEXT,
                is_clean INTEGER NOT NULL DEFAULT 0,
                cleaned_by TEXT NOT NULL DEFAULT '',
                cleaned_at TEXT,
                employee_id TEXT NOT NULL DEFAULT '',
                facilities TEXT NOT NULL,
                schedule TEXT NOT NULL DEFAULT '[]'
            );

            -- Attendance is append-only
            CREATE TABLE IF NOT EXISTS attendance_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                room_id TEXT NOT NULL,
                timestamp TEXT NOT NULL,
                count INTEGER NOT NULL,
                logged_by TEXT NOT NULL,
                FOREIGN KEY (room_id) REFERENCES rooms(id) ON DELETE CASCADE
            );

            -- Audit log
            CREATE TABLE IF NOT EXISTS audit_records (
                id TEXT PRIMARY KEY,
                timestamp TEXT NOT NULL,
                room_name TEXT NOT NULL,
                actor TEXT NOT NULL,
                kind TEXT NOT NULL,
                message TEXT NOT NULL,
                details TEXT NOT NULL
            );

            -- Announcements
            CREATE TABLE IF NOT EXISTS announcements (
                id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                author TEXT NOT NULL,
                timestamp TEXT NOT NULL
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for query performance",
        sql: r#"
            CREATE INDEX IF NOT EXISTS idx_attendance_room ON attendance_records(room_id);
            CREATE INDEX IF NOT EXISTS idx_audit_timestamp ON audit_records(timestamp);
            CREATE INDEX IF NOT EXISTS idx_announcements_timestamp ON announcements(timestamp);
        "#,
    },
];

/// Initialize the migrations table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;
    info!(current_version, "Checking for pending migrations");

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn latest_version() -> u32 {
        MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
    }

    #[test]
    fn test_migrations_run() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    fn names(conn: &Connection, kind: &str) -> Vec<String> {
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type = ?1 AND name NOT LIKE 'sqlite_%' ORDER BY name")
            .unwrap();
        stmt.query_map([kind], |row| row.get(0))
            .unwrap()
            .collect::<rusqlite::Result<Vec<String>>>()
            .unwrap()
    }

    #[test]
    fn test_room_schema_created() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA foreign_keys = ON").unwrap();
        run_migrations(&conn).unwrap();

        assert_eq!(
            names(&conn, "table"),
            vec![
                "announcements",
                "attendance_records",
                "audit_records",
                "rooms",
                "schema_migrations"
            ]
        );
        assert_eq!(
            names(&conn, "index"),
            vec![
                "idx_announcements_timestamp",
                "idx_attendance_room",
                "idx_audit_timestamp"
            ]
        );

        // A bare room row defaults to free with an empty schedule
        conn.execute(
            "INSERT INTO rooms (id, name, facilities) VALUES ('LH-01', 'Hall 1', '{}')",
            [],
        )
        .unwrap();
        let (status, is_clean, schedule): (String, bool, String) = conn
            .query_row(
                "SELECT status, is_clean, schedule FROM rooms WHERE id = 'LH-01'",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .unwrap();
        assert_eq!((status.as_str(), is_clean, schedule.as_str()), ("free", false, "[]"));

        // Attendance must belong to an existing room
        let orphan = conn.execute(
            "INSERT INTO attendance_records (room_id, timestamp, count, logged_by)
             VALUES ('LH-99', '2024-03-04T09:00:00Z', 10, 'Admin')",
            [],
        );
        assert!(orphan.is_err());
    }

    #[test]
    fn test_migrations_sequential() {
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(
                migration.version as usize,
                i + 1,
                "Migration {} should have version {}",
                migration.description,
                i + 1
            );
        }
    }
}
