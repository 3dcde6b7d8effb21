//! Audit log storage
//!
//! Append-only. Records are never updated or deleted.

use rusqlite::{params, Connection};
use tracing::instrument;

use super::parse::{parse_datetime, parse_json, parse_uuid};
use crate::error::Result;
use crate::models::AuditRecord;

pub struct AuditStore<'a> {
    conn: &'a Connection,
}

impl<'a> AuditStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Append a validated record
    #[instrument(skip(self, record), fields(room = %record.room_name, kind = record.label()))]
    pub fn append(&self, record: &AuditRecord) -> Result<()> {
        record.event.validate()?;
        self.conn.execute(
            "INSERT INTO audit_records (id, timestamp, room_name, actor, kind, message, details)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.id.to_string(),
                record.timestamp.to_rfc3339(),
                record.room_name,
                record.actor,
                record.label(),
                record.message(),
                serde_json::to_string(&record.event)?,
            ],
        )?;
        Ok(())
    }

    /// Most recent records first
    #[instrument(skip(self))]
    pub fn recent(&self, limit: u32) -> Result<Vec<AuditRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, timestamp, room_name, actor, details
             FROM audit_records
             ORDER BY timestamp DESC, rowid DESC
             LIMIT ?1",
        )?;

        let records = stmt
            .query_map(params![limit], |row| {
                Ok(AuditRecord {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    timestamp: parse_datetime(&row.get::<_, String>(1)?)?,
                    room_name: row.get(2)?,
                    actor: row.get(3)?,
                    event: parse_json(&row.get::<_, String>(4)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(records)
    }

    pub fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM audit_records", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
