//! Announcement storage

use rusqlite::{params, Connection};
use tracing::instrument;

use super::parse::{parse_datetime, parse_uuid};
use crate::error::Result;
use crate::models::Announcement;

pub struct AnnouncementStore<'a> {
    conn: &'a Connection,
}

impl<'a> AnnouncementStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    #[instrument(skip(self, announcement), fields(author = %announcement.author))]
    pub fn create(&self, announcement: &Announcement) -> Result<()> {
        self.conn.execute(
            "INSERT INTO announcements (id, text, author, timestamp) VALUES (?1, ?2, ?3, ?4)",
            params![
                announcement.id.to_string(),
                announcement.text,
                announcement.author,
                announcement.timestamp.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    /// Newest first
    #[instrument(skip(self))]
    pub fn recent(&self, limit: u32) -> Result<Vec<Announcement>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, text, author, timestamp FROM announcements
             ORDER BY timestamp DESC LIMIT ?1",
        )?;
        let announcements = stmt
            .query_map(params![limit], |row| {
                Ok(Announcement {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    text: row.get(1)?,
                    author: row.get(2)?,
                    timestamp: parse_datetime(&row.get::<_, String>(3)?)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(announcements)
    }
}
