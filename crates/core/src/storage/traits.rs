//! Storage repository traits
//!
//! These traits define the storage interface the host reads and reconciles
//! through, so it can run against SQLite or any other store holding the
//! shared room collection.

use crate::command::RoomCommand;
use crate::error::Result;
use crate::models::{Announcement, AuditRecord, Room};

/// Room repository operations
pub trait RoomRepository {
    /// All rooms in display order
    fn list_rooms(&self) -> Result<Vec<Room>>;

    /// Apply a batch of commands for one room atomically
    fn apply_commands(&self, room_id: &str, commands: &[RoomCommand]) -> Result<()>;
}

/// Audit log reads
pub trait AuditRepository {
    /// Most recent first, at most `limit`
    fn recent_audit(&self, limit: u32) -> Result<Vec<AuditRecord>>;
}

/// Announcement reads
pub trait AnnouncementRepository {
    /// Most recent first, at most `limit`
    fn recent_announcements(&self, limit: u32) -> Result<Vec<Announcement>>;
}
