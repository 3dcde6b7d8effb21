//! Attendance log entries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One logged head count; the list is append-only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    pub timestamp: DateTime<Utc>,
    pub count: u32,
    pub logged_by: String,
}
