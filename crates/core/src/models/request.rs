//! Operational requests and notifications

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    /// Free-form request routed to a department
    General,
    /// Critical issue e-mailed to a responsible person
    Special,
    /// A scheduled lecture did not take place
    ScheduledLectureCanceled,
}

impl RequestKind {
    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::General => "General Request",
            RequestKind::Special => "Special Request (Email)",
            RequestKind::ScheduledLectureCanceled => "Scheduled Lecture Canceled",
        }
    }

    pub fn default_department(&self) -> &'static str {
        match self {
            RequestKind::General | RequestKind::Special => "Administration",
            RequestKind::ScheduledLectureCanceled => "Academic Affairs",
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A request as shown in the recent-requests panel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEntry {
    pub room_name: String,
    pub kind: RequestKind,
    pub message: String,
    pub time: DateTime<Utc>,
    pub department: String,
    pub email_recipient: Option<String>,
}
