//! Daily cleanliness state of a room

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cleanliness of a room.
///
/// A clean room always carries who cleaned it and when; a dirty room carries
/// nothing. Only the rollover reconciler turns a stale `Clean` into `Dirty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CleaningStatus {
    Clean {
        cleaned_by: String,
        employee_id: String,
        cleaned_at: DateTime<Utc>,
    },
    Dirty,
}

impl CleaningStatus {
    pub fn clean(cleaned_by: impl Into<String>, employee_id: impl Into<String>, cleaned_at: DateTime<Utc>) -> Self {
        CleaningStatus::Clean {
            cleaned_by: cleaned_by.into(),
            employee_id: employee_id.into(),
            cleaned_at,
        }
    }

    /// Status written by the seeding operation
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self::clean("System", "AUTO", now)
    }

    pub fn is_clean(&self) -> bool {
        matches!(self, CleaningStatus::Clean { .. })
    }

    pub fn cleaned_at(&self) -> Option<DateTime<Utc>> {
        match self {
            CleaningStatus::Clean { cleaned_at, .. } => Some(*cleaned_at),
            CleaningStatus::Dirty => None,
        }
    }

    /// Cleaner name, empty when dirty
    pub fn cleaned_by(&self) -> &str {
        match self {
            CleaningStatus::Clean { cleaned_by, .. } => cleaned_by,
            CleaningStatus::Dirty => "",
        }
    }

    /// Employee id, empty when dirty
    pub fn employee_id(&self) -> &str {
        match self {
            CleaningStatus::Clean { employee_id, .. } => employee_id,
            CleaningStatus::Dirty => "",
        }
    }

    pub fn display_name(&self) -> &'static str {
        if self.is_clean() {
            "Clean"
        } else {
            "Dirty"
        }
    }
}
