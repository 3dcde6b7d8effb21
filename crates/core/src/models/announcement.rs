//! Announcement model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub text: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
}

impl Announcement {
    pub fn new(text: String, author: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            author,
            timestamp,
        }
    }

    /// The announcement written when the room collection is first seeded
    pub fn welcome(timestamp: DateTime<Utc>) -> Self {
        Self::new(
            "Welcome to the new University Hall Management System!".to_string(),
            "Admin".to_string(),
            timestamp,
        )
    }
}
