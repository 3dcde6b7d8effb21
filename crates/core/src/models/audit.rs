//! Audit records - one immutable entry per state-changing action

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RequestKind;
use crate::error::{Error, Result};

/// Every kind of action that is written to the audit log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuditEvent {
    LectureStarted {
        lecture_name: String,
        lecturer: String,
    },
    LectureEnded {
        lecture_name: String,
    },
    ScheduledLectureStarted {
        lecture_name: String,
    },
    ScheduledLectureSkipped {
        lecture_name: String,
    },
    CleaningCompleted {
        cleaned_by: String,
        employee_id: String,
        notes: String,
    },
    AttendanceLogged {
        count: u32,
    },
    RequestSent {
        request_kind: RequestKind,
        message: String,
        department: String,
        email_recipient: Option<String>,
    },
}

impl AuditEvent {
    /// Display label for the record type column
    pub fn label(&self) -> &'static str {
        match self {
            AuditEvent::LectureStarted { .. } => "Lecture Start",
            AuditEvent::LectureEnded { .. } => "Lecture End",
            AuditEvent::ScheduledLectureStarted { .. } => "Scheduled Lecture Start",
            AuditEvent::ScheduledLectureSkipped { .. } => "Scheduled Lecture Skipped",
            AuditEvent::CleaningCompleted { .. } => "Cleaning",
            AuditEvent::AttendanceLogged { .. } => "Attendance Log",
            AuditEvent::RequestSent { request_kind, .. } => request_kind.label(),
        }
    }

    /// Human readable summary
    pub fn message(&self) -> String {
        match self {
            AuditEvent::LectureStarted {
                lecture_name,
                lecturer,
            } => format!("Started: \"{}\" by {}.", lecture_name, lecturer),
            AuditEvent::LectureEnded { lecture_name } => {
                format!("Ended: \"{}\". Hall is now free.", lecture_name)
            }
            AuditEvent::ScheduledLectureStarted { lecture_name } => {
                format!("Scheduled lecture \"{}\" started.", lecture_name)
            }
            AuditEvent::ScheduledLectureSkipped { lecture_name } => {
                format!("Scheduled lecture \"{}\" was skipped.", lecture_name)
            }
            AuditEvent::CleaningCompleted { cleaned_by, .. } => format!("Cleaned by {}.", cleaned_by),
            AuditEvent::AttendanceLogged { count } => {
                format!("Logged attendance: {} students.", count)
            }
            AuditEvent::RequestSent { message, .. } => message.clone(),
        }
    }

    /// Reject events with missing identity fields
    pub fn validate(&self) -> Result<()> {
        let required: Vec<(&str, &str)> = match self {
            AuditEvent::LectureStarted {
                lecture_name,
                lecturer,
            } => vec![("lecture name", lecture_name.as_str()), ("lecturer", lecturer.as_str())],
            AuditEvent::LectureEnded { lecture_name }
            | AuditEvent::ScheduledLectureStarted { lecture_name }
            | AuditEvent::ScheduledLectureSkipped { lecture_name } => vec![("lecture name", lecture_name.as_str())],
            AuditEvent::CleaningCompleted {
                cleaned_by,
                employee_id,
                ..
            } => vec![("cleaner name", cleaned_by.as_str()), ("employee id", employee_id.as_str())],
            AuditEvent::AttendanceLogged { .. } => Vec::new(),
            AuditEvent::RequestSent {
                message,
                department,
                ..
            } => vec![("message", message.as_str()), ("department", department.as_str())],
        };

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(Error::Validation(format!(
                    "{} record requires a {}",
                    self.label(),
                    field
                )));
            }
        }
        Ok(())
    }
}

/// An immutable, timestamped audit entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub room_name: String,
    /// Who performed the action
    pub actor: String,
    pub event: AuditEvent,
}

impl AuditRecord {
    /// Create a record, validating the event first
    pub fn new(room_name: &str, event: AuditEvent, actor: &str, timestamp: DateTime<Utc>) -> Result<Self> {
        event.validate()?;
        if room_name.trim().is_empty() {
            return Err(Error::Validation("audit record requires a room name".into()));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            timestamp,
            room_name: room_name.to_string(),
            actor: actor.to_string(),
            event,
        })
    }

    pub fn label(&self) -> &'static str {
        self.event.label()
    }

    pub fn message(&self) -> String {
        self.event.message()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_and_messages() {
        let event = AuditEvent::LectureStarted {
            lecture_name: "Algorithms".into(),
            lecturer: "Dr. X".into(),
        };
        assert_eq!(event.label(), "Lecture Start");
        assert_eq!(event.message(), "Started: \"Algorithms\" by Dr. X.");

        let request = AuditEvent::RequestSent {
            request_kind: RequestKind::Special,
            message: "Projector broken".into(),
            department: "Administration".into(),
            email_recipient: Some("responsible.person@university.edu".into()),
        };
        assert_eq!(request.label(), "Special Request (Email)");
        assert_eq!(request.message(), "Projector broken");
    }

    #[test]
    fn test_validation_rejects_blank_fields() {
        let event = AuditEvent::CleaningCompleted {
            cleaned_by: "  ".into(),
            employee_id: "E-1".into(),
            notes: String::new(),
        };
        assert!(matches!(event.validate(), Err(Error::Validation(_))));
        assert!(AuditRecord::new("Hall 1", event, "op", Utc::now()).is_err());
    }

    #[test]
    fn test_record_requires_room_name() {
        let event = AuditEvent::AttendanceLogged { count: 3 };
        assert!(AuditRecord::new("", event.clone(), "op", Utc::now()).is_err());
        let record = AuditRecord::new("Hall 1", event, "op", Utc::now()).unwrap();
        assert_eq!(record.message(), "Logged attendance: 3 students.");
    }

    #[test]
    fn test_event_json_is_tagged() {
        let json = serde_json::to_value(AuditEvent::LectureEnded {
            lecture_name: "Physics".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "lecture_ended");
    }
}
