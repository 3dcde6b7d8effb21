//! Hallkeep Core Library
//!
//! Room state reconciliation for lecture halls: occupancy lifecycle, daily
//! cleanliness rollover, weekly schedule matching, facility editing, and the
//! audit and request logs. Operations are pure functions over room snapshots
//! that return commands; the SQLite store applies them.

pub mod attendance;
pub mod command;
pub mod editor;
pub mod error;
pub mod invariants;
pub mod lifecycle;
pub mod matcher;
pub mod models;
pub mod requests;
pub mod rollover;
pub mod scheduling;
pub mod seed;
pub mod storage;

pub use command::{Effects, FieldGroup, OpContext, RoomCommand, Vacancy};
pub use editor::FacilityEditor;
pub use error::{Error, Result};
pub use lifecycle::{CleanerInput, LectureInput, Transition};
pub use models::*;
pub use requests::RequestLedger;
pub use scheduling::ScheduleInput;
pub use storage::{AnnouncementRepository, AuditRepository, Database, RoomRepository};
