//! Lecture lifecycle state machine
//!
//! States are `Free`, `Occupied` and `Cleaning`; rooms cycle through them
//! indefinitely. Each transition validates its preconditions against a
//! snapshot and returns the commands that realise it. A transition invoked
//! from the wrong state fails with `IllegalTransition` and produces nothing.
//!
//! Occupancy alone never dirties a room: only the daily rollover does.

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone, Utc};
use tracing::debug;

use crate::command::{Effects, OpContext, RoomCommand, Vacancy};
use crate::error::{Error, Result};
use crate::matcher;
use crate::models::{
    AuditEvent, CleaningStatus, Lecture, RequestEntry, RequestKind, Room, RoomStatus, ScheduleEntry,
};

/// Form input for an ad hoc lecture
#[derive(Debug, Clone, Default)]
pub struct LectureInput {
    pub name: String,
    pub lecturer: String,
    pub subject_codes: String,
    pub students_count: Option<u32>,
    pub duration_hours: f64,
    /// Local date-time, e.g. "2024-03-04T09:00", or RFC 3339
    pub start_time: String,
}

/// Form input for completing a cleaning
#[derive(Debug, Clone, Default)]
pub struct CleanerInput {
    pub cleaner_name: String,
    pub employee_id: String,
    pub notes: String,
}

/// Every occupancy transition, for callers that dispatch generically
#[derive(Debug, Clone)]
pub enum Transition {
    StartLecture(LectureInput),
    MarkFree,
    MarkScheduledHeld(Option<ScheduleEntry>),
    MarkScheduledSkipped(Option<ScheduleEntry>),
    StartCleaning,
    CompleteCleaning(CleanerInput),
}

impl Transition {
    pub fn name(&self) -> &'static str {
        match self {
            Transition::StartLecture(_) => "start a lecture",
            Transition::MarkFree => "mark the room free",
            Transition::MarkScheduledHeld(_) => "mark a scheduled lecture held",
            Transition::MarkScheduledSkipped(_) => "mark a scheduled lecture skipped",
            Transition::StartCleaning => "start cleaning",
            Transition::CompleteCleaning(_) => "complete cleaning",
        }
    }
}

/// Run a transition against a snapshot
pub fn execute(room: &Room, transition: &Transition, ctx: &OpContext<'_>) -> Result<Effects> {
    let effects = match transition {
        Transition::StartLecture(input) => start_lecture(room, input, ctx),
        Transition::MarkFree => mark_free(room, ctx),
        Transition::MarkScheduledHeld(entry) => mark_scheduled_held(room, entry.as_ref(), ctx),
        Transition::MarkScheduledSkipped(entry) => mark_scheduled_skipped(room, entry.as_ref(), ctx),
        Transition::StartCleaning => start_cleaning(room, ctx),
        Transition::CompleteCleaning(input) => complete_cleaning(room, input, ctx),
    }?;
    debug!(
        room_id = %room.id,
        transition = transition.name(),
        commands = effects.commands.len(),
        "Transition accepted"
    );
    Ok(effects)
}

fn illegal(operation: &'static str, room: &Room) -> Error {
    Error::IllegalTransition {
        operation,
        status: room.status(),
    }
}

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn positive_duration(duration_hours: f64) -> Result<f64> {
    if duration_hours.is_finite() && duration_hours > 0.0 {
        Ok(duration_hours)
    } else {
        Err(Error::Validation(format!(
            "duration must be a positive number of hours, got {}",
            duration_hours
        )))
    }
}

/// Parse a lecture start, interpreting local forms in the deployment offset
pub fn parse_start_time(s: &str, offset: &FixedOffset) -> Result<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            if let Some(local) = offset.from_local_datetime(&naive).single() {
                return Ok(local.with_timezone(&Utc));
            }
        }
    }
    Err(Error::Validation(format!("unparsable start time: {:?}", s)))
}

/// Start an ad hoc lecture in a free room
pub fn start_lecture(room: &Room, input: &LectureInput, ctx: &OpContext<'_>) -> Result<Effects> {
    if room.status() != RoomStatus::Free {
        return Err(illegal("start a lecture", room));
    }

    let name = required(&input.name, "lecture name")?;
    let lecturer = required(&input.lecturer, "lecturer")?;
    let subject_codes = required(&input.subject_codes, "subject codes")?;
    let duration_hours = positive_duration(input.duration_hours)?;
    let start_time = parse_start_time(&input.start_time, ctx.now.offset())?;

    let lecture = Lecture::new(
        name.clone(),
        lecturer.clone(),
        subject_codes,
        input.students_count.unwrap_or(0),
        duration_hours,
        start_time,
        false,
    )?;

    Ok(Effects {
        commands: vec![RoomCommand::SetCurrentLecture {
            room_id: room.id.clone(),
            lecture,
        }],
        audit: vec![ctx.audit(
            room,
            AuditEvent::LectureStarted {
                lecture_name: name,
                lecturer,
            },
        )?],
        requests: Vec::new(),
    })
}

/// End the current lecture
pub fn mark_free(room: &Room, ctx: &OpContext<'_>) -> Result<Effects> {
    let lecture = room
        .current_lecture()
        .ok_or_else(|| illegal("mark the room free", room))?;

    Ok(Effects {
        commands: vec![RoomCommand::ClearCurrentLecture {
            room_id: room.id.clone(),
            vacancy: Vacancy::Free,
        }],
        audit: vec![ctx.audit(
            room,
            AuditEvent::LectureEnded {
                lecture_name: lecture.name.clone(),
            },
        )?],
        requests: Vec::new(),
    })
}

/// Occupy a free room with today's scheduled lecture
pub fn mark_scheduled_held(
    room: &Room,
    entry: Option<&ScheduleEntry>,
    ctx: &OpContext<'_>,
) -> Result<Effects> {
    const OPERATION: &str = "mark a scheduled lecture held";

    if room.status() != RoomStatus::Free {
        return Err(illegal(OPERATION, room));
    }
    let entry = entry.ok_or_else(|| illegal(OPERATION, room))?;
    if !matcher::matches_today(room, entry, &ctx.now) {
        return Err(illegal(OPERATION, room));
    }

    let scheduled = &entry.lecture;
    let clock = scheduled.clock_time().ok_or_else(|| {
        Error::Validation(format!(
            "scheduled start time {:?} is not HH:MM",
            scheduled.start_time
        ))
    })?;
    let duration_hours = positive_duration(scheduled.duration_hours)?;
    let start_time = ctx
        .now
        .offset()
        .from_local_datetime(&ctx.today().and_time(clock))
        .single()
        .ok_or_else(|| Error::Validation("scheduled start time does not exist today".into()))?
        .with_timezone(&Utc);

    let lecture = Lecture::new(
        scheduled.name.clone(),
        scheduled.lecturer.clone(),
        scheduled.subject_codes.clone(),
        0,
        duration_hours,
        start_time,
        true,
    )?;

    Ok(Effects {
        commands: vec![RoomCommand::SetCurrentLecture {
            room_id: room.id.clone(),
            lecture,
        }],
        audit: vec![ctx.audit(
            room,
            AuditEvent::ScheduledLectureStarted {
                lecture_name: scheduled.name.clone(),
            },
        )?],
        requests: Vec::new(),
    })
}

/// Record that a scheduled lecture will not take place.
///
/// If the room is currently held by exactly that scheduled lecture it is
/// freed as well; otherwise only the skip is recorded.
pub fn mark_scheduled_skipped(
    room: &Room,
    entry: Option<&ScheduleEntry>,
    ctx: &OpContext<'_>,
) -> Result<Effects> {
    let entry = entry.ok_or_else(|| illegal("mark a scheduled lecture skipped", room))?;
    let lecture_name = entry.lecture.name.clone();

    let held_by_entry = room
        .current_lecture()
        .is_some_and(|l| l.is_scheduled_lecture && l.name == lecture_name);

    let freed = if held_by_entry {
        mark_free(room, ctx)?
    } else {
        Effects::default()
    };

    let kind = RequestKind::ScheduledLectureCanceled;
    let notification = RequestEntry {
        room_name: room.name.clone(),
        kind,
        message: format!(
            "Scheduled lecture \"{}\" in {} was skipped/canceled.",
            lecture_name, room.name
        ),
        time: ctx.now_utc(),
        department: kind.default_department().to_string(),
        email_recipient: Some("academic.head@example.com".to_string()),
    };

    let skipped = Effects {
        commands: Vec::new(),
        audit: vec![ctx.audit(room, AuditEvent::ScheduledLectureSkipped { lecture_name })?],
        requests: vec![notification],
    };

    Ok(freed.merge(skipped))
}

/// Mark the room as being cleaned; the cleaning status itself is unchanged.
///
/// A lecture still running is ended and recorded as such.
pub fn start_cleaning(room: &Room, ctx: &OpContext<'_>) -> Result<Effects> {
    if room.status() == RoomStatus::Cleaning {
        return Err(illegal("start cleaning", room));
    }
    let audit = match room.current_lecture() {
        Some(lecture) => vec![ctx.audit(
            room,
            AuditEvent::LectureEnded {
                lecture_name: lecture.name.clone(),
            },
        )?],
        None => Vec::new(),
    };
    Ok(Effects {
        commands: vec![RoomCommand::ClearCurrentLecture {
            room_id: room.id.clone(),
            vacancy: Vacancy::Cleaning,
        }],
        audit,
        requests: Vec::new(),
    })
}

/// Record a completed cleaning; always leaves the room free
pub fn complete_cleaning(room: &Room, input: &CleanerInput, ctx: &OpContext<'_>) -> Result<Effects> {
    let cleaner_name = required(&input.cleaner_name, "cleaner name")?;
    let employee_id = required(&input.employee_id, "employee id")?;

    Ok(Effects {
        commands: vec![
            RoomCommand::ClearCurrentLecture {
                room_id: room.id.clone(),
                vacancy: Vacancy::Free,
            },
            RoomCommand::SetCleaningStatus {
                room_id: room.id.clone(),
                status: CleaningStatus::clean(cleaner_name.clone(), employee_id.clone(), ctx.now_utc()),
            },
        ],
        audit: vec![ctx.audit(
            room,
            AuditEvent::CleaningCompleted {
                cleaned_by: cleaner_name,
                employee_id,
                notes: input.notes.trim().to_string(),
            },
        )?],
        requests: Vec::new(),
    })
}
