//! Command execution

use std::sync::Arc;

use chrono::FixedOffset;
use hallkeep_core::lifecycle::{self, CleanerInput, LectureInput};
use hallkeep_core::scheduling::{self, parse_weekday, ScheduleInput};
use hallkeep_core::{
    attendance, matcher, requests, AnnouncementRepository, AuditRepository, FacilityEditor,
};

use crate::cli::{
    AttendanceArgs, CleanArgs, Command, FacilitiesArgs, RequestArgs, ScheduleCommand,
    ScheduleEntryArgs, ScheduledArgs, StartLectureArgs,
};
use crate::error::Result;
use crate::output;
use crate::reconciler;
use crate::state::AppState;

pub async fn execute(command: Command, state: Arc<AppState>) -> Result<()> {
    match command {
        Command::Status { room } => status(&state, room.as_deref()),
        Command::StartLecture(args) => start_lecture(&state, args),
        Command::EndLecture { room } => {
            let effects = state.execute(&room, lifecycle::mark_free)?;
            print!("{}", output::effects(&effects));
            Ok(())
        }
        Command::Held(args) => held(&state, args),
        Command::Skip(args) => skip(&state, args),
        Command::StartCleaning { room } => {
            state.execute(&room, lifecycle::start_cleaning)?;
            println!("{} is being cleaned", room);
            Ok(())
        }
        Command::Clean(args) => clean(&state, args),
        Command::Facilities(args) => facilities(&state, args),
        Command::Schedule(cmd) => schedule(&state, cmd),
        Command::Attendance(args) => log_attendance(&state, args),
        Command::Request(args) => request(&state, args),
        Command::Audit { limit } => {
            let limit = limit.unwrap_or(state.config.audit_display_limit);
            print!("{}", audit_log(&*state.db()?, limit, state.now().offset())?);
            Ok(())
        }
        Command::Announcements { limit } => {
            let limit = limit.unwrap_or(state.config.announcement_display_limit);
            print!("{}", announcements(&*state.db()?, limit, state.now().offset())?);
            Ok(())
        }
        Command::Watch => reconciler::run(state).await,
    }
}

fn audit_log<S: AuditRepository>(store: &S, limit: u32, offset: &FixedOffset) -> Result<String> {
    Ok(output::audit_log(&store.recent_audit(limit)?, offset))
}

fn announcements<S: AnnouncementRepository>(
    store: &S,
    limit: u32,
    offset: &FixedOffset,
) -> Result<String> {
    Ok(output::announcements(&store.recent_announcements(limit)?, offset))
}

fn status(state: &AppState, room: Option<&str>) -> Result<()> {
    match room {
        Some(key) => {
            let room = state.observe(key)?;
            print!("{}", output::room_detail(&room, &state.now()));
        }
        None => {
            let rooms = state.observe_all()?;
            print!("{}", output::room_table(&rooms));
        }
    }
    Ok(())
}

fn start_lecture(state: &AppState, args: StartLectureArgs) -> Result<()> {
    let input = LectureInput {
        name: args.name,
        lecturer: args.lecturer,
        subject_codes: args.subjects,
        students_count: args.students,
        duration_hours: args.duration,
        start_time: args
            .start
            .unwrap_or_else(|| state.now().format("%Y-%m-%dT%H:%M").to_string()),
    };
    let effects = state.execute(&args.room, |room, ctx| lifecycle::start_lecture(room, &input, ctx))?;
    print!("{}", output::effects(&effects));
    Ok(())
}

fn held(state: &AppState, args: ScheduledArgs) -> Result<()> {
    let effects = state.execute(&args.room, |room, ctx| {
        let entry = match args.schedule_id {
            Some(id) => room.find_schedule_entry(id),
            None => matcher::next_entry_today(room, &ctx.now),
        };
        lifecycle::mark_scheduled_held(room, entry, ctx)
    })?;
    print!("{}", output::effects(&effects));
    Ok(())
}

fn skip(state: &AppState, args: ScheduledArgs) -> Result<()> {
    let effects = state.execute(&args.room, |room, ctx| {
        let entry = match args.schedule_id {
            Some(id) => room.find_schedule_entry(id),
            None => matcher::next_entry_today(room, &ctx.now),
        };
        lifecycle::mark_scheduled_skipped(room, entry, ctx)
    })?;
    print!("{}", output::effects(&effects));
    print_requests(state)
}

fn clean(state: &AppState, args: CleanArgs) -> Result<()> {
    let input = CleanerInput {
        cleaner_name: args.cleaner,
        employee_id: args.employee_id,
        notes: args.notes,
    };
    let effects = state.execute(&args.room, |room, ctx| lifecycle::complete_cleaning(room, &input, ctx))?;
    print!("{}", output::effects(&effects));
    Ok(())
}

fn facilities(state: &AppState, args: FacilitiesArgs) -> Result<()> {
    let room = state.observe(&args.room)?;
    let mut editor = FacilityEditor::open(&room);

    if let Some(chairs) = args.chairs {
        editor.set_chairs(chairs);
    }
    if let Some(present) = args.smart_board {
        editor.set_smart_board(present);
    }
    if let Some(present) = args.white_board {
        editor.set_white_board(present);
    }
    if let Some(available) = args.pens {
        editor.set_pens(available);
    }
    if let Some(count) = args.ac_count {
        editor.set_ac_count(count);
    }
    for position in args.toggle_ac {
        let unit = position
            .checked_sub(1)
            .and_then(|i| editor.draft().ac_units.get(i))
            .map(|u| u.id)
            .ok_or_else(|| {
                hallkeep_core::Error::Validation(format!("no AC unit at position {}", position))
            })?;
        editor.toggle_unit(unit)?;
    }

    state.commit_command(editor.commit())?;
    print!("{}", output::room_detail(&state.observe(&room.id)?, &state.now()));
    Ok(())
}

fn schedule_input(args: ScheduleEntryArgs) -> Result<ScheduleInput> {
    let days = args
        .days
        .iter()
        .map(|d| parse_weekday(d))
        .collect::<hallkeep_core::Result<Vec<_>>>()?;
    Ok(ScheduleInput {
        days,
        name: args.name,
        lecturer: args.lecturer,
        subject_codes: args.subjects,
        duration_hours: args.duration,
        start_time: args.start,
    })
}

fn schedule(state: &AppState, command: ScheduleCommand) -> Result<()> {
    let command = match command {
        ScheduleCommand::Add { room, entry } => {
            let room = state.observe(&room)?;
            scheduling::add_entry(&room, &schedule_input(entry)?)?
        }
        ScheduleCommand::Update {
            room,
            schedule_id,
            entry,
        } => {
            let room = state.observe(&room)?;
            scheduling::update_entry(&room, schedule_id, &schedule_input(entry)?)?
        }
        ScheduleCommand::Delete { room, schedule_id } => {
            let room = state.observe(&room)?;
            scheduling::delete_entry(&room, schedule_id)?
        }
    };
    let room_id = command.room_id().to_string();
    state.commit_command(command)?;
    print!("{}", output::room_detail(&state.observe(&room_id)?, &state.now()));
    Ok(())
}

fn log_attendance(state: &AppState, args: AttendanceArgs) -> Result<()> {
    let effects = state.execute(&args.room, |room, ctx| {
        attendance::log_attendance(room, args.count, &args.by, ctx)
    })?;
    print!("{}", output::effects(&effects));
    Ok(())
}

fn request(state: &AppState, args: RequestArgs) -> Result<()> {
    state.execute(&args.room, |room, ctx| {
        requests::send_request(
            room,
            &args.message,
            args.kind.into(),
            args.department.as_deref(),
            args.email.as_deref(),
            ctx,
        )
    })?;
    print_requests(state)
}

fn print_requests(state: &AppState) -> Result<()> {
    let ledger = state.ledger()?;
    print!(
        "{}",
        output::requests(ledger.recent(state.config.request_display_limit), state.now().offset())
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hallkeep_core::Database;

    #[test]
    fn test_history_reads_through_repositories() {
        let db = Database::open_in_memory().unwrap();
        let offset = FixedOffset::east_opt(0).unwrap();
        assert!(audit_log(&db, 10, &offset).unwrap().is_empty());

        db.seed_if_empty(Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap(), 1)
            .unwrap();
        let text = announcements(&db, 5, &offset).unwrap();
        assert!(text.contains("Admin"));
    }
}
