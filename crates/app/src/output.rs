//! Plain-text rendering of rooms and logs

use chrono::{DateTime, FixedOffset, Utc};
use hallkeep_core::{matcher, Announcement, AuditRecord, Effects, RequestEntry, Room};

fn local(at: DateTime<Utc>, offset: &FixedOffset) -> String {
    at.with_timezone(offset).format("%Y-%m-%d %H:%M").to_string()
}

/// One line per room
pub fn room_table(rooms: &[Room]) -> String {
    let mut out = format!("{:<8} {:<10} {:<10} {:<7} {}\n", "ID", "NAME", "STATUS", "CLEAN", "LECTURE");
    for room in rooms {
        let lecture = room
            .current_lecture()
            .map(|l| format!("{} ({})", l.name, l.lecturer))
            .unwrap_or_default();
        out.push_str(&format!(
            "{:<8} {:<10} {:<10} {:<7} {}\n",
            room.id,
            room.name,
            room.status().display_name(),
            room.cleaning_status.display_name(),
            lecture
        ));
    }
    out
}

/// Everything known about one room
pub fn room_detail(room: &Room, now: &DateTime<FixedOffset>) -> String {
    let offset = now.offset();
    let mut out = format!("{} ({})\n", room.name, room.id);
    out.push_str(&format!("Status: {}\n", room.status().display_name()));

    if let Some(lecture) = room.current_lecture() {
        out.push_str(&format!(
            "Lecture: {} by {} [{}], {} students, {} to {}{}\n",
            lecture.name,
            lecture.lecturer,
            lecture.subject_codes,
            lecture.students_count,
            local(lecture.start_time, offset),
            local(lecture.end_time, offset),
            if lecture.is_scheduled_lecture { " (scheduled)" } else { "" }
        ));
    }

    match room.cleaning_status.cleaned_at() {
        Some(at) => out.push_str(&format!(
            "Cleaning: Clean, by {} ({}) at {}\n",
            room.cleaning_status.cleaned_by(),
            room.cleaning_status.employee_id(),
            local(at, offset)
        )),
        None => out.push_str("Cleaning: Dirty\n"),
    }

    let f = &room.facilities;
    out.push_str(&format!(
        "Facilities: {} chairs, smart board {}, white board {}, pens {}\n",
        f.chairs_available,
        yes_no(f.smart_board),
        yes_no(f.white_board),
        yes_no(f.pens_available)
    ));
    out.push_str(&format!("AC units: {}/{} working\n", f.working_ac_count(), f.ac_units.len()));
    for (i, unit) in f.ac_units.iter().enumerate() {
        out.push_str(&format!(
            "  {}. {} {}\n",
            i + 1,
            if unit.working { "working" } else { "broken " },
            unit.id
        ));
    }

    if let Some(next) = matcher::next_entry_today(room, now) {
        out.push_str(&format!(
            "Next today: {} at {} ({})\n",
            next.lecture.name, next.lecture.start_time, next.schedule_id
        ));
    }

    if !room.schedule.is_empty() {
        out.push_str("Schedule:\n");
        for entry in &room.schedule {
            out.push_str(&format!(
                "  {} {} {}h {} - {} ({})\n",
                entry.lecture.start_time,
                entry.lecture.name,
                entry.lecture.duration_hours,
                entry.lecture.lecturer,
                entry.days_label(),
                entry.schedule_id
            ));
        }
    }

    let attendance = room.attendance_most_recent_first();
    if !attendance.is_empty() {
        out.push_str("Attendance:\n");
        for record in attendance {
            out.push_str(&format!(
                "  {} {} students ({})\n",
                local(record.timestamp, offset),
                record.count,
                record.logged_by
            ));
        }
    }
    out
}

fn yes_no(b: bool) -> &'static str {
    if b {
        "yes"
    } else {
        "no"
    }
}

pub fn audit_log(records: &[AuditRecord], offset: &FixedOffset) -> String {
    records
        .iter()
        .map(|r| {
            format!(
                "{} [{}] {}: {} ({})\n",
                local(r.timestamp, offset),
                r.label(),
                r.room_name,
                r.message(),
                r.actor
            )
        })
        .collect()
}

pub fn announcements(items: &[Announcement], offset: &FixedOffset) -> String {
    items
        .iter()
        .map(|a| format!("{} {}: {}\n", local(a.timestamp, offset), a.author, a.text))
        .collect()
}

pub fn requests<'a>(entries: impl Iterator<Item = &'a RequestEntry>, offset: &FixedOffset) -> String {
    entries
        .map(|e| {
            let to = match &e.email_recipient {
                Some(email) => format!("{} <{}>", e.department, email),
                None => e.department.clone(),
            };
            format!(
                "{} [{}] {} -> {}: {}\n",
                local(e.time, offset),
                e.kind,
                e.room_name,
                to,
                e.message
            )
        })
        .collect()
}

/// Summary of what an operation recorded
pub fn effects(effects: &Effects) -> String {
    effects
        .audit
        .iter()
        .map(|r| format!("{}: {}\n", r.label(), r.message()))
        .collect()
}
