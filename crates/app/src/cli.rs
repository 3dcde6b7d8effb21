//! CLI command definitions and argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use hallkeep_core::RequestKind;
use uuid::Uuid;

/// hallkeep - lecture hall occupancy, cleaning and schedule tracking.
#[derive(Debug, Parser)]
#[command(name = "hallkeep")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true, env = "HALLKEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Database file, overriding the configured one
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Name recorded as the actor on audit entries
    #[arg(long, global = true)]
    pub operator: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show all rooms, or one room in detail
    Status {
        /// Room id (LH-01) or name (Hall 1)
        room: Option<String>,
    },

    /// Start an ad hoc lecture in a free room
    StartLecture(StartLectureArgs),

    /// End the current lecture
    EndLecture { room: String },

    /// Mark today's scheduled lecture as held
    Held(ScheduledArgs),

    /// Mark today's scheduled lecture as skipped
    Skip(ScheduledArgs),

    /// Mark the room as being cleaned
    StartCleaning { room: String },

    /// Record a completed cleaning
    Clean(CleanArgs),

    /// Edit chairs, boards, pens and AC units
    Facilities(FacilitiesArgs),

    /// Manage the weekly schedule
    #[command(subcommand)]
    Schedule(ScheduleCommand),

    /// Log a head count
    Attendance(AttendanceArgs),

    /// Raise a request about a room
    Request(RequestArgs),

    /// Show the audit log
    Audit {
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Show recent announcements
    Announcements {
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Keep rooms reconciled until interrupted
    Watch,
}

#[derive(Debug, Args)]
pub struct StartLectureArgs {
    pub room: String,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub lecturer: String,

    /// Comma separated subject codes
    #[arg(long)]
    pub subjects: String,

    #[arg(long)]
    pub students: Option<u32>,

    /// Duration in hours, e.g. 1.5
    #[arg(long)]
    pub duration: f64,

    /// Local start, "YYYY-MM-DDTHH:MM"; defaults to now
    #[arg(long)]
    pub start: Option<String>,
}

#[derive(Debug, Args)]
pub struct ScheduledArgs {
    pub room: String,

    /// Schedule entry; defaults to the earliest entry today
    #[arg(long)]
    pub schedule_id: Option<Uuid>,
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    pub room: String,

    #[arg(long)]
    pub cleaner: String,

    #[arg(long)]
    pub employee_id: String,

    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Debug, Args)]
pub struct FacilitiesArgs {
    pub room: String,

    #[arg(long)]
    pub chairs: Option<u32>,

    #[arg(long)]
    pub smart_board: Option<bool>,

    #[arg(long)]
    pub white_board: Option<bool>,

    #[arg(long)]
    pub pens: Option<bool>,

    /// Target number of AC units
    #[arg(long)]
    pub ac_count: Option<usize>,

    /// Toggle the working flag of an AC unit (1-based position), repeatable
    #[arg(long = "toggle-ac")]
    pub toggle_ac: Vec<usize>,
}

#[derive(Debug, Subcommand)]
pub enum ScheduleCommand {
    /// Add a recurring entry
    Add {
        room: String,
        #[command(flatten)]
        entry: ScheduleEntryArgs,
    },
    /// Replace an existing entry
    Update {
        room: String,
        schedule_id: Uuid,
        #[command(flatten)]
        entry: ScheduleEntryArgs,
    },
    /// Remove an entry
    Delete { room: String, schedule_id: Uuid },
}

#[derive(Debug, Args)]
pub struct ScheduleEntryArgs {
    /// Days, comma separated, e.g. mon,wed
    #[arg(long, value_delimiter = ',', required = true)]
    pub days: Vec<String>,

    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub lecturer: String,

    #[arg(long)]
    pub subjects: String,

    #[arg(long)]
    pub duration: f64,

    /// Wall-clock start, "HH:MM"
    #[arg(long)]
    pub start: String,
}

#[derive(Debug, Args)]
pub struct AttendanceArgs {
    pub room: String,

    /// Number of students present
    #[arg(allow_negative_numbers = true)]
    pub count: i64,

    #[arg(long, default_value = "")]
    pub by: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RequestKindArg {
    General,
    Special,
}

impl From<RequestKindArg> for RequestKind {
    fn from(kind: RequestKindArg) -> Self {
        match kind {
            RequestKindArg::General => RequestKind::General,
            RequestKindArg::Special => RequestKind::Special,
        }
    }
}

#[derive(Debug, Args)]
pub struct RequestArgs {
    pub room: String,

    #[arg(long)]
    pub message: String,

    #[arg(long, value_enum, default_value = "general")]
    pub kind: RequestKindArg,

    #[arg(long)]
    pub department: Option<String>,

    #[arg(long)]
    pub email: Option<String>,
}
