//! Application state management

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, FixedOffset, Utc};
use hallkeep_core::{rollover, Database, Effects, OpContext, RequestLedger, Room, RoomCommand};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::feed::SnapshotFeed;

/// Main application state
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub config: Config,
    pub feed: SnapshotFeed,
    /// Requests raised by this process, newest first
    pub ledger: Arc<Mutex<RequestLedger>>,
    offset: FixedOffset,
}

impl AppState {
    /// Open the configured database, seeding it on first use
    pub fn new(config: Config) -> Result<Self> {
        let db_path = config.database_path()?;

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;
        Self::with_database(db, config)
    }

    pub fn with_database(db: Database, config: Config) -> Result<Self> {
        let offset = config.offset()?;
        let state = Self {
            db: Arc::new(Mutex::new(db)),
            config,
            feed: SnapshotFeed::new(),
            ledger: Arc::new(Mutex::new(RequestLedger::new())),
            offset,
        };
        let now = state.now().with_timezone(&Utc);
        if state.db()?.seed_if_empty(now, state.config.seed_room_count)? {
            info!(rooms = state.config.seed_room_count, "Created initial rooms");
        }
        Ok(state)
    }

    pub fn db(&self) -> Result<MutexGuard<'_, Database>> {
        self.db.lock().map_err(|_| AppError::Poisoned)
    }

    pub fn ledger(&self) -> Result<MutexGuard<'_, RequestLedger>> {
        self.ledger.lock().map_err(|_| AppError::Poisoned)
    }

    /// Current time in the deployment timezone
    pub fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }

    /// Load a room, bringing its cleanliness up to date on the way.
    ///
    /// A failed rollover write is logged and the stale snapshot returned;
    /// the next observation retries naturally.
    pub fn observe(&self, key: &str) -> Result<Room> {
        let now = self.now();
        let db = self.db()?;
        let room = db.require_room(key)?;
        let Some(command) = rollover::reconcile(&room, &now) else {
            return Ok(room);
        };

        match db.rooms().apply(&room.id, std::slice::from_ref(&command)) {
            Ok(()) => {
                let mut fresh = room;
                fresh.apply(&command)?;
                self.feed.publish(fresh.clone());
                Ok(fresh)
            }
            Err(e) => {
                warn!(room_id = %room.id, error = %e, "Rollover write failed");
                Ok(room)
            }
        }
    }

    /// All rooms, each observed as in [`AppState::observe`]
    pub fn observe_all(&self) -> Result<Vec<Room>> {
        let ids: Vec<String> = self.db()?.rooms().list()?.into_iter().map(|r| r.id).collect();
        ids.iter().map(|id| self.observe(id)).collect()
    }

    /// Run an operation against a fresh snapshot and commit its effects
    pub fn execute<F>(&self, key: &str, op: F) -> Result<Effects>
    where
        F: FnOnce(&Room, &OpContext<'_>) -> hallkeep_core::Result<Effects>,
    {
        let room = self.observe(key)?;
        let ctx = OpContext::new(self.now(), &self.config.operator);
        let effects = op(&room, &ctx)?;
        self.commit(&room.id, &effects)?;
        Ok(effects)
    }

    /// Commit one standalone command, e.g. from a schedule or facility edit
    pub fn commit_command(&self, command: RoomCommand) -> Result<()> {
        let room_id = command.room_id().to_string();
        let effects = Effects {
            commands: vec![command],
            ..Effects::default()
        };
        self.commit(&room_id, &effects)
    }

    fn commit(&self, room_id: &str, effects: &Effects) -> Result<()> {
        if effects.is_empty() {
            return Ok(());
        }
        let fresh = {
            let db = self.db()?;
            db.apply_effects(effects)?;
            db.require_room(room_id)?
        };
        info!(
            room_id,
            commands = effects.commands.len(),
            audit = effects.audit.len(),
            "Committed"
        );
        self.ledger()?.extend(effects.requests.iter().cloned());
        self.feed.publish(fresh);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hallkeep_core::lifecycle::{self, LectureInput};
    use hallkeep_core::{CleaningStatus, RoomStatus};

    fn state() -> AppState {
        let config = Config {
            seed_room_count: 3,
            ..Config::default()
        };
        AppState::with_database(Database::open_in_memory().unwrap(), config).unwrap()
    }

    #[test]
    fn test_seeds_on_first_open() {
        let s = state();
        assert_eq!(s.observe_all().unwrap().len(), 3);
    }

    #[test]
    fn test_execute_commits_and_publishes() {
        let s = state();
        let mut rx = s.feed.subscribe();
        let start = s.now().format("%Y-%m-%dT%H:%M").to_string();

        s.execute("LH-02", |room, ctx| {
            let input = LectureInput {
                name: "Algorithms".into(),
                lecturer: "Dr. X".into(),
                subject_codes: "CS201".into(),
                students_count: None,
                duration_hours: 1.5,
                start_time: start.clone(),
            };
            lifecycle::start_lecture(room, &input, ctx)
        })
        .unwrap();

        let published = rx.try_recv().unwrap();
        assert_eq!(published.id, "LH-02");
        assert_eq!(published.status(), RoomStatus::Occupied);
        assert_eq!(s.db().unwrap().audit().count().unwrap(), 1);
    }

    #[test]
    fn test_rejected_operation_writes_nothing() {
        let s = state();
        let err = s.execute("LH-01", lifecycle::mark_free).unwrap_err();
        assert!(matches!(err, AppError::Core(e) if e.is_rejection()));
        assert_eq!(s.db().unwrap().audit().count().unwrap(), 0);
    }

    #[test]
    fn test_observe_resets_stale_cleaning() {
        let s = state();
        let stale = CleaningStatus::clean("Sam", "E-7", Utc::now() - chrono::Duration::days(2));
        s.commit_command(RoomCommand::SetCleaningStatus {
            room_id: "LH-03".into(),
            status: stale,
        })
        .unwrap();

        let room = s.observe("Hall 3").unwrap();
        assert!(!room.cleaning_status.is_clean());
        assert!(!s.db().unwrap().require_room("LH-03").unwrap().cleaning_status.is_clean());
    }
}
