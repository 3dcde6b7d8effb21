//! Host loop for the cleanliness rollover
//!
//! Reconciliation runs whenever a snapshot is pushed on the feed and on a
//! fixed cadence, so a room goes dirty shortly after local midnight even when
//! nobody touches it. Write failures are logged and left for the next pass.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use hallkeep_core::{rollover, Room, RoomRepository};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::state::AppState;

/// Outcome of one reconciliation pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReconcileReport {
    pub checked: usize,
    pub reset: usize,
    pub failed: usize,
}

/// Reconcile every room in `store` against `now`
pub fn reconcile_store<S, Tz>(store: &S, now: &DateTime<Tz>) -> Result<ReconcileReport>
where
    S: RoomRepository,
    Tz: TimeZone,
{
    let rooms = store.list_rooms()?;
    let mut report = ReconcileReport {
        checked: rooms.len(),
        ..ReconcileReport::default()
    };

    for command in rollover::reconcile_all(&rooms, now) {
        match store.apply_commands(command.room_id(), std::slice::from_ref(&command)) {
            Ok(()) => report.reset += 1,
            Err(e) => {
                warn!(room_id = command.room_id(), error = %e, "Rollover write failed, will retry on next pass");
                report.failed += 1;
            }
        }
    }
    Ok(report)
}

fn reconcile_snapshot(state: &AppState, room: &Room) {
    if rollover::reconcile(room, &state.now()).is_none() {
        return;
    }
    // Observing re-reads the room and applies the reset
    if let Err(e) = state.observe(&room.id) {
        warn!(room_id = %room.id, error = %e, "Could not reconcile pushed snapshot");
    }
}

fn reconcile_tick(state: &AppState) {
    let now = state.now();
    let report = match state.db() {
        Ok(db) => reconcile_store(&*db, &now),
        Err(e) => Err(e),
    };
    match report {
        Ok(r) if r.reset > 0 || r.failed > 0 => {
            info!(checked = r.checked, reset = r.reset, failed = r.failed, "Reconciled rooms");
            if let Err(e) = publish_all(state) {
                warn!(error = %e, "Could not publish refreshed rooms");
            }
        }
        Ok(r) => debug!(checked = r.checked, "All rooms current"),
        Err(e) => warn!(error = %e, "Reconciliation pass failed"),
    }
}

fn publish_all(state: &AppState) -> Result<()> {
    let rooms = state.db()?.rooms().list()?;
    for room in rooms {
        state.feed.publish(room);
    }
    Ok(())
}

/// Watch the feed and the clock until ctrl-c
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let mut snapshots = state.feed.subscribe();
    let mut ticker = tokio::time::interval(Duration::from_secs(state.config.reconcile_interval_secs.max(1)));
    info!(
        interval_secs = state.config.reconcile_interval_secs,
        "Watching rooms"
    );

    loop {
        tokio::select! {
            _ = ticker.tick() => reconcile_tick(&state),
            snapshot = snapshots.recv() => match snapshot {
                Ok(room) => reconcile_snapshot(&state, &room),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Snapshot feed lagged, running a full pass");
                    reconcile_tick(&state);
                }
                Err(RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping watcher");
                break;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Utc};
    use hallkeep_core::{CleaningStatus, Database, Error, RoomCommand};
    use std::cell::Cell;

    fn stale_db() -> Database {
        let db = Database::open_in_memory().unwrap();
        let seeded_at = Utc::now() - chrono::Duration::days(1);
        db.seed_if_empty(seeded_at, 4).unwrap();
        db
    }

    #[test]
    fn test_reconcile_store_resets_stale_rooms() {
        let db = stale_db();
        let now = Utc::now().with_timezone(&FixedOffset::east_opt(0).unwrap());
        let report = reconcile_store(&db, &now).unwrap();
        assert_eq!(report, ReconcileReport { checked: 4, reset: 4, failed: 0 });

        let again = reconcile_store(&db, &now).unwrap();
        assert_eq!(again.reset, 0);
        assert!(db.rooms().list().unwrap().iter().all(|r| !r.cleaning_status.is_clean()));
    }

    /// Store whose writes fail a fixed number of times
    struct FlakyStore {
        inner: Database,
        failures: Cell<u32>,
    }

    impl RoomRepository for FlakyStore {
        fn list_rooms(&self) -> hallkeep_core::Result<Vec<Room>> {
            self.inner.list_rooms()
        }

        fn apply_commands(&self, room_id: &str, commands: &[RoomCommand]) -> hallkeep_core::Result<()> {
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(Error::InvalidOperation("store unavailable".into()));
            }
            self.inner.apply_commands(room_id, commands)
        }
    }

    #[test]
    fn test_failed_writes_self_heal_next_pass() {
        let store = FlakyStore {
            inner: stale_db(),
            failures: Cell::new(2),
        };
        let now = Utc::now();

        let first = reconcile_store(&store, &now).unwrap();
        assert_eq!((first.reset, first.failed), (2, 2));

        let second = reconcile_store(&store, &now).unwrap();
        assert_eq!((second.reset, second.failed), (2, 0));
        assert!(store
            .list_rooms()
            .unwrap()
            .iter()
            .all(|r| r.cleaning_status == CleaningStatus::Dirty));
    }
}
