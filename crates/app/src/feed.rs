//! Push-based room snapshot feed
//!
//! Every write publishes the refreshed room so observers (the reconciler,
//! status printers) react without polling the store.

use std::sync::Arc;

use hallkeep_core::Room;
use tokio::sync::broadcast;

const FEED_CAPACITY: usize = 256;

#[derive(Debug, Clone)]
pub struct SnapshotFeed {
    tx: broadcast::Sender<Arc<Room>>,
}

impl SnapshotFeed {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(FEED_CAPACITY);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Arc<Room>> {
        self.tx.subscribe()
    }

    /// Publish a snapshot; returns the number of observers reached
    pub fn publish(&self, room: Room) -> usize {
        // No subscribers is fine: nobody is watching
        self.tx.send(Arc::new(room)).unwrap_or(0)
    }
}

impl Default for SnapshotFeed {
    fn default() -> Self {
        Self::new()
    }
}
