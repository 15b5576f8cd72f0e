use std::collections::HashMap;
use std::sync::Arc;

use rocket::tokio::sync::{Mutex, OwnedMutexGuard};

use crate::model::common::election::ElectionId;

/// Map from election IDs to that election's lock.
///
/// Entries are never removed, so the map holds one lock per election ever touched.
type LockMap = HashMap<ElectionId, Arc<Mutex<()>>>;

/// Per-election locks, serialising read-modify-write cycles on a single election.
///
/// Operations on different elections never wait for each other.
#[derive(Default)]
pub struct ElectionLocks {
    locks: Mutex<LockMap>,
}

impl ElectionLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to the given election.
    /// Access lasts until the returned guard is dropped.
    pub async fn acquire(&self, election: ElectionId) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .lock()
            .await
            .entry(election)
            .or_default()
            .clone();
        lock.lock_owned().await
    }
}
