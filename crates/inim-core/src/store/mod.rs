// ── Snapshot store ──
//
// Lock-free reads of the current snapshot via `ArcSwap`. Writers go
// through `apply`, which detects alarm edges, updates the tracker and
// then swaps the snapshot, all under the tracker lock, so no reader sees
// a snapshot whose alarm baseline has not been recorded.

mod tracker;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;

use crate::model::{AlarmEvent, Snapshot};
use tracker::AlarmTracker;

pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
    tracker: Mutex<AlarmTracker>,
    /// Set once the first refresh has succeeded.
    loaded: AtomicBool,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self {
            current: ArcSwap::from_pointee(Snapshot::default()),
            tracker: Mutex::new(AlarmTracker::default()),
            loaded: AtomicBool::new(false),
        }
    }

    /// The current snapshot (empty before the first successful refresh).
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Install a freshly built snapshot and return its rising alarm edges.
    pub fn apply(&self, snapshot: Snapshot) -> Vec<AlarmEvent> {
        let mut tracker = self.tracker.lock().unwrap_or_else(PoisonError::into_inner);
        let events = tracker.detect(&snapshot);
        tracker.commit(&snapshot);
        self.current.store(Arc::new(snapshot));
        self.loaded.store(true, Ordering::Release);
        events
    }

    /// Last-seen live alarm flag for a (device, area) pair.
    pub fn last_alarm_flag(&self, device_id: i64, area_id: i64) -> Option<bool> {
        self.tracker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_seen(device_id, area_id)
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}
