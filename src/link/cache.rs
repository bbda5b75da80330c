//! Last-value cache shared between the session loop and API callers

use std::sync::{Arc, RwLock};

use crate::protocol::WeightReading;

/// Point-in-time view of the link
///
/// `reading` survives disconnects: a consumer polling the snapshot can still
/// show the last known weight, with `connected` telling it how fresh that
/// value is. Before the first frame both fields are at their zero values.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Most recent decoded reading, if any frame arrived yet
    pub reading: Option<WeightReading>,
    /// Whether the scale currently counts as reachable
    pub connected: bool,
}

impl Snapshot {
    /// Display string of the last reading, e.g. "0.162 kg"
    pub fn display(&self) -> Option<String> {
        self.reading.as_ref().map(|r| r.to_string())
    }

    /// Capture time of the last reading as epoch milliseconds
    pub fn timestamp_ms(&self) -> Option<u64> {
        self.reading.as_ref().map(|r| r.timestamp_ms())
    }
}

/// Shared store for the latest reading and connectivity flag
///
/// The session loop is the only writer; clones handed to callers are
/// read-only in practice and never block the loop for longer than a field
/// copy.
#[derive(Debug, Clone, Default)]
pub struct ReadingCache {
    inner: Arc<RwLock<Snapshot>>,
}

impl ReadingCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the cached reading
    pub fn store(&self, reading: WeightReading) {
        self.write().reading = Some(reading);
    }

    /// Update the connectivity flag, leaving the last reading in place
    pub fn set_connected(&self, connected: bool) {
        self.write().connected = connected;
    }

    /// Copy out the current view
    pub fn snapshot(&self) -> Snapshot {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// The cached reading alone
    pub fn last_reading(&self) -> Option<WeightReading> {
        self.snapshot().reading
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Snapshot> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn reading(net: f64) -> WeightReading {
        WeightReading {
            gross: net,
            tare: 0.0,
            net,
            unit: "kg".to_string(),
            captured_at: SystemTime::now(),
        }
    }

    #[test]
    fn test_empty_snapshot() {
        let cache = ReadingCache::new();
        let snap = cache.snapshot();

        assert!(snap.reading.is_none());
        assert!(!snap.connected);
        assert_eq!(snap.display(), None);
        assert_eq!(snap.timestamp_ms(), None);
    }

    #[test]
    fn test_snapshot_accessors() {
        let cache = ReadingCache::new();
        cache.store(reading(1.5));

        let snap = cache.snapshot();
        assert_eq!(snap.display(), Some("1.500 kg".to_string()));
        assert!(snap.timestamp_ms().unwrap_or(0) > 1_577_836_800_000);
    }

    #[test]
    fn test_store_replaces_reading() {
        let cache = ReadingCache::new();

        cache.store(reading(1.5));
        cache.store(reading(2.5));

        assert_eq!(cache.last_reading().map(|r| r.net), Some(2.5));
    }

    #[test]
    fn test_disconnect_keeps_last_reading() {
        let cache = ReadingCache::new();
        cache.store(reading(1.5));
        cache.set_connected(true);

        cache.set_connected(false);

        let snap = cache.snapshot();
        assert!(!snap.connected);
        assert_eq!(snap.reading.map(|r| r.net), Some(1.5));
    }

    #[test]
    fn test_clones_share_state() {
        let cache = ReadingCache::new();
        let clone = cache.clone();

        clone.store(reading(0.162));

        assert_eq!(cache.last_reading().map(|r| r.net), Some(0.162));
    }
}
