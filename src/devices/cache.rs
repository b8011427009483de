//! Cross-turn device snapshot cache

use std::time::{Duration, Instant};

use mini_moka::sync::Cache;

use super::DiscoverySnapshot;

/// Key-value store for device snapshots shared across turns
///
/// The cache is advisory: a miss only ever means the resolver falls back to
/// a fresh listing.
pub trait DeviceCache: Send + Sync {
    /// Look up an unexpired snapshot
    fn get(&self, key: &str) -> Option<DiscoverySnapshot>;

    /// Store a snapshot, replacing any previous value for the key
    fn set(&self, key: &str, snapshot: DiscoverySnapshot, ttl: Duration);
}

#[derive(Clone, Debug)]
struct CachedSnapshot {
    snapshot: DiscoverySnapshot,
    expires_at: Instant,
}

/// In-process [`DeviceCache`] backed by a bounded TTL cache
///
/// Entries carry their own deadline so callers can pass a per-write TTL;
/// `max_ttl` caps how long the underlying store keeps anything.
#[derive(Clone, Debug)]
pub struct SnapshotCache {
    entries: Cache<String, CachedSnapshot>,
}

impl SnapshotCache {
    /// Create a cache holding at most `capacity` users for at most `max_ttl`
    #[must_use]
    pub fn new(capacity: u64, max_ttl: Duration) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(capacity)
                .time_to_live(max_ttl)
                .build(),
        }
    }
}

impl DeviceCache for SnapshotCache {
    fn get(&self, key: &str) -> Option<DiscoverySnapshot> {
        let key = key.to_string();
        let cached = self.entries.get(&key)?;

        if cached.expires_at <= Instant::now() {
            self.entries.invalidate(&key);
            return None;
        }

        Some(cached.snapshot)
    }

    fn set(&self, key: &str, snapshot: DiscoverySnapshot, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            CachedSnapshot {
                snapshot,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::devices::Device;

    fn snapshot() -> DiscoverySnapshot {
        DiscoverySnapshot::try_from(vec![Device {
            id: "0".to_string(),
            name: "My device".to_string(),
            number: 1,
        }])
        .unwrap()
    }

    #[test]
    fn test_get_after_set() {
        let cache = SnapshotCache::new(16, Duration::from_secs(3600));
        cache.set("user:devices", snapshot(), Duration::from_secs(3600));

        assert_eq!(cache.get("user:devices"), Some(snapshot()));
        assert_eq!(cache.get("other:devices"), None);
    }

    #[test]
    fn test_entry_expires_after_its_ttl() {
        let cache = SnapshotCache::new(16, Duration::from_secs(3600));
        cache.set("user:devices", snapshot(), Duration::from_millis(20));

        std::thread::sleep(Duration::from_millis(50));

        assert_eq!(cache.get("user:devices"), None);
    }

    #[test]
    fn test_set_replaces_whole_snapshot() {
        let cache = SnapshotCache::new(16, Duration::from_secs(3600));
        cache.set("user:devices", snapshot(), Duration::from_secs(60));
        cache.set(
            "user:devices",
            DiscoverySnapshot::default(),
            Duration::from_secs(60),
        );

        assert_eq!(cache.get("user:devices"), Some(DiscoverySnapshot::default()));
    }
}
