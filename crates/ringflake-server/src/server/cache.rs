use core::{num::NonZeroUsize, time::Duration};
use std::time::Instant;

use lru::LruCache;
use parking_lot::Mutex;

struct Entry<V> {
    value: V,
    inserted: Instant,
}

/// A size-bounded LRU cache whose entries also expire after a fixed TTL.
///
/// Expired entries are dropped when they are read. Shared between request
/// handlers behind a single mutex.
pub struct ExpiringLruCache<K, V> {
    inner: Mutex<LruCache<K, Entry<V>>>,
    ttl: Duration,
}

impl<K, V> ExpiringLruCache<K, V>
where
    K: core::hash::Hash + Eq,
    V: Clone,
{
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            ttl,
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn add(&self, key: K, value: V) {
        self.add_at(key, value, Instant::now());
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    fn get_at(&self, key: &K, now: Instant) -> Option<V> {
        let mut inner = self.inner.lock();
        let expired = match inner.get(key) {
            None => return None,
            Some(entry) if now.saturating_duration_since(entry.inserted) < self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
        };
        if expired {
            inner.pop(key);
        }
        None
    }

    fn add_at(&self, key: K, value: V, now: Instant) {
        self.inner.lock().put(
            key,
            Entry {
                value,
                inserted: now,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(capacity: usize, ttl: Duration) -> ExpiringLruCache<String, String> {
        ExpiringLruCache::new(NonZeroUsize::new(capacity).unwrap(), ttl)
    }

    #[test]
    fn returns_fresh_entries() {
        let cache = cache(4, Duration::from_secs(60));
        cache.add("a".into(), "https://a.example".into());
        assert_eq!(cache.get(&"a".into()).as_deref(), Some("https://a.example"));
        assert_eq!(cache.get(&"b".into()), None);
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = cache(2, Duration::from_secs(60));
        cache.add("a".into(), "1".into());
        cache.add("b".into(), "2".into());
        // touch "a" so "b" is the eviction candidate
        assert!(cache.get(&"a".into()).is_some());
        cache.add("c".into(), "3".into());
        assert_eq!(cache.len(), 2);
        assert!(cache.get(&"b".into()).is_none());
        assert!(cache.get(&"a".into()).is_some());
        assert!(cache.get(&"c".into()).is_some());
    }

    #[test]
    fn expired_entries_are_dropped_on_read() {
        let cache = cache(4, Duration::from_secs(10));
        let start = Instant::now();
        cache.add_at("a".into(), "1".into(), start);

        assert!(
            cache
                .get_at(&"a".into(), start + Duration::from_secs(9))
                .is_some()
        );
        assert!(
            cache
                .get_at(&"a".into(), start + Duration::from_secs(10))
                .is_none()
        );
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn re_adding_refreshes_expiry() {
        let cache = cache(4, Duration::from_secs(10));
        let start = Instant::now();
        cache.add_at("a".into(), "1".into(), start);
        cache.add_at("a".into(), "2".into(), start + Duration::from_secs(8));
        assert_eq!(
            cache.get_at(&"a".into(), start + Duration::from_secs(15)),
            Some("2".to_owned())
        );
    }
}
