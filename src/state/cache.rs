//! Suggestion memoisation keyed by (week, category), with expiry.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use chrono::{Datelike, NaiveDate};

/// ISO week plus a catalogue category (e.g. a slot label).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub year: i32,
    pub week: u32,
    pub category: String,
}

impl CacheKey {
    pub fn new(year: i32, week: u32, category: impl Into<String>) -> Self {
        Self {
            year,
            week,
            category: category.into(),
        }
    }

    /// Key for the ISO week containing `date`.
    pub fn for_date(date: NaiveDate, category: impl Into<String>) -> Self {
        let iso = date.iso_week();
        Self::new(iso.year(), iso.week(), category)
    }
}

/// Store for suggested dish ids. Implementations must allow at most one
/// writer per key at a time.
pub trait SuggestionStore: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<Vec<String>>;
    fn put(&self, key: CacheKey, dish_ids: Vec<String>, ttl: Duration);
    fn remove(&self, key: &CacheKey);
}

type Clock = Box<dyn Fn() -> Instant + Send + Sync>;

struct Entry {
    expires_at: Instant,
    dish_ids: Vec<String>,
}

/// In-memory store. Expired entries are dropped when read.
pub struct TtlCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
    clock: Clock,
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::new()
    }
}

impl TtlCache {
    pub fn new() -> Self {
        Self::with_clock(Instant::now)
    }

    pub fn with_clock(clock: impl Fn() -> Instant + Send + Sync + 'static) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock: Box::new(clock),
        }
    }

    /// Number of stored entries, expired ones included until read.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SuggestionStore for TtlCache {
    fn get(&self, key: &CacheKey) -> Option<Vec<String>> {
        let now = (self.clock)();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        match entries.get(key) {
            Some(entry) if entry.expires_at > now => Some(entry.dish_ids.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    fn put(&self, key: CacheKey, dish_ids: Vec<String>, ttl: Duration) {
        let expires_at = (self.clock)() + ttl;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                key,
                Entry {
                    expires_at,
                    dish_ids,
                },
            );
    }

    fn remove(&self, key: &CacheKey) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Cache whose clock advances only when told to.
    fn manual_cache() -> (TtlCache, Arc<AtomicU64>) {
        let start = Instant::now();
        let offset = Arc::new(AtomicU64::new(0));
        let handle = Arc::clone(&offset);
        let cache = TtlCache::with_clock(move || {
            start + Duration::from_secs(handle.load(Ordering::SeqCst))
        });
        (cache, offset)
    }

    #[test]
    fn test_entries_expire() {
        let (cache, clock) = manual_cache();
        let key = CacheKey::new(2026, 43, "soup");
        cache.put(key.clone(), vec!["s1".to_string()], Duration::from_secs(60));

        clock.store(59, Ordering::SeqCst);
        assert_eq!(cache.get(&key), Some(vec!["s1".to_string()]));

        clock.store(60, Ordering::SeqCst);
        assert_eq!(cache.get(&key), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_keys_are_per_week_and_category() {
        let cache = TtlCache::new();
        let monday = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let sunday = NaiveDate::from_ymd_opt(2026, 10, 25).unwrap();
        assert_eq!(CacheKey::for_date(monday, "soup"), CacheKey::for_date(sunday, "soup"));

        cache.put(
            CacheKey::for_date(monday, "soup"),
            vec!["s1".to_string()],
            Duration::from_secs(60),
        );
        assert!(cache.get(&CacheKey::for_date(monday, "dessert")).is_none());

        let next_week = CacheKey::for_date(sunday + chrono::Days::new(1), "soup");
        assert!(cache.get(&next_week).is_none());

        cache.remove(&CacheKey::for_date(sunday, "soup"));
        assert!(cache.is_empty());
    }
}
