use dashmap::DashMap;
use std::time::{Duration, Instant};
use crate::data::types::History;

/// Fetched histories keyed by the requested day window.
///
/// Lets horizon changes recompute the forecast without another network round trip.
pub struct HistoryCache {
    cache: DashMap<u32, CachedHistory>,
    ttl: Duration,
}

struct CachedHistory {
    history: History,
    timestamp: Instant,
}

impl HistoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: DashMap::new(),
            ttl,
        }
    }

    pub fn insert(&self, days: u32, history: History) {
        self.cache.insert(days, CachedHistory {
            history,
            timestamp: Instant::now(),
        });
    }

    /// Get history if not expired (evict on read)
    pub fn get(&self, days: u32) -> Option<History> {
        let expired = match self.cache.get(&days) {
            Some(entry) if entry.timestamp.elapsed() <= self.ttl => {
                return Some(entry.history.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            self.cache.remove(&days);
        }
        None
    }

    /// Drop everything, forcing the next load to refetch
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::{DataOrigin, HistoricalPoint};
    use chrono::NaiveDate;
    use std::thread;

    fn history(price: f64) -> History {
        History {
            points: vec![HistoricalPoint {
                date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
                price,
            }],
            origin: DataOrigin::Live,
        }
    }

    #[test]
    fn test_cache_insert_and_get() {
        let cache = HistoryCache::new(Duration::from_secs(300));
        cache.insert(1825, history(42_000.0));

        let cached = cache.get(1825).unwrap();
        assert_eq!(cached.points[0].price, 42_000.0);
        assert!(cache.get(365).is_none());
    }

    #[test]
    fn test_cache_ttl_expiration() {
        let cache = HistoryCache::new(Duration::from_millis(200));
        cache.insert(30, history(1.0));

        assert!(cache.get(30).is_some());

        thread::sleep(Duration::from_millis(300));

        assert!(cache.get(30).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let cache = HistoryCache::new(Duration::from_secs(60));
        cache.insert(30, history(1.0));
        cache.insert(90, history(2.0));
        assert_eq!(cache.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }
}
