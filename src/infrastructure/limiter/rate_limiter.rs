use std::{
    sync::Arc,
    time::{Duration, Instant},
};
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::time::sleep;

/// Per-key fixed window: `limit` requests per `window_size`, counted from
/// the first request of the window. The whole store lives in process
/// memory, so the limit is per instance, not global.
#[derive(Debug)]
struct FixedWindow {
    window_start: Instant,
    count: u64,
    last_seen: Instant,
}

impl FixedWindow {
    fn new() -> Self {
        let now = Instant::now();
        Self {
            window_start: now,
            count: 0,
            last_seen: now,
        }
    }

    /// Returns `Ok(remaining)` when the request is admitted, otherwise
    /// `Err(retry_after_secs)`.
    fn check(&mut self, limit: u64, window_size: Duration) -> Result<u64, u64> {
        let now = Instant::now();
        self.last_seen = now;

        if now.duration_since(self.window_start) >= window_size {
            self.window_start = now;
            self.count = 0;
        }

        if self.count < limit {
            self.count += 1;
            Ok(limit - self.count)
        } else {
            let elapsed = now.duration_since(self.window_start);
            let retry_after = window_size.saturating_sub(elapsed).as_secs().max(1);
            Err(retry_after)
        }
    }
}

#[derive(Clone)]
pub struct RateLimiterStore {
    map: Arc<DashMap<String, Arc<Mutex<FixedWindow>>>>,
    limit: u64,
    window_size: Duration,
}

impl RateLimiterStore {
    pub fn new(limit: u64, window_size: Duration) -> Self {
        let store = Self {
            map: Arc::new(DashMap::new()),
            limit,
            window_size,
        };

        // Evict keys idle for two windows.
        {
            let map_clone = store.map.clone();
            let ttl = window_size * 2;
            tokio::spawn(async move {
                let interval = Duration::from_secs(60);
                loop {
                    sleep(interval).await;
                    let now = Instant::now();
                    let stale: Vec<String> = map_clone
                        .iter()
                        .filter_map(|entry| {
                            let window = entry.value().lock();
                            if now.duration_since(window.last_seen) > ttl {
                                Some(entry.key().clone())
                            } else {
                                None
                            }
                        })
                        .collect();

                    for key in stale {
                        map_clone.remove(&key);
                    }
                }
            });
        }

        store
    }

    /// Construct a store without spawning the eviction task.
    /// For unit tests running outside a long-lived runtime.
    #[cfg(test)]
    fn without_eviction(limit: u64, window_size: Duration) -> Self {
        Self {
            map: Arc::new(DashMap::new()),
            limit,
            window_size,
        }
    }

    fn get_window(&self, key: &str) -> Arc<Mutex<FixedWindow>> {
        if let Some(existing) = self.map.get(key) {
            existing.clone()
        } else {
            let window = Arc::new(Mutex::new(FixedWindow::new()));
            match self.map.entry(key.to_string()) {
                dashmap::mapref::entry::Entry::Occupied(entry) => entry.get().clone(),
                dashmap::mapref::entry::Entry::Vacant(entry) => {
                    entry.insert(window.clone());
                    window
                }
            }
        }
    }

    /// `Ok(remaining)` when admitted, `Err(retry_after_secs)` when over
    /// the limit.
    pub fn check(&self, key: &str) -> Result<u64, u64> {
        let window = self.get_window(key);
        let mut w = window.lock();
        w.check(self.limit, self.window_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sixth_request_in_window_is_rejected() {
        let store = RateLimiterStore::without_eviction(5, Duration::from_secs(3600));

        for _ in 0..5 {
            assert!(store.check("10.0.0.1").is_ok());
        }
        assert!(store.check("10.0.0.1").is_err());
    }

    #[test]
    fn limits_are_per_key() {
        let store = RateLimiterStore::without_eviction(1, Duration::from_secs(3600));

        assert!(store.check("10.0.0.1").is_ok());
        assert!(store.check("10.0.0.2").is_ok());
        assert!(store.check("10.0.0.1").is_err());
    }

    #[test]
    fn window_elapse_resets_the_count() {
        let store = RateLimiterStore::without_eviction(1, Duration::from_millis(10));

        assert!(store.check("10.0.0.1").is_ok());
        assert!(store.check("10.0.0.1").is_err());

        std::thread::sleep(Duration::from_millis(15));
        assert!(store.check("10.0.0.1").is_ok());
    }

    #[test]
    fn rejection_reports_retry_after() {
        let store = RateLimiterStore::without_eviction(1, Duration::from_secs(3600));
        store.check("10.0.0.1").unwrap();

        let retry_after = store.check("10.0.0.1").unwrap_err();
        assert!(retry_after >= 1 && retry_after <= 3600);
    }
}
