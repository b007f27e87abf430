use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::Value;
use tracing::debug;

use shared_models::ApiError;

/// Cache key: resource kind plus server-assigned identity.
pub type CacheKey = (&'static str, i64);

/// One upstream fetch, boxed so it can be coalesced or run in the
/// background after the requesting call already returned.
pub type FetchFuture = BoxFuture<'static, Result<Value, ApiError>>;

type SharedFetch = Shared<FetchFuture>;

/// Staleness window after which an entry becomes eligible for background
/// refresh on next access.
pub const STALE_AFTER: Duration = Duration::from_secs(60);

/// Keyed entity cache with get-or-fetch-with-coalescing semantics and
/// explicit invalidation. Injectable so suites can swap in `NoopCache` or
/// a deterministic fake.
#[async_trait]
pub trait EntityCache: Send + Sync {
    /// Return the cached wire value for `key`, or drive `fetch` to fill
    /// the entry. Concurrent callers for the same key share a single
    /// upstream call; at most one fetch per key is in flight at any
    /// instant.
    async fn get_or_fetch(&self, key: CacheKey, fetch: FetchFuture) -> Result<Value, ApiError>;

    /// Drop the entry so the next read is forced fresh.
    fn invalidate(&self, key: CacheKey);
}

enum Slot {
    InFlight {
        generation: u64,
        fetch: SharedFetch,
    },
    Ready {
        generation: u64,
        value: Value,
        fetched_at: Instant,
        refreshing: bool,
    },
}

struct CacheInner {
    slots: Mutex<HashMap<CacheKey, Slot>>,
    stale_after: Duration,
    generations: AtomicU64,
}

/// Process-wide cache implementation. Stale entries are served immediately
/// while a single background refresh runs (stale-while-revalidate); the
/// generation tag on each slot keeps a late writeback from resurrecting an
/// entry that was invalidated while its fetch was in flight.
#[derive(Clone)]
pub struct SharedCache {
    inner: Arc<CacheInner>,
}

enum Plan {
    Hit(Value),
    Join(SharedFetch),
    Fetch { shared: SharedFetch, generation: u64 },
    Refresh { value: Value, fetch: FetchFuture, generation: u64 },
}

impl SharedCache {
    pub fn new(stale_after: Duration) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                slots: Mutex::new(HashMap::new()),
                stale_after,
                generations: AtomicU64::new(0),
            }),
        }
    }

    fn next_generation(&self) -> u64 {
        self.inner.generations.fetch_add(1, Ordering::Relaxed)
    }

    fn spawn_refresh(&self, key: CacheKey, generation: u64, fetch: FetchFuture) {
        let inner = Arc::clone(&self.inner);
        let fresh_generation = self.next_generation();

        tokio::spawn(async move {
            let result = fetch.await;
            let mut slots = inner.slots.lock().expect("cache lock poisoned");

            // The entry may have been invalidated or replaced while the
            // refresh was in flight; in that case the result is discarded.
            let still_current = matches!(
                slots.get(&key),
                Some(Slot::Ready { generation: current, .. }) if *current == generation
            );
            if !still_current {
                return;
            }

            match result {
                Ok(value) => {
                    slots.insert(
                        key,
                        Slot::Ready {
                            generation: fresh_generation,
                            value,
                            fetched_at: Instant::now(),
                            refreshing: false,
                        },
                    );
                }
                Err(err) => {
                    debug!("Background refresh of {}/{} failed: {}", key.0, key.1, err);
                    if let Some(Slot::Ready { refreshing, .. }) = slots.get_mut(&key) {
                        *refreshing = false;
                    }
                }
            }
        });
    }

    #[cfg(test)]
    fn peek(&self, key: CacheKey) -> Option<Value> {
        let slots = self.inner.slots.lock().expect("cache lock poisoned");
        match slots.get(&key) {
            Some(Slot::Ready { value, .. }) => Some(value.clone()),
            _ => None,
        }
    }
}

#[async_trait]
impl EntityCache for SharedCache {
    async fn get_or_fetch(&self, key: CacheKey, fetch: FetchFuture) -> Result<Value, ApiError> {
        // The lock is never held across an await; the plan is decided
        // synchronously and executed after release.
        let plan = {
            let mut slots = self.inner.slots.lock().expect("cache lock poisoned");
            match slots.get_mut(&key) {
                Some(Slot::InFlight { fetch: shared, .. }) => Plan::Join(shared.clone()),
                Some(Slot::Ready {
                    generation,
                    value,
                    fetched_at,
                    refreshing,
                }) => {
                    let snapshot = value.clone();
                    if fetched_at.elapsed() >= self.inner.stale_after && !*refreshing {
                        *refreshing = true;
                        Plan::Refresh {
                            value: snapshot,
                            fetch,
                            generation: *generation,
                        }
                    } else {
                        Plan::Hit(snapshot)
                    }
                }
                None => {
                    let generation = self.next_generation();
                    let shared = fetch.shared();
                    slots.insert(
                        key,
                        Slot::InFlight {
                            generation,
                            fetch: shared.clone(),
                        },
                    );
                    Plan::Fetch { shared, generation }
                }
            }
        };

        match plan {
            Plan::Hit(value) => Ok(value),
            Plan::Join(shared) => shared.await,
            Plan::Refresh {
                value,
                fetch,
                generation,
            } => {
                debug!("Serving stale {}/{} while refreshing", key.0, key.1);
                self.spawn_refresh(key, generation, fetch);
                Ok(value)
            }
            Plan::Fetch { shared, generation } => {
                let result = shared.await;

                let mut slots = self.inner.slots.lock().expect("cache lock poisoned");
                let still_current = matches!(
                    slots.get(&key),
                    Some(Slot::InFlight { generation: current, .. }) if *current == generation
                );
                if still_current {
                    match &result {
                        Ok(value) => {
                            slots.insert(
                                key,
                                Slot::Ready {
                                    generation,
                                    value: value.clone(),
                                    fetched_at: Instant::now(),
                                    refreshing: false,
                                },
                            );
                        }
                        Err(_) => {
                            slots.remove(&key);
                        }
                    }
                }

                result
            }
        }
    }

    fn invalidate(&self, key: CacheKey) {
        let mut slots = self.inner.slots.lock().expect("cache lock poisoned");
        if slots.remove(&key).is_some() {
            debug!("Invalidated cache entry {}/{}", key.0, key.1);
        }
    }
}

/// Cache that never stores anything; every read goes upstream.
pub struct NoopCache;

#[async_trait]
impl EntityCache for NoopCache {
    async fn get_or_fetch(&self, _key: CacheKey, fetch: FetchFuture) -> Result<Value, ApiError> {
        fetch.await
    }

    fn invalidate(&self, _key: CacheKey) {}
}

/// The single process-wide cache shared by every `ResourceClient` built
/// through `ResourceClient::new`.
pub fn process_cache() -> Arc<SharedCache> {
    static CACHE: OnceLock<Arc<SharedCache>> = OnceLock::new();
    Arc::clone(CACHE.get_or_init(|| Arc::new(SharedCache::new(STALE_AFTER))))
}
