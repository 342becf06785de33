//! Keyed result cache with request coalescing and invalidation.
//!
//! Each key owns at most one in-flight request. Callers asking for a key that
//! is already loading await the same shared future instead of issuing another
//! request. Invalidation bumps the key's generation: results of requests
//! started under an older generation are stored but stay stale, and callers
//! waiting on such a request fetch again once it settles.
//!
//! A cache built with [`QueryCache::with_capacity`] keeps at most that many
//! keys, dropping the least recently fetched one that has no request in
//! flight.

use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures_util::future::{BoxFuture, FutureExt, Shared};

use crate::query::key::QueryKey;
use crate::repository::errors::{RepositoryError, RepositoryResult};

type SharedFetch<T> = Shared<BoxFuture<'static, RepositoryResult<T>>>;
type Entries<T> = Mutex<HashMap<QueryKey, Entry<T>>>;

/// Per-key lifecycle: `Idle → Loading → (Success | Error)`, re-entering
/// `Loading` on the next fetch after a change or invalidation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

struct InFlight<T> {
    generation: u64,
    future: SharedFetch<T>,
}

struct Entry<T> {
    status: QueryStatus,
    data: Option<T>,
    error: Option<RepositoryError>,
    generation: u64,
    stale: bool,
    last_used: u64,
    in_flight: Option<InFlight<T>>,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            status: QueryStatus::Idle,
            data: None,
            error: None,
            generation: 0,
            stale: true,
            last_used: 0,
            in_flight: None,
        }
    }
}

pub struct QueryCache<T> {
    entries: Arc<Entries<T>>,
    clock: Arc<AtomicU64>,
    capacity: Option<usize>,
}

impl<T> Clone for QueryCache<T> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            clock: Arc::clone(&self.clock),
            capacity: self.capacity,
        }
    }
}

/// Unbounded.
impl<T> Default for QueryCache<T> {
    fn default() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            clock: Arc::new(AtomicU64::new(0)),
            capacity: None,
        }
    }
}

impl<T> QueryCache<T> {
    /// Cache holding at most `capacity` keys (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock<T>(entries: &Entries<T>) -> MutexGuard<'_, HashMap<QueryKey, Entry<T>>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Drops least recently used idle keys until one more fits under `capacity`.
///
/// Keys with a request in flight are never dropped, so the map may briefly
/// exceed the bound while many keys are loading at once.
fn make_room<T>(entries: &mut HashMap<QueryKey, Entry<T>>, capacity: usize) {
    while entries.len() >= capacity {
        let oldest = entries
            .iter()
            .filter(|(_, entry)| entry.in_flight.is_none())
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        let Some(key) = oldest else {
            return;
        };
        log::debug!("evicting {key}");
        entries.remove(&key);
    }
}

/// Records the outcome of the request started under `generation`.
fn settle<T: Clone>(
    entries: &Entries<T>,
    key: &QueryKey,
    generation: u64,
    result: &RepositoryResult<T>,
) {
    let mut entries = lock(entries);
    let Some(entry) = entries.get_mut(key) else {
        return;
    };
    entry.in_flight = None;
    match result {
        Ok(data) => {
            entry.status = QueryStatus::Success;
            entry.data = Some(data.clone());
            entry.error = None;
            entry.stale = entry.generation != generation;
        }
        Err(err) => {
            log::debug!("query {key} failed: {err}");
            entry.status = QueryStatus::Error;
            entry.error = Some(err.clone());
            entry.stale = true;
        }
    }
}

impl<T> QueryCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Returns the cached value for `key` when fresh, otherwise joins or
    /// starts the request produced by `fetcher`.
    pub async fn fetch<F, Fut>(&self, key: QueryKey, fetcher: F) -> RepositoryResult<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = RepositoryResult<T>> + Send + 'static,
    {
        loop {
            let (future, generation) = {
                let mut entries = lock(&self.entries);
                if let Some(capacity) = self.capacity {
                    if !entries.contains_key(&key) {
                        make_room(&mut entries, capacity);
                    }
                }
                let entry = entries.entry(key.clone()).or_default();
                entry.last_used = self.clock.fetch_add(1, Ordering::Relaxed) + 1;
                if let Some(in_flight) = &entry.in_flight {
                    log::debug!("joining in-flight request for {key}");
                    (in_flight.future.clone(), in_flight.generation)
                } else {
                    if !entry.stale {
                        if let Some(data) = &entry.data {
                            return Ok(data.clone());
                        }
                    }
                    log::debug!("requesting {key}");
                    let future = self.start(key.clone(), entry.generation, fetcher());
                    entry.status = QueryStatus::Loading;
                    entry.in_flight = Some(InFlight {
                        generation: entry.generation,
                        future: future.clone(),
                    });
                    (future, entry.generation)
                }
            };

            let result = future.await;

            let current = lock(&self.entries).get(&key).map(|entry| entry.generation);
            // An entry evicted after settling has nothing newer to wait for.
            if current.is_none_or(|current| current == generation) {
                return result;
            }
            log::debug!("{key} was invalidated while loading, fetching again");
        }
    }

    fn start<Fut>(&self, key: QueryKey, generation: u64, request: Fut) -> SharedFetch<T>
    where
        Fut: Future<Output = RepositoryResult<T>> + Send + 'static,
    {
        let entries = Arc::clone(&self.entries);
        async move {
            let result = request.await;
            settle(&entries, &key, generation, &result);
            result
        }
        .boxed()
        .shared()
    }

    /// Last value stored for `key`, fresh or not.
    pub fn peek(&self, key: &QueryKey) -> Option<T> {
        lock(&self.entries)
            .get(key)
            .and_then(|entry| entry.data.clone())
    }

    pub fn last_error(&self, key: &QueryKey) -> Option<RepositoryError> {
        lock(&self.entries)
            .get(key)
            .and_then(|entry| entry.error.clone())
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        lock(&self.entries)
            .get(key)
            .map_or(QueryStatus::Idle, |entry| entry.status)
    }

    pub fn invalidate(&self, key: &QueryKey) {
        self.invalidate_where(|candidate| candidate == key);
    }

    /// Marks every matching key stale so its next fetch reaches the backend.
    pub fn invalidate_where<P>(&self, predicate: P)
    where
        P: Fn(&QueryKey) -> bool,
    {
        let mut entries = lock(&self.entries);
        for (key, entry) in entries.iter_mut().filter(|(key, _)| predicate(key)) {
            log::debug!("invalidating {key}");
            entry.generation += 1;
            entry.stale = true;
        }
    }
}
