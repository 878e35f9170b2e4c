/// Stale-while-revalidate cache store.
///
/// Maps canonical cache keys to entries carrying the last fetched payload,
/// its timestamp, a TTL, and the last fetch error. Reads are synchronous
/// and side-effect free; `request` additionally schedules a background
/// fetch when the entry is missing, stale, or errored, so consumers always
/// see the previous data immediately while a refresh runs behind them.
///
/// Ordering: every issued fetch carries a per-key sequence number. A
/// completion whose sequence is below the last applied one is discarded,
/// so a slow early fetch can never overwrite a fresher result that settled
/// before it. All entry fields are updated before subscribers are
/// notified, and callbacks run outside the store lock.
///
/// Entries live for the whole session; there is no eviction.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use serde_json::Value;
use threadpool::ThreadPool;

use crate::cache::key::CacheKey;
use crate::model::ApiError;

pub type FetchResult = Result<Value, ApiError>;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

/// Cached state for one key. Cloned out to callers and subscribers; the
/// store's copy is the only mutable one.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    /// Last successfully fetched payload. Never reset to `None` once
    /// populated — failed refreshes keep the stale value servable.
    pub data: Option<Value>,
    pub fetched_at: Option<DateTime<Utc>>,
    pub ttl_ms: i64,
    /// Last fetch error, cleared by the next successful fetch.
    pub error: Option<ApiError>,
    pub in_flight: bool,
}

impl CacheEntry {
    fn new(key: String, ttl_ms: i64) -> Self {
        Self {
            key,
            data: None,
            fetched_at: None,
            ttl_ms,
            error: None,
            in_flight: false,
        }
    }

    /// Fresh while `now - fetched_at < ttl_ms`. Never-fetched entries are
    /// not fresh.
    pub fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        match self.fetched_at {
            Some(fetched_at) => (now - fetched_at).num_milliseconds() < self.ttl_ms,
            None => false,
        }
    }

    /// Stale entries are still servable but eligible for background refresh.
    pub fn is_stale(&self, now: DateTime<Utc>) -> bool {
        !self.is_fresh(now)
    }

    /// Deserializes the cached payload, if any.
    pub fn decode<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        self.data
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

struct EntryState {
    entry: CacheEntry,
    /// Sequence number handed to the next issued fetch (first fetch gets 1).
    next_seq: u64,
    /// Highest sequence whose completion has been applied; 0 = none yet.
    applied_seq: u64,
    /// Sequences issued but not yet settled.
    pending: Vec<u64>,
}

impl EntryState {
    fn new(key: String, ttl_ms: i64) -> Self {
        Self {
            entry: CacheEntry::new(key, ttl_ms),
            next_seq: 1,
            applied_seq: 0,
            pending: Vec::new(),
        }
    }

    fn issue(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.pending.push(seq);
        self.entry.in_flight = true;
        seq
    }
}

// ---------------------------------------------------------------------------
// Subscriptions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber = Arc<dyn Fn(&CacheEntry) + Send + Sync + 'static>;

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

struct StoreInner {
    entries: HashMap<String, EntryState>,
    subscribers: HashMap<String, Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: u64,
}

/// Process-wide shared cache. Cloning shares the underlying state.
#[derive(Clone)]
pub struct CacheStore {
    inner: Arc<Mutex<StoreInner>>,
    pool: ThreadPool,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore {
    pub fn new() -> Self {
        Self::with_workers(4)
    }

    /// `workers` bounds how many background revalidations run at once.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreInner {
                entries: HashMap::new(),
                subscribers: HashMap::new(),
                next_subscription: 1,
            })),
            pool: ThreadPool::new(workers),
        }
    }

    /// Synchronous read; no side effects.
    pub fn get(&self, key: &CacheKey) -> Option<CacheEntry> {
        lock(&self.inner)
            .entries
            .get(&key.canonical())
            .map(|state| state.entry.clone())
    }

    /// Returns the current entry immediately and, when it is missing, stale,
    /// or errored with no fetch already in flight, schedules exactly one
    /// background call to `fetcher`.
    pub fn request<F>(&self, key: &CacheKey, ttl_ms: i64, fetcher: F) -> CacheEntry
    where
        F: FnOnce() -> FetchResult + Send + 'static,
    {
        self.request_at(key, ttl_ms, Utc::now(), fetcher)
    }

    /// `request` against an explicit `now`, for staleness tests.
    pub fn request_at<F>(
        &self,
        key: &CacheKey,
        ttl_ms: i64,
        now: DateTime<Utc>,
        fetcher: F,
    ) -> CacheEntry
    where
        F: FnOnce() -> FetchResult + Send + 'static,
    {
        let canonical = key.canonical();
        let (snapshot, issued) = {
            let mut inner = lock(&self.inner);
            let state = inner
                .entries
                .entry(canonical.clone())
                .or_insert_with(|| EntryState::new(canonical.clone(), ttl_ms));
            state.entry.ttl_ms = ttl_ms;

            let needs_fetch = !state.entry.in_flight
                && (state.entry.is_stale(now) || state.entry.error.is_some());
            if needs_fetch {
                let seq = state.issue();
                (state.entry.clone(), Some(seq))
            } else {
                (state.entry.clone(), None)
            }
        };

        if let Some(seq) = issued {
            // Loading-start transition, then the fetch itself.
            self.notify(&canonical, &snapshot);
            self.spawn_fetch(canonical, seq, fetcher);
        }
        snapshot
    }

    /// Forces a fetch even when the entry is fresh or one is already in
    /// flight. Used by pollers and manual retry.
    pub fn refresh<F>(&self, key: &CacheKey, ttl_ms: i64, fetcher: F) -> CacheEntry
    where
        F: FnOnce() -> FetchResult + Send + 'static,
    {
        let canonical = key.canonical();
        let (snapshot, seq) = {
            let mut inner = lock(&self.inner);
            let state = inner
                .entries
                .entry(canonical.clone())
                .or_insert_with(|| EntryState::new(canonical.clone(), ttl_ms));
            state.entry.ttl_ms = ttl_ms;
            let seq = state.issue();
            (state.entry.clone(), seq)
        };

        self.notify(&canonical, &snapshot);
        self.spawn_fetch(canonical, seq, fetcher);
        snapshot
    }

    /// Registers a callback notified on every state transition of `key`
    /// (loading-start, success, error).
    pub fn subscribe<F>(&self, key: &CacheKey, callback: F) -> SubscriptionId
    where
        F: Fn(&CacheEntry) + Send + Sync + 'static,
    {
        let mut inner = lock(&self.inner);
        inner.next_subscription += 1;
        let id = SubscriptionId(inner.next_subscription);
        inner
            .subscribers
            .entry(key.canonical())
            .or_default()
            .push((id, Arc::new(callback)));
        id
    }

    /// Removes a subscription. Idempotent: unsubscribing an id that is
    /// already gone is a no-op and leaves other subscribers untouched.
    pub fn unsubscribe(&self, key: &CacheKey, id: SubscriptionId) {
        let mut inner = lock(&self.inner);
        if let Some(subs) = inner.subscribers.get_mut(&key.canonical()) {
            subs.retain(|(sub_id, _)| *sub_id != id);
        }
    }

    fn spawn_fetch<F>(&self, canonical: String, seq: u64, fetcher: F)
    where
        F: FnOnce() -> FetchResult + Send + 'static,
    {
        let store = self.clone();
        self.pool.execute(move || {
            let result = fetcher();
            store.apply_completion(&canonical, seq, result);
        });
    }

    /// Applies a settled fetch. Completions are applied in settle order;
    /// one older than the last applied sequence is discarded so it cannot
    /// clobber a fresher result.
    fn apply_completion(&self, canonical: &str, seq: u64, result: FetchResult) {
        let snapshot = {
            let mut inner = lock(&self.inner);
            let Some(state) = inner.entries.get_mut(canonical) else {
                return;
            };
            state.pending.retain(|pending| *pending != seq);
            state.entry.in_flight = !state.pending.is_empty();

            if seq > state.applied_seq {
                state.applied_seq = seq;
                match result {
                    Ok(data) => {
                        state.entry.data = Some(data);
                        state.entry.fetched_at = Some(Utc::now());
                        state.entry.error = None;
                    }
                    Err(error) => {
                        // Keep prior data: stale-but-servable.
                        tracing::warn!(key = canonical, %error, "fetch failed; retaining stale data");
                        state.entry.error = Some(error);
                    }
                }
            } else {
                tracing::debug!(key = canonical, seq, "discarding out-of-date completion");
            }
            state.entry.clone()
        };

        self.notify(canonical, &snapshot);
    }

    /// Invokes subscribers outside the lock; the entry snapshot is fully
    /// updated before anyone sees it.
    fn notify(&self, canonical: &str, entry: &CacheEntry) {
        let subs: Vec<Subscriber> = lock(&self.inner)
            .subscribers
            .get(canonical)
            .map(|subs| subs.iter().map(|(_, s)| s.clone()).collect())
            .unwrap_or_default();
        for subscriber in subs {
            subscriber(entry);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
