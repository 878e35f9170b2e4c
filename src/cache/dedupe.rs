/// Request deduplication.
///
/// Guarantees at most one outstanding fetch per key. The first caller for a
/// key (the leader) runs the fetcher; callers arriving while it is pending
/// (followers) block and receive a clone of the leader's result instead of
/// issuing their own request. Once the result settles, the key is cleared,
/// so a later call fetches fresh.
///
/// The leader holds a guard whose `Drop` clears the key and releases any
/// followers even if the fetcher panics — a panicking fetcher must never
/// leave the key permanently stuck.

use std::collections::HashMap;
use std::sync::{Arc, Condvar, Mutex, MutexGuard};

use crate::model::ApiError;

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // A poisoned mutex here only means some fetcher panicked; the protected
    // state is still internally consistent.
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

enum FlightState<T> {
    Pending,
    Settled(Result<T, ApiError>),
}

struct Flight<T> {
    state: Mutex<FlightState<T>>,
    settled: Condvar,
}

/// One in-flight-map per payload type. `T` must be `Clone` so every
/// follower can take its own copy of the shared result.
pub struct Deduplicator<T: Clone> {
    flights: Mutex<HashMap<String, Arc<Flight<T>>>>,
}

impl<T: Clone> Default for Deduplicator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Deduplicator<T> {
    pub fn new() -> Self {
        Self { flights: Mutex::new(HashMap::new()) }
    }

    /// True while a leader for `key` is still fetching.
    pub fn in_flight(&self, key: &str) -> bool {
        lock(&self.flights).contains_key(key)
    }

    /// Runs `fetcher` for `key`, or joins the fetch already in flight.
    pub fn dedupe<F>(&self, key: &str, fetcher: F) -> Result<T, ApiError>
    where
        F: FnOnce() -> Result<T, ApiError>,
    {
        let (flight, is_leader) = {
            let mut flights = lock(&self.flights);
            match flights.get(key) {
                Some(existing) => (existing.clone(), false),
                None => {
                    let flight = Arc::new(Flight {
                        state: Mutex::new(FlightState::Pending),
                        settled: Condvar::new(),
                    });
                    flights.insert(key.to_string(), flight.clone());
                    (flight, true)
                }
            }
        };

        if !is_leader {
            tracing::debug!(key, "joining in-flight request");
            return self.wait_for(&flight);
        }

        let guard = FlightGuard { dedup: self, key, flight: &flight, settled: false };
        let result = fetcher();
        guard.settle(result.clone());
        result
    }

    fn wait_for(&self, flight: &Flight<T>) -> Result<T, ApiError> {
        let mut state = lock(&flight.state);
        loop {
            match &*state {
                FlightState::Settled(result) => return result.clone(),
                FlightState::Pending => {
                    state = flight
                        .settled
                        .wait(state)
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                }
            }
        }
    }
}

/// Clears the in-flight entry for the leader. If the fetcher panicked
/// before settling, followers are released with an error instead of
/// waiting forever.
struct FlightGuard<'a, T: Clone> {
    dedup: &'a Deduplicator<T>,
    key: &'a str,
    flight: &'a Arc<Flight<T>>,
    settled: bool,
}

impl<T: Clone> FlightGuard<'_, T> {
    fn settle(mut self, result: Result<T, ApiError>) {
        self.publish(result);
        self.settled = true;
    }

    fn publish(&self, result: Result<T, ApiError>) {
        {
            let mut state = lock(&self.flight.state);
            *state = FlightState::Settled(result);
        }
        self.flight.settled.notify_all();
        lock(&self.dedup.flights).remove(self.key);
    }
}

impl<T: Clone> Drop for FlightGuard<'_, T> {
    fn drop(&mut self) {
        if !self.settled {
            tracing::warn!(key = self.key, "fetcher aborted before settling; clearing dedup key");
            self.publish(Err(ApiError::Network(
                "fetch aborted before completion".to_string(),
            )));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
