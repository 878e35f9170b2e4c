/// Sync facade.
///
/// `SyncService` wires the API client, the cache store, and the request
/// deduplicator into one entry point per resource. Reads go through the
/// cache's stale-while-revalidate path and return a snapshot immediately;
/// forced refreshes bypass freshness. All background fetchers are wrapped in
/// the deduplicator, so a poller tick racing a user-triggered refresh for
/// the same key still makes exactly one network call.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::api::client::ApiClient;
use crate::api::{alerts, dashboard, sensors};
use crate::cache::{CacheEntry, CacheKey, CacheStore, Deduplicator};
use crate::config::ClientConfig;
use crate::model::{AlertStatus, ApiError, Parameter};
use crate::poller::Poller;
use crate::timerange::{TimeRangeError, TimeRangeResolver};

use crate::alert::AlertGroup;

fn to_value<T: serde::Serialize>(data: T) -> Result<Value, ApiError> {
    serde_json::to_value(data).map_err(|e| ApiError::Parse(e.to_string()))
}

#[derive(Clone)]
pub struct SyncService {
    api: Arc<ApiClient>,
    cache: CacheStore,
    dedupe: Arc<Deduplicator<Value>>,
    ttl_ms: i64,
    poll_interval: Duration,
}

impl SyncService {
    pub fn new(config: &ClientConfig) -> Result<Self, ApiError> {
        Ok(Self {
            api: Arc::new(ApiClient::new(config)?),
            cache: CacheStore::new(),
            dedupe: Arc::new(Deduplicator::new()),
            ttl_ms: config.default_ttl_ms,
            poll_interval: Duration::from_secs(config.alert_poll_interval_secs),
        })
    }

    /// The underlying store, for subscriptions and direct reads.
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    // --- Per-resource reads -------------------------------------------------
    //
    // Each returns the current cache snapshot and schedules a background
    // fetch when the entry is missing, stale, or errored. Decode snapshots
    // with `CacheEntry::decode::<T>()`.

    pub fn alerts(&self, ipal_id: &str) -> CacheEntry {
        let key = CacheKey::Alerts { ipal_id: ipal_id.to_string() };
        self.cache.request(&key, self.ttl_ms, self.alerts_fetcher(&key, ipal_id))
    }

    pub fn alert_stats(&self, ipal_id: &str) -> CacheEntry {
        let key = CacheKey::AlertStats { ipal_id: ipal_id.to_string() };
        self.cache
            .request(&key, self.ttl_ms, self.alert_stats_fetcher(&key, ipal_id))
    }

    pub fn latest_readings(&self, ipal_id: &str) -> CacheEntry {
        let key = CacheKey::LatestReadings { ipal_id: ipal_id.to_string() };
        let fetcher = self.deduped(&key, {
            let ipal_id = ipal_id.to_string();
            move |api| sensors::fetch_latest_readings(api, &ipal_id).and_then(to_value)
        });
        self.cache.request(&key, self.ttl_ms, fetcher)
    }

    /// Chart history for one parameter over the resolver's current range.
    /// The cache key carries the preset, so switching presets reads a
    /// different entry instead of overwriting the previous one.
    pub fn sensor_history(
        &self,
        ipal_id: &str,
        parameter: Parameter,
        resolver: &TimeRangeResolver,
    ) -> Result<CacheEntry, TimeRangeError> {
        let range = resolver.resolve()?;
        let key = CacheKey::SensorHistory {
            ipal_id: ipal_id.to_string(),
            parameter,
            range: resolver.preset(),
        };
        let fetcher = self.deduped(&key, {
            let ipal_id = ipal_id.to_string();
            move |api| sensors::fetch_history(api, &ipal_id, parameter, &range).and_then(to_value)
        });
        Ok(self.cache.request(&key, self.ttl_ms, fetcher))
    }

    pub fn dashboard_summary(&self, ipal_id: &str) -> CacheEntry {
        let key = CacheKey::DashboardSummary { ipal_id: ipal_id.to_string() };
        let fetcher = self.deduped(&key, {
            let ipal_id = ipal_id.to_string();
            move |api| dashboard::fetch_summary(api, &ipal_id).and_then(to_value)
        });
        self.cache.request(&key, self.ttl_ms, fetcher)
    }

    pub fn ipals(&self) -> CacheEntry {
        let key = CacheKey::IpalList;
        let fetcher = self.deduped(&key, |api| dashboard::fetch_ipals(api).and_then(to_value));
        self.cache.request(&key, self.ttl_ms, fetcher)
    }

    // --- Forced refresh -----------------------------------------------------

    pub fn refresh_alerts(&self, ipal_id: &str) -> CacheEntry {
        let key = CacheKey::Alerts { ipal_id: ipal_id.to_string() };
        self.cache.refresh(&key, self.ttl_ms, self.alerts_fetcher(&key, ipal_id))
    }

    pub fn refresh_alert_stats(&self, ipal_id: &str) -> CacheEntry {
        let key = CacheKey::AlertStats { ipal_id: ipal_id.to_string() };
        self.cache
            .refresh(&key, self.ttl_ms, self.alert_stats_fetcher(&key, ipal_id))
    }

    // --- Alert status updates -----------------------------------------------

    /// Acknowledges every active alert in `group`. Returns the number of
    /// alerts the server updated; a group with nothing active is answered
    /// locally with 0. On success the alert caches are refreshed so the next
    /// read reflects the new statuses.
    pub fn acknowledge_group(
        &self,
        ipal_id: &str,
        group: &AlertGroup,
    ) -> Result<u64, ApiError> {
        self.update_group(ipal_id, group.acknowledge_all_ids(), AlertStatus::Acknowledged)
    }

    /// Resolves every not-yet-resolved alert in `group`.
    pub fn resolve_group(&self, ipal_id: &str, group: &AlertGroup) -> Result<u64, ApiError> {
        self.update_group(ipal_id, group.resolve_all_ids(), AlertStatus::Resolved)
    }

    fn update_group(
        &self,
        ipal_id: &str,
        alert_ids: Vec<String>,
        status: AlertStatus,
    ) -> Result<u64, ApiError> {
        if alert_ids.is_empty() {
            tracing::debug!(ipal_id, ?status, "no alerts eligible for transition");
            return Ok(0);
        }
        let updated = alerts::update_alert_status(&self.api, &alert_ids, status)?;
        tracing::info!(ipal_id, ?status, updated, "alert statuses updated");
        self.refresh_alerts(ipal_id);
        self.refresh_alert_stats(ipal_id);
        Ok(updated)
    }

    // --- Polling ------------------------------------------------------------

    /// A poller that force-refreshes the alert list and stats for `ipal_id`
    /// on the configured interval. Idle until `start()`; dropping it stops
    /// the loop.
    pub fn alert_poller(&self, ipal_id: &str) -> Poller {
        let service = self.clone();
        let ipal_id = ipal_id.to_string();
        Poller::new(self.poll_interval, move || {
            service.refresh_alerts(&ipal_id);
            service.refresh_alert_stats(&ipal_id);
        })
    }

    // --- Fetcher plumbing ---------------------------------------------------

    /// Wraps a typed fetch in the deduplicator under the entry's canonical
    /// key and erases its payload to `Value` for cache storage.
    fn deduped<F>(&self, key: &CacheKey, fetch: F) -> impl FnOnce() -> Result<Value, ApiError> + Send + 'static
    where
        F: FnOnce(&ApiClient) -> Result<Value, ApiError> + Send + 'static,
    {
        let api = Arc::clone(&self.api);
        let dedupe = Arc::clone(&self.dedupe);
        let canonical = key.canonical();
        move || dedupe.dedupe(&canonical, || fetch(&api))
    }

    fn alerts_fetcher(
        &self,
        key: &CacheKey,
        ipal_id: &str,
    ) -> impl FnOnce() -> Result<Value, ApiError> + Send + 'static {
        let ipal_id = ipal_id.to_string();
        self.deduped(key, move |api| alerts::fetch_alerts(api, &ipal_id).and_then(to_value))
    }

    fn alert_stats_fetcher(
        &self,
        key: &CacheKey,
        ipal_id: &str,
    ) -> impl FnOnce() -> Result<Value, ApiError> + Send + 'static {
        let ipal_id = ipal_id.to_string();
        self.deduped(key, move |api| {
            alerts::fetch_alert_stats(api, &ipal_id).and_then(to_value)
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
