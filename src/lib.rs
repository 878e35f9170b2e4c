/// ipalmon_client: client-side sync core for the IPAL monitoring dashboard.
///
/// # Module structure
///
/// ```text
/// ipalmon_client
/// ├── model      — shared data types (AlertRecord, SensorReading, ApiError, …)
/// ├── config     — environment-driven client configuration (.env / IPAL_* vars)
/// ├── api
/// │   ├── client    — authenticated blocking HTTP client (bearer, status mapping)
/// │   ├── alerts    — alert list/stats endpoints: URL construction + parsing
/// │   ├── sensors   — latest readings and history endpoints
/// │   ├── dashboard — summary and installation registry endpoints
/// │   └── fixtures (test only) — representative API response payloads
/// ├── cache
/// │   ├── key    — typed cache keys with one canonical string form
/// │   ├── store  — TTL cache with stale-while-revalidate and subscriptions
/// │   └── dedupe — per-key collapse of concurrent fetches
/// ├── poller     — interval polling with overlap skip and clean shutdown
/// ├── timerange  — preset/custom time range selection and resolution
/// ├── storage    — persisted selections (one TOML file per key)
/// ├── alert
/// │   └── grouping — per-reading alert groups with severity/status rollups
/// └── sync       — facade wiring client + cache + dedup + pollers
/// ```

/// Public modules
pub mod alert;
pub mod api;
pub mod cache;
pub mod config;
pub mod model;
pub mod poller;
pub mod storage;
pub mod sync;
pub mod timerange;
