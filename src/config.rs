/// Client configuration loader.
///
/// Separates deployment settings (API base URL, auth token, poll cadence,
/// cache TTLs, storage directory) from code. Values come from environment
/// variables, with `.env` support for local development.

use std::path::PathBuf;

use thiserror::Error;

/// Environment variable names.
const ENV_BASE_URL: &str = "IPAL_API_BASE_URL";
const ENV_TOKEN: &str = "IPAL_API_TOKEN";
const ENV_TIMEOUT: &str = "IPAL_REQUEST_TIMEOUT_SECS";
const ENV_POLL_INTERVAL: &str = "IPAL_ALERT_POLL_INTERVAL_SECS";
const ENV_DEFAULT_TTL: &str = "IPAL_CACHE_TTL_MS";
const ENV_STORAGE_DIR: &str = "IPAL_STORAGE_DIR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

/// Runtime configuration for the sync layer.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the IPAL REST API, without trailing slash.
    pub api_base_url: String,

    /// Bearer token attached to every request. `None` means unauthenticated;
    /// the API client rejects requests with a distinct auth error in that case.
    pub auth_token: Option<String>,

    /// Per-request timeout (default: 20 seconds).
    pub request_timeout_secs: u64,

    /// How often the alert poller refreshes (default: 30 seconds).
    pub alert_poll_interval_secs: u64,

    /// Default freshness window for cached entries (default: 60 000 ms).
    pub default_ttl_ms: i64,

    /// Directory for persisted selections (time range, selected IPAL).
    pub storage_dir: PathBuf,
}

/// Loads configuration from the process environment, reading `.env` first.
pub fn load_from_env() -> Result<ClientConfig, ConfigError> {
    dotenv::dotenv().ok();
    build(|name| std::env::var(name).ok())
}

/// Builds a config from a variable lookup. Factored out of `load_from_env`
/// so tests can supply variables without mutating the process environment.
pub fn build(
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ClientConfig, ConfigError> {
    let api_base_url = lookup(ENV_BASE_URL)
        .map(|u| u.trim_end_matches('/').to_string())
        .ok_or(ConfigError::MissingVar(ENV_BASE_URL))?;

    let auth_token = lookup(ENV_TOKEN).filter(|t| !t.is_empty());

    let request_timeout_secs = parse_or(&lookup, ENV_TIMEOUT, 20)?;
    let alert_poll_interval_secs = parse_or(&lookup, ENV_POLL_INTERVAL, 30)?;
    let default_ttl_ms = parse_or(&lookup, ENV_DEFAULT_TTL, 60_000)?;

    let storage_dir = lookup(ENV_STORAGE_DIR)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(".ipalmon"));

    Ok(ClientConfig {
        api_base_url,
        auth_token,
        request_timeout_secs,
        alert_poll_interval_secs,
        default_ttl_ms,
        storage_dir,
    })
}

fn parse_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::InvalidValue { var, value: raw }),
    }
}
