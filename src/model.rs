/// Shared data types for the IPAL monitoring client.
///
/// Severity ordering and alert status transitions live here, as the single
/// source of truth, so every comparison in the codebase (grouping, sorting,
/// bulk transitions) uses the same enumeration rather than scattered
/// ad hoc literals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Sensor parameters
// ---------------------------------------------------------------------------

/// The four water-quality parameters measured at every IPAL installation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Parameter {
    Ph,
    Tds,
    Turbidity,
    Temperature,
}

impl Parameter {
    /// Canonical lowercase name, as used in cache keys and API queries.
    pub fn as_str(&self) -> &'static str {
        match self {
            Parameter::Ph => "ph",
            Parameter::Tds => "tds",
            Parameter::Turbidity => "turbidity",
            Parameter::Temperature => "temperature",
        }
    }
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Alert severity and status
// ---------------------------------------------------------------------------

/// Alert severity levels, in ascending order.
///
/// The derived `Ord` gives `critical > high > medium > low`; `rank()` exposes
/// the numeric order for display purposes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn rank(&self) -> u8 {
        match self {
            Severity::Low => 1,
            Severity::Medium => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

/// Alert lifecycle state. Transitions are monotonic:
/// `active → acknowledged → resolved`. Resolving an active alert directly
/// is allowed; re-activating is not part of this system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertStatus {
    Active,
    Acknowledged,
    Resolved,
}

impl AlertStatus {
    /// Whether moving from `self` to `next` is a legal forward transition.
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        use AlertStatus::*;
        matches!(
            (self, next),
            (Active, Acknowledged) | (Active, Resolved) | (Acknowledged, Resolved)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Active => "active",
            AlertStatus::Acknowledged => "acknowledged",
            AlertStatus::Resolved => "resolved",
        }
    }
}

// ---------------------------------------------------------------------------
// Records returned by the API
// ---------------------------------------------------------------------------

/// A single threshold-exceedance alert as returned by `/api/alerts`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub id: String,
    pub ipal_id: String,
    /// Sensor reading that triggered the alert. Absent for alerts raised
    /// without a backing reading (e.g. staleness alerts).
    pub reading_id: Option<String>,
    pub parameter: Parameter,
    pub value: f64,
    pub threshold: f64,
    pub severity: Severity,
    pub status: AlertStatus,
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

/// A single sensor measurement as returned by `/api/sensors`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorReading {
    pub id: String,
    pub ipal_id: String,
    pub parameter: Parameter,
    pub value: f64,
    pub unit: String,
    pub timestamp: DateTime<Utc>,
}

/// Metadata for one monitored water-treatment installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ipal {
    pub id: String,
    pub name: String,
    pub location: String,
    pub active: bool,
}

/// Per-status alert counts from `/api/alerts/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertStats {
    pub total: u64,
    pub active: u64,
    pub acknowledged: u64,
    pub resolved: u64,
}

/// Aggregate view from `/api/dashboard/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub ipal_id: String,
    pub ipal_name: String,
    pub active_alerts: u64,
    pub latest_readings: Vec<SensorReading>,
}

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Errors surfaced by the API layer and retained in cache entries.
///
/// `Auth` is distinct from the other classes so the UI can redirect to
/// re-authentication instead of silently retrying. `Http` and `Rejected`
/// both fall in the "server error" class: stale data is retained and a
/// manual retry is allowed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),

    #[error("authentication failed: {0}")]
    Auth(String),

    #[error("server error (HTTP {status}): {message}")]
    Http { status: u16, message: String },

    #[error("API rejected request: {0}")]
    Rejected(String),

    #[error("malformed response: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    Validation(String),
}

impl ApiError {
    /// True for errors that should send the UI to re-authentication.
    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Auth(_))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
