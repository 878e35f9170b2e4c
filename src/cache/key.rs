/// Typed cache keys.
///
/// Cache keys used to be ad hoc interpolated strings, which made collisions
/// between similarly named resources possible. `CacheKey` describes the
/// resource and its parameters as data and renders one canonical string,
/// so `alerts:ipal1` and `alert-stats:ipal1` can never collide.

use crate::model::Parameter;
use crate::timerange::TimeRangePreset;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Flat alert list for one installation.
    Alerts { ipal_id: String },
    /// Per-status alert counts for one installation.
    AlertStats { ipal_id: String },
    /// Most recent reading per parameter for one installation.
    LatestReadings { ipal_id: String },
    /// Chart history for one parameter over a named range.
    SensorHistory {
        ipal_id: String,
        parameter: Parameter,
        range: TimeRangePreset,
    },
    /// Dashboard summary for one installation.
    DashboardSummary { ipal_id: String },
    /// Registry of all installations.
    IpalList,
}

impl CacheKey {
    /// Canonical string form, stable across the session. This is the dedup
    /// key: equal keys collapse to one in-flight request.
    pub fn canonical(&self) -> String {
        match self {
            CacheKey::Alerts { ipal_id } => format!("alerts:{ipal_id}"),
            CacheKey::AlertStats { ipal_id } => format!("alert-stats:{ipal_id}"),
            CacheKey::LatestReadings { ipal_id } => format!("latest:{ipal_id}"),
            CacheKey::SensorHistory { ipal_id, parameter, range } => {
                format!("chart:{ipal_id}:{parameter}:{range}")
            }
            CacheKey::DashboardSummary { ipal_id } => format!("dashboard:{ipal_id}"),
            CacheKey::IpalList => "ipals".to_string(),
        }
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.canonical())
    }
}
