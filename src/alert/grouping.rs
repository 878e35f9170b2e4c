/// Alert grouping and bulk-transition helpers.
///
/// `group_alerts` takes the flat list of `AlertRecord`s fetched from the API
/// and organizes them into per-reading `AlertGroup`s, making it convenient to
/// ask "what is the worst outstanding problem for this reading?" without
/// filtering a flat list every time.
///
/// Groups are a pure view over the flat list: they are recomputed on every
/// render and never mutated independently. The bulk helpers only compute
/// which alert ids a transition applies to; the actual status mutation is an
/// API call owned by the sync layer.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::{AlertRecord, AlertStatus, Severity};

/// Sentinel group key for alerts with no backing reading.
pub const UNKNOWN_READING_GROUP: &str = "unknown";

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// All alerts sharing one `reading_id`, in their original relative order.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertGroup {
    pub reading_id: String,
    pub alerts: Vec<AlertRecord>,
}

impl AlertGroup {
    /// Worst severity present in the group (`critical > high > medium > low`).
    pub fn highest_severity(&self) -> Option<Severity> {
        self.alerts.iter().map(|a| a.severity).max()
    }

    /// Timestamp of the most recent alert in the group.
    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.alerts.iter().map(|a| a.timestamp).max()
    }

    pub fn all_resolved(&self) -> bool {
        self.alerts.iter().all(|a| a.status == AlertStatus::Resolved)
    }

    pub fn has_active_alerts(&self) -> bool {
        self.alerts.iter().any(|a| a.status == AlertStatus::Active)
    }

    /// Ids targeted by "acknowledge all": every alert currently `active`.
    /// Alerts already acknowledged or resolved are untouched.
    pub fn acknowledge_all_ids(&self) -> Vec<String> {
        self.alerts
            .iter()
            .filter(|a| a.status == AlertStatus::Active)
            .map(|a| a.id.clone())
            .collect()
    }

    /// Ids targeted by "resolve all": every alert not already `resolved`.
    pub fn resolve_all_ids(&self) -> Vec<String> {
        self.alerts
            .iter()
            .filter(|a| a.status != AlertStatus::Resolved)
            .map(|a| a.id.clone())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Partitions a flat alert list into per-reading groups.
///
/// Alerts with no `reading_id` land in the `"unknown"` group. Within each
/// group the alerts keep their original relative order; the groups
/// themselves are sorted descending by latest alert timestamp (most recent
/// reading first), with ties broken by first appearance in the input.
pub fn group_alerts(alerts: Vec<AlertRecord>) -> Vec<AlertGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut buckets: HashMap<String, Vec<AlertRecord>> = HashMap::new();

    for alert in alerts {
        let key = alert
            .reading_id
            .clone()
            .unwrap_or_else(|| UNKNOWN_READING_GROUP.to_string());
        if !buckets.contains_key(&key) {
            order.push(key.clone());
        }
        buckets.entry(key).or_default().push(alert);
    }

    let mut groups: Vec<AlertGroup> = order
        .into_iter()
        .map(|reading_id| {
            let alerts = buckets.remove(&reading_id).unwrap_or_default();
            AlertGroup { reading_id, alerts }
        })
        .collect();

    // Stable sort keeps first-appearance order for equal timestamps.
    groups.sort_by(|a, b| b.latest_timestamp().cmp(&a.latest_timestamp()));
    groups
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
