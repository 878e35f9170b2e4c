/// `/api/alerts` endpoint family: list, stats, and bulk status updates.

use serde::{Deserialize, Serialize};

use crate::api::{parse_envelope, ApiClient};
use crate::model::{AlertRecord, AlertStats, AlertStatus, ApiError};

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Alert list for one installation, optionally filtered by status.
pub fn build_alerts_url(ipal_id: &str, status: Option<AlertStatus>) -> String {
    let mut url = format!("/alerts?ipal_id={}", urlencoding::encode(ipal_id));
    if let Some(status) = status {
        url.push_str(&format!("&status={}", status.as_str()));
    }
    url
}

pub fn build_alert_stats_url(ipal_id: &str) -> String {
    format!("/alerts/stats?ipal_id={}", urlencoding::encode(ipal_id))
}

pub const UPDATE_STATUS_PATH: &str = "/alerts/status";

/// Body for the bulk status-update endpoint.
#[derive(Debug, Serialize)]
pub struct UpdateStatusRequest {
    pub alert_ids: Vec<String>,
    pub status: AlertStatus,
}

#[derive(Debug, Deserialize)]
struct UpdateStatusData {
    updated: u64,
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

pub fn parse_alerts_response(json: &str) -> Result<Vec<AlertRecord>, ApiError> {
    parse_envelope(json)
}

pub fn parse_alert_stats_response(json: &str) -> Result<AlertStats, ApiError> {
    parse_envelope(json)
}

/// Returns how many alerts the server transitioned.
pub fn parse_update_status_response(json: &str) -> Result<u64, ApiError> {
    let data: UpdateStatusData = parse_envelope(json)?;
    Ok(data.updated)
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

pub fn fetch_alerts(client: &ApiClient, ipal_id: &str) -> Result<Vec<AlertRecord>, ApiError> {
    let body = client.get(&build_alerts_url(ipal_id, None))?;
    parse_alerts_response(&body)
}

pub fn fetch_alert_stats(client: &ApiClient, ipal_id: &str) -> Result<AlertStats, ApiError> {
    let body = client.get(&build_alert_stats_url(ipal_id))?;
    parse_alert_stats_response(&body)
}

/// Bulk-transitions `alert_ids` to `status`. An empty id set is a no-op
/// answered locally, without a network call.
pub fn update_alert_status(
    client: &ApiClient,
    alert_ids: &[String],
    status: AlertStatus,
) -> Result<u64, ApiError> {
    if alert_ids.is_empty() {
        return Ok(0);
    }
    let request = UpdateStatusRequest {
        alert_ids: alert_ids.to_vec(),
        status,
    };
    let body = client.put_json(UPDATE_STATUS_PATH, &request)?;
    parse_update_status_response(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
