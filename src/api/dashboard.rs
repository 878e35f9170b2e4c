/// `/api/dashboard` summary and `/api/ipals` installation metadata.

use crate::api::{parse_envelope, ApiClient};
use crate::model::{ApiError, DashboardSummary, Ipal};

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

pub fn build_summary_url(ipal_id: &str) -> String {
    format!("/dashboard/summary?ipal_id={}", urlencoding::encode(ipal_id))
}

pub fn build_ipals_url() -> String {
    "/ipals".to_string()
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

pub fn parse_summary_response(json: &str) -> Result<DashboardSummary, ApiError> {
    parse_envelope(json)
}

pub fn parse_ipals_response(json: &str) -> Result<Vec<Ipal>, ApiError> {
    parse_envelope(json)
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

pub fn fetch_summary(client: &ApiClient, ipal_id: &str) -> Result<DashboardSummary, ApiError> {
    let body = client.get(&build_summary_url(ipal_id))?;
    parse_summary_response(&body)
}

pub fn fetch_ipals(client: &ApiClient) -> Result<Vec<Ipal>, ApiError> {
    let body = client.get(&build_ipals_url())?;
    parse_ipals_response(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
