/// `/api/sensors` endpoint family: latest readings and chart history.

use crate::api::{parse_envelope, ApiClient};
use crate::model::{ApiError, Parameter, SensorReading};
use crate::timerange::TimeRange;

// ---------------------------------------------------------------------------
// URL construction
// ---------------------------------------------------------------------------

/// Most recent reading per parameter for one installation.
pub fn build_latest_readings_url(ipal_id: &str) -> String {
    format!("/sensors/latest?ipal_id={}", urlencoding::encode(ipal_id))
}

/// Chart history for one parameter across explicit bounds. RFC 3339 bounds
/// contain `:` and `+`, so they are percent-encoded.
pub fn build_history_url(ipal_id: &str, parameter: Parameter, range: &TimeRange) -> String {
    format!(
        "/sensors/history?ipal_id={}&parameter={}&start={}&end={}",
        urlencoding::encode(ipal_id),
        parameter.as_str(),
        urlencoding::encode(&range.start.to_rfc3339()),
        urlencoding::encode(&range.end.to_rfc3339()),
    )
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

pub fn parse_readings_response(json: &str) -> Result<Vec<SensorReading>, ApiError> {
    parse_envelope(json)
}

// ---------------------------------------------------------------------------
// Fetch
// ---------------------------------------------------------------------------

pub fn fetch_latest_readings(
    client: &ApiClient,
    ipal_id: &str,
) -> Result<Vec<SensorReading>, ApiError> {
    let body = client.get(&build_latest_readings_url(ipal_id))?;
    parse_readings_response(&body)
}

pub fn fetch_history(
    client: &ApiClient,
    ipal_id: &str,
    parameter: Parameter,
    range: &TimeRange,
) -> Result<Vec<SensorReading>, ApiError> {
    let body = client.get(&build_history_url(ipal_id, parameter, range))?;
    parse_readings_response(&body)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
