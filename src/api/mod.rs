/// IPAL REST API access.
///
/// `client` owns the authenticated HTTP transport; `alerts`, `sensors`, and
/// `dashboard` contain URL construction and response parsing for their
/// endpoint families. Parsing is transport-independent (string in, typed
/// model out) so it can be exercised against the fixture payloads in
/// `fixtures` without a server.
///
/// Every endpoint wraps its payload in `{ "success": bool, "data" | "message" }`.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::model::ApiError;

pub mod alerts;
pub mod client;
pub mod dashboard;
pub mod sensors;

#[cfg(test)]
pub(crate) mod fixtures;

pub use client::ApiClient;

#[derive(Deserialize)]
struct Envelope<T> {
    success: bool,
    data: Option<T>,
    message: Option<String>,
}

/// Unwraps the standard response envelope.
///
/// # Errors
/// - `ApiError::Parse` — malformed JSON, or a success envelope with no data.
/// - `ApiError::Rejected` — `success: false`; carries the server's message.
pub(crate) fn parse_envelope<T: DeserializeOwned>(json: &str) -> Result<T, ApiError> {
    let envelope: Envelope<T> = serde_json::from_str(json)
        .map_err(|e| ApiError::Parse(format!("JSON deserialization failed: {e}")))?;

    if !envelope.success {
        return Err(ApiError::Rejected(
            envelope.message.unwrap_or_else(|| "no message provided".to_string()),
        ));
    }

    envelope
        .data
        .ok_or_else(|| ApiError::Parse("success envelope missing 'data' field".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_success_yields_data() {
        let parsed: Vec<u32> = parse_envelope(r#"{ "success": true, "data": [1, 2, 3] }"#)
            .expect("valid envelope should parse");
        assert_eq!(parsed, vec![1, 2, 3]);
    }

    #[test]
    fn test_envelope_failure_yields_rejected_with_message() {
        let result: Result<Vec<u32>, _> =
            parse_envelope(r#"{ "success": false, "message": "IPAL not found" }"#);
        assert!(
            matches!(result, Err(ApiError::Rejected(ref m)) if m == "IPAL not found"),
            "got {:?}",
            result
        );
    }

    #[test]
    fn test_envelope_failure_without_message_still_rejected() {
        let result: Result<Vec<u32>, _> = parse_envelope(r#"{ "success": false }"#);
        assert!(matches!(result, Err(ApiError::Rejected(_))));
    }

    #[test]
    fn test_success_without_data_is_parse_error() {
        let result: Result<Vec<u32>, _> = parse_envelope(r#"{ "success": true }"#);
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let result: Result<Vec<u32>, _> = parse_envelope("{ not json }}}");
        assert!(matches!(result, Err(ApiError::Parse(_))));
    }
}
