/// Test fixtures: representative JSON payloads from the IPAL API.
///
/// These are structurally complete but truncated to the minimum needed to
/// exercise the parsers. Every endpoint wraps its payload in the standard
/// envelope:
///
///   { "success": true,  "data": ... }
///   { "success": false, "message": "..." }
///
/// Alert records carry the full schema: id, ipal_id, reading_id (nullable),
/// parameter, value, threshold, severity, status, timestamp, message.

/// Three alerts across two readings: rdg-101 has a low TDS alert and a
/// critical pH alert; rdg-102 has a high turbidity alert. Timestamps are
/// ordered so rdg-101 holds the most recent one.
#[cfg(test)]
pub(crate) fn fixture_alerts_json() -> &'static str {
    r#"{
      "success": true,
      "data": [
        {
          "id": "alr-001",
          "ipal_id": "ipal1",
          "reading_id": "rdg-101",
          "parameter": "tds",
          "value": 520.0,
          "threshold": 500.0,
          "severity": "low",
          "status": "acknowledged",
          "timestamp": "2025-06-01T08:10:00Z",
          "message": "TDS slightly above threshold"
        },
        {
          "id": "alr-002",
          "ipal_id": "ipal1",
          "reading_id": "rdg-101",
          "parameter": "ph",
          "value": 9.8,
          "threshold": 8.5,
          "severity": "critical",
          "status": "active",
          "timestamp": "2025-06-01T08:20:00Z",
          "message": "pH far above safe range"
        },
        {
          "id": "alr-003",
          "ipal_id": "ipal1",
          "reading_id": "rdg-102",
          "parameter": "turbidity",
          "value": 48.0,
          "threshold": 25.0,
          "severity": "high",
          "status": "active",
          "timestamp": "2025-06-01T08:15:00Z",
          "message": "Turbidity spike detected"
        }
      ]
    }"#
}

/// A staleness alert raised without a backing reading; `reading_id` is null.
#[cfg(test)]
pub(crate) fn fixture_alert_without_reading_json() -> &'static str {
    r#"{
      "success": true,
      "data": [
        {
          "id": "alr-010",
          "ipal_id": "ipal2",
          "reading_id": null,
          "parameter": "temperature",
          "value": 0.0,
          "threshold": 0.0,
          "severity": "medium",
          "status": "active",
          "timestamp": "2025-06-01T09:00:00Z",
          "message": "No temperature readings for 60 minutes"
        }
      ]
    }"#
}

#[cfg(test)]
pub(crate) fn fixture_alert_stats_json() -> &'static str {
    r#"{
      "success": true,
      "data": { "total": 12, "active": 3, "acknowledged": 4, "resolved": 5 }
    }"#
}

#[cfg(test)]
pub(crate) fn fixture_update_status_json() -> &'static str {
    r#"{ "success": true, "data": { "updated": 2 } }"#
}

/// One latest reading per parameter for ipal1.
#[cfg(test)]
pub(crate) fn fixture_latest_readings_json() -> &'static str {
    r#"{
      "success": true,
      "data": [
        {
          "id": "rdg-201", "ipal_id": "ipal1", "parameter": "ph",
          "value": 7.2, "unit": "pH", "timestamp": "2025-06-01T08:30:00Z"
        },
        {
          "id": "rdg-202", "ipal_id": "ipal1", "parameter": "tds",
          "value": 410.0, "unit": "ppm", "timestamp": "2025-06-01T08:30:00Z"
        },
        {
          "id": "rdg-203", "ipal_id": "ipal1", "parameter": "turbidity",
          "value": 12.5, "unit": "NTU", "timestamp": "2025-06-01T08:30:00Z"
        },
        {
          "id": "rdg-204", "ipal_id": "ipal1", "parameter": "temperature",
          "value": 27.4, "unit": "C", "timestamp": "2025-06-01T08:30:00Z"
        }
      ]
    }"#
}

/// A short chronological TDS series for the history chart.
#[cfg(test)]
pub(crate) fn fixture_history_json() -> &'static str {
    r#"{
      "success": true,
      "data": [
        {
          "id": "rdg-301", "ipal_id": "ipal1", "parameter": "tds",
          "value": 395.0, "unit": "ppm", "timestamp": "2025-06-01T06:00:00Z"
        },
        {
          "id": "rdg-302", "ipal_id": "ipal1", "parameter": "tds",
          "value": 402.0, "unit": "ppm", "timestamp": "2025-06-01T07:00:00Z"
        },
        {
          "id": "rdg-303", "ipal_id": "ipal1", "parameter": "tds",
          "value": 410.0, "unit": "ppm", "timestamp": "2025-06-01T08:00:00Z"
        }
      ]
    }"#
}

#[cfg(test)]
pub(crate) fn fixture_summary_json() -> &'static str {
    r#"{
      "success": true,
      "data": {
        "ipal_id": "ipal1",
        "ipal_name": "IPAL Cikapundung",
        "active_alerts": 2,
        "latest_readings": [
          {
            "id": "rdg-201", "ipal_id": "ipal1", "parameter": "ph",
            "value": 7.2, "unit": "pH", "timestamp": "2025-06-01T08:30:00Z"
          },
          {
            "id": "rdg-204", "ipal_id": "ipal1", "parameter": "temperature",
            "value": 27.4, "unit": "C", "timestamp": "2025-06-01T08:30:00Z"
          }
        ]
      }
    }"#
}

#[cfg(test)]
pub(crate) fn fixture_ipals_json() -> &'static str {
    r#"{
      "success": true,
      "data": [
        { "id": "ipal1", "name": "IPAL Cikapundung", "location": "Bandung", "active": true },
        { "id": "ipal2", "name": "IPAL Citarum Hulu", "location": "Majalaya", "active": false }
      ]
    }"#
}

/// The server's failure envelope, as returned with HTTP 200.
#[cfg(test)]
pub(crate) fn fixture_rejected_envelope_json() -> &'static str {
    r#"{ "success": false, "message": "IPAL not found" }"#
}
