//! Normalization of untrusted ENS payloads into the canonical event model.
//!
//! Total by design: every field has a default, so normalization can never
//! fail and the loose `serde_json::Value` never travels past this boundary.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{EventStatus, StoredEvent};

/// Numeric timestamps below this are Unix seconds, at or above are milliseconds
const MILLIS_THRESHOLD: i64 = 10_000_000_000;

/// Converts a raw inbound event into a `StoredEvent` with defaulted fields.
///
/// The status starts as `LoggedOnly`; the pipeline overwrites it with the
/// actual delivery outcome.
pub fn normalize(raw: &serde_json::Value, ingested_at: DateTime<Utc>) -> StoredEvent {
    let id = str_field(raw, "messageId")
        .or_else(|| str_field(raw, "messageKey"))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    StoredEvent {
        id,
        timestamp_iso: timestamp_iso(raw, ingested_at),
        event_type: str_field(raw, "eventCategoryType").unwrap_or_else(|| "Unknown".to_string()),
        mobile_number: str_field(raw, "mobileNumber").unwrap_or_else(|| "N/A".to_string()),
        contact_key: str_field(raw, "contactKey").unwrap_or_else(|| "N/A".to_string()),
        send_method: str_field(raw, "sendMethod").unwrap_or_else(|| "N/A".to_string()),
        message_type: str_field(raw, "messageType").unwrap_or_else(|| "N/A".to_string()),
        journey_name: str_field(raw, "journeyName"),
        activity_name: str_field(raw, "activityName"),
        failure_reason: str_field(raw, "failureReason"),
        status: EventStatus::LoggedOnly,
        payload: raw.clone(),
    }
}

fn str_field(raw: &serde_json::Value, key: &str) -> Option<String> {
    raw.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Renders the inbound timestamp as ISO-8601, defaulting to ingestion time.
///
/// ENS is inconsistent about units, so values below `MILLIS_THRESHOLD` are
/// treated as seconds and scaled up; everything else is already milliseconds.
fn timestamp_iso(raw: &serde_json::Value, ingested_at: DateTime<Utc>) -> String {
    let numeric = raw
        .get("timestamp")
        .and_then(|v| v.as_i64().or_else(|| v.as_f64().map(|f| f as i64)));

    match numeric {
        Some(value) => {
            let millis = if value < MILLIS_THRESHOLD {
                value.saturating_mul(1000)
            } else {
                value
            };
            DateTime::<Utc>::from_timestamp_millis(millis)
                .unwrap_or(ingested_at)
                .to_rfc3339()
        }
        None => ingested_at.to_rfc3339(),
    }
}
