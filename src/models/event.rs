use serde::Serialize;

/// Delivery outcome for a processed event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Record created in Salesforce
    SentToExternal,
    /// Stored in memory only (sink disabled or event not routed to it)
    LoggedOnly,
    /// Explicitly excluded from forwarding
    Filtered,
    /// Unexpected failure while processing the event
    Error,
    /// The sink rejected the record creation
    Failed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::SentToExternal => "sent_to_external",
            EventStatus::LoggedOnly => "logged_only",
            EventStatus::Filtered => "filtered",
            EventStatus::Error => "error",
            EventStatus::Failed => "failed",
        }
    }
}

/// Canonical event model - a single normalized ENS notification
///
/// Every field is default-filled by the normalizer; the original payload is
/// retained verbatim for inspection on the dashboard. The `id` doubles as
/// the dashboard expand/collapse key, so it must be stable across renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredEvent {
    pub id: String,
    pub timestamp_iso: String,
    pub event_type: String,
    pub mobile_number: String,
    pub contact_key: String,
    pub send_method: String,
    pub message_type: String,
    pub journey_name: Option<String>,
    pub activity_name: Option<String>,
    pub failure_reason: Option<String>,
    pub status: EventStatus,
    pub payload: serde_json::Value,
}
