//! Record sink: creates Salesforce records for forwarded events.
//!
//! The sink sits behind a trait so the pipeline can be exercised in tests
//! without a live org.

use async_trait::async_trait;

use crate::config::SalesforceConfig;
use crate::error::{AppError, AppResult};
use crate::models::StoredEvent;
use crate::salesforce::auth::TokenCache;

/// Salesforce long text area fields cap out at 131072 characters;
/// stay just under it
const MAX_PAYLOAD_CHARS: usize = 131_000;

/// Name fields are limited to 80 characters
const MAX_NAME_CHARS: usize = 80;

const API_VERSION: &str = "v59.0";

/// Something that durably stores a forwarded event
#[async_trait]
pub trait RecordSink: Send + Sync {
    /// Creates one external record for `event`.
    ///
    /// At most one attempt is made; the pipeline records failures in the
    /// event status rather than retrying.
    async fn create_record(&self, event: &StoredEvent) -> AppResult<()>;
}

/// Production sink backed by the Salesforce REST API
pub struct SalesforceSink {
    tokens: TokenCache,
    client: reqwest::Client,
    event_object: String,
}

impl SalesforceSink {
    /// Creates a sink from credentials, with its own HTTP client
    pub fn new(config: SalesforceConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");

        let event_object = config.event_object.clone();
        let tokens = TokenCache::new(config, client.clone());

        Self {
            tokens,
            client,
            event_object,
        }
    }

    /// Creates a sink around an existing token cache (used by tests)
    pub fn with_cache(tokens: TokenCache, client: reqwest::Client, event_object: String) -> Self {
        Self {
            tokens,
            client,
            event_object,
        }
    }
}

#[async_trait]
impl RecordSink for SalesforceSink {
    async fn create_record(&self, event: &StoredEvent) -> AppResult<()> {
        let credential = self.tokens.get().await?;

        let payload = serde_json::to_string(&event.payload)
            .map_err(|e| AppError::Internal(format!("Failed to serialize payload: {}", e)))?;

        let body = serde_json::json!({
            "Name": truncate(&event.id, MAX_NAME_CHARS),
            "Event_Type__c": event.event_type,
            "Payload__c": truncate(&payload, MAX_PAYLOAD_CHARS),
        });

        let url = format!(
            "{}/services/data/{}/sobjects/{}",
            credential.instance_url.trim_end_matches('/'),
            API_VERSION,
            self.event_object
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&credential.access_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            log::info!("Created {} record for event {}", self.event_object, event.id);
            Ok(())
        } else {
            let message = response.text().await.unwrap_or_default();
            Err(AppError::Sink {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// Truncates at a char boundary so multi-byte payloads never split
fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((index, _)) => &s[..index],
        None => s,
    }
}
