//! Asynchronous batch processing of verified callbacks.
//!
//! Runs after the webhook response has already been sent: outcomes are only
//! ever observable through the event store and the logs, never through the
//! HTTP exchange with ENS.

use std::sync::Arc;

use chrono::Utc;

use crate::error::AppError;
use crate::models::EventStatus;
use crate::salesforce::RecordSink;
use crate::store::EventStore;
use crate::webhook::normalizer::normalize;

/// Event category forwarded to the record sink (inbound SMS/OTT messages)
pub const INBOUND_MESSAGE_TYPE: &str = "EngagementEvents.OttMobileOriginated";

/// Shared pipeline state handed to each spawned batch task
#[derive(Clone)]
pub struct PipelineContext {
    pub store: Arc<EventStore>,
    /// Absent when the relay runs in logging-only mode
    pub sink: Option<Arc<dyn RecordSink>>,
}

/// Processes one callback body: a single event object or an array of them.
///
/// Events are handled sequentially in delivery order. Failures are isolated
/// per event - a sink rejection or auth failure marks that event and moves
/// on to the next one. Every event ends up in the store regardless of
/// outcome.
pub async fn process_batch(body: serde_json::Value, ctx: &PipelineContext) {
    let events = match body {
        serde_json::Value::Array(items) => items,
        single => vec![single],
    };

    log::info!("Processing batch of {} event(s)", events.len());

    for raw in events {
        let mut event = normalize(&raw, Utc::now());

        if event.event_type == INBOUND_MESSAGE_TYPE {
            if let Some(sink) = &ctx.sink {
                event.status = match sink.create_record(&event).await {
                    Ok(()) => EventStatus::SentToExternal,
                    Err(AppError::Sink { status, message }) => {
                        log::error!(
                            "Sink rejected event {} (HTTP {}): {}",
                            event.id,
                            status,
                            message
                        );
                        EventStatus::Failed
                    }
                    Err(e) => {
                        log::error!("Failed to forward event {}: {}", event.id, e);
                        EventStatus::Error
                    }
                };
            } else {
                log::info!("Sink disabled, logging event {} only", event.id);
            }
        }

        log::info!(
            "Stored event {} type={} status={}",
            event.id,
            event.event_type,
            event.status.as_str()
        );
        ctx.store.append(event);
    }
}
