use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};

use crate::models::StoredEvent;
use crate::store::EventStore;

#[derive(Deserialize)]
pub struct EventsQuery {
    /// Event type filter; absent or "all" returns everything
    #[serde(rename = "type")]
    pub event_type: Option<String>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub total: usize,
    pub events: Vec<StoredEvent>,
}

/// GET /api/events?type=<eventType|all>
/// Returns stored events newest-first, optionally filtered by type
pub async fn list_events(
    store: web::Data<EventStore>,
    query: web::Query<EventsQuery>,
) -> HttpResponse {
    let filter = query
        .event_type
        .as_deref()
        .filter(|t| !t.is_empty() && *t != "all");

    let events = store.query(filter);

    HttpResponse::Ok().json(EventsResponse {
        total: events.len(),
        events,
    })
}

/// Configures the events API routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/events", web::get().to(list_events));
}
