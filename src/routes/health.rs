use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::store::EventStore;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    timestamp: DateTime<Utc>,
    #[serde(rename = "eventsInMemory")]
    events_in_memory: usize,
}

/// GET /health
/// Liveness check - is the process running?
pub async fn health(store: web::Data<EventStore>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        timestamp: Utc::now(),
        events_in_memory: store.len(),
    })
}

/// Configures the health route
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health));
}
