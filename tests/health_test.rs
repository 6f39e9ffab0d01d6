//! Integration tests for the health and dashboard endpoints.

use std::sync::Arc;

use actix_web::{test, web, App};
use ens_relay::models::{EventStatus, StoredEvent};
use ens_relay::routes;
use ens_relay::store::EventStore;
use serde_json::Value;

fn sample(id: &str) -> StoredEvent {
    StoredEvent {
        id: id.to_string(),
        timestamp_iso: "2024-01-01T00:00:00+00:00".to_string(),
        event_type: "Unknown".to_string(),
        mobile_number: "N/A".to_string(),
        contact_key: "N/A".to_string(),
        send_method: "N/A".to_string(),
        message_type: "N/A".to_string(),
        journey_name: None,
        activity_name: None,
        failure_reason: None,
        status: EventStatus::LoggedOnly,
        payload: serde_json::json!({}),
    }
}

macro_rules! app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::from($store.clone()))
                .configure(routes::health::configure)
                .configure(routes::dashboard::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_health_reports_store_size() {
    let store = Arc::new(EventStore::new(100));
    let app = app!(store);

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["eventsInMemory"], 0);
    assert!(body["timestamp"].is_string());

    store.append(sample("e1"));

    let req = test::TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["eventsInMemory"], 1);
}

#[actix_web::test]
async fn test_index_redirects_to_dashboard() {
    let store = Arc::new(EventStore::new(100));
    let app = app!(store);

    let req = test::TestRequest::get().uri("/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 302);
    assert_eq!(
        resp.headers().get("location").unwrap().to_str().unwrap(),
        "/dashboard"
    );
}

#[actix_web::test]
async fn test_dashboard_disables_caching() {
    let store = Arc::new(EventStore::new(100));
    let app = app!(store);

    let req = test::TestRequest::get().uri("/dashboard").to_request();
    let resp = test::call_service(&app, req).await;

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get("cache-control").unwrap().to_str().unwrap(),
        "no-store"
    );

    let content_type = resp.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(content_type.contains("text/html"));
}
