//! Integration tests for the events read API.

use std::sync::Arc;

use actix_web::{test, web, App};
use ens_relay::models::{EventStatus, StoredEvent};
use ens_relay::routes;
use ens_relay::store::EventStore;
use pretty_assertions::assert_eq;
use serde_json::Value;

fn sample(id: &str, event_type: &str) -> StoredEvent {
    StoredEvent {
        id: id.to_string(),
        timestamp_iso: "2024-01-01T00:00:00+00:00".to_string(),
        event_type: event_type.to_string(),
        mobile_number: "N/A".to_string(),
        contact_key: "N/A".to_string(),
        send_method: "N/A".to_string(),
        message_type: "N/A".to_string(),
        journey_name: None,
        activity_name: None,
        failure_reason: None,
        status: EventStatus::LoggedOnly,
        payload: serde_json::json!({"messageId": id}),
    }
}

macro_rules! events_app {
    ($store:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::from($store.clone()))
                .configure(routes::events::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn test_list_events_empty() {
    let store = Arc::new(EventStore::new(100));
    let app = events_app!(store);

    let req = test::TestRequest::get().uri("/api/events").to_request();
    let resp = test::call_service(&app, req).await;
    assert!(resp.status().is_success());

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 0);
    assert_eq!(body["events"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_list_events_newest_first() {
    let store = Arc::new(EventStore::new(100));
    store.append(sample("e1", "EngagementEvents.SmsSent"));
    store.append(sample("e2", "EngagementEvents.SmsDelivered"));
    let app = events_app!(store);

    let req = test::TestRequest::get().uri("/api/events").to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 2);
    assert_eq!(body["events"][0]["id"], "e2");
    assert_eq!(body["events"][1]["id"], "e1");
}

#[actix_web::test]
async fn test_list_events_type_filter() {
    let store = Arc::new(EventStore::new(100));
    store.append(sample("e1", "EngagementEvents.SmsSent"));
    store.append(sample("e2", "EngagementEvents.SmsDelivered"));
    let app = events_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/events?type=EngagementEvents.SmsSent")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["events"][0]["id"], "e1");
}

#[actix_web::test]
async fn test_list_events_all_filter_returns_everything() {
    let store = Arc::new(EventStore::new(100));
    store.append(sample("e1", "EngagementEvents.SmsSent"));
    store.append(sample("e2", "EngagementEvents.SmsDelivered"));
    let app = events_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/events?type=all")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 2);
}

#[actix_web::test]
async fn test_list_events_unknown_type_is_empty() {
    let store = Arc::new(EventStore::new(100));
    store.append(sample("e1", "EngagementEvents.SmsSent"));
    let app = events_app!(store);

    let req = test::TestRequest::get()
        .uri("/api/events?type=DoesNotExist")
        .to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["total"], 0);
}

#[actix_web::test]
async fn test_events_serialize_with_camel_case_fields() {
    let store = Arc::new(EventStore::new(100));
    store.append(sample("e1", "Unknown"));
    let app = events_app!(store);

    let req = test::TestRequest::get().uri("/api/events").to_request();
    let resp = test::call_service(&app, req).await;

    let body: Value = test::read_body_json(resp).await;
    let event = &body["events"][0];
    assert_eq!(event["timestampIso"], "2024-01-01T00:00:00+00:00");
    assert_eq!(event["eventType"], "Unknown");
    assert_eq!(event["mobileNumber"], "N/A");
    assert_eq!(event["status"], "logged_only");
    assert_eq!(event["payload"]["messageId"], "e1");
}
