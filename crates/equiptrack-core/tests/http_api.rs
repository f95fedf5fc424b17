//! HTTP API tests
//!
//! Drives the axum router in-process with `tower::ServiceExt::oneshot`.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use equiptrack_core::api::{ACTOR_HEADER, AppState, router};
use equiptrack_core::storage::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::in_memory()
        .await
        .expect("Failed to create test database");
    router(AppState::new(db))
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    actor: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(ACTOR_HEADER, actor);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// Create a type, a location and one equipment record; returns the equipment id
async fn seed(app: &Router, name: &str, serial: &str, condition: i64) -> i64 {
    let (_, equipment_type) = send(
        app,
        Method::POST,
        "/types",
        None,
        Some(json!({ "name": "Laptop" })),
    )
    .await;
    let (_, location) = send(
        app,
        Method::POST,
        "/locations",
        None,
        Some(json!({ "name": "Lab", "description": "Floor 2" })),
    )
    .await;

    let (status, created) = send(
        app,
        Method::POST,
        "/inventory",
        Some("alice@example.com"),
        Some(json!({
            "name": name,
            "serial_number": serial,
            "status": "available",
            "condition": condition,
            "type_id": equipment_type["id"],
            "location_id": location["id"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    created["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overall_status"], "ok");
}

#[tokio::test]
async fn test_basic_search_response_shape() {
    let app = app().await;
    seed(&app, "Dell Latitude", "DL-1", 8).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/inventory/search",
        None,
        Some(json!({ "query": "LATITUDE" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);
    assert_eq!(body["query"], "LATITUDE");
    assert_eq!(body["limit"], 50);
    assert_eq!(body["offset"], 0);
    assert_eq!(body["results"][0]["serial_number"], "DL-1");
    assert_eq!(body["results"][0]["type"]["name"], "Laptop");
    assert_eq!(body["results"][0]["location"]["description"], "Floor 2");
}

#[tokio::test]
async fn test_search_rejects_bad_page() {
    let app = app().await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/inventory/search",
        None,
        Some(json!({ "query": "x", "limit": 0 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E800");
}

#[tokio::test]
async fn test_advanced_search() {
    let app = app().await;
    seed(&app, "Projector", "XQ-555", 6).await;

    let (_, names) = send(
        &app,
        Method::POST,
        "/inventory/search/advanced",
        None,
        Some(json!({ "query": "xq", "search_fields": ["name"] })),
    )
    .await;
    assert_eq!(names["total_count"], 0);

    let (_, both) = send(
        &app,
        Method::POST,
        "/inventory/search/advanced",
        None,
        Some(json!({ "query": "xq", "search_fields": ["name", "serial_number"] })),
    )
    .await;
    assert_eq!(both["total_count"], 1);
}

#[tokio::test]
async fn test_quick_search_and_suggestions() {
    let app = app().await;
    seed(&app, "Label Printer", "LP-1", 7).await;

    let (status, quick) = send(
        &app,
        Method::GET,
        "/inventory/search/quick?q=label",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(quick["limit"], 10);
    assert_eq!(quick["offset"], 0);
    assert_eq!(quick["total_count"], 1);

    let (status, _) = send(
        &app,
        Method::GET,
        "/inventory/search/quick?q=label&limit=51",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, suggestions) = send(
        &app,
        Method::GET,
        "/inventory/search/suggestions?q=la",
        None,
        None,
    )
    .await;
    assert_eq!(suggestions["suggestions"], json!(["Label Printer"]));
    assert_eq!(suggestions["count"], 1);
}

#[tokio::test]
async fn test_stats_and_analytics() {
    let app = app().await;
    seed(&app, "Drill", "DR-1", 2).await;

    let (_, stats) = send(&app, Method::GET, "/inventory/search/stats", None, None).await;
    assert_eq!(stats["total_equipment"], 1);
    assert_eq!(stats["status_distribution"]["available"], 1);
    assert_eq!(stats["average_condition"], 2.0);

    let (_, analytics) = send(&app, Method::GET, "/inventory/search/analytics", None, None).await;
    assert_eq!(analytics["condition_distribution"]["Poor"], 1);
    assert_eq!(analytics["type_distribution"]["Laptop"], 1);
    assert_eq!(analytics["search_vector_coverage"], 0.0);
}

#[tokio::test]
async fn test_vector_maintenance_endpoints() {
    let app = app().await;
    let id = seed(&app, "Drill", "DR-1", 2).await;

    let (status, single) = send(
        &app,
        Method::POST,
        &format!("/inventory/{}/update-search", id),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(single["equipment_id"], id);

    let (status, body) = send(&app, Method::POST, "/inventory/999/update-search", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "E001");

    let (_, optimize) = send(&app, Method::POST, "/inventory/search/optimize", None, None).await;
    assert_eq!(optimize["total_equipment"], 1);
    assert_eq!(optimize["optimization_percentage"], 100.0);

    let (_, bulk) = send(
        &app,
        Method::POST,
        "/inventory/search/bulk-update",
        None,
        Some(json!({ "equipment_ids": [id, 999] })),
    )
    .await;
    assert_eq!(bulk["updated_count"], 1);
    assert_eq!(bulk["failed_count"], 1);
    assert_eq!(bulk["total_processed"], 2);
    assert_eq!(bulk["failures"][0]["equipment_id"], 999);

    let (status, _) = send(
        &app,
        Method::POST,
        "/inventory/search/bulk-update",
        None,
        Some(json!({ "equipment_ids": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_patch_is_audited() {
    let app = app().await;
    let id = seed(&app, "Router", "RT-1", 9).await;

    let (status, patched) = send(
        &app,
        Method::PATCH,
        &format!("/inventory/{}/patch", id),
        Some("bob@example.com"),
        Some(json!({ "condition": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["condition"], 4);
    assert_eq!(patched["name"], "Router");

    let (_, history) = send(
        &app,
        Method::GET,
        &format!("/inventory/{}/history", id),
        None,
        None,
    )
    .await;
    let entries = history.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["action"], "create");
    assert_eq!(entries[1]["action"], "update");
    assert_eq!(entries[1]["actor"], "bob@example.com");
    assert_eq!(entries[1]["old"]["condition"], 9);
    assert_eq!(entries[1]["new"]["condition"], 4);
    assert_eq!(entries[1]["old"]["type"]["name"], "Laptop");
    assert_eq!(entries[1]["new"]["location"]["name"], "Lab");
}

#[tokio::test]
async fn test_patch_errors() {
    let app = app().await;
    let id = seed(&app, "Router", "RT-1", 9).await;

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/inventory/{}/patch", id),
        None,
        Some(json!({ "condition": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "E700");

    let (status, _) = send(
        &app,
        Method::PATCH,
        "/inventory/999/patch",
        Some("bob"),
        Some(json!({ "condition": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(
        &app,
        Method::PATCH,
        &format!("/inventory/{}/patch", id),
        Some("bob"),
        Some(json!({ "condition": 11 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "E801");

    let (_, history) = send(
        &app,
        Method::GET,
        &format!("/inventory/{}/history", id),
        None,
        None,
    )
    .await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_malformed_requests_are_json_400() {
    let app = app().await;
    let id = seed(&app, "Router", "RT-1", 9).await;

    let cases = [
        (
            Method::POST,
            "/inventory/search".to_string(),
            Some(json!({ "query": "router", "limit": "x" })),
        ),
        (
            Method::POST,
            "/inventory/search/bulk-update".to_string(),
            Some(json!({})),
        ),
        (Method::GET, "/inventory/search/quick".to_string(), None),
        (Method::GET, "/inventory/search/suggestions".to_string(), None),
        (Method::GET, "/inventory/abc".to_string(), None),
        (Method::GET, "/inventory/abc/history".to_string(), None),
        (Method::POST, "/inventory/abc/update-search".to_string(), None),
        (
            Method::PATCH,
            format!("/inventory/{}/patch", id),
            Some(json!({ "condition": "four" })),
        ),
    ];

    for (method, uri, body) in cases {
        let (status, response) = send(&app, method, &uri, Some("bob"), body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(response["code"], "E800", "{uri}");
        assert!(response["error"].as_str().is_some(), "{uri}");
    }

    let (_, history) = send(
        &app,
        Method::GET,
        &format!("/inventory/{}/history", id),
        None,
        None,
    )
    .await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_ascii_search_over_http() {
    let app = app().await;
    seed(&app, "Écran Dell", "ÉC-01", 8).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/inventory/search",
        None,
        Some(json!({ "query": "ÉCRAN" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_count"], 1);

    let (_, suggestions) = send(
        &app,
        Method::GET,
        "/inventory/search/suggestions?q=%C3%A9c",
        None,
        None,
    )
    .await;
    assert_eq!(suggestions["suggestions"], json!(["Écran Dell", "ÉC-01"]));
}
