//! Integration Tests for the cache server API
//!
//! Tests full request/response cycle for each endpoint.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use std::time::Duration;
use tower::ServiceExt;
use webvault::{api::create_router, cache::CacheStore, AppState};

// == Helper Functions ==

fn create_test_app() -> Router {
    let cache = CacheStore::new(100);
    let state = AppState::new(cache);
    create_router(state)
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// == SET Endpoint Tests ==

#[tokio::test]
async fn test_set_endpoint_success() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request(
            "PUT",
            "/set",
            r#"{"key":"test_key","value":"test_value"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["key"], "test_key");
    assert!(json["message"].as_str().unwrap().contains("test_key"));
}

#[tokio::test]
async fn test_set_with_ttl_reports_remaining_ttl() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/set",
            r#"{"key":"ttl_key","value":"ttl_value","ttl":60}"#,
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(empty_request("GET", "/get/ttl_key"))
        .await
        .unwrap();
    let json = body_to_json(response.into_body()).await;
    let ttl = json["ttl"].as_u64().unwrap();
    assert!(ttl > 0 && ttl <= 60);
}

// == GET Endpoint Tests ==

#[tokio::test]
async fn test_get_endpoint_success() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/set",
            r#"{"key":"get_key","value":"get_value"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app
        .oneshot(empty_request("GET", "/get/get_key"))
        .await
        .unwrap();

    assert_eq!(get_response.status(), StatusCode::OK);
    let json = body_to_json(get_response.into_body()).await;
    assert_eq!(json["key"].as_str().unwrap(), "get_key");
    assert_eq!(json["value"].as_str().unwrap(), "get_value");
    // No TTL given: the entry never expires
    assert!(json.get("ttl").is_none());
}

#[tokio::test]
async fn test_get_endpoint_not_found() {
    let app = create_test_app();

    let response = app
        .oneshot(empty_request("GET", "/get/nonexistent"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

// == DELETE Endpoint Tests ==

#[tokio::test]
async fn test_delete_endpoint_reports_removed_count() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request(
            "PUT",
            "/set",
            r#"{"key":"delete_key","value":"v"}"#,
        ))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/del/delete_key"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["removed"], 1);

    // Deleting again is not an error
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/del/delete_key"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["removed"], 0);

    let response = app
        .oneshot(empty_request("GET", "/get/delete_key"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Set Membership Tests ==

#[tokio::test]
async fn test_set_membership_cycle() {
    let app = create_test_app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/sets/revoked", r#"{"member":"tok-1"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["result"], true);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/sets/revoked/tok-1"))
        .await
        .unwrap();
    assert_eq!(body_to_json(response.into_body()).await["result"], true);

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/sets/revoked/tok-1"))
        .await
        .unwrap();
    assert_eq!(body_to_json(response.into_body()).await["result"], true);

    let response = app
        .oneshot(empty_request("GET", "/sets/revoked/tok-1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_json(response.into_body()).await["result"], false);
}

#[tokio::test]
async fn test_wrong_kind_of_value_conflicts() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("PUT", "/set", r#"{"key":"plain","value":"v"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/sets/plain", r#"{"member":"m"}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    app.clone()
        .oneshot(json_request("POST", "/sets/members", r#"{"member":"m"}"#))
        .await
        .unwrap();

    let response = app
        .oneshot(empty_request("GET", "/get/members"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app();

    app.clone()
        .oneshot(json_request("PUT", "/set", r#"{"key":"s","value":"v"}"#))
        .await
        .unwrap();
    app.clone()
        .oneshot(empty_request("GET", "/get/s"))
        .await
        .unwrap();
    app.clone()
        .oneshot(empty_request("GET", "/get/missing"))
        .await
        .unwrap();

    let response = app
        .oneshot(empty_request("GET", "/stats"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
    assert_eq!(json["total_entries"], 1);
    assert!((json["hit_rate"].as_f64().unwrap() - 0.5).abs() < 0.001);
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let response = app
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Error Response Tests ==

#[tokio::test]
async fn test_invalid_json_request() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("PUT", "/set", r#"{"invalid json"#))
        .await
        .unwrap();

    // Axum rejects malformed bodies before the handler runs
    assert!(
        response.status() == StatusCode::BAD_REQUEST
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
    );
}

#[tokio::test]
async fn test_empty_key_request() {
    let app = create_test_app();

    let response = app
        .oneshot(json_request("PUT", "/set", r#"{"key":"","value":"test"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
}

// == TTL Expiration via API Tests ==

#[tokio::test]
async fn test_ttl_expiration_via_api() {
    let app = create_test_app();

    let set_response = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/set",
            r#"{"key":"ttl_test","value":"expires_soon","ttl":1}"#,
        ))
        .await
        .unwrap();
    assert_eq!(set_response.status(), StatusCode::OK);

    let get_response = app
        .clone()
        .oneshot(empty_request("GET", "/get/ttl_test"))
        .await
        .unwrap();
    assert_eq!(get_response.status(), StatusCode::OK);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let get_response = app
        .oneshot(empty_request("GET", "/get/ttl_test"))
        .await
        .unwrap();

    assert_eq!(get_response.status(), StatusCode::NOT_FOUND);
}
