//! Integration tests for the store API.
//!
//! Requests go through the full router (extractors, handlers, store,
//! error mapping) via `tower::ServiceExt::oneshot`, without a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_http::cors::CorsLayer;

use mlte_server::router::build_router;
use mlte_server::state::AppState;
use mlte_store::{MemoryStore, StoreUri};

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

fn test_app() -> Router {
    app_with_prefix("/api")
}

fn app_with_prefix(prefix: &str) -> Router {
    let store = MemoryStore::new(StoreUri::parse("memory://").unwrap());
    build_router(AppState::new(Arc::new(store)), prefix, CorsLayer::permissive())
}

async fn send(app: &Router, method: &str, path: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(json) => Body::from(serde_json::to_vec(&json).unwrap()),
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(path)
                .header("content-type", "application/json")
                .body(body)
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap_or(json!(null));
    (status, json)
}

async fn post_json(app: &Router, path: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", path, Some(body)).await
}

async fn get_json(app: &Router, path: &str) -> (StatusCode, Value) {
    send(app, "GET", path, None).await
}

async fn delete_json(app: &Router, path: &str) -> (StatusCode, Value) {
    send(app, "DELETE", path, None).await
}

const V0: &str = "/api/namespace/ns0/model/model0/version/v0";

async fn seed(app: &Router) {
    let (status, _) = post_json(app, "/api/namespace", json!({"identifier": "ns0"})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) =
        post_json(app, "/api/namespace/ns0/model", json!({"identifier": "model0"})).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = post_json(
        app,
        "/api/namespace/ns0/model/model0/version",
        json!({"identifier": "v0"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check() {
    let app = test_app();
    let (status, body) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn namespace_lifecycle() {
    let app = test_app();

    let (status, body) = post_json(&app, "/api/namespace", json!({"identifier": "ns0"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"identifier": "ns0", "models": []}));

    let (status, body) = post_json(&app, "/api/namespace", json!({"identifier": "ns0"})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "CONFLICT");
    assert_eq!(
        body["error"]["details"],
        json!({"entity": "namespace", "identifier": "ns0"})
    );

    post_json(&app, "/api/namespace/ns0/model", json!({"identifier": "m"})).await;
    let (status, body) = get_json(&app, "/api/namespace/ns0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["models"], json!(["m"]));

    let (_, body) = get_json(&app, "/api/namespace").await;
    assert_eq!(body, json!(["ns0"]));

    let (status, body) = delete_json(&app, "/api/namespace/ns0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["identifier"], "ns0");

    let (status, body) = get_json(&app, "/api/namespace/ns0/model/m").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["details"]["entity"], "namespace");
}

#[tokio::test]
async fn artifact_versions_over_http() {
    let app = test_app();
    seed(&app).await;

    let artifact = |v: i64| json!({"identifier": "a", "type": "value", "body": {"v": v}});
    let (status, body) = post_json(&app, &format!("{V0}/artifact"), artifact(1)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["version"], 0);
    let (_, body) = post_json(&app, &format!("{V0}/artifact"), artifact(2)).await;
    assert_eq!(body["version"], 1);

    let (_, body) = get_json(&app, &format!("{V0}/artifact/a")).await;
    assert_eq!(body["body"], json!({"v": 2}));
    let (_, body) = get_json(&app, &format!("{V0}/artifact/a?version=0")).await;
    assert_eq!(body["body"], json!({"v": 1}));

    let (status, body) = get_json(&app, &format!("{V0}/artifact/a?version=5")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["details"]["identifier"], "ns0/model0/v0/a");

    let (status, _) = delete_json(&app, "/api/namespace/ns0/model/model0/version/v0").await;
    assert_eq!(status, StatusCode::OK);
    let (status, body) = get_json(&app, &format!("{V0}/artifact/a")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["details"]["entity"], "version");
}

#[tokio::test]
async fn listing_and_search() {
    let app = test_app();
    seed(&app).await;
    for (id, kind, score) in [
        ("c", "value", 0.2),
        ("a", "value", 0.9),
        ("b", "report", 0.95),
    ] {
        let artifact = json!({"identifier": id, "type": kind, "body": {"score": score}});
        post_json(&app, &format!("{V0}/artifact"), artifact).await;
    }

    let (_, body) = get_json(&app, &format!("{V0}/artifact?limit=2&offset=1")).await;
    let ids: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["identifier"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["b", "c"]);

    let query = json!({
        "filter": {"type": "and", "filters": [
            {"type": "type", "item_type": "value"},
            {"type": "field", "path": "score", "condition": {"op": "greater_than", "value": 0.5}}
        ]}
    });
    let (status, body) = post_json(&app, &format!("{V0}/artifact/search"), query).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert_eq!(body[0]["identifier"], "a");
}

#[tokio::test]
async fn artifact_named_search_is_addressable() {
    let app = test_app();
    seed(&app).await;
    let path = format!("{V0}/artifact/search");

    let (status, body) = get_json(&app, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["details"]["identifier"], "ns0/model0/v0/search");

    let artifact = json!({"identifier": "search", "type": "value", "body": {"n": 1}});
    post_json(&app, &format!("{V0}/artifact"), artifact).await;

    let (status, body) = get_json(&app, &format!("{path}?version=0")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["body"], json!({"n": 1}));

    // POST on the same path is still the search endpoint.
    let (status, body) = post_json(&app, &path, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["identifier"], "search");

    let (status, body) = delete_json(&app, &path).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["identifier"], "search");
    let (status, _) = get_json(&app, &path).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_artifact_type_is_rejected() {
    let app = test_app();
    seed(&app).await;
    let artifact = json!({"identifier": "a", "type": "pickle", "body": {}});
    let (status, _) = post_json(&app, &format!("{V0}/artifact"), artifact).await;
    assert!(status.is_client_error(), "{status}");

    let (_, body) = get_json(&app, &format!("{V0}/artifact")).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn invalid_identifier_is_bad_request() {
    let app = test_app();
    let (status, body) = post_json(&app, "/api/namespace", json!({"identifier": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn percent_encoded_identifiers() {
    let app = test_app();
    post_json(&app, "/api/namespace", json!({"identifier": "ns0"})).await;
    post_json(&app, "/api/namespace/ns0/model", json!({"identifier": "my model"})).await;

    let (status, body) = get_json(&app, "/api/namespace/ns0/model/my%20model").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["identifier"], "my model");
}

#[tokio::test]
async fn custom_prefix() {
    let app = app_with_prefix("/store/api");
    let (status, _) = get_json(&app, "/store/api/health").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get_json(&app, "/api/health").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
