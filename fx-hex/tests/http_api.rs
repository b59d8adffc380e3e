//! Integration tests for the HTTP API.
//!
//! These drive the full router (handlers, error mapping, trace layer) against
//! the built-in reference rates and an in-memory snapshot store.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use http_body_util::BodyExt;
use fx_hex::{FxService, ServiceOptions, inbound::HttpServer};
use fx_repo::{LogNotifier, MemoryStore, StaticRateProvider};
use serde_json::Value;
use tower::ServiceExt;

/// Helper to create a router whose rates are already loaded.
async fn create_test_app() -> Router {
    let service = FxService::new(
        Box::new(StaticRateProvider::reference()),
        MemoryStore::new(),
        Box::new(LogNotifier),
        ServiceOptions::default(),
    );
    service.refresh().await.unwrap();
    HttpServer::new(Arc::new(service)).router()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("Content-Type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Sends a request and returns the status with the parsed JSON body.
async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let app = create_test_app().await;

    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_list_currencies() {
    let app = create_test_app().await;

    let (status, body) = send(&app, get("/api/currencies")).await;
    assert_eq!(status, StatusCode::OK);
    let currencies = body.as_array().unwrap();
    assert_eq!(currencies.len(), 10);
    assert_eq!(currencies[0]["code"], "USD");
}

#[tokio::test]
async fn test_list_rates_reports_online_table() {
    let app = create_test_app().await;

    let (status, body) = send(&app, get("/api/rates")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["offline"], false);
    assert!(!body["rates"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_convert_accepts_text_amount() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        post_json("/api/convert", r#"{"amount": "100", "from": "USD", "to": "EUR"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["converted"], 85.0);
    assert_eq!(body["formatted"], "€85.00");
    assert_eq!(body["rate_available"], true);
}

#[tokio::test]
async fn test_convert_unsupported_currency_is_bad_request() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        post_json("/api/convert", r#"{"amount": 1, "from": "USD", "to": "XYZ"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert_eq!(body["error"], "Unsupported currency: XYZ");
}

#[tokio::test]
async fn test_convert_null_amount_counts_as_zero() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        post_json("/api/convert", r#"{"amount": null, "from": "USD", "to": "EUR"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 0.0);
    assert_eq!(body["converted"], 0.0);

    let (status, body) = send(
        &app,
        post_json(
            "/api/quote",
            r#"{"amount": 100, "from": "USD", "to": "EUR", "fee_percent": true}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["breakdown"]["fee"], 0.0);
}

#[tokio::test]
async fn test_convert_overflow_is_bad_request() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        post_json("/api/convert", r#"{"amount": 1e308, "from": "USD", "to": "JPY"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert_eq!(
        body["error"],
        "Converting USD -> JPY gives an amount out of range"
    );
}

#[tokio::test]
async fn test_convert_many_preserves_order() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/convert/multi",
            r#"{"amount": 100, "base": "USD", "targets": ["EUR", "GBP", "JPY"]}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let codes: Vec<&str> = body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["currency"].as_str().unwrap())
        .collect();
    assert_eq!(codes, vec!["EUR", "GBP", "JPY"]);
}

#[tokio::test]
async fn test_convert_many_duplicate_targets_is_bad_request() {
    let app = create_test_app().await;

    let (status, _) = send(
        &app,
        post_json(
            "/api/convert/multi",
            r#"{"amount": 100, "base": "USD", "targets": ["EUR", "EUR"]}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_applies_default_fee() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        post_json("/api/quote", r#"{"amount": 1000, "from": "USD", "to": "USD"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["breakdown"]["fee"], 25.0);
    assert_eq!(body["breakdown"]["total"], 1025.0);
    assert_eq!(body["formatted_total"], "$1025.00");
}

#[tokio::test]
async fn test_alert_lifecycle() {
    let app = create_test_app().await;

    // Reference USD->EUR is 0.85, so "below 0.90" fires.
    let (status, created) = send(
        &app,
        post_json(
            "/api/alerts",
            r#"{"from": "USD", "to": "EUR", "target_rate": 0.9, "condition": "below"}"#,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["is_active"], true);
    let id = created["id"].as_str().unwrap().to_string();

    let (_, listed) = send(&app, get("/api/alerts")).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, checked) = send(&app, post_json("/api/alerts/check", "{}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(checked["fired"], 1);

    let (status, toggled) =
        send(&app, post_json(&format!("/api/alerts/{}/toggle", id), "{}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["is_active"], false);

    let (_, checked) = send(&app, post_json("/api/alerts/check", "{}")).await;
    assert_eq!(checked["fired"], 0);

    let delete = Request::builder()
        .method(Method::DELETE)
        .uri(format!("/api/alerts/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = send(&app, get("/api/alerts")).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_alert_is_not_found() {
    let app = create_test_app().await;

    let (status, body) = send(
        &app,
        post_json(
            "/api/alerts/00000000-0000-0000-0000-000000000000/toggle",
            "{}",
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);

    let (status, _) = send(&app, post_json("/api/alerts/not-a-uuid/toggle", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rates_before_first_refresh_are_unavailable() {
    let service = FxService::new(
        Box::new(StaticRateProvider::reference()),
        MemoryStore::new(),
        Box::new(LogNotifier),
        ServiceOptions::default(),
    );
    let app = HttpServer::new(Arc::new(service)).router();

    let (status, body) = send(&app, get("/api/rates")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], 503);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = create_test_app().await;

    let (status, body) = send(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "FX Currency Conversion API");
    assert!(body["paths"]["/api/convert"]["post"].is_object());
    assert!(body["paths"]["/api/alerts/{id}"]["delete"].is_object());
    assert!(body["components"]["schemas"]["ConversionResponse"].is_object());

    let response = app.clone().oneshot(get("/swagger-ui/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
