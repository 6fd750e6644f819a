//! HTTP-level tests: requests go through axum, the trace layer and the
//! blocking dispatcher.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use store_api::StoreSettings;
use store_server::{build_app, demo};
use tower::ServiceExt;

fn app(settings: StoreSettings, cors: bool) -> axum::Router {
    build_app(Arc::new(demo::store_router(settings)), cors)
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_get_cart_issues_token() {
    let request = Request::get("/cart").body(Body::empty()).unwrap();
    let (status, headers, body) = send(app(StoreSettings::default(), false), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["content-type"], "application/json; charset=utf-8");
    assert!(headers["cart-token"].to_str().unwrap().starts_with("sess_"));
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(body["items_count"], 0);
}

#[tokio::test]
async fn test_cart_round_trip_over_http() {
    let app = app(StoreSettings::default(), false);

    let add = Request::post("/cart/add-item")
        .header("content-type", "application/json")
        .body(Body::from(json!({"id": 11, "quantity": 2}).to_string()))
        .unwrap();
    let (status, headers, cart) = send(app.clone(), add).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(cart["totals"]["subtotal"], 3600);
    let token = headers["cart-token"].to_str().unwrap().to_string();

    let select = Request::post("/cart/select-shipping-rate/0")
        .header("cart-token", token.as_str())
        .body(Body::from(json!({"rate_id": "express"}).to_string()))
        .unwrap();
    let (status, _, body) = send(app.clone(), select).await;
    // No destination yet, so the country-restricted rate is not offered.
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "invalid_rate");

    let get = Request::get("/cart").header("cart-token", token.as_str()).body(Body::empty()).unwrap();
    let (_, _, cart) = send(app, get).await;
    assert_eq!(cart["items"][0]["quantity"], 2);
    assert_eq!(cart["shipping_packages"][0]["selected_rate"], "flat_rate");
}

#[tokio::test]
async fn test_shipping_disabled_over_http() {
    let app = app(StoreSettings::default().with_shipping(false), false);
    let request = Request::post("/cart/select-shipping-rate/0")
        .body(Body::from(json!({"rate_id": "flat_rate"}).to_string()))
        .unwrap();
    let (status, _, body) = send(app, request).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "shipping_disabled");
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let big = vec![b' '; store_server::app::MAX_BODY_BYTES + 1];
    let request = Request::post("/cart/add-item").body(Body::from(big)).unwrap();
    let (status, _, body) = send(app(StoreSettings::default(), false), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_json");
}

#[tokio::test]
async fn test_cors_preflight_when_enabled() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/cart")
        .header("origin", "https://shop.example")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();
    let response = app(StoreSettings::default(), true).oneshot(request).await.unwrap();
    assert!(response.headers().contains_key("access-control-allow-origin"));
}
