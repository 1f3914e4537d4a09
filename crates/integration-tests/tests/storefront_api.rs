//! HTTP routes, driven in-process through the full middleware stack.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode},
};
use pbs_integration_tests::{app_state, checkout_details, fast_checkout};
use pbs_storefront::cart::{CartRepository, MemoryPersistence};
use pbs_storefront::checkout::CheckoutSettings;
use pbs_storefront::middleware::REQUEST_ID_HEADER;
use pbs_storefront::routes;
use pbs_storefront::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
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
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn setup(checkout: CheckoutSettings) -> (Router, AppState) {
    let state = app_state(Arc::new(MemoryPersistence::new()), checkout);
    (routes::app(state.clone()), state)
}

#[tokio::test]
async fn test_health() {
    let (app, _) = setup(fast_checkout());
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_product_listing_and_filter() {
    let (app, _) = setup(fast_checkout());

    let (status, all) = send(&app, Method::GET, "/products", None).await;
    assert_eq!(status, StatusCode::OK);
    let count = all["products"].as_array().unwrap().len();
    assert!(count > 0);
    assert!(all["categories"].as_array().unwrap().contains(&json!("cups")));

    let (_, cups) = send(&app, Method::GET, "/products?category=cups", None).await;
    let cups = cups["products"].as_array().unwrap();
    assert!(!cups.is_empty() && cups.len() < count);
    assert!(cups.iter().all(|p| p["category"] == "cups"));
}

#[tokio::test]
async fn test_product_detail() {
    let (app, _) = setup(fast_checkout());

    let (status, product) = send(&app, Method::GET, "/products/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["name"], "Custom Paper Cups");
    assert_eq!(product["defaultSize"], "8oz");
    assert_eq!(product["tiers"].as_array().unwrap().len(), 5);

    let (status, body) = send(&app, Method::GET, "/products/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_cart_add_replace_remove_clear() {
    let (app, _) = setup(fast_checkout());

    let (status, cart) = send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 7, "size": "12oz", "quantityTier": "251-500 units"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"][0]["id"], "7-12oz");
    assert_eq!(cart["items"][0]["lineTotal"], "180.00");
    assert_eq!(cart["summary"]["totalDisplay"], "$180.00");

    // Same product and size replaces the line
    let (_, cart) = send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 7, "size": "12oz", "quantityTier": 25})),
    )
    .await;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["qty"], 25);

    let (_, cart) = send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 3, "quantityTier": 75})),
    )
    .await;
    assert_eq!(cart["items"][1]["id"], "3-default");
    assert_eq!(cart["items"][1]["size"], "Standard");
    assert_eq!(cart["summary"]["itemCountLabel"], "2 items");

    let (status, cart) = send(&app, Method::DELETE, "/cart/items/7-12oz", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);

    // Removing again is not an error
    let (status, _) = send(&app, Method::DELETE, "/cart/items/7-12oz", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, cart) = send(&app, Method::DELETE, "/cart", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(cart["items"].as_array().unwrap().is_empty());
    assert_eq!(cart["summary"]["subtotalDisplay"], "$0.00");
}

#[tokio::test]
async fn test_cart_add_rejections() {
    let (app, state) = setup(fast_checkout());

    let (status, _) = send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 999, "quantityTier": 25})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 7, "size": "64oz", "quantityTier": 25})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 7, "quantityTier": "a lot"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    assert!(state.cart().is_empty());
}

#[tokio::test]
async fn test_checkout_empty_cart() {
    let (app, _) = setup(fast_checkout());

    let (status, view) = send(&app, Method::GET, "/checkout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "empty");
    assert_eq!(view["browse"], "/products");

    let (status, _) = send(
        &app,
        Method::POST,
        "/checkout",
        Some(serde_json::to_value(checkout_details()).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = send(&app, Method::GET, "/checkout/success", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_checkout_success_flow() {
    let (app, state) = setup(fast_checkout());
    send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 1, "size": "Large", "quantityTier": 500})),
    )
    .await;

    let (status, view) = send(&app, Method::GET, "/checkout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "editing");
    assert_eq!(view["canSubmit"], true);
    assert_eq!(view["summary"]["totalDisplay"], "$325.00");

    let (status, confirmation) = send(
        &app,
        Method::POST,
        "/checkout",
        Some(serde_json::to_value(checkout_details()).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!(confirmation["reference"].as_str().unwrap().starts_with("ORD-"));
    assert_eq!(confirmation["summary"]["shippingDisplay"], "Free");
    assert_eq!(confirmation["nextSteps"][0]["label"], "Order Received");
    assert_eq!(confirmation["nextSteps"][0]["current"], true);
    assert!(state.cart().is_empty());

    let (status, success) = send(&app, Method::GET, "/checkout/success", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(success["reference"], confirmation["reference"]);
}

#[tokio::test]
async fn test_checkout_invalid_details() {
    let (app, state) = setup(fast_checkout());
    send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 3, "quantityTier": 25})),
    )
    .await;

    let mut details = serde_json::to_value(checkout_details()).unwrap();
    details["email"] = json!("maria.example.com");
    let (status, body) = send(&app, Method::POST, "/checkout", Some(details)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("email"));
    assert_eq!(state.cart().len(), 1);
}

#[tokio::test]
async fn test_cart_locked_while_submitting() {
    let (app, state) = setup(CheckoutSettings {
        delay: Duration::from_millis(300),
        timeout: Duration::from_secs(5),
    });
    send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 3, "quantityTier": 25})),
    )
    .await;

    let submit_app = app.clone();
    let submission = tokio::spawn(async move {
        send(
            &submit_app,
            Method::POST,
            "/checkout",
            Some(serde_json::to_value(checkout_details()).unwrap()),
        )
        .await
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let (status, view) = send(&app, Method::GET, "/checkout", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["status"], "submitting");
    assert_eq!(view["canSubmit"], false);

    let (status, _) = send(&app, Method::DELETE, "/cart", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 5, "quantityTier": 25})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("locked"));

    let (status, _) = send(
        &app,
        Method::POST,
        "/checkout",
        Some(serde_json::to_value(checkout_details()).unwrap()),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, confirmation) = submission.await.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(confirmation["items"].as_array().unwrap().len(), 1);
    assert!(state.cart().is_empty());
    assert!(!state.cart_locked());
}

#[tokio::test]
async fn test_checkout_timeout_keeps_cart() {
    let (app, state) = setup(CheckoutSettings {
        delay: Duration::from_secs(5),
        timeout: Duration::from_millis(20),
    });
    send(
        &app,
        Method::POST,
        "/cart/items",
        Some(json!({"productId": 3, "quantityTier": 25})),
    )
    .await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/checkout",
        Some(serde_json::to_value(checkout_details()).unwrap()),
    )
    .await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(state.cart().len(), 1);
    assert!(!state.cart_locked());
}
