//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Health check
//!
//! # Products
//! GET    /products             - Product listing (?category=)
//! GET    /products/{id}        - Product detail with tier estimates
//!
//! # Cart
//! GET    /cart                 - Cart lines and summary
//! POST   /cart/items           - Add a selection (replaces same product + size)
//! DELETE /cart/items/{id}      - Remove a line (no-op if absent)
//! DELETE /cart                 - Clear the cart
//!
//! # Checkout
//! GET    /checkout             - Checkout page data, or empty-cart notice
//! POST   /checkout             - Place the order
//! GET    /checkout/success     - Confirmation of the completed order
//! ```

pub mod cart;
pub mod checkout;
pub mod products;

use axum::{
    Router,
    middleware::from_fn,
    routing::{delete, get, post},
};

use crate::middleware::{request_id_middleware, trace_layer};
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", delete(cart::remove))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::submit))
        .route("/success", get(checkout::success))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout routes
        .nest("/checkout", checkout_routes())
}

/// The full application with its middleware stack, bound to `state`.
pub fn app(state: AppState) -> Router {
    routes()
        .layer(from_fn(request_id_middleware))
        .layer(trace_layer())
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running.
async fn health() -> &'static str {
    "ok"
}
