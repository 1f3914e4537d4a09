//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing, opens the span with a `request_id` field)
//! 3. Request ID (add unique ID to each request)

pub mod request_id;

use axum::{body::Body, http::Request};
use tower_http::trace::{HttpMakeClassifier, TraceLayer};
use tracing::{Span, field::Empty};

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};

/// Span constructor for [`trace_layer`].
pub type MakeRequestSpan = fn(&Request<Body>) -> Span;

/// Request tracing layer whose span has room for the request ID.
#[must_use]
pub fn trace_layer() -> TraceLayer<HttpMakeClassifier, MakeRequestSpan> {
    TraceLayer::new_for_http().make_span_with(request_span as MakeRequestSpan)
}

fn request_span(request: &Request<Body>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = Empty,
    )
}
