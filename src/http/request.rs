//! Request ID handling.
//!
//! # Responsibilities
//! - Assign a UUID v4 request ID to requests that arrive without one
//! - Echo the ID back on the response
//!
//! # Design Decisions
//! - Request ID added as early as possible so the request log can carry it
//! - An ID supplied by the client is kept, not replaced

use axum::http::HeaderName;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer that sets `x-request-id` on requests missing it.
pub fn set_request_id() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer that copies `x-request-id` from the request onto the response.
pub fn propagate_request_id() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}
