//! Operational HTTP endpoints.
//!
//! - `<metrics_endpoint>` (default `/metrics`): Prometheus text format

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use prometheus::Registry;

use crate::obs;

pub async fn metrics(State(registry): State<Registry>) -> Response {
    match obs::render(&registry) {
        Ok((body, content_type)) => {
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "metrics exposition failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics unavailable").into_response()
        }
    }
}
