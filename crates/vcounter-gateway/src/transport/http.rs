//! `GET <route>`: bump the visitor counter and return it.
//!
//! - 200 `{"count": N}` on success
//! - 500 `{"error": "..."}` on any store or internal failure
//! - CORS headers on every response, including the `OPTIONS` preflight

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::app_state::AppState;
use crate::obs::metrics::ServiceMetrics;

pub const CORS_HEADERS: [(HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET"),
    (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
];

/// Message used when `http.expose_error_detail` is off.
const REDACTED_ERROR: &str = "internal error";

/// Keeps `in_flight` accurate even if the request future is dropped.
struct InFlight<'a>(&'a ServiceMetrics);

impl<'a> InFlight<'a> {
    fn enter(m: &'a ServiceMetrics) -> Self {
        m.in_flight.inc();
        Self(m)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.in_flight.dec();
    }
}

pub async fn get_visitor_count(State(state): State<AppState>) -> Response {
    tracing::info!("visitor count requested");
    let metrics = state.metrics();
    let _guard = InFlight::enter(metrics);

    match state.counter().increment().await {
        Ok(count) => {
            metrics.requests.inc(&[("outcome", "ok")]);
            respond(StatusCode::OK, json!({ "count": count }))
        }
        Err(e) => {
            let code = e.client_code().as_str();
            tracing::error!(error = %e, code, "error processing visitor count");
            metrics.requests.inc(&[("outcome", "error")]);
            let source = if e.is_store_failure() { "store" } else { "internal" };
            metrics.errors.inc(&[("code", code), ("source", source)]);

            let message = if state.cfg().http.expose_error_detail {
                e.to_string()
            } else {
                REDACTED_ERROR.to_string()
            };
            respond(StatusCode::INTERNAL_SERVER_ERROR, json!({ "error": message }))
        }
    }
}

pub async fn preflight() -> Response {
    (StatusCode::NO_CONTENT, CORS_HEADERS).into_response()
}

fn respond(status: StatusCode, body: Value) -> Response {
    (status, CORS_HEADERS, Json(body)).into_response()
}
