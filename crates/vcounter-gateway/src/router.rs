//! Axum router wiring.
//!
//! The counter lives at the configured `http.route` (GET + OPTIONS preflight);
//! operational endpoints sit beside it.

use axum::{routing::get, Router};

use crate::{app_state::AppState, ops, transport};

pub fn build_router(state: AppState) -> Router {
    let route = state.cfg().http.route.clone();

    Router::new()
        .route(
            &route,
            get(transport::http::get_visitor_count).options(transport::http::preflight),
        )
        .route("/healthz", get(ops::healthz))
        .route("/readyz", get(ops::readyz))
        .route("/metrics", get(ops::metrics))
        .with_state(state)
}
