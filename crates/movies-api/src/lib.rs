//! Movies API: HTTP surface of the movies catalog.
//!
//! The binary in `main.rs` wires configuration, storage and telemetry; this
//! library holds everything the integration tests need to build the same
//! router.

use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use tower_http::timeout::TimeoutLayer;

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

/// Builds the application router: every route plus the per-request deadline.
/// Requests that outlive `request_timeout` are answered with `408`.
pub fn app(state: state::AppState, request_timeout: Duration) -> Router {
    Router::new()
        .merge(routes::health::router())
        .merge(routes::movies::router())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
