//! Shared test helpers for API integration tests.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use movies_catalog::application::movie_service::MovieService;
use movies_core::event::EventPublisher;
use movies_store::pg_movie_repository::PgMovieRepository;
use sqlx::PgPool;
use tower::ServiceExt;

use movies_api::state::AppState;

const TEST_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the full app router over a real `PgMovieRepository`. Uses the same
/// route structure as `main.rs`.
pub fn build_test_app(pool: PgPool) -> Router {
    let service = MovieService::new(Arc::new(PgMovieRepository::new(pool)));
    movies_api::app(AppState::new(service), TEST_REQUEST_TIMEOUT)
}

/// Build the full app router with `publisher` receiving lifecycle events.
pub fn build_test_app_with_publisher(pool: PgPool, publisher: Arc<dyn EventPublisher>) -> Router {
    let service =
        MovieService::with_publisher(Arc::new(PgMovieRepository::new(pool)), publisher);
    movies_api::app(AppState::new(service), TEST_REQUEST_TIMEOUT)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body_bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body_bytes).unwrap()
    };

    (status, json)
}

/// Send a POST request with a JSON body and return the response.
pub async fn post_json(
    app: Router,
    uri: &str,
    body: &serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();

    send(app, request).await
}

/// Send a GET request and return the response.
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}

/// Send a DELETE request and return the response. Empty bodies become `Null`.
pub async fn delete(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    send(app, request).await
}
