//! Movies API server entry point.

use std::sync::Arc;

use movies_api::bootstrap::{apply_seed, shutdown_signal};
use movies_api::config::Config;
use movies_api::error::AppError;
use movies_api::state::AppState;
use movies_api::telemetry::{self, OTLP_ENDPOINT_VAR, Telemetry};
use movies_catalog::application::movie_service::MovieService;
use movies_core::clock::SystemClock;
use movies_store::pg_event_publisher::PgNotifyEventPublisher;
use movies_store::pg_movie_repository::PgMovieRepository;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let otlp_endpoint = std::env::var(OTLP_ENDPOINT_VAR).ok();
    let telemetry = telemetry::init(otlp_endpoint.as_deref())?;

    let result = run(&telemetry).await;
    telemetry.finish(result)
}

async fn run(telemetry: &Telemetry) -> Result<(), AppError> {
    tracing::info!(
        spans_exported = telemetry.exports_spans(),
        "Starting movies API server"
    );

    let config = Config::from_env()?;

    // Create database connection pool and bring the schema up to date.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("../../migrations").run(&pool).await?;

    let repository = Arc::new(PgMovieRepository::new(pool.clone()));
    let service = if config.events_enabled {
        let publisher = PgNotifyEventPublisher::new(
            pool.clone(),
            config.event_subjects.clone(),
            Arc::new(SystemClock),
        );
        tracing::info!(subjects = ?config.event_subjects, "event publishing enabled");
        MovieService::with_publisher(repository, Arc::new(publisher))
    } else {
        MovieService::new(repository)
    };

    if let Some(seed_file) = &config.seed_file {
        apply_seed(&service, seed_file, config.request_timeout).await?;
    }

    match service.count().await {
        Ok(total) => tracing::info!(movies = total, "catalog ready"),
        Err(e) => tracing::warn!(error = %e, "could not count movies"),
    }

    // TODO: Replace CorsLayer::permissive() with restricted origins for production.
    let app = movies_api::app(AppState::new(service), config.request_timeout)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.socket_addr()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
