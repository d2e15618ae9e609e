//! Startup steps that run before the listener accepts traffic.

use std::path::Path;
use std::time::Duration;

use movies_catalog::application::movie_service::MovieService;
use movies_catalog::application::seed_loader::load_seed;
use tracing::info;

use crate::error::AppError;

/// Loads the seed file at `path` and applies it through the service's
/// idempotent seeding path, giving up after `budget`.
///
/// Returns the number of movies inserted.
///
/// # Errors
///
/// Returns `AppError::Seed` if the file cannot be read or parsed, if seeding
/// fails, or if it does not finish within `budget`.
pub async fn apply_seed(
    service: &MovieService,
    path: &Path,
    budget: Duration,
) -> Result<u64, AppError> {
    let movies = load_seed(path)
        .await
        .map_err(|e| AppError::Seed(format!("load seed: {e}")))?;

    let inserted = tokio::time::timeout(budget, service.ensure_seed(movies))
        .await
        .map_err(|_| AppError::Seed(format!("seeding did not finish within {budget:?}")))?
        .map_err(|e| AppError::Seed(format!("ensure seed: {e}")))?;

    if inserted > 0 {
        info!(inserted, path = %path.display(), "seeded movies");
    }
    Ok(inserted)
}

/// Resolves when the process receives Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
