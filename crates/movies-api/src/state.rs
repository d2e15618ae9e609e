//! Shared application state.

use std::sync::Arc;

use movies_catalog::application::movie_service::MovieService;

/// Application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Movie use cases over the configured repository and publisher.
    pub service: Arc<MovieService>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(service: MovieService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}
