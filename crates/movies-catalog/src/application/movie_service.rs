//! The movie service: use-case orchestration over the repository and the
//! event publisher.
//!
//! The service never touches storage directly. Identifier and entity checks
//! short-circuit before any repository call, and event publication is
//! best-effort: a failed notification is logged and dropped, never returned.

use std::sync::Arc;

use movies_core::error::DomainError;
use movies_core::event::EventPublisher;
use movies_core::movie::Movie;
use movies_core::repository::MovieRepository;
use tracing::{debug, info, warn};

/// Use-case layer for the movie catalog. Cheap to share across requests.
#[derive(Clone)]
pub struct MovieService {
    repo: Arc<dyn MovieRepository>,
    publisher: Option<Arc<dyn EventPublisher>>,
}

impl std::fmt::Debug for MovieService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MovieService")
            .field("publisher", &self.publisher.is_some())
            .finish_non_exhaustive()
    }
}

impl MovieService {
    /// Creates a service that publishes no events.
    #[must_use]
    pub fn new(repo: Arc<dyn MovieRepository>) -> Self {
        Self {
            repo,
            publisher: None,
        }
    }

    /// Creates a service that notifies `publisher` after successful writes.
    #[must_use]
    pub fn with_publisher(repo: Arc<dyn MovieRepository>, publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            repo,
            publisher: Some(publisher),
        }
    }

    /// Returns every movie in listing order.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn list(&self) -> Result<Vec<Movie>, DomainError> {
        self.repo.list().await
    }

    /// Returns the movie addressed by `id`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidId` for an empty `id` and
    /// `DomainError::NotFound` when nothing matches.
    pub async fn get(&self, id: &str) -> Result<Movie, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidId);
        }
        self.repo.get(id).await
    }

    /// Normalizes, validates and persists `movie`, then announces it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` for a bad title or year and
    /// `DomainError::DuplicateConflict` when the movie already exists.
    /// Publication failures are never returned.
    pub async fn create(&self, mut movie: Movie) -> Result<Movie, DomainError> {
        movie.normalize();
        movie.validate()?;

        let created = self.repo.create(&movie).await?;
        info!(movie_id = %created.id, "movie created");

        if let Some(publisher) = &self.publisher {
            // Best effort: the record is durable whether or not the bus is up.
            if let Err(e) = publisher.movie_created(&created).await {
                warn!(movie_id = %created.id, error = %e, "failed to publish movie created event");
            }
        }
        Ok(created)
    }

    /// Deletes the movie addressed by `id`, then announces it.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidId` for an empty `id` and
    /// `DomainError::NotFound` when nothing matches. Publication failures are
    /// never returned.
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidId);
        }
        self.repo.delete(id).await?;
        info!(movie_id = %id, "movie deleted");

        if let Some(publisher) = &self.publisher {
            if let Err(e) = publisher.movie_deleted(id).await {
                warn!(movie_id = %id, error = %e, "failed to publish movie deleted event");
            }
        }
        Ok(())
    }

    /// Returns the total number of movies.
    ///
    /// # Errors
    ///
    /// Propagates repository errors.
    pub async fn count(&self) -> Result<u64, DomainError> {
        self.repo.count().await
    }

    /// Idempotently loads `seed` into the catalog and returns how many movies
    /// were actually inserted.
    ///
    /// Candidates with a blank title, a zero year or any other validation
    /// failure are dropped silently. Duplicates of existing movies are
    /// skipped by the repository, so running the same seed twice inserts
    /// nothing the second time.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::SeedEmpty` when a non-empty seed has no valid
    /// candidates, and `DomainError::Seed` wrapping the repository error when
    /// the bulk insert fails.
    pub async fn ensure_seed(&self, seed: Vec<Movie>) -> Result<u64, DomainError> {
        if seed.is_empty() {
            return Ok(0);
        }

        let offered = seed.len();
        let clean: Vec<Movie> = seed
            .into_iter()
            .filter_map(|mut movie| {
                movie.normalize();
                if movie.title.is_empty() || movie.year == 0 {
                    return None;
                }
                movie.validate().ok().map(|()| movie)
            })
            .collect();

        if clean.is_empty() {
            return Err(DomainError::SeedEmpty);
        }
        debug!(offered, valid = clean.len(), "seed candidates filtered");

        let inserted = self
            .repo
            .bulk_insert_ignoring_duplicates(&clean)
            .await
            .map_err(|e| DomainError::Seed {
                source: Box::new(e),
            })?;
        info!(inserted, valid = clean.len(), "seed applied");
        Ok(inserted)
    }
}
