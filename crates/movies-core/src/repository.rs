//! Movie repository abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::movie::Movie;

/// Storage-agnostic contract for movie persistence.
///
/// Implementations resolve identifiers with [`crate::identity::MovieKey`] and
/// rely on the store to enforce uniqueness of (`title`, `year`) and of
/// `legacy_id`. Dropping a returned future cancels the in-flight call.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Returns every movie in [`crate::ordering::list_order`] order.
    async fn list(&self) -> Result<Vec<Movie>, DomainError>;

    /// Looks up a single movie by public identifier.
    ///
    /// Returns `DomainError::NotFound` when nothing matches.
    async fn get(&self, id: &str) -> Result<Movie, DomainError>;

    /// Persists a new movie and returns it with its public `id` populated:
    /// the legacy key when one was supplied, otherwise the new surrogate key.
    ///
    /// Returns `DomainError::DuplicateConflict` on a uniqueness violation.
    async fn create(&self, movie: &Movie) -> Result<Movie, DomainError>;

    /// Removes a movie by public identifier.
    ///
    /// Returns `DomainError::NotFound` when nothing matches, including when
    /// the movie was already deleted.
    async fn delete(&self, id: &str) -> Result<(), DomainError>;

    /// Returns the total number of movies.
    async fn count(&self) -> Result<u64, DomainError>;

    /// Inserts `movies` as one unordered batch, skipping any item that
    /// violates a uniqueness constraint. Returns the number actually inserted.
    ///
    /// Any other write error is returned as `DomainError::BulkInsert` with
    /// the partial count achieved.
    async fn bulk_insert_ignoring_duplicates(&self, movies: &[Movie]) -> Result<u64, DomainError>;
}
