//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
///
/// Each variant is a stable, distinguishable kind so transport adapters can
/// map it to their own status codes mechanically.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A movie failed entity validation (bad title or year).
    #[error("validation error: {0}")]
    Validation(String),

    /// An empty identifier was supplied to a lookup or delete.
    #[error("invalid id")]
    InvalidId,

    /// No movie matched the resolved identity.
    #[error("movie not found: {0}")]
    NotFound(String),

    /// A uniqueness constraint (title/year or legacy id) was violated.
    #[error("duplicate movie: {0}")]
    DuplicateConflict(String),

    /// Every seed candidate was filtered out before reaching storage.
    #[error("no valid items to seed")]
    SeedEmpty,

    /// A bulk insert hit a non-duplicate write error.
    #[error("bulk insert failed after {inserted} inserted: {reason}")]
    BulkInsert {
        /// Records that were inserted before or around the failure.
        inserted: u64,
        /// The underlying write error.
        reason: String,
    },

    /// The repository failed while seeding.
    #[error("seed insert failed: {source}")]
    Seed {
        /// The repository error that aborted the seed.
        source: Box<DomainError>,
    },

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn test_seed_error_exposes_repository_error_as_source() {
        // Arrange
        let err = DomainError::Seed {
            source: Box::new(DomainError::Infrastructure("connection reset".into())),
        };

        // Act
        let source = err.source().map(ToString::to_string);

        // Assert
        assert_eq!(
            err.to_string(),
            "seed insert failed: infrastructure error: connection reset"
        );
        assert_eq!(
            source.as_deref(),
            Some("infrastructure error: connection reset")
        );
    }

    #[test]
    fn test_bulk_insert_error_reports_partial_count() {
        let err = DomainError::BulkInsert {
            inserted: 3,
            reason: "disk full".into(),
        };

        assert_eq!(
            err.to_string(),
            "bulk insert failed after 3 inserted: disk full"
        );
    }
}
