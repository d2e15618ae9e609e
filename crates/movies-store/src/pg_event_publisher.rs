//! `EventPublisher` over `PostgreSQL` `LISTEN`/`NOTIFY`.
//!
//! Each event is serialized into an [`EventEnvelope`] and sent with
//! `pg_notify(subject, envelope)`. Subscribers `LISTEN` on the subject name.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use movies_core::clock::Clock;
use movies_core::event::{EventEnvelope, EventPublisher, EventSubjects, PublishError};
use movies_core::movie::Movie;

/// Publishes movie lifecycle events as `PostgreSQL` notifications.
#[derive(Clone)]
pub struct PgNotifyEventPublisher {
    pool: PgPool,
    subjects: EventSubjects,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for PgNotifyEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgNotifyEventPublisher")
            .field("subjects", &self.subjects)
            .finish_non_exhaustive()
    }
}

impl PgNotifyEventPublisher {
    /// Creates a publisher sending to `subjects` on `pool`.
    #[must_use]
    pub fn new(pool: PgPool, subjects: EventSubjects, clock: Arc<dyn Clock>) -> Self {
        Self {
            pool,
            subjects,
            clock,
        }
    }

    async fn notify(&self, subject: &str, payload: String) -> Result<(), PublishError> {
        sqlx::query("SELECT pg_notify($1, $2)")
            .bind(subject)
            .bind(payload)
            .execute(&self.pool)
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;

        debug!(subject, "event published");
        Ok(())
    }
}

#[async_trait]
impl EventPublisher for PgNotifyEventPublisher {
    async fn movie_created(&self, movie: &Movie) -> Result<(), PublishError> {
        let payload = EventEnvelope::movie_created(movie, self.clock.now()).to_json()?;
        self.notify(&self.subjects.created, payload).await
    }

    async fn movie_deleted(&self, id: &str) -> Result<(), PublishError> {
        let payload = EventEnvelope::movie_deleted(id, self.clock.now()).to_json()?;
        self.notify(&self.subjects.deleted, payload).await
    }
}
