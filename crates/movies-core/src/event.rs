//! Domain event abstractions.
//!
//! Events are fire-and-forget notifications: a publisher failure is reported
//! to the caller but the movie service never turns it into a failure of the
//! write that produced it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::movie::Movie;

/// Event type emitted after a movie is created.
pub const MOVIE_CREATED_EVENT_TYPE: &str = "movies.created";

/// Event type emitted after a movie is deleted.
pub const MOVIE_DELETED_EVENT_TYPE: &str = "movies.deleted";

/// Errors raised while publishing an event.
#[derive(Debug, Error)]
pub enum PublishError {
    /// The envelope could not be serialized.
    #[error("event serialization failed: {0}")]
    Serialization(String),

    /// The message bus rejected or failed to receive the event.
    #[error("event transport failed: {0}")]
    Transport(String),
}

/// Wire envelope wrapped around every event payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventEnvelope<T> {
    /// Event type name for routing.
    #[serde(rename = "type")]
    pub event_type: String,
    /// When the event occurred.
    pub occurred_at: DateTime<Utc>,
    /// Event-specific payload.
    pub payload: T,
}

impl<T: Serialize> EventEnvelope<T> {
    /// Serializes the envelope to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `PublishError::Serialization` if the payload cannot be
    /// represented as JSON.
    pub fn to_json(&self) -> Result<String, PublishError> {
        serde_json::to_string(self).map_err(|e| PublishError::Serialization(e.to_string()))
    }
}

/// Payload of a `movies.created` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieCreated {
    /// Public identifier of the new movie.
    pub id: String,
    /// Movie title.
    pub title: String,
    /// Release year.
    pub year: i32,
}

/// Payload of a `movies.deleted` event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieDeleted {
    /// Public identifier of the removed movie, as supplied by the caller.
    pub id: String,
}

impl EventEnvelope<MovieCreated> {
    /// Builds the envelope announcing `movie`.
    #[must_use]
    pub fn movie_created(movie: &Movie, occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_type: MOVIE_CREATED_EVENT_TYPE.to_owned(),
            occurred_at,
            payload: MovieCreated {
                id: movie.id.clone(),
                title: movie.title.clone(),
                year: movie.year,
            },
        }
    }
}

impl EventEnvelope<MovieDeleted> {
    /// Builds the envelope announcing the removal of `id`.
    #[must_use]
    pub fn movie_deleted(id: &str, occurred_at: DateTime<Utc>) -> Self {
        Self {
            event_type: MOVIE_DELETED_EVENT_TYPE.to_owned(),
            occurred_at,
            payload: MovieDeleted { id: id.to_owned() },
        }
    }
}

/// Subject (channel) names an event is published to, one per event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventSubjects {
    /// Subject for `movies.created`.
    pub created: String,
    /// Subject for `movies.deleted`.
    pub deleted: String,
}

impl Default for EventSubjects {
    fn default() -> Self {
        Self {
            created: MOVIE_CREATED_EVENT_TYPE.to_owned(),
            deleted: MOVIE_DELETED_EVENT_TYPE.to_owned(),
        }
    }
}

/// Publishes movie lifecycle notifications.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Announces that `movie` was created.
    async fn movie_created(&self, movie: &Movie) -> Result<(), PublishError>;

    /// Announces that the movie addressed by `id` was deleted.
    async fn movie_deleted(&self, id: &str) -> Result<(), PublishError>;
}

/// A publisher that accepts every event and does nothing with it.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopEventPublisher;

#[async_trait]
impl EventPublisher for NoopEventPublisher {
    async fn movie_created(&self, _movie: &Movie) -> Result<(), PublishError> {
        Ok(())
    }

    async fn movie_deleted(&self, _id: &str) -> Result<(), PublishError> {
        Ok(())
    }
}
