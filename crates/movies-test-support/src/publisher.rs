//! Test publishers: `EventPublisher` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use movies_core::event::{EventPublisher, PublishError};
use movies_core::movie::Movie;

/// A notification observed by [`RecordingEventPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishedEvent {
    /// `movie_created(movie)`
    Created(Movie),
    /// `movie_deleted(id)`
    Deleted(String),
}

/// A publisher that records every notification and always succeeds.
#[derive(Debug, Default)]
pub struct RecordingEventPublisher {
    published: Mutex<Vec<PublishedEvent>>,
}

impl RecordingEventPublisher {
    /// Creates a publisher with an empty record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every notification received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published(&self) -> Vec<PublishedEvent> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingEventPublisher {
    async fn movie_created(&self, movie: &Movie) -> Result<(), PublishError> {
        self.published
            .lock()
            .unwrap()
            .push(PublishedEvent::Created(movie.clone()));
        Ok(())
    }

    async fn movie_deleted(&self, id: &str) -> Result<(), PublishError> {
        self.published
            .lock()
            .unwrap()
            .push(PublishedEvent::Deleted(id.to_owned()));
        Ok(())
    }
}

/// A publisher whose bus is always unreachable. Counts attempts so tests can
/// confirm a notification was tried and its failure swallowed.
#[derive(Debug, Default)]
pub struct FailingEventPublisher {
    attempts: Mutex<usize>,
}

impl FailingEventPublisher {
    /// Creates a failing publisher with zero recorded attempts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of publish attempts.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }

    fn fail(&self) -> Result<(), PublishError> {
        *self.attempts.lock().unwrap() += 1;
        Err(PublishError::Transport("bus unreachable".into()))
    }
}

#[async_trait]
impl EventPublisher for FailingEventPublisher {
    async fn movie_created(&self, _movie: &Movie) -> Result<(), PublishError> {
        self.fail()
    }

    async fn movie_deleted(&self, _id: &str) -> Result<(), PublishError> {
        self.fail()
    }
}
