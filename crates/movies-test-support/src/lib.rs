//! Shared test doubles and utilities for the movies catalog service.

mod clock;
mod publisher;
mod repository;

pub use clock::FixedClock;
pub use publisher::{FailingEventPublisher, PublishedEvent, RecordingEventPublisher};
pub use repository::{
    FailingMovieRepository, InMemoryMovieRepository, RepositoryCall, SlowMovieRepository,
};
