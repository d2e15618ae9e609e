//! Movies Store: `PostgreSQL` infrastructure for the movies catalog.
//!
//! Implements the repository contract over the `movies` table and publishes
//! lifecycle events with `pg_notify` on the same pool.

pub mod pg_event_publisher;
pub mod pg_movie_repository;
