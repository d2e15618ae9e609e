//! Application services for the catalog context.

pub mod movie_service;
pub mod seed_loader;
