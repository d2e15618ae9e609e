//! Movies Core: shared domain abstractions.
//!
//! This crate defines the movie entity, the identity and ordering rules, and
//! the repository and event publisher contracts that every other crate
//! depends on. It contains no infrastructure code.

pub mod clock;
pub mod error;
pub mod event;
pub mod identity;
pub mod movie;
pub mod ordering;
pub mod repository;
