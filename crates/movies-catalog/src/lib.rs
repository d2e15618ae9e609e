//! Movies Catalog: use-case layer.
//!
//! Orchestrates validation, persistence and best-effort event publication for
//! movie records, and owns the idempotent seeding path used at bootstrap.

pub mod application;
pub mod domain;
