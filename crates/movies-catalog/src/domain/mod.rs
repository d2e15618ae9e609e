//! Domain types owned by the catalog context.

pub mod seed_record;
