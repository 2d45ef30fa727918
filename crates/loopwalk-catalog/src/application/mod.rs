//! Application layer for the Location Catalog context.

pub mod builtin;
pub mod ingest;
