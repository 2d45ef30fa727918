//! Domain layer for the Location Catalog context.

pub mod catalog;
pub mod location;
pub mod naming;
