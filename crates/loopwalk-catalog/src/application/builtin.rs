//! The catalog shipped with the engine.

use loopwalk_core::error::DomainError;

use super::ingest::parse_catalog;
use crate::domain::catalog::Catalog;

/// YAML source of the built-in catalog.
pub const BUILTIN_SOURCE: &str = include_str!("../../content/corridors.yaml");

/// Returns the built-in two-corridor catalog.
///
/// # Errors
///
/// Returns `DomainError::InvalidCatalog` if the embedded source is invalid.
pub fn builtin_catalog() -> Result<Catalog, DomainError> {
    parse_catalog(BUILTIN_SOURCE)
}
