//! Catalog ingestion from YAML source.
//!
//! ```yaml
//! naming: { prefix: Gang, extension: mp4 }
//! locations:
//!   - id: 2
//!     left: { keyword: Call, actions: ["1", "2"] }
//!     right:
//!       keyword: Door
//!       actions:
//!         - chain: { id: "1", depth: 2 }
//!       prerequisite: { depends_on: left, required_state: empty, fallback: DoorRno }
//! ```

use loopwalk_core::error::DomainError;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::debug;

use crate::domain::catalog::Catalog;
use crate::domain::location::{
    ActionSpec, DEFAULT_CHAIN_DEPTH, LocationDefinition, LocationId, Prerequisite, RequiredState,
    Side, SideDefinition,
};
use crate::domain::naming::SceneNaming;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDocument {
    #[serde(default)]
    naming: NamingDocument,
    locations: Vec<LocationDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NamingDocument {
    #[serde(default = "default_prefix")]
    prefix: String,
    #[serde(default = "default_extension")]
    extension: String,
}

impl Default for NamingDocument {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            extension: default_extension(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LocationDocument {
    id: u32,
    left: SideDocument,
    right: SideDocument,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SideDocument {
    #[serde(default = "default_keyword")]
    keyword: String,
    #[serde(default)]
    actions: Vec<ActionDocument>,
    #[serde(default)]
    prerequisite: Option<PrerequisiteDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ActionDocument {
    Simple(String),
    Chain { chain: ChainDocument },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ChainDocument {
    id: String,
    #[serde(default = "default_depth")]
    depth: u32,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PrerequisiteDocument {
    depends_on: Side,
    #[serde(default)]
    required_state: RequiredState,
    fallback: String,
}

fn default_prefix() -> String {
    SceneNaming::default().prefix
}

fn default_extension() -> String {
    SceneNaming::default().extension
}

fn default_keyword() -> String {
    "Call".to_owned()
}

fn default_depth() -> u32 {
    DEFAULT_CHAIN_DEPTH
}

impl From<ActionDocument> for ActionSpec {
    fn from(document: ActionDocument) -> Self {
        match document {
            ActionDocument::Simple(id) => ActionSpec::simple(id),
            ActionDocument::Chain { chain } => ActionSpec::chain(chain.id, chain.depth),
        }
    }
}

impl From<SideDocument> for SideDefinition {
    fn from(document: SideDocument) -> Self {
        Self {
            keyword: document.keyword,
            actions: document.actions.into_iter().map(ActionSpec::from).collect(),
            prerequisite: document.prerequisite.map(|p| Prerequisite {
                depends_on: p.depends_on,
                required_state: p.required_state,
                fallback: p.fallback,
            }),
        }
    }
}

/// Returns the hex SHA-256 of a catalog source.
#[must_use]
pub fn version_hash(source: &str) -> String {
    format!("{:x}", Sha256::digest(source.as_bytes()))
}

/// Parses and validates a YAML catalog.
///
/// # Errors
///
/// Returns `DomainError::InvalidCatalog` if the document does not parse or
/// fails validation.
pub fn parse_catalog(source: &str) -> Result<Catalog, DomainError> {
    let document: CatalogDocument = serde_yaml::from_str(source)
        .map_err(|e| DomainError::InvalidCatalog(format!("catalog parse failed: {e}")))?;

    let naming = SceneNaming {
        prefix: document.naming.prefix,
        extension: document.naming.extension,
    };
    let locations = document
        .locations
        .into_iter()
        .map(|location| LocationDefinition {
            id: LocationId(location.id),
            left: location.left.into(),
            right: location.right.into(),
        })
        .collect();

    let hash = version_hash(source);
    let catalog = Catalog::new(naming, locations)?;
    debug!(
        locations = catalog.locations().len(),
        version_hash = %hash,
        "catalog ingested"
    );
    Ok(catalog.with_version_hash(hash))
}
