//! Shared host state.

use std::sync::Arc;

use async_trait::async_trait;
use loopwalk_asset_store::caching_preloader::CachingPreloader;
use loopwalk_asset_store::directory_source::DirectoryAssetSource;
use loopwalk_asset_store::http_source::HttpAssetSource;
use loopwalk_asset_store::source::AssetSource;
use loopwalk_catalog::application::builtin::builtin_catalog;
use loopwalk_catalog::application::ingest::parse_catalog;
use loopwalk_catalog::domain::catalog::Catalog;
use loopwalk_core::clock::{Clock, SystemClock};
use loopwalk_core::error::DomainError;
use loopwalk_core::scene::SceneId;
use tracing::info;

use crate::config::{AssetLocation, Config};
use crate::error::AppError;

/// The asset source selected by configuration.
#[derive(Debug, Clone)]
pub enum ConfiguredSource {
    /// Scenes read from a local directory.
    Directory(DirectoryAssetSource),
    /// Scenes downloaded over HTTP.
    Http(HttpAssetSource),
}

impl From<&AssetLocation> for ConfiguredSource {
    fn from(location: &AssetLocation) -> Self {
        match location {
            AssetLocation::Directory(root) => Self::Directory(DirectoryAssetSource::new(root.clone())),
            AssetLocation::Http(base_url) => Self::Http(HttpAssetSource::new(base_url)),
        }
    }
}

#[async_trait]
impl AssetSource for ConfiguredSource {
    async fn fetch(&self, scene: &SceneId) -> Result<Vec<u8>, DomainError> {
        match self {
            Self::Directory(source) => source.fetch(scene).await,
            Self::Http(source) => source.fetch(scene).await,
        }
    }

    fn live_location(&self, scene: &SceneId) -> String {
        match self {
            Self::Directory(source) => source.live_location(scene),
            Self::Http(source) => source.live_location(scene),
        }
    }
}

/// Host state shared by every command.
#[derive(Clone)]
pub struct AppState {
    /// The catalog being played.
    pub catalog: Arc<Catalog>,
    /// Scene preloader and playback resolver.
    pub preloader: Arc<CachingPreloader<ConfiguredSource>>,
    /// Clock for event timestamps.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    /// Creates host state from its parts.
    #[must_use]
    pub fn new(
        catalog: Arc<Catalog>,
        preloader: Arc<CachingPreloader<ConfiguredSource>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            catalog,
            preloader,
            clock,
        }
    }

    /// Builds host state from configuration, loading the catalog.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Io` if the catalog file cannot be read and
    /// `AppError::Domain` if it is invalid.
    pub async fn from_config(config: &Config) -> Result<Self, AppError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                let source = tokio::fs::read_to_string(path).await?;
                info!(path = %path.display(), "loading catalog");
                parse_catalog(&source)?
            }
            None => {
                info!("using built-in catalog");
                builtin_catalog()?
            }
        };

        let preloader =
            CachingPreloader::new(ConfiguredSource::from(&config.assets), config.preload_concurrency);

        Ok(Self::new(
            Arc::new(catalog),
            Arc::new(preloader),
            Arc::new(SystemClock),
        ))
    }
}
