//! Asset source backed by a local directory.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use loopwalk_core::error::DomainError;
use loopwalk_core::scene::SceneId;

use crate::source::AssetSource;

/// Reads scenes from files named after their identifiers.
#[derive(Debug, Clone)]
pub struct DirectoryAssetSource {
    root: PathBuf,
}

impl DirectoryAssetSource {
    /// Creates a source rooted at `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, scene: &SceneId) -> PathBuf {
        self.root.join(scene.as_str())
    }
}

#[async_trait]
impl AssetSource for DirectoryAssetSource {
    async fn fetch(&self, scene: &SceneId) -> Result<Vec<u8>, DomainError> {
        tokio::fs::read(self.path_of(scene))
            .await
            .map_err(|e| DomainError::AssetUnavailable {
                scene: scene.to_string(),
                reason: e.to_string(),
            })
    }

    fn live_location(&self, scene: &SceneId) -> String {
        self.path_of(scene).display().to_string()
    }
}
