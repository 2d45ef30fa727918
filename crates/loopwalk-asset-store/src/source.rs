//! The `AssetSource` abstraction.

use async_trait::async_trait;
use loopwalk_core::error::DomainError;
use loopwalk_core::scene::SceneId;

/// Somewhere scene assets can be fetched from.
#[async_trait]
pub trait AssetSource: Send + Sync {
    /// Fetches the full contents of `scene`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AssetUnavailable` if the asset cannot be read.
    async fn fetch(&self, scene: &SceneId) -> Result<Vec<u8>, DomainError>;

    /// Returns where the host can stream `scene` from directly.
    fn live_location(&self, scene: &SceneId) -> String;
}
