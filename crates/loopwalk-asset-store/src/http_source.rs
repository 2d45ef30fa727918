//! Asset source backed by an HTTP server.

use async_trait::async_trait;
use loopwalk_core::error::DomainError;
use loopwalk_core::scene::SceneId;
use reqwest::Client;
use tracing::debug;

use crate::source::AssetSource;

/// Downloads scenes from `{base_url}/{scene}`.
#[derive(Debug, Clone)]
pub struct HttpAssetSource {
    client: Client,
    base_url: String,
}

impl HttpAssetSource {
    /// Creates a source for `base_url`; a trailing slash is ignored.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn url_of(&self, scene: &SceneId) -> String {
        format!("{}/{}", self.base_url, scene)
    }
}

#[async_trait]
impl AssetSource for HttpAssetSource {
    async fn fetch(&self, scene: &SceneId) -> Result<Vec<u8>, DomainError> {
        let unavailable = |reason: String| DomainError::AssetUnavailable {
            scene: scene.to_string(),
            reason,
        };

        let url = self.url_of(scene);
        debug!(%url, "fetching asset");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(unavailable(format!("HTTP {status}")));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    fn live_location(&self, scene: &SceneId) -> String {
        self.url_of(scene)
    }
}
