//! Asset readiness abstraction.
//!
//! Before a location becomes interactive, every scene it can request is made
//! ready by an [`AssetPreloader`]. Individual asset failures are absorbed by
//! the preloader and only reported; playback of such a scene falls back to a
//! live fetch in the host.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::DomainError;
use crate::scene::SceneId;

/// Progress of a preload batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadProgress {
    /// Assets settled so far (loaded or failed).
    pub loaded: usize,
    /// Assets in the batch.
    pub total: usize,
}

impl LoadProgress {
    /// Returns the settled share of the batch in `[0.0, 1.0]`.
    ///
    /// An empty batch counts as complete.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.loaded as f64 / self.total as f64
        }
    }

    /// Returns the settled share as a whole percentage, rounded down.
    #[must_use]
    pub fn percent(&self) -> usize {
        if self.total == 0 {
            100
        } else {
            self.loaded * 100 / self.total
        }
    }
}

/// Receives progress notifications during a preload batch.
pub trait LoadObserver: Send + Sync {
    /// Called after every asset of the batch settles.
    fn on_progress(&self, progress: LoadProgress);
}

impl<F> LoadObserver for F
where
    F: Fn(LoadProgress) + Send + Sync,
{
    fn on_progress(&self, progress: LoadProgress) {
        self(progress);
    }
}

/// Outcome of a preload batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PreloadReport {
    /// Scenes now available from the cache.
    pub ready: Vec<SceneId>,
    /// Scenes that failed and will be fetched live on playback.
    pub unavailable: Vec<SceneId>,
}

impl PreloadReport {
    /// Returns `true` if every requested scene is cached.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.unavailable.is_empty()
    }
}

/// Makes the scenes of an upcoming location ready for playback.
#[async_trait]
pub trait AssetPreloader: Send + Sync {
    /// Fetches and caches every scene in `scenes`, reporting progress to
    /// `observer`. Per-asset failures are listed in the report, not returned.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the preloader itself cannot
    /// operate.
    async fn ensure_ready(
        &self,
        scenes: &[SceneId],
        observer: &dyn LoadObserver,
    ) -> Result<PreloadReport, DomainError>;
}
