//! Concurrent fetch-and-cache preloader.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use futures_util::{StreamExt, stream};
use loopwalk_core::assets::{AssetPreloader, LoadObserver, LoadProgress, PreloadReport};
use loopwalk_core::error::DomainError;
use loopwalk_core::scene::SceneId;
use tracing::{info, warn};

use crate::source::AssetSource;

/// Default number of assets fetched at once.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// How the host should play a scene.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Playback {
    /// The scene is cached; play these bytes.
    Cached(Arc<Vec<u8>>),
    /// The scene was never cached; stream it from here.
    Live(String),
}

/// Preloads scenes from an [`AssetSource`] into an in-memory cache.
///
/// Cached scenes are kept for the lifetime of the preloader, so a restart or
/// a revisited location settles them immediately.
#[derive(Debug)]
pub struct CachingPreloader<S> {
    source: S,
    concurrency: usize,
    cache: RwLock<HashMap<SceneId, Arc<Vec<u8>>>>,
}

impl<S: AssetSource> CachingPreloader<S> {
    /// Creates a preloader fetching at most `concurrency` assets at once.
    #[must_use]
    pub fn new(source: S, concurrency: usize) -> Self {
        Self {
            source,
            concurrency: concurrency.max(1),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the underlying source.
    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Returns `true` if `scene` is cached.
    #[must_use]
    pub fn is_cached(&self, scene: &SceneId) -> bool {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(scene)
    }

    /// Returns the number of cached scenes.
    #[must_use]
    pub fn cached_count(&self) -> usize {
        self.cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Resolves `scene` to cached bytes, falling back to its live location.
    #[must_use]
    pub fn resolve(&self, scene: &SceneId) -> Playback {
        let cached = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(scene)
            .cloned();
        match cached {
            Some(bytes) => Playback::Cached(bytes),
            None => Playback::Live(self.source.live_location(scene)),
        }
    }

    fn store(&self, scene: SceneId, bytes: Vec<u8>) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(scene, Arc::new(bytes));
    }
}

#[async_trait]
impl<S: AssetSource> AssetPreloader for CachingPreloader<S> {
    async fn ensure_ready(
        &self,
        scenes: &[SceneId],
        observer: &dyn LoadObserver,
    ) -> Result<PreloadReport, DomainError> {
        let total = scenes.len();
        let mut report = PreloadReport::default();
        if total == 0 {
            warn!("preload manifest is empty");
            observer.on_progress(LoadProgress { loaded: 0, total });
            return Ok(report);
        }

        let mut loaded = 0;
        let mut pending = Vec::new();
        for scene in scenes {
            if self.is_cached(scene) {
                loaded += 1;
                report.ready.push(scene.clone());
                observer.on_progress(LoadProgress { loaded, total });
            } else {
                pending.push(scene.clone());
            }
        }

        let mut fetches = stream::iter(pending)
            .map(|scene| async move {
                let result = self.source.fetch(&scene).await;
                (scene, result)
            })
            .buffer_unordered(self.concurrency);

        while let Some((scene, result)) = fetches.next().await {
            loaded += 1;
            match result {
                Ok(bytes) => {
                    self.store(scene.clone(), bytes);
                    report.ready.push(scene.clone());
                }
                Err(error) => {
                    warn!(%scene, %error, "asset unavailable, will play live");
                    report.unavailable.push(scene.clone());
                }
            }
            observer.on_progress(LoadProgress { loaded, total });
        }

        info!(
            total,
            ready = report.ready.len(),
            unavailable = report.unavailable.len(),
            "preload complete"
        );
        Ok(report)
    }
}
