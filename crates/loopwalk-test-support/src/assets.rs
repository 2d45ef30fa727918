//! Test preloaders and observers — mock `AssetPreloader` and `LoadObserver`
//! implementations for tests.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use loopwalk_core::assets::{AssetPreloader, LoadObserver, LoadProgress, PreloadReport};
use loopwalk_core::error::DomainError;
use loopwalk_core::scene::SceneId;

/// A preloader that reports every scene ready at once, except those marked
/// unavailable, and records every manifest it was asked for.
#[derive(Debug, Default)]
pub struct InstantPreloader {
    unavailable: HashSet<SceneId>,
    manifests: Mutex<Vec<Vec<SceneId>>>,
}

impl InstantPreloader {
    /// Creates a preloader for which every scene is available.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a preloader that reports `scenes` unavailable.
    #[must_use]
    pub fn with_unavailable<I, S>(scenes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<SceneId>,
    {
        Self {
            unavailable: scenes.into_iter().map(Into::into).collect(),
            manifests: Mutex::new(Vec::new()),
        }
    }

    /// Returns a snapshot of every manifest requested so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn manifests(&self) -> Vec<Vec<SceneId>> {
        self.manifests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetPreloader for InstantPreloader {
    async fn ensure_ready(
        &self,
        scenes: &[SceneId],
        observer: &dyn LoadObserver,
    ) -> Result<PreloadReport, DomainError> {
        self.manifests.lock().unwrap().push(scenes.to_vec());

        let total = scenes.len();
        let mut report = PreloadReport::default();
        for (index, scene) in scenes.iter().enumerate() {
            if self.unavailable.contains(scene) {
                report.unavailable.push(scene.clone());
            } else {
                report.ready.push(scene.clone());
            }
            observer.on_progress(LoadProgress {
                loaded: index + 1,
                total,
            });
        }
        if total == 0 {
            observer.on_progress(LoadProgress { loaded: 0, total });
        }
        Ok(report)
    }
}

/// A preloader that always returns an infrastructure error. Useful for
/// testing error-handling paths.
#[derive(Debug)]
pub struct FailingPreloader;

#[async_trait]
impl AssetPreloader for FailingPreloader {
    async fn ensure_ready(
        &self,
        _scenes: &[SceneId],
        _observer: &dyn LoadObserver,
    ) -> Result<PreloadReport, DomainError> {
        Err(DomainError::Infrastructure("asset source unreachable".into()))
    }
}

/// A load observer that records every progress notification.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    progress: Mutex<Vec<LoadProgress>>,
}

impl RecordingObserver {
    /// Creates an observer with no recorded progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every notification received.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn progress(&self) -> Vec<LoadProgress> {
        self.progress.lock().unwrap().clone()
    }
}

impl LoadObserver for RecordingObserver {
    fn on_progress(&self, progress: LoadProgress) {
        self.progress.lock().unwrap().push(progress);
    }
}
