//! Integration tests for preloading catalog scenes from a directory.

use loopwalk_asset_store::caching_preloader::{CachingPreloader, Playback};
use loopwalk_asset_store::directory_source::DirectoryAssetSource;
use loopwalk_asset_store::source::AssetSource;
use loopwalk_catalog::application::builtin::builtin_catalog;
use loopwalk_catalog::domain::location::LocationId;
use loopwalk_core::assets::AssetPreloader;
use loopwalk_test_support::RecordingObserver;

#[tokio::test]
async fn test_preload_builtin_location_from_directory() {
    // Arrange
    let catalog = builtin_catalog().unwrap();
    let scenes = catalog.scenes_for(LocationId(1)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    for scene in &scenes {
        tokio::fs::write(dir.path().join(scene.as_str()), scene.as_str())
            .await
            .unwrap();
    }
    let preloader = CachingPreloader::new(DirectoryAssetSource::new(dir.path()), 4);
    let observer = RecordingObserver::new();

    // Act
    let report = preloader.ensure_ready(&scenes, &observer).await.unwrap();

    // Assert
    assert!(report.is_complete());
    assert_eq!(report.ready.len(), scenes.len());
    let last = observer.progress().last().copied().unwrap();
    assert_eq!(last.loaded, scenes.len());
    assert_eq!(last.percent(), 100);
    match preloader.resolve(&scenes[0]) {
        Playback::Cached(bytes) => assert_eq!(bytes.as_slice(), scenes[0].as_str().as_bytes()),
        other => panic!("expected cached playback, got {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_files_fall_back_to_live_playback() {
    // Arrange
    let catalog = builtin_catalog().unwrap();
    let scenes = catalog.scenes_for(LocationId(2)).unwrap();
    let dir = tempfile::tempdir().unwrap();
    tokio::fs::write(dir.path().join("Gang2.mp4"), b"idle")
        .await
        .unwrap();
    let source = DirectoryAssetSource::new(dir.path());
    let preloader = CachingPreloader::new(source.clone(), 2);

    // Act
    let report = preloader
        .ensure_ready(&scenes, &RecordingObserver::new())
        .await
        .unwrap();

    // Assert
    assert_eq!(report.ready.len(), 1);
    assert_eq!(report.unavailable.len(), scenes.len() - 1);
    let walk = scenes
        .iter()
        .find(|scene| scene.as_str() == "Gang2Walk.mp4")
        .unwrap();
    assert_eq!(
        preloader.resolve(walk),
        Playback::Live(source.live_location(walk))
    );
}
