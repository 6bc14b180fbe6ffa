//! Manifest loading and library construction across the file boundary.

use std::time::Duration;

use reverie_core::media::{SimulatedMediaConfig, SimulatedPipeline};
use reverie_core::{LibraryError, MediaLibrary, ReverieConfig};
use serde_json::json;
use tokio_test::assert_ok;

#[test]
fn test_manifest_survives_disk_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("library.json");

    let original = MediaLibrary::demo();
    std::fs::write(&path, original.to_manifest_json().unwrap()).unwrap();

    let contents = std::fs::read_to_string(&path).unwrap();
    let reloaded = assert_ok!(MediaLibrary::from_json(&contents));

    assert_eq!(reloaded.track_count(), original.track_count());
    assert_eq!(reloaded.video_count(), original.video_count());
    assert_eq!(reloaded.tracks()[0], original.tracks()[0]);
}

#[tokio::test(start_paused = true)]
async fn test_session_runs_over_loaded_manifest() {
    let manifest = json!({
        "tracks": ["/audio/one.mp3", "/audio/two.mp3"],
        "videos": ["/video/loop.mp4"]
    })
    .to_string();
    let library = MediaLibrary::from_json(&manifest).unwrap();

    let audio = SimulatedPipeline::new(SimulatedMediaConfig::default());
    let video = SimulatedPipeline::new(SimulatedMediaConfig::looping_video());
    let session =
        reverie_core::spawn_session(ReverieConfig::for_testing(), library, audio, video).unwrap();

    session.enter().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.track_count, 2);
    assert_eq!(snapshot.video_count, 1);
    assert!(snapshot.playing);

    session.shutdown().await.unwrap();
}

#[test]
fn test_malformed_manifest_rejected() {
    let result = MediaLibrary::from_json("{not json");
    assert!(matches!(
        result.unwrap_err(),
        LibraryError::InvalidManifest { .. }
    ));
}

#[test]
fn test_manifest_without_tracks_rejected() {
    let manifest = json!({ "tracks": [], "videos": ["/video/loop.mp4"] }).to_string();
    let result = MediaLibrary::from_json(&manifest);
    assert_eq!(result.unwrap_err(), LibraryError::NoTracks);
}
