//! Whole-session flows over simulated media under a paused tokio clock.
//!
//! Every test runs the real actor with [`SimulatedPipeline`] surfaces, so
//! buffering delays, track endings, fades, and auto-hide timers all fire at
//! exact virtual instants.

use std::time::Duration;

use reverie_core::media::{SimulatedMediaConfig, SimulatedPipeline, Transport};
use reverie_core::session::ControlIntent;
use reverie_core::{MediaLibrary, MediaSource, ReverieConfig, SessionHandle, TrackIndex};

fn simulated_session(config: ReverieConfig, library: MediaLibrary) -> SessionHandle {
    let audio = SimulatedPipeline::new(SimulatedMediaConfig::default());
    let video = SimulatedPipeline::new(SimulatedMediaConfig::looping_video());
    reverie_core::spawn_session(config, library, audio, video).unwrap()
}

#[tokio::test(start_paused = true)]
async fn test_enter_fades_in_and_plays() {
    let session = simulated_session(ReverieConfig::for_testing(), MediaLibrary::demo());

    session.enter().await.unwrap();
    // Buffering, start, and the 200ms test ramp all fit inside a second.
    tokio::time::sleep(Duration::from_secs(1)).await;

    let snapshot = session.snapshot().await.unwrap();
    assert!(snapshot.entered);
    assert!(snapshot.playing);
    assert!(!snapshot.fading);
    assert_eq!(snapshot.volume, 0.7);
    assert_eq!(snapshot.audio_transport, Transport::Playing);
    assert_eq!(snapshot.video_transport, Transport::Playing);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_tracks_advance_in_sequence_as_they_end() {
    let library = MediaLibrary::new(
        vec![
            MediaSource::new("/audio/one.mp3"),
            MediaSource::new("/audio/two.mp3"),
            MediaSource::new("/audio/three.mp3"),
        ],
        vec![MediaSource::new("/video/clouds.mp4")],
    )
    .unwrap();

    let audio = SimulatedPipeline::new(SimulatedMediaConfig {
        buffering_delay: Duration::from_millis(100),
        track_length: Duration::from_secs(10),
        ..SimulatedMediaConfig::default()
    });
    let video = SimulatedPipeline::new(SimulatedMediaConfig::looping_video());
    let session =
        reverie_core::spawn_session(ReverieConfig::for_testing(), library, audio, video).unwrap();

    session.enter().await.unwrap();

    // First track ends at 10s; the next binds, buffers, and restarts.
    tokio::time::sleep(Duration::from_secs(11)).await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.current_track, TrackIndex::new(1));
    assert_eq!(snapshot.audio_transport, Transport::Playing);

    tokio::time::sleep(Duration::from_millis(10_500)).await;
    assert_eq!(
        session.snapshot().await.unwrap().current_track,
        TrackIndex::new(2)
    );

    // The last track wraps back to the first.
    tokio::time::sleep(Duration::from_millis(10_500)).await;
    let snapshot = session.snapshot().await.unwrap();
    assert_eq!(snapshot.current_track, TrackIndex::new(0));
    assert!(snapshot.playing);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_intents_adjust_volume_and_mute() {
    let session = simulated_session(ReverieConfig::for_testing(), MediaLibrary::demo());

    session.enter().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    session.intent(ControlIntent::VolumeUp);
    session.intent(ControlIntent::VolumeUp);
    let snapshot = session.snapshot().await.unwrap();
    assert!((snapshot.volume - 0.9).abs() < 1e-9);

    session.intent(ControlIntent::ToggleMute);
    assert!(session.snapshot().await.unwrap().muted);

    session.intent(ControlIntent::ToggleMute);
    assert!(!session.snapshot().await.unwrap().muted);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_controls_hide_after_inactivity() {
    let session = simulated_session(ReverieConfig::for_testing(), MediaLibrary::demo());

    session.enter().await.unwrap();
    assert!(session.snapshot().await.unwrap().controls_visible);

    // Test config hides 1s after entry.
    tokio::time::sleep(Duration::from_millis(1_050)).await;
    assert!(!session.snapshot().await.unwrap().controls_visible);

    session.activity();
    assert!(session.snapshot().await.unwrap().controls_visible);

    // And 500ms after the last activity pulse.
    tokio::time::sleep(Duration::from_millis(550)).await;
    assert!(!session.snapshot().await.unwrap().controls_visible);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_rejected_autoplay_recovers_on_user_gesture() {
    let audio = SimulatedPipeline::new(SimulatedMediaConfig::with_start_rejections(2));
    let video = SimulatedPipeline::new(SimulatedMediaConfig::looping_video());
    let session = reverie_core::spawn_session(
        ReverieConfig::for_testing(),
        MediaLibrary::demo(),
        audio,
        video,
    )
    .unwrap();

    // Entry start is rejected, and so is the retry when buffering finishes.
    session.enter().await.unwrap();
    tokio::time::sleep(Duration::from_secs(1)).await;

    let snapshot = session.snapshot().await.unwrap();
    assert!(snapshot.playing, "intent survives rejected starts");
    assert_eq!(snapshot.audio_transport, Transport::Paused);
    assert_eq!(snapshot.video_transport, Transport::Playing);

    // A pause/play gesture retries the start, which now succeeds.
    session.toggle_play_pause().await.unwrap();
    assert!(!session.snapshot().await.unwrap().playing);

    session.toggle_play_pause().await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert!(snapshot.playing);
    assert_eq!(snapshot.audio_transport, Transport::Playing);

    session.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_shuffle_toggle_preserves_position_continuity() {
    let mut config = ReverieConfig::for_testing();
    config.playlist.shuffle_seed = Some(7);
    let session = simulated_session(config, MediaLibrary::demo());

    session.enter().await.unwrap();

    assert_eq!(session.next_track().await.unwrap(), TrackIndex::new(1));
    let at_toggle = session.next_track().await.unwrap();
    assert_eq!(at_toggle, TrackIndex::new(2));

    session.set_shuffled(true).await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert!(snapshot.shuffled);
    assert_eq!(snapshot.current_track, at_toggle);

    let shuffled_next = session.next_track().await.unwrap();
    assert_ne!(shuffled_next, at_toggle);
    assert_eq!(session.previous_track().await.unwrap(), at_toggle);

    session.set_shuffled(false).await.unwrap();
    let snapshot = session.snapshot().await.unwrap();
    assert!(!snapshot.shuffled);
    assert_eq!(snapshot.current_track, at_toggle);

    // Back in index order, traversal resumes from the natural successor.
    assert_eq!(session.next_track().await.unwrap(), TrackIndex::new(3));

    session.shutdown().await.unwrap();
}
