//! Session actor: single task that owns all session state.
//!
//! Commands from handles, lifecycle signals from pipelines, and timer
//! firings all funnel into one `select!` loop, so every state change is
//! serialized without locks.

use tokio::sync::mpsc;

use crate::ReverieError;
use crate::config::ReverieConfig;
use crate::media::{MediaLibrary, MediaPipeline, ResourceSignal};
use crate::session::commands::{SessionCommand, TimerFire};
use crate::session::core::AmbientSession;
use crate::session::handle::SessionHandle;

/// Spawns the session actor and returns a handle to it.
///
/// The actor binds the initial media, then runs until a `Shutdown` command
/// arrives or every handle is dropped.
///
/// # Errors
/// - `ReverieError::Configuration` - Invalid config values
/// - `ReverieError::Playlist` - Library with no tracks
/// - `ReverieError::Rotation` - Library with no videos
pub fn spawn_session<A, V>(
    config: ReverieConfig,
    library: MediaLibrary,
    audio: A,
    video: V,
) -> Result<SessionHandle, ReverieError>
where
    A: MediaPipeline + 'static,
    V: MediaPipeline + 'static,
{
    config.validate()?;

    let (command_tx, command_rx) = mpsc::channel(100);
    let (signal_tx, signal_rx) = mpsc::unbounded_channel();
    let (timer_tx, timer_rx) = mpsc::unbounded_channel();

    let session = AmbientSession::new(config, library, audio, video, signal_tx, timer_tx)?;
    tokio::spawn(run_session_loop(session, command_rx, signal_rx, timer_rx));

    Ok(SessionHandle::new(command_tx))
}

async fn run_session_loop<A: MediaPipeline, V: MediaPipeline>(
    mut session: AmbientSession<A, V>,
    mut commands: mpsc::Receiver<SessionCommand>,
    mut signals: mpsc::UnboundedReceiver<ResourceSignal>,
    mut timers: mpsc::UnboundedReceiver<TimerFire>,
) {
    tracing::debug!("session actor started");
    session.initialize().await;

    loop {
        tokio::select! {
            command = commands.recv() => match command {
                Some(command) => {
                    if !handle_command(&mut session, command).await {
                        break;
                    }
                }
                // Every handle dropped; the session winds down.
                None => break,
            },
            Some(signal) = signals.recv() => {
                session.handle_signal(signal).await;
            }
            Some(fire) = timers.recv() => {
                session.handle_timer(fire).await;
            }
        }
    }

    session.teardown().await;
    tracing::debug!("session actor stopped");
}

/// Processes one command. Returns false when the actor should stop.
async fn handle_command<A: MediaPipeline, V: MediaPipeline>(
    session: &mut AmbientSession<A, V>,
    command: SessionCommand,
) -> bool {
    match command {
        SessionCommand::Enter { responder } => {
            session.enter().await;
            let _ = responder.send(());
        }
        SessionCommand::Play { responder } => {
            session.play().await;
            let _ = responder.send(());
        }
        SessionCommand::Pause { responder } => {
            session.pause().await;
            let _ = responder.send(());
        }
        SessionCommand::TogglePlayPause { responder } => {
            session.toggle_play_pause().await;
            let _ = responder.send(());
        }
        SessionCommand::SetMuted { muted, responder } => {
            session.set_muted(muted).await;
            let _ = responder.send(());
        }
        SessionCommand::SetVolume { volume, responder } => {
            session.set_volume(volume).await;
            let _ = responder.send(());
        }
        SessionCommand::NextTrack { responder } => {
            let index = session.next_track().await;
            let _ = responder.send(index);
        }
        SessionCommand::PreviousTrack { responder } => {
            let index = session.previous_track().await;
            let _ = responder.send(index);
        }
        SessionCommand::SetShuffled { enabled, responder } => {
            session.set_shuffled(enabled);
            let _ = responder.send(());
        }
        SessionCommand::Reshuffle { responder } => {
            session.reshuffle();
            let _ = responder.send(());
        }
        SessionCommand::SwitchVideo { responder } => {
            let index = session.switch_video().await;
            let _ = responder.send(index);
        }
        SessionCommand::Intent { intent } => {
            session.apply_intent(intent).await;
        }
        SessionCommand::Activity => {
            session.activity();
        }
        SessionCommand::GetSnapshot { responder } => {
            let _ = responder.send(session.snapshot());
        }
        SessionCommand::Shutdown { responder } => {
            tracing::debug!("session shutdown requested");
            let _ = responder.send(());
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::playlist::TrackIndex;
    use crate::session::SessionError;
    use crate::session::test_mocks::ScriptedPipeline;

    fn demo_session() -> (SessionHandle, ScriptedPipeline, ScriptedPipeline) {
        let audio = ScriptedPipeline::new();
        let video = ScriptedPipeline::new();
        let handle = spawn_session(
            ReverieConfig::default(),
            MediaLibrary::demo(),
            audio.clone(),
            video.clone(),
        )
        .unwrap();
        (handle, audio, video)
    }

    #[tokio::test]
    async fn test_spawn_and_basic_operations() {
        let (handle, _audio, _video) = demo_session();
        assert!(handle.is_running());

        let snapshot = handle.snapshot().await.unwrap();
        assert!(!snapshot.playing);
        assert!(!snapshot.entered);
        assert_eq!(snapshot.volume, 0.7);
        assert_eq!(snapshot.current_track, TrackIndex::new(0));
        assert_eq!(snapshot.track_count, 5);

        handle.shutdown().await.unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;

        assert!(!handle.is_running());
        let result = handle.snapshot().await;
        assert_eq!(result.unwrap_err(), SessionError::SessionShutdown);
    }

    #[tokio::test]
    async fn test_enter_starts_both_pipelines() {
        let (handle, audio, video) = demo_session();

        handle.enter().await.unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.entered);
        assert!(snapshot.playing);
        assert!(snapshot.controls_visible);
        assert_eq!(audio.start_calls(), 1);
        assert_eq!(video.start_calls(), 1);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_track_navigation_rebinds_audio() {
        let (handle, audio, _video) = demo_session();

        let next = handle.next_track().await.unwrap();
        assert_eq!(next, TrackIndex::new(1));

        let previous = handle.previous_track().await.unwrap();
        assert_eq!(previous, TrackIndex::new(0));

        let tracks = MediaLibrary::demo().tracks().to_vec();
        assert_eq!(
            audio.loaded_sources(),
            vec![tracks[0].clone(), tracks[1].clone(), tracks[0].clone()]
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_snapshot_carries_upcoming_queue() {
        let (handle, _audio, _video) = demo_session();

        let snapshot = handle.snapshot().await.unwrap();
        let queue: Vec<usize> = snapshot.upcoming.iter().map(|t| t.as_usize()).collect();
        assert_eq!(queue, vec![0, 1, 2, 3, 4]);

        handle.next_track().await.unwrap();

        let snapshot = handle.snapshot().await.unwrap();
        let queue: Vec<usize> = snapshot.upcoming.iter().map(|t| t.as_usize()).collect();
        assert_eq!(queue, vec![1, 2, 3, 4, 0]);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_intents_gated_until_entry() {
        let (handle, _audio, _video) = demo_session();

        handle.intent(crate::session::ControlIntent::ToggleMute);
        let snapshot = handle.snapshot().await.unwrap();
        assert!(!snapshot.muted);

        handle.enter().await.unwrap();
        handle.intent(crate::session::ControlIntent::ToggleMute);
        let snapshot = handle.snapshot().await.unwrap();
        assert!(snapshot.muted);

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_switch_video_rotates_and_preloads() {
        let (handle, _audio, video) = demo_session();

        let index = handle.switch_video().await.unwrap();
        assert_eq!(index, 1);

        let videos = MediaLibrary::demo().videos().to_vec();
        assert_eq!(
            video.loaded_sources(),
            vec![videos[0].clone(), videos[1].clone()]
        );
        assert_eq!(
            video.preloaded_sources(),
            vec![videos[1].clone(), videos[2].clone()]
        );

        handle.shutdown().await.unwrap();
    }
}
