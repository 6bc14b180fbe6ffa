//! Cloneable handle for talking to the session actor.

use tokio::sync::{mpsc, oneshot};

use crate::playlist::TrackIndex;
use crate::session::SessionError;
use crate::session::commands::{ControlIntent, SessionCommand, SessionSnapshot};

/// Handle to a running session actor.
///
/// Cheap to clone; all clones talk to the same actor. Every request method
/// resolves once the actor has processed the command, so a following
/// `snapshot` observes its effect.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
}

impl SessionHandle {
    pub(crate) fn new(sender: mpsc::Sender<SessionCommand>) -> Self {
        Self { sender }
    }

    /// Whether the session actor is still accepting commands.
    pub fn is_running(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Performs the entry gesture: starts playback, reveals the controls.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn enter(&self) -> Result<(), SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::Enter { responder }).await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Requests playback on both surfaces.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn play(&self) -> Result<(), SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::Play { responder }).await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Halts playback on both surfaces.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn pause(&self) -> Result<(), SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::Pause { responder }).await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Toggles between playing and paused.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn toggle_play_pause(&self) -> Result<(), SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::TogglePlayPause { responder })
            .await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Mutes or unmutes audio output.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn set_muted(&self, muted: bool) -> Result<(), SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::SetMuted { muted, responder })
            .await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Sets the volume, clamped to `0.0..=1.0`.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn set_volume(&self, volume: f64) -> Result<(), SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::SetVolume { volume, responder })
            .await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Skips to the next track and returns its index.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn next_track(&self) -> Result<TrackIndex, SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::NextTrack { responder }).await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Steps back to the previous track and returns its index.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn previous_track(&self) -> Result<TrackIndex, SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::PreviousTrack { responder })
            .await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Switches between sequential and shuffled traversal.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn set_shuffled(&self, enabled: bool) -> Result<(), SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::SetShuffled { enabled, responder })
            .await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Draws a fresh shuffled order.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn reshuffle(&self) -> Result<(), SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::Reshuffle { responder }).await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Rotates to the next background video and returns its index.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn switch_video(&self) -> Result<usize, SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::SwitchVideo { responder }).await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Sends a keyboard-style intent, fire and forget.
    ///
    /// Silently dropped if the actor is gone; key presses have nowhere to
    /// report errors to.
    pub fn intent(&self, intent: ControlIntent) {
        let _ = self.sender.try_send(SessionCommand::Intent { intent });
    }

    /// Reports pointer or key activity, fire and forget.
    pub fn activity(&self) {
        let _ = self.sender.try_send(SessionCommand::Activity);
    }

    /// Returns a point-in-time snapshot of the session.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor no longer running
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::GetSnapshot { responder }).await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    /// Stops the session actor.
    ///
    /// # Errors
    /// - `SessionError::SessionShutdown` - Actor already stopped
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        let (responder, receiver) = oneshot::channel();
        self.send(SessionCommand::Shutdown { responder }).await?;
        receiver.await.map_err(|_| SessionError::SessionShutdown)
    }

    async fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| SessionError::SessionShutdown)
    }
}
