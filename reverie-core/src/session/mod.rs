//! Ambient session orchestration.
//!
//! The session owns the audio and video pipelines, the playlist sequencer,
//! and the video rotation, and keeps them synchronized: one actor task
//! serializes user commands, pipeline lifecycle signals, and timer firings
//! over the same state. Callers interact through the cloneable
//! [`SessionHandle`].

pub mod actor;
pub mod commands;
pub mod core;
pub mod fade;
pub mod handle;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_mocks;


pub use actor::spawn_session;
pub use commands::{ControlIntent, SessionCommand, SessionSnapshot, TimerFire};
pub use fade::{FadeRamp, FadeStep};
pub use handle::SessionHandle;
pub use self::core::{AmbientSession, PlaybackState};

/// Errors that can occur when talking to a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Session is no longer running")]
    SessionShutdown,
}
