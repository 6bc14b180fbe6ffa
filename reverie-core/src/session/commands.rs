//! Messages exchanged with the session actor.

use tokio::sync::oneshot;

use crate::media::{MediaSource, Transport};
use crate::playlist::TrackIndex;

/// Commands the session actor processes.
#[derive(Debug)]
pub enum SessionCommand {
    /// First user gesture: begin playback and reveal the controls.
    Enter {
        responder: oneshot::Sender<()>,
    },
    Play {
        responder: oneshot::Sender<()>,
    },
    Pause {
        responder: oneshot::Sender<()>,
    },
    TogglePlayPause {
        responder: oneshot::Sender<()>,
    },
    SetMuted {
        muted: bool,
        responder: oneshot::Sender<()>,
    },
    SetVolume {
        volume: f64,
        responder: oneshot::Sender<()>,
    },
    NextTrack {
        responder: oneshot::Sender<TrackIndex>,
    },
    PreviousTrack {
        responder: oneshot::Sender<TrackIndex>,
    },
    SetShuffled {
        enabled: bool,
        responder: oneshot::Sender<()>,
    },
    Reshuffle {
        responder: oneshot::Sender<()>,
    },
    SwitchVideo {
        responder: oneshot::Sender<usize>,
    },
    /// Keyboard-style intent, fire and forget.
    Intent {
        intent: ControlIntent,
    },
    /// Pointer or key activity that keeps the controls visible.
    Activity,
    GetSnapshot {
        responder: oneshot::Sender<SessionSnapshot>,
    },
    Shutdown {
        responder: oneshot::Sender<()>,
    },
}

/// Control actions a key press maps to.
///
/// Intents are ignored until the session has been entered, so stray key
/// presses on the entry screen change nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlIntent {
    TogglePlayPause,
    VolumeUp,
    VolumeDown,
    NextTrack,
    PreviousTrack,
    ToggleMute,
    ToggleShuffle,
}

/// Timer firings delivered back to the actor by spawned timer tasks.
///
/// Each timer family carries a generation counter. Superseding a timer bumps
/// the generation, so a firing from an aborted predecessor that was already
/// in flight is recognized as stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerFire {
    /// One fade-in ramp step is due.
    FadeTick { generation: u64 },
    /// The controls auto-hide delay elapsed.
    HideControls { generation: u64 },
}

/// Point-in-time view of the session, safe to render from.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Whether the session intends to be playing.
    pub playing: bool,
    /// Whether audio output is muted.
    pub muted: bool,
    /// Requested volume in `0.0..=1.0`.
    pub volume: f64,
    /// Whether the entry gesture has happened.
    pub entered: bool,
    /// Whether the control overlay is showing.
    pub controls_visible: bool,
    /// Whether shuffled traversal is active.
    pub shuffled: bool,
    /// Track currently bound to the audio pipeline.
    pub current_track: TrackIndex,
    /// Source location of the current track.
    pub track_source: MediaSource,
    /// Number of tracks in the library.
    pub track_count: usize,
    /// Tracks in traversal order starting at the current one; the tail is
    /// what a queue display renders as up next.
    pub upcoming: Vec<TrackIndex>,
    /// Index of the background video currently showing.
    pub current_video: usize,
    /// Number of background videos in the library.
    pub video_count: usize,
    /// Whether a fade-in ramp is in progress.
    pub fading: bool,
    /// Actual transport state of the audio pipeline.
    pub audio_transport: Transport,
    /// Actual transport state of the video pipeline.
    pub video_transport: Transport,
}
