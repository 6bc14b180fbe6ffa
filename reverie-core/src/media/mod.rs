//! Media pipeline abstractions and implementations.
//!
//! A [`MediaPipeline`] is the session's view of one playback surface (the
//! audio element or the background video element). Pipelines report their
//! lifecycle back through an unbounded signal channel so the session actor
//! can react to buffering and end-of-track events without polling.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub mod library;
pub mod simulated;

pub use library::{LibraryError, MediaLibrary};
pub use simulated::{SimulatedMediaConfig, SimulatedPipeline};

/// Location of a playable media resource.
///
/// Opaque to the session; pipelines interpret it (URL, file path, or a
/// simulated identifier).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaSource(String);

impl MediaSource {
    /// Creates a media source from any string-like location.
    pub fn new(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    /// Returns the source location as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MediaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which playback surface a pipeline drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Audio,
    Video,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Audio => write!(f, "audio"),
            Self::Video => write!(f, "video"),
        }
    }
}

/// Whether a pipeline is currently rendering media.
///
/// This is the pipeline's actual state, not the session's intent. A session
/// can intend to play while the pipeline sits paused waiting for data or for
/// a start attempt that was rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Transport {
    Playing,
    #[default]
    Paused,
}

/// Lifecycle events a pipeline reports while rendering a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaSignal {
    /// Playback actually began after a start request.
    Started,
    /// Enough of the current source is buffered to begin playback.
    ReadyToPlay,
    /// The current source finished on its own.
    Ended,
}

/// A lifecycle signal tagged with the surface that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSignal {
    pub resource: ResourceKind,
    pub signal: MediaSignal,
}

/// Channel on which pipelines report lifecycle signals.
pub type SignalSender = mpsc::UnboundedSender<ResourceSignal>;

/// Errors that can occur during media playback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MediaError {
    #[error("Playback start rejected: {reason}")]
    StartRejected { reason: String },

    #[error("No media source bound to pipeline")]
    NoSourceBound,
}

/// One playback surface as the session sees it.
///
/// Contracts every implementation upholds:
/// - A successful `start` flips the transport to `Playing` before returning.
/// - A rejected `start` leaves the transport `Paused` and the pipeline
///   otherwise intact; a later `start` may succeed.
/// - `load` replaces the bound source and cancels signals still pending for
///   the previous source, so stale `ReadyToPlay` or `Ended` events never
///   arrive for a source no longer bound.
#[async_trait]
pub trait MediaPipeline: Send {
    /// Binds the signal channel this pipeline reports lifecycle events on.
    fn bind_signals(&mut self, resource: ResourceKind, signals: SignalSender);

    /// Binds a new source, replacing any previous one.
    async fn load(&mut self, source: &MediaSource);

    /// Hints that a source will be loaded soon and may be warmed up.
    ///
    /// Purely advisory; the default does nothing.
    async fn preload(&mut self, source: &MediaSource) {
        let _ = source;
    }

    /// Requests playback of the bound source.
    ///
    /// # Errors
    /// - `MediaError::StartRejected` - The environment refused to begin
    ///   playback (autoplay policy, device in use)
    /// - `MediaError::NoSourceBound` - `start` before any `load`
    async fn start(&mut self) -> Result<(), MediaError>;

    /// Halts playback, keeping the bound source and its position.
    async fn stop(&mut self);

    /// Sets the output gain in `0.0..=1.0`.
    async fn set_gain(&mut self, gain: f64);

    /// Mutes or unmutes output without touching the gain.
    async fn set_muted(&mut self, muted: bool);

    /// Current transport state of this pipeline.
    fn transport(&self) -> Transport;
}
