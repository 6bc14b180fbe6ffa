//! Reverie Core - Ambient audio/visual session engine
//!
//! This crate provides the building blocks for a synchronized ambient
//! experience: a session actor that keeps one audio and one video resource
//! in lockstep, playlist sequencing with optional shuffle, background video
//! rotation, and configuration management.

pub mod config;
pub mod media;
pub mod playlist;
pub mod rotation;
pub mod session;
pub mod tracing_setup;

// Re-export main types for convenient access
pub use config::{ConfigError, ReverieConfig};
pub use media::{LibraryError, MediaError, MediaLibrary, MediaPipeline, MediaSource};
pub use playlist::{PlaylistError, PlaylistSequencer, TrackIndex};
pub use rotation::{RotationError, VideoRotation};
pub use session::{SessionError, SessionHandle, SessionSnapshot, spawn_session};

/// Core errors that can bubble up from any Reverie subsystem.
///
/// High-level error types representing failures in core functionality.
#[derive(Debug, thiserror::Error)]
pub enum ReverieError {
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Playlist error: {0}")]
    Playlist(#[from] PlaylistError),

    #[error("Video rotation error: {0}")]
    Rotation(#[from] RotationError),

    #[error("Media error: {0}")]
    Media(#[from] MediaError),

    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ReverieError {
    /// Returns a user-friendly error message suitable for display.
    pub fn user_message(&self) -> String {
        match self {
            ReverieError::Session(SessionError::SessionShutdown) => {
                "Session is no longer running".to_string()
            }
            ReverieError::Playlist(PlaylistError::EmptyPlaylist) => {
                "The playlist has no tracks".to_string()
            }
            ReverieError::Rotation(RotationError::NoVideos) => {
                "No background videos available".to_string()
            }
            ReverieError::Media(_) => "Media resource error occurred".to_string(),
            ReverieError::Library(e) => format!("Invalid media library: {e}"),
            ReverieError::Configuration(e) => format!("Invalid configuration: {e}"),
            ReverieError::Io(_) => "File system error occurred".to_string(),
        }
    }

    /// Checks if this error is due to user input validation.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ReverieError::Library(_)
                | ReverieError::Configuration(_)
                | ReverieError::Playlist(PlaylistError::EmptyPlaylist)
        )
    }
}

pub type Result<T> = std::result::Result<T, ReverieError>;
