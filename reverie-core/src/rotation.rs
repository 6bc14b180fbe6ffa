//! Background video rotation.
//!
//! Videos cycle in fixed order, independent of the audio playlist. The
//! rotation also names the follow-up video so callers can warm it up before
//! the switch happens.

/// Errors that can occur during video rotation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RotationError {
    #[error("Video rotation requires at least one video")]
    NoVideos,
}

/// Cyclic cursor over the fixed set of background videos.
#[derive(Debug, Clone)]
pub struct VideoRotation {
    current: usize,
    total: usize,
}

impl VideoRotation {
    /// Creates a rotation over `total` videos, starting at the first.
    ///
    /// # Errors
    /// - `RotationError::NoVideos` - Zero videos
    pub fn new(total: usize) -> Result<Self, RotationError> {
        if total == 0 {
            return Err(RotationError::NoVideos);
        }
        Ok(Self { current: 0, total })
    }

    /// Index of the video currently showing.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of videos in the rotation.
    pub fn video_count(&self) -> usize {
        self.total
    }

    /// Index of the video that would show after the current one.
    ///
    /// This is the preload target while the current video plays.
    pub fn next_index(&self) -> usize {
        (self.current + 1) % self.total
    }

    /// Moves to the next video and returns its index.
    pub fn advance(&mut self) -> usize {
        self.current = self.next_index();
        self.current
    }
}
