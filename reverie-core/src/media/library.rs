//! Media library describing the tracks and videos available to a session.
//!
//! The library is loaded once, from a JSON manifest or the built-in demo
//! set, and stays fixed for the session's lifetime.

use serde::{Deserialize, Serialize};

use super::MediaSource;

/// Errors that can occur while building a media library.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LibraryError {
    #[error("Media library must contain at least one track")]
    NoTracks,

    #[error("Media library must contain at least one video")]
    NoVideos,

    #[error("Invalid media manifest: {reason}")]
    InvalidManifest { reason: String },
}

/// On-disk manifest shape.
#[derive(Debug, Serialize, Deserialize)]
struct ManifestFile {
    tracks: Vec<MediaSource>,
    videos: Vec<MediaSource>,
}

/// Fixed set of audio tracks and background videos for one session.
#[derive(Debug, Clone)]
pub struct MediaLibrary {
    tracks: Vec<MediaSource>,
    videos: Vec<MediaSource>,
}

impl MediaLibrary {
    /// Creates a library from explicit track and video lists.
    ///
    /// # Errors
    /// - `LibraryError::NoTracks` - Empty track list
    /// - `LibraryError::NoVideos` - Empty video list
    pub fn new(
        tracks: Vec<MediaSource>,
        videos: Vec<MediaSource>,
    ) -> Result<Self, LibraryError> {
        if tracks.is_empty() {
            return Err(LibraryError::NoTracks);
        }
        if videos.is_empty() {
            return Err(LibraryError::NoVideos);
        }
        Ok(Self { tracks, videos })
    }

    /// Parses a library from a JSON manifest.
    ///
    /// The manifest is an object with `tracks` and `videos` arrays of
    /// source strings.
    ///
    /// # Errors
    /// - `LibraryError::InvalidManifest` - Malformed JSON or wrong shape
    /// - `LibraryError::NoTracks` - Manifest with an empty track list
    /// - `LibraryError::NoVideos` - Manifest with an empty video list
    pub fn from_json(manifest: &str) -> Result<Self, LibraryError> {
        let parsed: ManifestFile =
            serde_json::from_str(manifest).map_err(|e| LibraryError::InvalidManifest {
                reason: e.to_string(),
            })?;
        Self::new(parsed.tracks, parsed.videos)
    }

    /// Renders this library back into manifest JSON.
    ///
    /// # Errors
    /// - `LibraryError::InvalidManifest` - Serialization failure
    pub fn to_manifest_json(&self) -> Result<String, LibraryError> {
        let manifest = ManifestFile {
            tracks: self.tracks.clone(),
            videos: self.videos.clone(),
        };
        serde_json::to_string_pretty(&manifest).map_err(|e| LibraryError::InvalidManifest {
            reason: e.to_string(),
        })
    }

    /// Built-in demo library used when no manifest is provided.
    pub fn demo() -> Self {
        Self {
            tracks: vec![
                MediaSource::new("/audio/drift.mp3"),
                MediaSource::new("/audio/undertow.mp3"),
                MediaSource::new("/audio/glasshouse.mp3"),
                MediaSource::new("/audio/meridian.mp3"),
                MediaSource::new("/audio/lowlight.mp3"),
            ],
            videos: vec![
                MediaSource::new("/video/clouds.mp4"),
                MediaSource::new("/video/tide.mp4"),
                MediaSource::new("/video/embers.mp4"),
            ],
        }
    }

    /// Audio tracks in manifest order.
    pub fn tracks(&self) -> &[MediaSource] {
        &self.tracks
    }

    /// Background videos in manifest order.
    pub fn videos(&self) -> &[MediaSource] {
        &self.videos
    }

    /// Number of audio tracks.
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Number of background videos.
    pub fn video_count(&self) -> usize {
        self.videos.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_track_list_rejected() {
        let result = MediaLibrary::new(vec![], vec![MediaSource::new("/video/a.mp4")]);
        assert_eq!(result.unwrap_err(), LibraryError::NoTracks);
    }

    #[test]
    fn test_empty_video_list_rejected() {
        let result = MediaLibrary::new(vec![MediaSource::new("/audio/a.mp3")], vec![]);
        assert_eq!(result.unwrap_err(), LibraryError::NoVideos);
    }

    #[test]
    fn test_from_json_parses_manifest() {
        let manifest = r#"{
            "tracks": ["/audio/one.mp3", "/audio/two.mp3"],
            "videos": ["/video/one.mp4"]
        }"#;

        let library = MediaLibrary::from_json(manifest).unwrap();

        assert_eq!(library.track_count(), 2);
        assert_eq!(library.video_count(), 1);
        assert_eq!(library.tracks()[0], MediaSource::new("/audio/one.mp3"));
    }

    #[test]
    fn test_from_json_rejects_malformed_manifest() {
        let result = MediaLibrary::from_json("{not json");
        assert!(matches!(
            result.unwrap_err(),
            LibraryError::InvalidManifest { .. }
        ));
    }

    #[test]
    fn test_from_json_rejects_empty_tracks() {
        let manifest = r#"{"tracks": [], "videos": ["/video/one.mp4"]}"#;
        let result = MediaLibrary::from_json(manifest);
        assert_eq!(result.unwrap_err(), LibraryError::NoTracks);
    }

    #[test]
    fn test_manifest_round_trip() {
        let library = MediaLibrary::demo();

        let json = library.to_manifest_json().unwrap();
        let reloaded = MediaLibrary::from_json(&json).unwrap();

        assert_eq!(reloaded.tracks(), library.tracks());
        assert_eq!(reloaded.videos(), library.videos());
    }

    #[test]
    fn test_demo_library_is_populated() {
        let library = MediaLibrary::demo();
        assert!(library.track_count() > 0);
        assert!(library.video_count() > 0);
    }
}
