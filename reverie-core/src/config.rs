//! Centralized configuration for Reverie.
//!
//! All tunable parameters and settings are defined here to avoid
//! hard-coded values scattered throughout the codebase.

use std::time::Duration;

/// Errors raised when validating a configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Fade tick interval must be non-zero")]
    ZeroFadeTick,

    #[error("Volume step must be greater than zero")]
    ZeroVolumeStep,

    #[error("Initial volume {volume} is outside 0.0..=1.0")]
    VolumeOutOfRange { volume: f64 },
}

/// Central configuration for all Reverie components.
///
/// Groups related configuration settings into logical sections.
/// Supports environment variable overrides for runtime customization.
#[derive(Debug, Clone, Default)]
pub struct ReverieConfig {
    pub playback: PlaybackConfig,
    pub playlist: PlaylistConfig,
    pub controls: ControlsConfig,
}

/// Playback and fade behavior configuration.
///
/// Controls the initial audio settings and the shape of the fade-in ramp
/// applied whenever audio playback starts.
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// Audio volume when a session starts (0.0 to 1.0)
    pub initial_volume: f64,
    /// Volume change applied per keyboard step
    pub volume_step: f64,
    /// Total length of the fade-in ramp
    pub fade_duration: Duration,
    /// Interval between fade ramp steps
    pub fade_tick: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_volume: 0.7,
            volume_step: 0.1,
            fade_duration: Duration::from_secs(1),
            fade_tick: Duration::from_millis(50), // 20 steps per ramp
        }
    }
}

/// Playlist sequencing configuration.
#[derive(Debug, Clone, Default)]
pub struct PlaylistConfig {
    /// Deterministic seed for reproducible shuffle orders
    pub shuffle_seed: Option<u64>,
}

/// Controls visibility configuration.
///
/// The control surface hides itself after a period of inactivity; activity
/// pulses reset the countdown with a shorter delay than the initial entry.
#[derive(Debug, Clone)]
pub struct ControlsConfig {
    /// Auto-hide delay after entering the experience
    pub hide_after_enter: Duration,
    /// Auto-hide delay after a pointer activity pulse
    pub hide_after_activity: Duration,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            hide_after_enter: Duration::from_secs(4),
            hide_after_activity: Duration::from_secs(3),
        }
    }
}

impl ReverieConfig {
    /// Creates configuration with environment variable overrides.
    ///
    /// Allows runtime configuration via environment variables while
    /// maintaining sensible defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(volume) = std::env::var("REVERIE_INITIAL_VOLUME") {
            if let Ok(value) = volume.parse::<f64>() {
                config.playback.initial_volume = value;
            }
        }

        if let Ok(seed) = std::env::var("REVERIE_SHUFFLE_SEED") {
            if let Ok(value) = seed.parse::<u64>() {
                config.playlist.shuffle_seed = Some(value);
            }
        }

        if let Ok(fade) = std::env::var("REVERIE_FADE_MS") {
            if let Ok(millis) = fade.parse::<u64>() {
                config.playback.fade_duration = Duration::from_millis(millis);
            }
        }

        config
    }

    /// Creates a configuration optimized for testing.
    ///
    /// Shrinks every timer so tests spend virtual milliseconds where a real
    /// session spends seconds, and fixes the shuffle seed.
    pub fn for_testing() -> Self {
        Self {
            playback: PlaybackConfig {
                initial_volume: 0.7,
                volume_step: 0.1,
                fade_duration: Duration::from_millis(200), // 4 steps per ramp
                fade_tick: Duration::from_millis(50),
            },
            playlist: PlaylistConfig {
                shuffle_seed: Some(42), // Fixed seed for reproducible tests
            },
            controls: ControlsConfig {
                hide_after_enter: Duration::from_secs(1),
                hide_after_activity: Duration::from_millis(500),
            },
        }
    }

    /// Validates timing and volume settings.
    ///
    /// # Errors
    /// - `ConfigError::ZeroFadeTick` - Fade tick interval of zero
    /// - `ConfigError::ZeroVolumeStep` - Non-positive volume step
    /// - `ConfigError::VolumeOutOfRange` - Initial volume outside 0.0..=1.0
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.playback.fade_tick.is_zero() {
            return Err(ConfigError::ZeroFadeTick);
        }
        if self.playback.volume_step <= 0.0 {
            return Err(ConfigError::ZeroVolumeStep);
        }
        let volume = self.playback.initial_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(ConfigError::VolumeOutOfRange { volume });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_values() {
        let config = ReverieConfig::default();

        assert_eq!(config.playback.initial_volume, 0.7);
        assert_eq!(config.playback.volume_step, 0.1);
        assert_eq!(config.playback.fade_duration, Duration::from_secs(1));
        assert_eq!(config.playback.fade_tick, Duration::from_millis(50));
        assert_eq!(config.playlist.shuffle_seed, None);
        assert_eq!(config.controls.hide_after_enter, Duration::from_secs(4));
        assert_eq!(config.controls.hide_after_activity, Duration::from_secs(3));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_testing_preset_is_valid_and_seeded() {
        let config = ReverieConfig::for_testing();

        assert!(config.validate().is_ok());
        assert_eq!(config.playlist.shuffle_seed, Some(42));
        assert!(config.playback.fade_duration < Duration::from_secs(1));
        assert!(config.controls.hide_after_activity < Duration::from_secs(1));
    }

    #[test]
    fn test_validate_rejects_zero_fade_tick() {
        let mut config = ReverieConfig::default();
        config.playback.fade_tick = Duration::ZERO;

        assert_eq!(config.validate(), Err(ConfigError::ZeroFadeTick));
    }

    #[test]
    fn test_validate_rejects_bad_volume_settings() {
        let mut config = ReverieConfig::default();
        config.playback.volume_step = 0.0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroVolumeStep));

        let mut config = ReverieConfig::default();
        config.playback.initial_volume = 1.5;
        assert_eq!(
            config.validate(),
            Err(ConfigError::VolumeOutOfRange { volume: 1.5 })
        );
    }

    #[test]
    fn test_env_override() {
        unsafe {
            std::env::set_var("REVERIE_INITIAL_VOLUME", "0.4");
            std::env::set_var("REVERIE_SHUFFLE_SEED", "12345");
            std::env::set_var("REVERIE_FADE_MS", "250");
        }

        let config = ReverieConfig::from_env();

        assert_eq!(config.playback.initial_volume, 0.4);
        assert_eq!(config.playlist.shuffle_seed, Some(12345));
        assert_eq!(config.playback.fade_duration, Duration::from_millis(250));

        // Cleanup
        unsafe {
            std::env::remove_var("REVERIE_INITIAL_VOLUME");
            std::env::remove_var("REVERIE_SHUFFLE_SEED");
            std::env::remove_var("REVERIE_FADE_MS");
        }
    }
}
