//! Logging initialization shared by every Reverie binary.
//!
//! Sessions are driven by timers, so most problems only make sense as a
//! timeline. Console output stays at whatever level the user asked for,
//! while a full trace of the run is written to disk and overwritten on
//! the next start.

use std::fs::{File, create_dir_all};
use std::path::Path;

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

/// Debug log for the most recent run, inside the logs directory.
const LOG_FILE_NAME: &str = "reverie-last-run.log";

/// Installs the global subscriber: console events at `console_level`, the
/// full trace of the run at `<logs_dir>/reverie-last-run.log` (`./logs`
/// when no directory is given).
///
/// A `RUST_LOG` value in the environment overrides the console filter.
///
/// # Errors
///
/// - `Box<dyn std::error::Error>` - If the logs directory or the log file
///   cannot be created
pub fn init_tracing(
    console_level: Level,
    logs_dir: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let logs_path = logs_dir.unwrap_or_else(|| Path::new("logs"));
    create_dir_all(logs_path)?;

    let log_file_path = logs_path.join(LOG_FILE_NAME);
    let log_file = File::create(&log_file_path)?;

    // The console shares the terminal with session output, so keep it bare.
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(console_level.to_string()));
    let console_layer = fmt::layer()
        .with_target(false)
        .with_filter(console_filter);

    // The file keeps everything, including the stale-timer drops that are
    // only logged at trace.
    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(log_file)
        .with_filter(EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    tracing::info!(%console_level, log_file = %log_file_path.display(), "tracing initialized");

    Ok(())
}

/// Console verbosity choices exposed on the command line.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliLogLevel {
    /// Errors only
    Error,
    /// Errors and warnings
    Warn,
    /// Session lifecycle events
    Info,
    /// Every state change
    Debug,
    /// Everything, including dropped stale timers
    Trace,
}

impl CliLogLevel {
    /// Converts the CLI choice to the tracing level it stands for.
    ///
    /// # Examples
    /// ```
    /// use reverie_core::tracing_setup::CliLogLevel;
    ///
    /// assert_eq!(CliLogLevel::Info.as_tracing_level(), tracing::Level::INFO);
    /// ```
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            CliLogLevel::Error => "error",
            CliLogLevel::Warn => "warn",
            CliLogLevel::Info => "info",
            CliLogLevel::Debug => "debug",
            CliLogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_writes_debug_log_file() {
        let dir = tempfile::tempdir().unwrap();

        // Quiet console so parallel tests stay readable; the file layer
        // still records everything.
        init_tracing(Level::ERROR, Some(dir.path())).unwrap();
        tracing::debug!("log file smoke entry");

        let log_path = dir.path().join(LOG_FILE_NAME);
        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(contents.contains("log file smoke entry"));
    }

    #[test]
    fn test_log_level_maps_to_tracing_level() {
        assert_eq!(CliLogLevel::Error.as_tracing_level(), Level::ERROR);
        assert_eq!(CliLogLevel::Warn.as_tracing_level(), Level::WARN);
        assert_eq!(CliLogLevel::Info.as_tracing_level(), Level::INFO);
        assert_eq!(CliLogLevel::Debug.as_tracing_level(), Level::DEBUG);
        assert_eq!(CliLogLevel::Trace.as_tracing_level(), Level::TRACE);
    }

    #[test]
    fn test_log_level_display_renders_lowercase() {
        // clap renders the default with Display, so the text has to match
        // a value-enum name exactly.
        assert_eq!(CliLogLevel::Info.to_string(), "info");
        assert_eq!(CliLogLevel::Trace.to_string(), "trace");
    }
}
