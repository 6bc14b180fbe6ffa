//! CLI command handlers.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Subcommand;
use reverie_core::media::{SimulatedMediaConfig, SimulatedPipeline};
use reverie_core::session::ControlIntent;
use reverie_core::{MediaLibrary, ReverieConfig, SessionHandle, spawn_session};

#[derive(Subcommand)]
pub enum Commands {
    /// Run a scripted session against simulated media
    Demo {
        /// Media manifest file (JSON); built-in demo library when omitted
        #[arg(short, long)]
        manifest: Option<PathBuf>,

        /// Shuffle seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,

        /// Seconds between scripted steps
        #[arg(long, default_value = "2")]
        step_secs: u64,
    },
    /// List the tracks and videos a manifest provides
    Tracks {
        /// Media manifest file (JSON); built-in demo library when omitted
        #[arg(short, long)]
        manifest: Option<PathBuf>,
    },
    /// Write a starter manifest to edit
    Init {
        /// Output path for the manifest
        #[arg(short, long, default_value = "reverie.json")]
        output: PathBuf,
    },
}

/// Dispatches a parsed subcommand.
///
/// # Errors
/// - Manifest file unreadable or malformed
/// - Session startup failure
pub async fn handle_command(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Demo {
            manifest,
            seed,
            step_secs,
        } => run_demo(manifest.as_deref(), seed, step_secs).await,
        Commands::Tracks { manifest } => list_tracks(manifest.as_deref()).await,
        Commands::Init { output } => write_starter_manifest(&output).await,
    }
}

/// Runs a scripted session over simulated pipelines, printing one status
/// line after each step.
///
/// # Errors
/// - Manifest file unreadable or malformed
/// - Session startup failure
pub async fn run_demo(
    manifest: Option<&Path>,
    seed: Option<u64>,
    step_secs: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let library = load_library(manifest).await?;

    let mut config = ReverieConfig::default();
    config.playlist.shuffle_seed = seed;

    println!("Reverie demo session");
    println!("{:-<60}", "");
    println!(
        "Tracks: {}  Videos: {}",
        library.track_count(),
        library.video_count()
    );
    println!();

    // Short simulated tracks so the demo hits a natural track end.
    let track_length = Duration::from_secs((step_secs * 3).max(1));
    let audio = SimulatedPipeline::new(SimulatedMediaConfig {
        track_length,
        ..SimulatedMediaConfig::default()
    });
    let video = SimulatedPipeline::new(SimulatedMediaConfig::looping_video());

    let session = spawn_session(config, library, audio, video)?;
    let step = Duration::from_secs(step_secs);

    session.enter().await?;
    print_step(&session, "entered").await?;

    let script: Vec<(&str, ControlIntent)> = vec![
        ("next track", ControlIntent::NextTrack),
        ("toggle shuffle", ControlIntent::ToggleShuffle),
        ("next track", ControlIntent::NextTrack),
        ("volume up", ControlIntent::VolumeUp),
        ("mute", ControlIntent::ToggleMute),
        ("unmute", ControlIntent::ToggleMute),
        ("previous track", ControlIntent::PreviousTrack),
        ("pause", ControlIntent::TogglePlayPause),
        ("resume", ControlIntent::TogglePlayPause),
    ];

    for (label, intent) in script {
        tokio::time::sleep(step).await;
        session.intent(intent);
        session.activity();
        print_step(&session, label).await?;
    }

    tokio::time::sleep(step).await;
    let video_index = session.switch_video().await?;
    print_step(&session, &format!("switch video -> {}", video_index + 1)).await?;

    session.shutdown().await?;
    println!();
    println!("Demo complete");
    Ok(())
}

/// Prints the tracks and videos of a manifest, or of the demo library.
///
/// # Errors
/// - Manifest file unreadable or malformed
pub async fn list_tracks(manifest: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let library = load_library(manifest).await?;

    println!("Tracks ({}):", library.track_count());
    println!("{:-<60}", "");
    for (index, track) in library.tracks().iter().enumerate() {
        println!("{:>3}. {track}", index + 1);
    }

    println!();
    println!("Videos ({}):", library.video_count());
    println!("{:-<60}", "");
    for (index, video) in library.videos().iter().enumerate() {
        println!("{:>3}. {video}", index + 1);
    }
    Ok(())
}

/// Writes the demo library as a starter manifest.
///
/// # Errors
/// - Output path not writable
pub async fn write_starter_manifest(output: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let manifest = MediaLibrary::demo().to_manifest_json()?;
    tokio::fs::write(output, manifest).await?;

    println!("Starter manifest written to {}", output.display());
    println!("Edit the track and video lists, then run:");
    println!("  reverie demo --manifest {}", output.display());
    Ok(())
}

async fn load_library(manifest: Option<&Path>) -> Result<MediaLibrary, Box<dyn std::error::Error>> {
    match manifest {
        Some(path) => {
            let contents = tokio::fs::read_to_string(path).await?;
            Ok(MediaLibrary::from_json(&contents)?)
        }
        None => Ok(MediaLibrary::demo()),
    }
}

async fn print_step(
    session: &SessionHandle,
    action: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = session.snapshot().await?;
    let state = if snapshot.playing { "playing" } else { "paused" };

    let mut flags = String::new();
    if snapshot.muted {
        flags.push_str(" [muted]");
    }
    if snapshot.shuffled {
        flags.push_str(" [shuffle]");
    }
    if snapshot.fading {
        flags.push_str(" [fading]");
    }

    // The queue wraps, so a single-track library is its own up-next.
    let next_track = snapshot
        .upcoming
        .get(1)
        .copied()
        .unwrap_or(snapshot.current_track);

    println!(
        "[{state}] track {}/{} (next {}, video {}/{}) vol {:.2}{flags} - {action}",
        snapshot.current_track.as_usize() + 1,
        snapshot.track_count,
        next_track.as_usize() + 1,
        snapshot.current_video + 1,
        snapshot.video_count,
        snapshot.volume,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_load_library_defaults_to_demo() {
        let library = load_library(None).await.unwrap();
        assert_eq!(library.track_count(), MediaLibrary::demo().track_count());
    }

    #[tokio::test]
    async fn test_starter_manifest_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reverie.json");

        write_starter_manifest(&path).await.unwrap();
        let library = load_library(Some(&path)).await.unwrap();

        assert_eq!(library.track_count(), MediaLibrary::demo().track_count());
        assert_eq!(library.video_count(), MediaLibrary::demo().video_count());
    }

    #[tokio::test]
    async fn test_list_tracks_accepts_demo_library() {
        list_tracks(None).await.unwrap();
    }

    #[tokio::test]
    async fn test_demo_completes_with_zero_step_delay() {
        run_demo(None, Some(1), 0).await.unwrap();
    }
}
