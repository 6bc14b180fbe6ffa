//! Deterministic simulated media pipeline.
//!
//! Stands in for a real playback surface by emitting the same lifecycle
//! signals on timers: `ReadyToPlay` after a buffering delay, `Ended` when
//! the simulated track length runs out. Under a paused tokio clock the
//! timings are exact, which integration tests rely on.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep};

use super::{
    MediaError, MediaPipeline, MediaSignal, MediaSource, ResourceKind, ResourceSignal,
    SignalSender, Transport,
};

/// Timing and behavior knobs for a simulated pipeline.
#[derive(Debug, Clone)]
pub struct SimulatedMediaConfig {
    /// Delay between `load` and the `ReadyToPlay` signal.
    pub buffering_delay: Duration,
    /// Play time before a non-looping source emits `Ended`.
    pub track_length: Duration,
    /// Looping sources play until stopped and never emit `Ended`.
    pub looping: bool,
    /// Number of `start` calls to reject before accepting one.
    pub start_rejections: u32,
}

impl Default for SimulatedMediaConfig {
    fn default() -> Self {
        Self {
            buffering_delay: Duration::from_millis(150),
            track_length: Duration::from_secs(12),
            looping: false,
            start_rejections: 0,
        }
    }
}

impl SimulatedMediaConfig {
    /// Preset for a background video surface: loops until stopped.
    pub fn looping_video() -> Self {
        Self {
            looping: true,
            ..Self::default()
        }
    }

    /// Preset that rejects the first `count` start attempts.
    ///
    /// Models a browser autoplay policy refusing playback until the
    /// environment allows it.
    pub fn with_start_rejections(count: u32) -> Self {
        Self {
            start_rejections: count,
            ..Self::default()
        }
    }
}

/// Simulated playback surface driven by tokio timers.
///
/// Tracks how much play time the bound source has left across stop and
/// restart, so a track stopped halfway resumes with half its length
/// remaining rather than starting its clock over.
#[derive(Debug)]
pub struct SimulatedPipeline {
    config: SimulatedMediaConfig,
    binding: Option<(ResourceKind, SignalSender)>,
    source: Option<MediaSource>,
    transport: Arc<Mutex<Transport>>,
    gain: f64,
    muted: bool,
    remaining: Duration,
    started_at: Option<Instant>,
    rejections_left: u32,
    ready_task: Option<JoinHandle<()>>,
    ended_task: Option<JoinHandle<()>>,
}

impl SimulatedPipeline {
    /// Creates an idle pipeline with no source bound.
    pub fn new(config: SimulatedMediaConfig) -> Self {
        let remaining = config.track_length;
        let rejections_left = config.start_rejections;
        Self {
            config,
            binding: None,
            source: None,
            transport: Arc::new(Mutex::new(Transport::Paused)),
            gain: 1.0,
            muted: false,
            remaining,
            started_at: None,
            rejections_left,
            ready_task: None,
            ended_task: None,
        }
    }

    /// Current output gain.
    pub fn gain(&self) -> f64 {
        self.gain
    }

    /// Whether output is muted.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Source currently bound, if any.
    pub fn current_source(&self) -> Option<&MediaSource> {
        self.source.as_ref()
    }

    fn emit(&self, signal: MediaSignal) {
        if let Some((resource, sender)) = &self.binding {
            let _ = sender.send(ResourceSignal {
                resource: *resource,
                signal,
            });
        }
    }

    fn cancel_pending_signals(&mut self) {
        if let Some(task) = self.ready_task.take() {
            task.abort();
        }
        if let Some(task) = self.ended_task.take() {
            task.abort();
        }
    }
}

#[async_trait]
impl MediaPipeline for SimulatedPipeline {
    fn bind_signals(&mut self, resource: ResourceKind, signals: SignalSender) {
        self.binding = Some((resource, signals));
    }

    async fn load(&mut self, source: &MediaSource) {
        self.cancel_pending_signals();
        *self.transport.lock() = Transport::Paused;
        self.started_at = None;
        self.remaining = self.config.track_length;
        self.source = Some(source.clone());
        tracing::debug!(%source, "simulated pipeline loading source");

        let delay = self.config.buffering_delay;
        let binding = self.binding.clone();
        self.ready_task = Some(tokio::spawn(async move {
            sleep(delay).await;
            if let Some((resource, sender)) = binding {
                let _ = sender.send(ResourceSignal {
                    resource,
                    signal: MediaSignal::ReadyToPlay,
                });
            }
        }));
    }

    async fn preload(&mut self, source: &MediaSource) {
        tracing::trace!(%source, "simulated pipeline preload hint");
    }

    async fn start(&mut self) -> Result<(), MediaError> {
        if self.source.is_none() {
            return Err(MediaError::NoSourceBound);
        }

        if self.rejections_left > 0 {
            self.rejections_left -= 1;
            tracing::debug!(
                rejections_left = self.rejections_left,
                "simulated pipeline rejecting start"
            );
            return Err(MediaError::StartRejected {
                reason: "simulated autoplay policy".to_string(),
            });
        }

        if let Some(task) = self.ended_task.take() {
            task.abort();
        }
        *self.transport.lock() = Transport::Playing;
        self.started_at = Some(Instant::now());
        self.emit(MediaSignal::Started);

        if !self.config.looping {
            let remaining = self.remaining;
            let transport = Arc::clone(&self.transport);
            let binding = self.binding.clone();
            self.ended_task = Some(tokio::spawn(async move {
                sleep(remaining).await;
                *transport.lock() = Transport::Paused;
                if let Some((resource, sender)) = binding {
                    let _ = sender.send(ResourceSignal {
                        resource,
                        signal: MediaSignal::Ended,
                    });
                }
            }));
        }

        Ok(())
    }

    async fn stop(&mut self) {
        if let Some(task) = self.ended_task.take() {
            task.abort();
        }
        if let Some(started) = self.started_at.take() {
            self.remaining = self.remaining.saturating_sub(started.elapsed());
        }
        *self.transport.lock() = Transport::Paused;
        tracing::debug!(
            remaining_ms = self.remaining.as_millis() as u64,
            "simulated pipeline stopped"
        );
    }

    async fn set_gain(&mut self, gain: f64) {
        self.gain = gain;
        tracing::trace!(gain, "simulated pipeline gain changed");
    }

    async fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        tracing::trace!(muted, "simulated pipeline mute changed");
    }

    fn transport(&self) -> Transport {
        *self.transport.lock()
    }
}

impl Drop for SimulatedPipeline {
    fn drop(&mut self) {
        self.cancel_pending_signals();
    }
}
