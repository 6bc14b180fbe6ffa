//! Mock implementations for testing the ambient session.
//!
//! [`ScriptedPipeline`] records every call it receives and only emits
//! lifecycle signals when told to, so tests control exactly which events
//! reach the session and when. Clones share state, letting a test keep a
//! probe while the session owns the pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::media::{
    MediaError, MediaPipeline, MediaSignal, MediaSource, ResourceKind, ResourceSignal,
    SignalSender, Transport,
};

#[derive(Debug, Default)]
struct ScriptedState {
    transport: Transport,
    start_calls: u32,
    stop_calls: u32,
    loads: Vec<MediaSource>,
    preloads: Vec<MediaSource>,
    gains: Vec<f64>,
    mutes: Vec<bool>,
    rejections_left: u32,
}

/// Recording mock pipeline with optional scripted signal emission.
#[derive(Debug, Clone)]
pub struct ScriptedPipeline {
    state: Arc<Mutex<ScriptedState>>,
    binding: Arc<Mutex<Option<(ResourceKind, SignalSender)>>>,
    emit_started: bool,
    emit_ready_on_load: bool,
}

impl ScriptedPipeline {
    /// Mock that records calls and emits no signals on its own.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptedState::default())),
            binding: Arc::new(Mutex::new(None)),
            emit_started: false,
            emit_ready_on_load: false,
        }
    }

    /// Mock that rejects the first `count` start attempts.
    pub fn new_with_start_rejections(count: u32) -> Self {
        let pipeline = Self::new();
        pipeline.state.lock().rejections_left = count;
        pipeline
    }

    /// Mock that emits `Started` on start and `ReadyToPlay` on load,
    /// like a pipeline with instantly available media.
    pub fn new_with_auto_signals() -> Self {
        Self {
            emit_started: true,
            emit_ready_on_load: true,
            ..Self::new()
        }
    }

    /// Emits a lifecycle signal as if the underlying media produced it.
    pub fn emit_signal(&self, signal: MediaSignal) {
        if let Some((resource, sender)) = self.binding.lock().as_ref() {
            let _ = sender.send(ResourceSignal {
                resource: *resource,
                signal,
            });
        }
    }

    pub fn start_calls(&self) -> u32 {
        self.state.lock().start_calls
    }

    pub fn stop_calls(&self) -> u32 {
        self.state.lock().stop_calls
    }

    pub fn loaded_sources(&self) -> Vec<MediaSource> {
        self.state.lock().loads.clone()
    }

    pub fn preloaded_sources(&self) -> Vec<MediaSource> {
        self.state.lock().preloads.clone()
    }

    pub fn gain_history(&self) -> Vec<f64> {
        self.state.lock().gains.clone()
    }

    pub fn mute_history(&self) -> Vec<bool> {
        self.state.lock().mutes.clone()
    }
}

impl Default for ScriptedPipeline {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MediaPipeline for ScriptedPipeline {
    fn bind_signals(&mut self, resource: ResourceKind, signals: SignalSender) {
        *self.binding.lock() = Some((resource, signals));
    }

    async fn load(&mut self, source: &MediaSource) {
        {
            let mut state = self.state.lock();
            state.loads.push(source.clone());
            state.transport = Transport::Paused;
        }
        if self.emit_ready_on_load {
            self.emit_signal(MediaSignal::ReadyToPlay);
        }
    }

    async fn preload(&mut self, source: &MediaSource) {
        self.state.lock().preloads.push(source.clone());
    }

    async fn start(&mut self) -> Result<(), MediaError> {
        {
            let mut state = self.state.lock();
            state.start_calls += 1;
            if state.rejections_left > 0 {
                state.rejections_left -= 1;
                return Err(MediaError::StartRejected {
                    reason: "scripted rejection".to_string(),
                });
            }
            state.transport = Transport::Playing;
        }
        if self.emit_started {
            self.emit_signal(MediaSignal::Started);
        }
        Ok(())
    }

    async fn stop(&mut self) {
        let mut state = self.state.lock();
        state.stop_calls += 1;
        state.transport = Transport::Paused;
    }

    async fn set_gain(&mut self, gain: f64) {
        self.state.lock().gains.push(gain);
    }

    async fn set_muted(&mut self, muted: bool) {
        self.state.lock().mutes.push(muted);
    }

    fn transport(&self) -> Transport {
        self.state.lock().transport
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test]
    async fn test_scripted_pipeline_records_calls() {
        let mut pipeline = ScriptedPipeline::new();

        pipeline.load(&MediaSource::new("/audio/a.mp3")).await;
        pipeline.start().await.unwrap();
        pipeline.set_gain(0.5).await;
        pipeline.stop().await;

        assert_eq!(pipeline.loaded_sources().len(), 1);
        assert_eq!(pipeline.start_calls(), 1);
        assert_eq!(pipeline.stop_calls(), 1);
        assert_eq!(pipeline.gain_history(), vec![0.5]);
        assert_eq!(pipeline.transport(), Transport::Paused);
    }

    #[tokio::test]
    async fn test_clones_share_recorded_state() {
        let mut pipeline = ScriptedPipeline::new();
        let probe = pipeline.clone();

        pipeline.start().await.unwrap();

        assert_eq!(probe.start_calls(), 1);
        assert_eq!(probe.transport(), Transport::Playing);
    }

    #[tokio::test]
    async fn test_rejections_then_success() {
        let mut pipeline = ScriptedPipeline::new_with_start_rejections(2);
        pipeline.load(&MediaSource::new("/audio/a.mp3")).await;

        assert!(pipeline.start().await.is_err());
        assert!(pipeline.start().await.is_err());
        assert_eq!(pipeline.transport(), Transport::Paused);

        pipeline.start().await.unwrap();
        assert_eq!(pipeline.transport(), Transport::Playing);
        assert_eq!(pipeline.start_calls(), 3);
    }

    #[tokio::test]
    async fn test_auto_signals_reach_bound_channel() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut pipeline = ScriptedPipeline::new_with_auto_signals();
        pipeline.bind_signals(ResourceKind::Audio, tx);

        pipeline.load(&MediaSource::new("/audio/a.mp3")).await;
        pipeline.start().await.unwrap();

        assert_eq!(rx.recv().await.unwrap().signal, MediaSignal::ReadyToPlay);
        assert_eq!(rx.recv().await.unwrap().signal, MediaSignal::Started);
    }
}
