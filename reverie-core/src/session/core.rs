//! Core session state machine.
//!
//! [`AmbientSession`] owns both pipelines and all playback bookkeeping:
//! playlist cursor, video rotation, fade ramp, and control overlay
//! visibility. The actor loop drives it one event at a time, so none of this
//! state needs synchronization.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval, sleep};

use crate::ReverieError;
use crate::config::ReverieConfig;
use crate::media::{
    MediaLibrary, MediaPipeline, MediaSignal, ResourceKind, ResourceSignal, SignalSender,
    Transport,
};
use crate::playlist::{PlaylistSequencer, TrackIndex};
use crate::rotation::VideoRotation;
use crate::session::commands::{ControlIntent, SessionSnapshot, TimerFire};
use crate::session::fade::FadeRamp;

/// Audio playback state as requested by the user.
///
/// `playing` is intent, not transport. It stays true while a rejected or
/// still-buffering start keeps a pipeline paused; the session retries from
/// lifecycle signals until the pipelines catch up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    pub playing: bool,
    pub muted: bool,
    pub volume: f64,
}

/// The session state machine, generic over its two playback surfaces.
pub struct AmbientSession<A, V> {
    config: ReverieConfig,
    library: MediaLibrary,
    audio: A,
    video: V,
    state: PlaybackState,
    sequencer: PlaylistSequencer,
    rotation: VideoRotation,
    entered: bool,
    controls_visible: bool,
    fade: Option<FadeRamp>,
    fade_generation: u64,
    fade_task: Option<JoinHandle<()>>,
    hide_generation: u64,
    hide_task: Option<JoinHandle<()>>,
    timer_tx: mpsc::UnboundedSender<TimerFire>,
}

impl<A: MediaPipeline, V: MediaPipeline> AmbientSession<A, V> {
    /// Creates a session over the given library and pipelines.
    ///
    /// Binds both pipelines to the signal channel the actor listens on.
    /// Timer tasks report back through `timer_tx`.
    ///
    /// # Errors
    /// - `ReverieError::Playlist` - Library with no tracks
    /// - `ReverieError::Rotation` - Library with no videos
    pub fn new(
        config: ReverieConfig,
        library: MediaLibrary,
        mut audio: A,
        mut video: V,
        signal_tx: SignalSender,
        timer_tx: mpsc::UnboundedSender<TimerFire>,
    ) -> Result<Self, ReverieError> {
        let sequencer =
            PlaylistSequencer::new(library.track_count(), config.playlist.shuffle_seed)?;
        let rotation = VideoRotation::new(library.video_count())?;

        audio.bind_signals(ResourceKind::Audio, signal_tx.clone());
        video.bind_signals(ResourceKind::Video, signal_tx);

        let state = PlaybackState {
            playing: false,
            muted: false,
            volume: config.playback.initial_volume,
        };

        Ok(Self {
            config,
            library,
            audio,
            video,
            state,
            sequencer,
            rotation,
            entered: false,
            controls_visible: false,
            fade: None,
            fade_generation: 0,
            fade_task: None,
            hide_generation: 0,
            hide_task: None,
            timer_tx,
        })
    }

    /// Binds the initial track and video without starting playback.
    pub async fn initialize(&mut self) {
        let track = self.library.tracks()[self.sequencer.current().as_usize()].clone();
        self.audio.load(&track).await;
        self.audio.set_gain(self.state.volume).await;
        self.audio.set_muted(self.state.muted).await;

        let video_source = self.library.videos()[self.rotation.current()].clone();
        self.video.load(&video_source).await;
        // The background video never carries sound.
        self.video.set_muted(true).await;
        if self.rotation.video_count() > 1 {
            let upcoming = self.library.videos()[self.rotation.next_index()].clone();
            self.video.preload(&upcoming).await;
        }

        tracing::debug!(
            tracks = self.library.track_count(),
            videos = self.library.video_count(),
            volume = self.state.volume,
            "session initialized"
        );
    }

    /// Handles the entry gesture: starts playback and reveals the controls.
    ///
    /// Only the first entry does anything; the session cannot be re-entered.
    pub async fn enter(&mut self) {
        if self.entered {
            tracing::debug!("enter ignored; session already entered");
            return;
        }
        self.entered = true;
        tracing::info!("session entered");

        self.play().await;
        self.show_controls(self.config.controls.hide_after_enter);
    }

    /// Requests playback on both surfaces.
    ///
    /// Pipelines already rendering are left alone. A rejected start is
    /// logged and swallowed; the playing intent stands and lifecycle
    /// signals retry later.
    pub async fn play(&mut self) {
        if self.video.transport() == Transport::Paused {
            if let Err(error) = self.video.start().await {
                tracing::debug!(%error, "video start rejected; keeping playing intent");
            }
        }
        if self.audio.transport() == Transport::Paused {
            if let Err(error) = self.audio.start().await {
                tracing::debug!(%error, "audio start rejected; keeping playing intent");
            }
        }
        self.state.playing = true;
    }

    /// Halts both surfaces, skipping ones already paused.
    pub async fn pause(&mut self) {
        if self.audio.transport() == Transport::Playing {
            self.audio.stop().await;
        }
        if self.video.transport() == Transport::Playing {
            self.video.stop().await;
        }
        self.state.playing = false;
    }

    pub async fn toggle_play_pause(&mut self) {
        if self.state.playing {
            self.pause().await;
        } else {
            self.play().await;
        }
    }

    /// Sets the requested volume, clamped to `0.0..=1.0`.
    ///
    /// During a fade-in the new volume is recorded but not applied; the
    /// ramp finishes toward its original target and the completion step
    /// re-syncs gain to the latest request.
    pub async fn set_volume(&mut self, volume: f64) {
        let volume = volume.clamp(0.0, 1.0);
        self.state.volume = volume;

        if self.fade.is_some() {
            tracing::debug!(volume, "volume change deferred until fade completes");
            return;
        }
        self.audio.set_gain(volume).await;
    }

    /// Mutes or unmutes audio, deferring during a fade like `set_volume`.
    pub async fn set_muted(&mut self, muted: bool) {
        self.state.muted = muted;

        if self.fade.is_some() {
            tracing::debug!(muted, "mute change deferred until fade completes");
            return;
        }
        self.audio.set_muted(muted).await;
    }

    /// Applies a keyboard-style control intent.
    ///
    /// Ignored until the session has been entered.
    pub async fn apply_intent(&mut self, intent: ControlIntent) {
        if !self.entered {
            tracing::debug!(?intent, "intent ignored before session entry");
            return;
        }

        match intent {
            ControlIntent::TogglePlayPause => self.toggle_play_pause().await,
            ControlIntent::VolumeUp => {
                self.set_volume(self.state.volume + self.config.playback.volume_step)
                    .await;
            }
            ControlIntent::VolumeDown => {
                self.set_volume(self.state.volume - self.config.playback.volume_step)
                    .await;
            }
            ControlIntent::NextTrack => {
                self.next_track().await;
            }
            ControlIntent::PreviousTrack => {
                self.previous_track().await;
            }
            ControlIntent::ToggleMute => self.set_muted(!self.state.muted).await,
            ControlIntent::ToggleShuffle => self.set_shuffled(!self.sequencer.is_shuffled()),
        }
    }

    /// Steps the playlist forward and rebinds the audio source.
    pub async fn next_track(&mut self) -> TrackIndex {
        let index = self.sequencer.next();
        self.change_track(index).await;
        index
    }

    /// Steps the playlist backward and rebinds the audio source.
    pub async fn previous_track(&mut self) -> TrackIndex {
        let index = self.sequencer.previous();
        self.change_track(index).await;
        index
    }

    /// Switches traversal order; the current track keeps playing.
    pub fn set_shuffled(&mut self, enabled: bool) {
        self.sequencer.set_shuffled(enabled);
    }

    /// Draws a fresh shuffled order; the current track keeps playing.
    pub fn reshuffle(&mut self) {
        self.sequencer.reshuffle();
    }

    /// Rotates to the next background video and warms up the one after.
    pub async fn switch_video(&mut self) -> usize {
        let index = self.rotation.advance();
        let source = self.library.videos()[index].clone();
        tracing::debug!(video = index, %source, "switching video");

        self.video.load(&source).await;
        if self.rotation.video_count() > 1 {
            let upcoming = self.library.videos()[self.rotation.next_index()].clone();
            self.video.preload(&upcoming).await;
        }
        index
    }

    /// Keeps the controls visible after pointer or key activity.
    pub fn activity(&mut self) {
        if !self.entered {
            return;
        }
        self.show_controls(self.config.controls.hide_after_activity);
    }

    /// Reacts to a pipeline lifecycle signal.
    pub async fn handle_signal(&mut self, signal: ResourceSignal) {
        match (signal.resource, signal.signal) {
            (ResourceKind::Audio, MediaSignal::Started) => {
                tracing::debug!("audio playback started; beginning fade-in");
                self.begin_fade().await;
            }
            (ResourceKind::Audio, MediaSignal::ReadyToPlay) => {
                self.resume_if_intended(ResourceKind::Audio).await;
            }
            (ResourceKind::Audio, MediaSignal::Ended) => {
                let index = self.sequencer.advance();
                tracing::debug!(next = %index, "track ended; advancing playlist");
                self.change_track(index).await;
            }
            (ResourceKind::Video, MediaSignal::Started) => {
                tracing::trace!("video playback started");
            }
            (ResourceKind::Video, MediaSignal::ReadyToPlay)
            | (ResourceKind::Video, MediaSignal::Ended) => {
                self.resume_if_intended(ResourceKind::Video).await;
            }
        }
    }

    /// Reacts to a timer firing, dropping stale generations.
    pub async fn handle_timer(&mut self, fire: TimerFire) {
        match fire {
            TimerFire::FadeTick { generation } => {
                if generation != self.fade_generation {
                    tracing::trace!(generation, "stale fade tick dropped");
                    return;
                }
                self.fade_step().await;
            }
            TimerFire::HideControls { generation } => {
                if generation != self.hide_generation {
                    tracing::trace!(generation, "stale hide timer dropped");
                    return;
                }
                if self.controls_visible {
                    self.controls_visible = false;
                    tracing::debug!("controls hidden after inactivity");
                }
            }
        }
    }

    /// Current state of everything a renderer needs.
    pub fn snapshot(&self) -> SessionSnapshot {
        let current_track = self.sequencer.current();
        SessionSnapshot {
            playing: self.state.playing,
            muted: self.state.muted,
            volume: self.state.volume,
            entered: self.entered,
            controls_visible: self.controls_visible,
            shuffled: self.sequencer.is_shuffled(),
            current_track,
            track_source: self.library.tracks()[current_track.as_usize()].clone(),
            track_count: self.library.track_count(),
            upcoming: self.sequencer.upcoming(),
            current_video: self.rotation.current(),
            video_count: self.rotation.video_count(),
            fading: self.fade.is_some(),
            audio_transport: self.audio.transport(),
            video_transport: self.video.transport(),
        }
    }

    /// Stops playback and cancels outstanding timers before the actor exits.
    pub async fn teardown(&mut self) {
        self.cancel_fade();
        if let Some(task) = self.hide_task.take() {
            task.abort();
        }
        self.audio.stop().await;
        self.video.stop().await;
        self.state.playing = false;
        tracing::debug!("session torn down");
    }

    /// Rebinds the audio pipeline to a new track.
    ///
    /// The restart is deferred: once the new source reports `ReadyToPlay`,
    /// `resume_if_intended` starts it if the session still means to play.
    async fn change_track(&mut self, index: TrackIndex) {
        let source = self.library.tracks()[index.as_usize()].clone();
        tracing::debug!(
            track = %index,
            %source,
            resume = self.state.playing,
            "changing track"
        );
        self.audio.load(&source).await;
    }

    /// Starts a paused pipeline if the session intends to be playing.
    async fn resume_if_intended(&mut self, resource: ResourceKind) {
        if !self.state.playing {
            return;
        }
        match resource {
            ResourceKind::Audio => {
                if self.audio.transport() == Transport::Paused {
                    if let Err(error) = self.audio.start().await {
                        tracing::debug!(%error, "deferred audio start rejected; keeping playing intent");
                    }
                }
            }
            ResourceKind::Video => {
                if self.video.transport() == Transport::Paused {
                    if let Err(error) = self.video.start().await {
                        tracing::debug!(%error, "deferred video start rejected; keeping playing intent");
                    }
                }
            }
        }
    }

    /// Begins the fade-in ramp toward the requested volume.
    ///
    /// Muted or zero-volume playback skips the ramp; the gain is applied
    /// directly and no ticker is spawned.
    async fn begin_fade(&mut self) {
        self.cancel_fade();

        if self.state.muted || self.state.volume <= 0.0 {
            self.audio.set_gain(self.state.volume).await;
            return;
        }

        let total_ticks = self.fade_tick_count();
        self.fade = Some(FadeRamp::new(self.state.volume, total_ticks));
        self.audio.set_gain(0.0).await;

        self.fade_generation += 1;
        let generation = self.fade_generation;
        let tick = self.config.playback.fade_tick;
        let timer_tx = self.timer_tx.clone();
        self.fade_task = Some(tokio::spawn(async move {
            let mut ticker = interval(tick);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first interval tick resolves immediately; the ramp starts
            // one tick period later.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                if timer_tx.send(TimerFire::FadeTick { generation }).is_err() {
                    break;
                }
            }
        }));

        tracing::debug!(
            target = self.state.volume,
            ticks = total_ticks,
            "fade-in started"
        );
    }

    /// Applies one fade tick; on completion re-syncs gain and mute to the
    /// latest requested state.
    async fn fade_step(&mut self) {
        let Some(ramp) = self.fade.as_mut() else {
            return;
        };
        let step = ramp.advance();

        if step.finished {
            self.cancel_fade();
            // Volume and mute requests made during the ramp apply here.
            self.audio.set_gain(self.state.volume).await;
            self.audio.set_muted(self.state.muted).await;
            tracing::debug!(volume = self.state.volume, "fade-in complete");
        } else {
            self.audio.set_gain(step.level).await;
        }
    }

    fn cancel_fade(&mut self) {
        self.fade = None;
        if let Some(task) = self.fade_task.take() {
            task.abort();
        }
    }

    fn fade_tick_count(&self) -> u32 {
        let duration_ms = self.config.playback.fade_duration.as_millis();
        let tick_ms = self.config.playback.fade_tick.as_millis().max(1);
        (duration_ms / tick_ms).max(1) as u32
    }

    /// Shows the controls and schedules an auto-hide.
    ///
    /// Bumping the generation invalidates any earlier hide timer still in
    /// flight, so fresh activity always restarts the full delay.
    fn show_controls(&mut self, hide_after: Duration) {
        self.controls_visible = true;
        self.hide_generation += 1;

        if let Some(task) = self.hide_task.take() {
            task.abort();
        }

        let generation = self.hide_generation;
        let timer_tx = self.timer_tx.clone();
        self.hide_task = Some(tokio::spawn(async move {
            sleep(hide_after).await;
            let _ = timer_tx.send(TimerFire::HideControls { generation });
        }));
    }
}
