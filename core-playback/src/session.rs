//! # Playback Session
//!
//! Single authority for what is playing and what plays next.
//!
//! ## Overview
//!
//! A [`PlaybackSession`] owns one playlist, one resume offset and one wrapped
//! [`PlaybackEngine`]. Every operation runs under one async mutex, including
//! the auto-advance triggered by the engine's completion signal, so the engine
//! only ever sees one command sequence at a time.
//!
//! ```text
//!  host/UI ──dispatch()──┐
//!                        ▼
//!  engine completion ─> [ state lock ] ─> engine calls ─> track/action streams
//!   (via listener)                                    └─> host surface refresh
//! ```
//!
//! ## Streams
//!
//! Two replay-latest streams report what happened: the track that became
//! current after every load, and the action applied by every successful
//! operation.
//!
//! ## Usage
//!
//! ```ignore
//! let session = PlaybackSession::new(engine, host, track_store, SessionSettings::default());
//! session.spawn_completion_listener();
//!
//! let mut actions = session.subscribe_action();
//! session.set_playlist(tracks, 0).await;
//! session.play().await?;
//! assert_eq!(actions.recv().await, Some(Action::Play));
//! ```

use crate::action::Action;
use crate::error::{PlaybackError, Result};
use crate::notification;
use crate::playlist::Playlist;
use crate::track::Track;
use bridge_traits::{ActionIntent, HostLifecycle, PlaybackEngine, TrackStore};
use core_runtime::config::{CoreConfig, FeatureFlags, NotificationSettings};
use core_runtime::events::{ReplayLatest, Subscription};
use core_runtime::logging::strip_path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// No playlist yet.
    Idle,
    /// Playlist loaded, nothing playing.
    Ready,
    Playing,
    Paused,
    /// Closed by the user. State is kept for a later `play()`.
    Closed,
}

/// Behaviour and presentation settings for a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSettings {
    pub features: FeatureFlags,
    pub notification: NotificationSettings,
}

impl From<&CoreConfig> for SessionSettings {
    fn from(config: &CoreConfig) -> Self {
        Self {
            features: config.features,
            notification: config.notification.clone(),
        }
    }
}

#[derive(Debug)]
struct SessionState {
    playlist: Playlist,
    resume_position: Duration,
    status: SessionStatus,
}

/// The playback session core.
pub struct PlaybackSession {
    engine: Arc<dyn PlaybackEngine>,
    host: Arc<dyn HostLifecycle>,
    track_store: Arc<dyn TrackStore>,
    settings: SessionSettings,
    state: Mutex<SessionState>,
    track_stream: ReplayLatest<Arc<Track>>,
    action_stream: ReplayLatest<Action>,
    /// Bumped on every load so completions of an earlier source can be told apart.
    load_generation: Arc<AtomicU64>,
    completions: parking_lot::Mutex<Option<mpsc::UnboundedReceiver<u64>>>,
}

impl PlaybackSession {
    /// Create a session around `engine` and register its completion handler.
    ///
    /// Completion signals are queued until
    /// [`spawn_completion_listener`](Self::spawn_completion_listener) starts
    /// draining them.
    pub fn new(
        engine: Arc<dyn PlaybackEngine>,
        host: Arc<dyn HostLifecycle>,
        track_store: Arc<dyn TrackStore>,
        settings: SessionSettings,
    ) -> Arc<Self> {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let load_generation = Arc::new(AtomicU64::new(0));
        let fired_generation = Arc::clone(&load_generation);
        engine.set_completion_handler(Box::new(move || {
            // The receiver is gone once the session is dropped.
            let _ = completion_tx.send(fired_generation.load(Ordering::SeqCst));
        }));

        Arc::new(Self {
            engine,
            host,
            track_store,
            settings,
            state: Mutex::new(SessionState {
                playlist: Playlist::default(),
                resume_position: Duration::ZERO,
                status: SessionStatus::Idle,
            }),
            track_stream: ReplayLatest::new(),
            action_stream: ReplayLatest::new(),
            load_generation,
            completions: parking_lot::Mutex::new(Some(completion_rx)),
        })
    }

    /// Build a session from an assembled [`CoreConfig`].
    pub fn from_config(config: &CoreConfig) -> Arc<Self> {
        Self::new(
            Arc::clone(&config.engine),
            Arc::clone(&config.host),
            Arc::clone(&config.track_store),
            SessionSettings::from(config),
        )
    }

    /// Start the task that turns engine completion signals into auto-advance.
    ///
    /// Must be called from within a tokio runtime. Returns `None` if the
    /// listener was already started. The task holds only a weak reference and
    /// exits on the first signal after the session is dropped.
    pub fn spawn_completion_listener(self: &Arc<Self>) -> Option<JoinHandle<()>> {
        let Some(mut completions) = self.completions.lock().take() else {
            warn!("Completion listener already running");
            return None;
        };

        let weak: Weak<Self> = Arc::downgrade(self);
        Some(tokio::spawn(async move {
            while let Some(generation) = completions.recv().await {
                let Some(session) = weak.upgrade() else {
                    break;
                };
                session.complete_generation(generation).await;
            }
            debug!("Completion listener stopped");
        }))
    }

    // ========================================================================
    // Playlist
    // ========================================================================

    /// Replace the playlist and cursor. Does not start or stop playback.
    ///
    /// `start_index` is not validated; an invalid index fails on the next load.
    pub async fn set_playlist(&self, tracks: Vec<Arc<Track>>, start_index: usize) {
        let mut state = self.state.lock().await;
        let len = tracks.len();
        state.playlist.replace(tracks, start_index);

        state.status = match (state.status, len) {
            (SessionStatus::Playing | SessionStatus::Paused, _) => state.status,
            (_, 0) => SessionStatus::Idle,
            (_, _) => SessionStatus::Ready,
        };
        debug!(len, start_index, status = ?state.status, "Playlist replaced");
    }

    /// Track at the cursor.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::IndexOutOfRange`] when the playlist is empty or the
    /// cursor is invalid.
    pub async fn current_track(&self) -> Result<Arc<Track>> {
        self.state.lock().await.playlist.current()
    }

    pub async fn current_index(&self) -> usize {
        self.state.lock().await.playlist.index()
    }

    pub async fn playlist_len(&self) -> usize {
        self.state.lock().await.playlist.len()
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status
    }

    /// Offset captured by the last [`pause`](Self::pause).
    pub async fn resume_position(&self) -> Duration {
        self.state.lock().await.resume_position
    }

    /// Whether the engine is outputting audio.
    pub async fn is_playing(&self) -> Result<bool> {
        let _state = self.state.lock().await;
        self.engine.is_playing().await.map_err(PlaybackError::Engine)
    }

    // ========================================================================
    // Streams
    // ========================================================================

    /// Observe every track that becomes current.
    pub fn subscribe_track(&self) -> Subscription<Arc<Track>> {
        self.track_stream.subscribe()
    }

    /// Observe every action the session applies.
    pub fn subscribe_action(&self) -> Subscription<Action> {
        self.action_stream.subscribe()
    }

    pub fn latest_track(&self) -> Option<Arc<Track>> {
        self.track_stream.latest()
    }

    pub fn latest_action(&self) -> Option<Action> {
        self.action_stream.latest()
    }

    // ========================================================================
    // Actions
    // ========================================================================

    /// Load and start the track at the cursor.
    ///
    /// # Errors
    ///
    /// - [`PlaybackError::IndexOutOfRange`] before any engine call when the
    ///   cursor has no track
    /// - [`PlaybackError::Engine`] when the source cannot be opened or
    ///   started; nothing is emitted and no other track is tried
    pub async fn play(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.play_locked(&mut state).await
    }

    /// Capture the current offset and pause.
    pub async fn pause(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.pause_locked(&mut state).await
    }

    /// Seek back to the captured offset and start again.
    pub async fn resume(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.resume_locked(&mut state).await
    }

    /// Step forward one track (wrapping) and play it.
    pub async fn next(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.playlist.advance()?;
        self.play_locked(&mut state).await
    }

    /// Step back one track (wrapping) and play it.
    pub async fn previous(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        state.playlist.retreat()?;
        self.play_locked(&mut state).await
    }

    /// End the visible session: emit `Pause`, stop the engine and ask the host
    /// to tear down its surface.
    ///
    /// The host is asked to end the session even if stopping the engine fails.
    pub async fn close(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        self.close_locked(&mut state).await
    }

    /// Pause when playing, resume when paused. No-op on an empty playlist.
    pub async fn toggle(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.playlist.is_empty() {
            debug!("Toggle ignored, playlist is empty");
            return Ok(());
        }

        if self.engine.is_playing().await.map_err(PlaybackError::Engine)? {
            self.pause_locked(&mut state).await
        } else {
            self.resume_locked(&mut state).await
        }
    }

    /// Run `action`.
    pub async fn dispatch(&self, action: Action) -> Result<()> {
        debug!(%action, "Dispatching action");
        let mut state = self.state.lock().await;
        self.dispatch_locked(&mut state, Some(action)).await
    }

    /// Run the action with transport tag `tag`. Unknown tags close the session.
    pub async fn dispatch_tag(&self, tag: i32) -> Result<()> {
        let action = Action::from_tag(tag);
        if action.is_none() {
            warn!(tag, "Unknown action tag, closing session");
        }
        let mut state = self.state.lock().await;
        self.dispatch_locked(&mut state, action).await
    }

    /// Run the action carried by an inbound envelope.
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InvalidIntent`] if the envelope is not keyed `"action"`.
    pub async fn dispatch_intent(&self, intent: &ActionIntent) -> Result<()> {
        if !intent.is_action() {
            return Err(PlaybackError::InvalidIntent(format!(
                "unexpected key '{}'",
                intent.key
            )));
        }
        self.dispatch_tag(intent.value).await
    }

    /// React to the engine finishing the currently loaded track.
    ///
    /// Advances like [`next`](Self::next) while playing with auto-advance on.
    /// There is no caller to return a failure to, so it is logged and reported
    /// through [`HostLifecycle::playback_failed`].
    pub async fn handle_completion(&self) {
        let mut state = self.state.lock().await;
        self.complete_locked(&mut state).await;
    }

    /// Completion signalled while load `generation` was current. Signals that
    /// were queued before a later load are dropped.
    async fn complete_generation(&self, generation: u64) {
        let mut state = self.state.lock().await;
        let current = self.load_generation.load(Ordering::SeqCst);
        if generation != current {
            debug!(generation, current, "Dropping completion of an earlier load");
            return;
        }
        self.complete_locked(&mut state).await;
    }

    async fn complete_locked(&self, state: &mut SessionState) {
        if !self.settings.features.auto_advance_on_completion {
            debug!("Track completed, auto-advance disabled");
            return;
        }
        if state.status != SessionStatus::Playing {
            debug!(status = ?state.status, "Ignoring completion outside playback");
            return;
        }

        let result = match state.playlist.advance() {
            Ok(_) => self.play_locked(state).await,
            Err(e) => Err(e),
        };

        if let Err(e) = result {
            error!(error = %e, index = state.playlist.index(), "Auto-advance failed");
            self.host.playback_failed(&e.to_string()).await;
        }
    }

    // ========================================================================
    // Locked implementations
    // ========================================================================

    async fn dispatch_locked(
        &self,
        state: &mut SessionState,
        action: Option<Action>,
    ) -> Result<()> {
        match action {
            Some(Action::Play) => self.play_locked(state).await,
            Some(Action::Pause) => self.pause_locked(state).await,
            Some(Action::Resume) => self.resume_locked(state).await,
            Some(Action::Next) => {
                state.playlist.advance()?;
                self.play_locked(state).await
            }
            Some(Action::Previous) => {
                state.playlist.retreat()?;
                self.play_locked(state).await
            }
            Some(Action::Close) | None => self.close_locked(state).await,
        }
    }

    #[instrument(skip(self, state), fields(index = state.playlist.index()))]
    async fn play_locked(&self, state: &mut SessionState) -> Result<()> {
        let track = state.playlist.current()?;
        let source = track.audio_source();

        self.engine.stop().await.map_err(PlaybackError::Engine)?;
        if let Err(e) = self.load_and_start(source).await {
            warn!(location = strip_path(&track.data), error = %e, "Failed to play track");
            if state.status != SessionStatus::Idle {
                state.status = SessionStatus::Ready;
            }
            return Err(e);
        }

        state.resume_position = Duration::ZERO;
        state.status = SessionStatus::Playing;
        info!(title = %track.title, artist = %track.artist, "Playing track");

        self.track_stream.emit(Arc::clone(&track));
        self.action_stream.emit(Action::Play);
        self.refresh_surface(Some(&track)).await;
        Ok(())
    }

    async fn load_and_start(&self, source: bridge_traits::AudioSource) -> Result<()> {
        self.engine.reset().await.map_err(PlaybackError::Engine)?;
        self.load_generation.fetch_add(1, Ordering::SeqCst);
        self.engine
            .set_source(source)
            .await
            .map_err(PlaybackError::Engine)?;
        self.engine.prepare().await.map_err(PlaybackError::Engine)?;
        self.engine.start().await.map_err(PlaybackError::Engine)
    }

    async fn pause_locked(&self, state: &mut SessionState) -> Result<()> {
        let position = self
            .engine
            .current_position()
            .await
            .map_err(PlaybackError::Engine)?;
        self.engine.pause().await.map_err(PlaybackError::Engine)?;

        state.resume_position = position;
        if state.status != SessionStatus::Idle {
            state.status = SessionStatus::Paused;
        }
        debug!(?position, "Paused");

        self.action_stream.emit(Action::Pause);
        let track = state.playlist.current().ok();
        self.refresh_surface(track.as_deref()).await;
        Ok(())
    }

    async fn resume_locked(&self, state: &mut SessionState) -> Result<()> {
        let position = state.resume_position;
        self.engine
            .seek(position)
            .await
            .map_err(PlaybackError::Engine)?;
        self.engine.start().await.map_err(PlaybackError::Engine)?;

        if state.status != SessionStatus::Idle {
            state.status = SessionStatus::Playing;
        }
        debug!(?position, "Resumed");

        self.action_stream.emit(Action::Play);
        let track = state.playlist.current().ok();
        self.refresh_surface(track.as_deref()).await;
        Ok(())
    }

    async fn close_locked(&self, state: &mut SessionState) -> Result<()> {
        self.action_stream.emit(Action::Pause);

        let stopped = self.engine.stop().await.map_err(PlaybackError::Engine);
        let ended = self.host.end_session().await.map_err(PlaybackError::Host);
        state.status = SessionStatus::Closed;
        info!("Session closed");

        stopped?;
        ended
    }

    /// Push fresh render instructions to the host. Failures are logged only.
    async fn refresh_surface(&self, track: Option<&Track>) {
        if !self.settings.features.show_surface {
            return;
        }
        let Some(track) = track else {
            debug!("No current track, skipping surface refresh");
            return;
        };

        let is_playing = match self.engine.is_playing().await {
            Ok(playing) => playing,
            Err(e) => {
                warn!(error = %e, "Could not query engine state for surface");
                self.action_stream.latest() == Some(Action::Play)
            }
        };
        let cover = notification::resolve_cover(self.track_store.as_ref(), &track.album_id).await;
        let content = notification::render(track, is_playing, cover, &self.settings.notification);

        if let Err(e) = self.host.show_persistent_surface(content).await {
            warn!(error = %e, "Failed to show playback surface");
        }
    }
}

impl std::fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("settings", &self.settings)
            .field("latest_track", &self.track_stream.latest())
            .field("latest_action", &self.action_stream.latest())
            .finish_non_exhaustive()
    }
}
