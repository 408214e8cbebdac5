//! Playback engine bridge.
//!
//! The session core never decodes audio itself. It drives a host-provided
//! engine (Android `MediaPlayer`, AVPlayer, a desktop decoder thread, ...)
//! through the [`PlaybackEngine`] contract below and treats everything behind
//! it as a black box.

use crate::{error::Result, platform::PlatformSendSync};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Where an engine should read encoded audio from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// Local file accessible to the host runtime.
    LocalFile { path: PathBuf },
    /// Remote HTTP(S) stream to be fetched by the host.
    RemoteStream {
        url: String,
        headers: HashMap<String, String>,
    },
}

impl AudioSource {
    /// Resolve a track's data location into a source descriptor.
    ///
    /// `http://` and `https://` locations become remote streams, `file://`
    /// URIs and bare paths become local files.
    pub fn from_location(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            return AudioSource::RemoteStream {
                url: location.to_string(),
                headers: HashMap::new(),
            };
        }

        let path = location.strip_prefix("file://").unwrap_or(location);
        AudioSource::LocalFile {
            path: PathBuf::from(path),
        }
    }

    /// Determine whether the source represents remote content.
    pub fn is_remote(&self) -> bool {
        matches!(self, AudioSource::RemoteStream { .. })
    }
}

impl fmt::Display for AudioSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioSource::LocalFile { path } => write!(f, "{}", path.display()),
            AudioSource::RemoteStream { url, .. } => write!(f, "{}", url),
        }
    }
}

/// Callback invoked by the engine when the loaded source plays to its end.
///
/// Engines may call this from any thread. Implementations of the session core
/// only enqueue work from inside the handler and never block it.
pub type CompletionHandler = Box<dyn Fn() + Send + Sync>;

/// Contract for the platform audio engine wrapped by the session core.
///
/// One engine instance backs one session. Call order for a fresh load is
/// `stop` → `reset` → `set_source` → `prepare` → `start`. `prepare` is allowed
/// to take as long as the platform needs; the session awaits it before
/// reporting the track as playing.
#[async_trait::async_trait]
pub trait PlaybackEngine: PlatformSendSync {
    /// Return the engine to its uninitialized state, dropping any source.
    async fn reset(&self) -> Result<()>;

    /// Point the engine at a new source. Does not start decoding.
    async fn set_source(&self, source: AudioSource) -> Result<()>;

    /// Open and prepare the current source.
    ///
    /// # Errors
    ///
    /// Fails when the source cannot be opened or its format is unsupported.
    async fn prepare(&self) -> Result<()>;

    /// Start (or restart after a pause) audio output.
    async fn start(&self) -> Result<()>;

    /// Pause output, keeping the source and position.
    async fn pause(&self) -> Result<()>;

    /// Seek to an absolute offset within the prepared source.
    async fn seek(&self, position: Duration) -> Result<()>;

    /// Stop output. A stopped engine must be reset before it is reused.
    async fn stop(&self) -> Result<()>;

    /// Current playback offset in the prepared source.
    async fn current_position(&self) -> Result<Duration>;

    /// Whether audio is currently being output.
    async fn is_playing(&self) -> Result<bool>;

    /// Register the handler fired on natural end of the current source.
    ///
    /// Replaces any previously registered handler.
    fn set_completion_handler(&self, handler: CompletionHandler);
}
