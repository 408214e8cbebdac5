//! Host lifecycle bridge and the data it exchanges with the core.
//!
//! The host owns the process/service lifecycle and the persistent playback
//! surface (an Android foreground notification, an MPNowPlayingInfo entry, a
//! tray widget). The core never builds widgets: it hands the host a
//! [`SurfaceContent`] and the host renders it however the platform requires.
//! Taps on the rendered controls come back as [`ActionIntent`] envelopes.

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::{error::Result, platform::PlatformSendSync};

/// Payload key every inbound action intent must carry.
pub const ACTION_INTENT_KEY: &str = "action";

/// Cross-boundary action request.
///
/// Serialized as `{"key":"action","value":<tag>}` so hosts can stash it in a
/// platform intent/extra and hand it back verbatim when the user taps a control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionIntent {
    pub key: String,
    pub value: i32,
}

impl ActionIntent {
    /// Envelope for the given action tag.
    pub fn new(value: i32) -> Self {
        Self {
            key: ACTION_INTENT_KEY.to_string(),
            value,
        }
    }

    /// Parse an envelope previously produced by [`ActionIntent::to_json`].
    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Whether the envelope is addressed to the playback session.
    pub fn is_action(&self) -> bool {
        self.key == ACTION_INTENT_KEY
    }
}

/// Notification channel the surface should be posted on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceChannel {
    pub id: String,
    pub name: String,
}

/// Cover image for the current track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoverArt {
    /// Encoded image bytes as read from the track store.
    Image(Bytes),
    /// No artwork found; the host shows its bundled placeholder.
    Placeholder,
}

impl CoverArt {
    pub fn is_placeholder(&self) -> bool {
        matches!(self, CoverArt::Placeholder)
    }
}

/// Icon shown on the combined play/pause control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayPauseIcon {
    Play,
    Pause,
}

/// Controls rendered on the playback surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurfaceControl {
    PlayPause,
    Previous,
    Next,
    Close,
}

/// A control together with the intent it should fire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBinding {
    pub control: SurfaceControl,
    pub intent: ActionIntent,
}

/// Render instructions for the persistent playback surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceContent {
    pub channel: SurfaceChannel,
    pub title: String,
    pub artist: String,
    pub cover: CoverArt,
    pub play_pause_icon: PlayPauseIcon,
    pub bindings: Vec<ControlBinding>,
    /// Tapping the surface body brings the main screen to the foreground.
    pub open_app: bool,
}

impl SurfaceContent {
    /// Intent bound to the given control, if it is rendered.
    pub fn binding(&self, control: SurfaceControl) -> Option<&ActionIntent> {
        self.bindings
            .iter()
            .find(|binding| binding.control == control)
            .map(|binding| &binding.intent)
    }
}

/// Host lifecycle shim the session core calls out to.
///
/// # Re-entrancy
///
/// These methods are awaited while the session holds its internal lock.
/// Implementations must not call back into the session synchronously; forward
/// follow-up actions through a spawned task or the host's own event loop.
#[async_trait::async_trait]
pub trait HostLifecycle: PlatformSendSync {
    /// Show (or replace) the persistent playback surface.
    async fn show_persistent_surface(&self, content: SurfaceContent) -> Result<()>;

    /// Hide the surface and release the host's session resources.
    async fn end_session(&self) -> Result<()>;

    /// Report a playback failure that had no synchronous caller, such as an
    /// auto-advance that could not open the next track.
    async fn playback_failed(&self, _message: &str) {}
}
