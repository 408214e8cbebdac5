//! # Host Bridge Traits
//!
//! Contracts between the playback session core and the host platform.
//!
//! ## Overview
//!
//! The core owns the "what is playing and what happens next" logic. Everything
//! platform-bound is reached through the traits in this crate, which each host
//! (Android service, iOS app, desktop shell) implements once:
//!
//! - [`PlaybackEngine`](playback::PlaybackEngine) - the black-box audio player
//! - [`TrackStore`](storage::TrackStore) - album artwork lookup
//! - [`HostLifecycle`](host::HostLifecycle) - persistent surface and session teardown
//! - [`LoggerSink`](logging::LoggerSink) - forward core logs to host logging
//!
//! The data exchanged across the boundary lives here as well: the
//! [`ActionIntent`](host::ActionIntent) transport envelope for inbound control
//! taps and the [`SurfaceContent`](host::SurfaceContent) render instructions.
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Implementations
//! should convert platform errors into it with enough context (file path,
//! URL, codec) for the host to show a useful message.
//!
//! ## Thread Safety
//!
//! Every bridge is `Send + Sync` (see
//! [`PlatformSendSync`](platform::PlatformSendSync)) because engines signal
//! completion from their own threads.

pub mod error;
pub mod host;
pub mod logging;
pub mod platform;
pub mod playback;
pub mod storage;

pub use error::{BridgeError, Result};

pub use host::{
    ActionIntent, ControlBinding, CoverArt, HostLifecycle, PlayPauseIcon, SurfaceChannel,
    SurfaceContent, SurfaceControl, ACTION_INTENT_KEY,
};
pub use logging::{LogEntry, LogLevel, LoggerSink};
pub use playback::{AudioSource, CompletionHandler, PlaybackEngine};
pub use storage::TrackStore;
