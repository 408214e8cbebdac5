//! # Playback Session Core
//!
//! Owns the playlist, the play/pause state machine and the wrapped playback
//! engine, and reports what it does through two replay-latest streams.
//!
//! ## Overview
//!
//! - [`session`]: the [`PlaybackSession`] state machine and action dispatch
//! - [`playlist`]: ordered tracks with a wrapping cursor
//! - [`action`]: the six playback commands and their transport tags
//! - [`notification`]: render instructions for the host's playback surface
//! - [`track`]: track metadata and source resolution
//!
//! The engine, the host lifecycle shim and the track store are injected as
//! `bridge_traits` implementations; nothing here touches audio or UI directly.

pub mod action;
pub mod error;
pub mod notification;
pub mod playlist;
pub mod session;
pub mod track;

pub use action::Action;
pub use error::{PlaybackError, Result};
pub use playlist::Playlist;
pub use session::{PlaybackSession, SessionSettings, SessionStatus};
pub use track::Track;
