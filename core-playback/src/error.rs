//! # Playback Error Types
//!
//! Errors surfaced by the playback session.

use bridge_traits::BridgeError;
use thiserror::Error;

/// Errors that can occur during playback operations.
#[derive(Error, Debug)]
pub enum PlaybackError {
    // ========================================================================
    // Engine Errors
    // ========================================================================
    /// The engine could not open, prepare or drive the source. Propagated
    /// unchanged and never retried by the session.
    #[error("Engine error: {0}")]
    Engine(#[source] BridgeError),

    // ========================================================================
    // Contract Violations
    // ========================================================================
    /// A track was requested at an index the playlist does not have, most
    /// commonly because the playlist is empty.
    #[error("Track index {index} out of range for playlist of {len}")]
    IndexOutOfRange { index: usize, len: usize },

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// The host lifecycle shim failed to end the session.
    #[error("Host error: {0}")]
    Host(#[source] BridgeError),

    /// An inbound action envelope could not be decoded or was not addressed to
    /// the session.
    #[error("Invalid action intent: {0}")]
    InvalidIntent(String),
}

impl PlaybackError {
    /// Returns `true` if the failure came from the engine.
    pub fn is_engine_error(&self) -> bool {
        matches!(self, PlaybackError::Engine(_))
    }

    /// Returns `true` for caller mistakes rather than runtime failures.
    pub fn is_contract_violation(&self) -> bool {
        matches!(
            self,
            PlaybackError::IndexOutOfRange { .. } | PlaybackError::InvalidIntent(_)
        )
    }
}

/// Result type for playback operations.
pub type Result<T> = std::result::Result<T, PlaybackError>;
