//! # Core Runtime Module
//!
//! Runtime infrastructure shared by the playback core and its host façade:
//! - Logging and tracing setup with host log forwarding
//! - Configuration assembly and capability validation
//! - The replay-latest multicast stream used for session notifications

pub mod config;
pub mod error;
pub mod events;
pub mod logging;

pub use error::{Error, Result};
pub use events::{ReplayLatest, Subscription};
