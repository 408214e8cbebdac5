//! # Desktop Bridge Implementations
//!
//! Default implementations of bridge traits for desktop platforms
//! (macOS, Windows, Linux).
//!
//! ## Overview
//!
//! - `TrackStore` as [`FsTrackStore`], resolving album artwork from a
//!   directory with `tokio::fs`
//! - `HostLifecycle` as [`DesktopHost`], which keeps the playback surface in
//!   memory for the window/tray and logs through `tracing`
//!
//! There is no desktop `PlaybackEngine` here; hosts inject their decoder.
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DesktopHost, FsTrackStore};
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .engine(engine)
//!     .host(Arc::new(DesktopHost::new()))
//!     .track_store(Arc::new(FsTrackStore::new("/home/me/.covers")))
//!     .build()?;
//! ```

mod artwork;
mod host;

pub use artwork::FsTrackStore;
pub use host::DesktopHost;
