//! Track store bridge.
//!
//! The track store owns the music library. The session core only needs it to
//! resolve album artwork for the playback surface; playlists themselves are
//! handed to the session by the UI layer.

use bytes::Bytes;
use std::path::{Path, PathBuf};

use crate::{error::Result, platform::PlatformSendSync};

/// Read-only view of the host's track store.
#[async_trait::async_trait]
pub trait TrackStore: PlatformSendSync {
    /// Location of the album cover image, if the store has one.
    async fn album_image_path(&self, album_id: &str) -> Result<Option<PathBuf>>;

    /// Read encoded image bytes from a path returned by
    /// [`album_image_path`](TrackStore::album_image_path).
    async fn read_image(&self, path: &Path) -> Result<Bytes>;
}
