//! Track metadata handed to the session by the track store.

use bridge_traits::AudioSource;
use serde::{Deserialize, Serialize};

/// A playable track.
///
/// Immutable once loaded. Playlists hold `Arc<Track>` so the session never
/// copies track data it does not own.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    /// Key used to look up cover art in the track store.
    pub album_id: String,
    /// Location of the encoded audio: a path, `file://` URI or HTTP(S) URL.
    pub data: String,
}

impl Track {
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album_id: impl Into<String>,
        data: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            album_id: album_id.into(),
            data: data.into(),
        }
    }

    /// Source descriptor the engine should load for this track.
    pub fn audio_source(&self) -> AudioSource {
        AudioSource::from_location(&self.data)
    }
}
