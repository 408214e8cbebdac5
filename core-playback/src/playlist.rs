//! Ordered track list with a wrapping cursor.

use crate::error::{PlaybackError, Result};
use crate::track::Track;
use std::sync::Arc;

/// Tracks queued for playback plus the current position.
///
/// The index is only meaningful while the playlist is non-empty. It is not
/// validated on [`replace`](Playlist::replace); an out-of-range index surfaces
/// as [`PlaybackError::IndexOutOfRange`] on the next [`current`](Playlist::current).
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Arc<Track>>,
    index: usize,
}

impl Playlist {
    pub fn new(tracks: Vec<Arc<Track>>, index: usize) -> Self {
        Self { tracks, index }
    }

    /// Swap in a new track list and position.
    pub fn replace(&mut self, tracks: Vec<Arc<Track>>, index: usize) {
        self.tracks = tracks;
        self.index = index;
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn tracks(&self) -> &[Arc<Track>] {
        &self.tracks
    }

    /// Track at the cursor.
    pub fn current(&self) -> Result<Arc<Track>> {
        self.tracks
            .get(self.index)
            .cloned()
            .ok_or(PlaybackError::IndexOutOfRange {
                index: self.index,
                len: self.tracks.len(),
            })
    }

    /// Move forward one track, wrapping from the last to the first.
    pub fn advance(&mut self) -> Result<usize> {
        self.ensure_not_empty()?;
        let len = self.tracks.len();
        self.index = (self.index % len + 1) % len;
        Ok(self.index)
    }

    /// Move back one track, wrapping from the first to the last.
    pub fn retreat(&mut self) -> Result<usize> {
        self.ensure_not_empty()?;
        self.index = match self.index {
            0 => self.tracks.len() - 1,
            // An index left out of range by `replace` still steps into range.
            i => (i - 1).min(self.tracks.len() - 1),
        };
        Ok(self.index)
    }

    fn ensure_not_empty(&self) -> Result<()> {
        if self.tracks.is_empty() {
            return Err(PlaybackError::IndexOutOfRange {
                index: self.index,
                len: 0,
            });
        }
        Ok(())
    }
}
