//! Album artwork lookup over a local directory using Tokio

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    TrackStore,
};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File extensions probed for each album, in order.
const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Track store that resolves `<artwork_dir>/<album_id>.{jpg,jpeg,png}`.
///
/// Desktop players keep no media database, so the only thing the session
/// needs from the store is cover art by album id.
pub struct FsTrackStore {
    artwork_dir: PathBuf,
}

impl FsTrackStore {
    pub fn new(artwork_dir: impl Into<PathBuf>) -> Self {
        Self {
            artwork_dir: artwork_dir.into(),
        }
    }

    /// Store rooted at the platform data directory.
    pub fn with_default_dir() -> Self {
        let artwork_dir = dirs::data_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("music-player-core")
            .join("artwork");
        Self::new(artwork_dir)
    }

    pub fn artwork_dir(&self) -> &Path {
        &self.artwork_dir
    }
}

impl Default for FsTrackStore {
    fn default() -> Self {
        Self::with_default_dir()
    }
}

fn is_valid_album_id(album_id: &str) -> bool {
    !album_id.is_empty()
        && album_id != "."
        && album_id != ".."
        && !album_id.contains(['/', '\\'])
}

#[async_trait]
impl TrackStore for FsTrackStore {
    async fn album_image_path(&self, album_id: &str) -> Result<Option<PathBuf>> {
        if !is_valid_album_id(album_id) {
            debug!(album_id, "Rejected album id");
            return Ok(None);
        }

        for extension in IMAGE_EXTENSIONS {
            let candidate = self
                .artwork_dir
                .join(format!("{}.{}", album_id, extension));
            match fs::metadata(&candidate).await {
                Ok(metadata) if metadata.is_file() => return Ok(Some(candidate)),
                Ok(_) => continue,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => continue,
                Err(e) => return Err(BridgeError::Io(e)),
            }
        }

        debug!(album_id, dir = ?self.artwork_dir, "No artwork for album");
        Ok(None)
    }

    async fn read_image(&self, path: &Path) -> Result<Bytes> {
        let data = fs::read(path).await.map_err(BridgeError::Io)?;
        debug!(path = ?path, size = data.len(), "Read artwork");
        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    async fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("fs-track-store-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir).await;
        fs::create_dir_all(&dir).await.unwrap();
        dir
    }

    #[tokio::test]
    async fn test_finds_first_matching_extension() {
        let dir = scratch_dir("ext").await;
        fs::write(dir.join("42.png"), b"png").await.unwrap();
        fs::write(dir.join("42.jpeg"), b"jpeg").await.unwrap();
        let store = FsTrackStore::new(&dir);

        let path = store.album_image_path("42").await.unwrap().unwrap();
        assert_eq!(path, dir.join("42.jpeg"));
        assert_eq!(store.read_image(&path).await.unwrap(), Bytes::from("jpeg"));

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_artwork_is_none() {
        let dir = scratch_dir("missing").await;
        let store = FsTrackStore::new(&dir);

        assert!(store.album_image_path("7").await.unwrap().is_none());

        fs::remove_dir_all(&dir).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_like_album_ids() {
        let store = FsTrackStore::new(env::temp_dir());
        assert!(store.album_image_path("../etc").await.unwrap().is_none());
        assert!(store.album_image_path("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_read_missing_file_is_io_error() {
        let store = FsTrackStore::new(env::temp_dir());
        let result = store
            .read_image(Path::new("/definitely/not/here.png"))
            .await;
        assert!(matches!(result, Err(BridgeError::Io(_))));
    }

    #[test]
    fn test_default_dir_is_named() {
        let store = FsTrackStore::default();
        assert!(store.artwork_dir().ends_with("music-player-core/artwork"));
    }
}
