//! # Playback Surface Builder
//!
//! Turns the current track and play state into [`SurfaceContent`] the host
//! renders as its persistent playback surface. Building is pure; the only I/O
//! is the cover lookup in [`resolve_cover`], which never fails.

use crate::action::Action;
use crate::track::Track;
use bridge_traits::{
    ControlBinding, CoverArt, PlayPauseIcon, SurfaceChannel, SurfaceContent, SurfaceControl,
    TrackStore,
};
use core_runtime::config::NotificationSettings;
use tracing::{debug, warn};

/// Render instructions for `track`.
///
/// While playing, the play/pause control shows a pause icon and fires
/// [`Action::Pause`]; otherwise it shows a play icon and fires
/// [`Action::Resume`]. Previous, next and close are always bound.
pub fn render(
    track: &Track,
    is_playing: bool,
    cover: CoverArt,
    settings: &NotificationSettings,
) -> SurfaceContent {
    let (play_pause_icon, play_pause_action) = if is_playing {
        (PlayPauseIcon::Pause, Action::Pause)
    } else {
        (PlayPauseIcon::Play, Action::Resume)
    };

    let bindings = [
        (SurfaceControl::Previous, Action::Previous),
        (SurfaceControl::PlayPause, play_pause_action),
        (SurfaceControl::Next, Action::Next),
        (SurfaceControl::Close, Action::Close),
    ]
    .into_iter()
    .map(|(control, action)| ControlBinding {
        control,
        intent: action.intent(),
    })
    .collect();

    SurfaceContent {
        channel: SurfaceChannel {
            id: settings.channel_id.clone(),
            name: settings.channel_name.clone(),
        },
        title: track.title.clone(),
        artist: track.artist.clone(),
        cover,
        play_pause_icon,
        bindings,
        open_app: settings.open_app_on_tap,
    }
}

/// Look up the album cover, falling back to [`CoverArt::Placeholder`].
///
/// A missing or unreadable image is not an error for the session.
pub async fn resolve_cover(store: &dyn TrackStore, album_id: &str) -> CoverArt {
    let path = match store.album_image_path(album_id).await {
        Ok(Some(path)) => path,
        Ok(None) => {
            debug!(album_id, "No album artwork, using placeholder");
            return CoverArt::Placeholder;
        }
        Err(e) => {
            warn!(album_id, error = %e, "Album artwork lookup failed");
            return CoverArt::Placeholder;
        }
    };

    match store.read_image(&path).await {
        Ok(bytes) if !bytes.is_empty() => CoverArt::Image(bytes),
        Ok(_) => {
            warn!(album_id, "Album artwork is empty");
            CoverArt::Placeholder
        }
        Err(e) => {
            warn!(album_id, error = %e, "Failed to read album artwork");
            CoverArt::Placeholder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::BridgeError;
    use bytes::Bytes;
    use mockall::mock;
    use mockall::predicate::eq;
    use std::path::{Path, PathBuf};

    mock! {
        pub Store {}

        #[async_trait]
        impl TrackStore for Store {
            async fn album_image_path(&self, album_id: &str) -> bridge_traits::Result<Option<PathBuf>>;
            async fn read_image(&self, path: &Path) -> bridge_traits::Result<Bytes>;
        }
    }

    fn track() -> Track {
        Track::new("Intro", "The XX", "42", "/music/intro.mp3")
    }

    #[test]
    fn playing_surface_offers_pause() {
        let content = render(
            &track(),
            true,
            CoverArt::Placeholder,
            &NotificationSettings::default(),
        );

        assert_eq!(content.title, "Intro");
        assert_eq!(content.artist, "The XX");
        assert_eq!(content.play_pause_icon, PlayPauseIcon::Pause);
        assert_eq!(
            content.binding(SurfaceControl::PlayPause),
            Some(&Action::Pause.intent())
        );
        assert_eq!(content.channel.id, "android_music_service");
        assert!(content.open_app);
    }

    #[test]
    fn paused_surface_offers_resume() {
        let content = render(
            &track(),
            false,
            CoverArt::Placeholder,
            &NotificationSettings::default(),
        );

        assert_eq!(content.play_pause_icon, PlayPauseIcon::Play);
        assert_eq!(
            content.binding(SurfaceControl::PlayPause),
            Some(&Action::Resume.intent())
        );
    }

    #[test]
    fn navigation_controls_are_bound() {
        let content = render(
            &track(),
            true,
            CoverArt::Image(Bytes::from_static(b"png")),
            &NotificationSettings::default(),
        );

        assert_eq!(content.bindings.len(), 4);
        assert_eq!(
            content.binding(SurfaceControl::Next),
            Some(&Action::Next.intent())
        );
        assert_eq!(
            content.binding(SurfaceControl::Previous),
            Some(&Action::Previous.intent())
        );
        assert_eq!(
            content.binding(SurfaceControl::Close),
            Some(&Action::Close.intent())
        );
        assert!(!content.cover.is_placeholder());
    }

    #[test]
    fn settings_flow_into_surface() {
        let settings = NotificationSettings {
            channel_id: "player".to_string(),
            channel_name: "Player".to_string(),
            open_app_on_tap: false,
        };
        let content = render(&track(), false, CoverArt::Placeholder, &settings);
        assert_eq!(content.channel.name, "Player");
        assert!(!content.open_app);
    }

    #[tokio::test]
    async fn cover_is_read_from_store() {
        let mut store = MockStore::new();
        store
            .expect_album_image_path()
            .with(eq("42"))
            .returning(|_| Ok(Some(PathBuf::from("/art/42.jpg"))));
        store
            .expect_read_image()
            .returning(|_| Ok(Bytes::from_static(b"jpeg")));

        let cover = resolve_cover(&store, "42").await;
        assert_eq!(cover, CoverArt::Image(Bytes::from_static(b"jpeg")));
    }

    #[tokio::test]
    async fn missing_cover_falls_back_to_placeholder() {
        let mut store = MockStore::new();
        store.expect_album_image_path().returning(|_| Ok(None));
        store.expect_read_image().never();

        assert!(resolve_cover(&store, "42").await.is_placeholder());
    }

    #[tokio::test]
    async fn unreadable_cover_falls_back_to_placeholder() {
        let mut store = MockStore::new();
        store
            .expect_album_image_path()
            .returning(|_| Ok(Some(PathBuf::from("/art/42.jpg"))));
        store
            .expect_read_image()
            .returning(|_| Err(BridgeError::OperationFailed("denied".to_string())));

        assert!(resolve_cover(&store, "42").await.is_placeholder());
    }

    #[tokio::test]
    async fn lookup_error_falls_back_to_placeholder() {
        let mut store = MockStore::new();
        store
            .expect_album_image_path()
            .returning(|_| Err(BridgeError::NotAvailable("media store".to_string())));

        assert!(resolve_cover(&store, "42").await.is_placeholder());
    }
}
