//! Host lifecycle shim for desktop players

use async_trait::async_trait;
use bridge_traits::{error::Result, HostLifecycle, SurfaceContent};
use parking_lot::RwLock;
use tracing::{error, info};

/// Desktop [`HostLifecycle`].
///
/// Desktop apps have no foreground-service notification, so the surface is
/// kept in memory for the tray/window to render and every change is logged.
#[derive(Default)]
pub struct DesktopHost {
    surface: RwLock<Option<SurfaceContent>>,
    last_failure: RwLock<Option<String>>,
}

impl DesktopHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Content currently shown, or `None` once the session has ended.
    pub fn surface(&self) -> Option<SurfaceContent> {
        self.surface.read().clone()
    }

    pub fn is_surface_visible(&self) -> bool {
        self.surface.read().is_some()
    }

    pub fn last_failure(&self) -> Option<String> {
        self.last_failure.read().clone()
    }
}

#[async_trait]
impl HostLifecycle for DesktopHost {
    async fn show_persistent_surface(&self, content: SurfaceContent) -> Result<()> {
        info!(
            title = %content.title,
            artist = %content.artist,
            icon = ?content.play_pause_icon,
            "Showing playback surface"
        );
        *self.surface.write() = Some(content);
        Ok(())
    }

    async fn end_session(&self) -> Result<()> {
        info!("Hiding playback surface");
        *self.surface.write() = None;
        Ok(())
    }

    async fn playback_failed(&self, message: &str) {
        error!(reason = message, "Playback failed");
        *self.last_failure.write() = Some(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{CoverArt, PlayPauseIcon, SurfaceChannel};

    fn content(title: &str) -> SurfaceContent {
        SurfaceContent {
            channel: SurfaceChannel {
                id: "music".to_string(),
                name: "Music".to_string(),
            },
            title: title.to_string(),
            artist: "Artist".to_string(),
            cover: CoverArt::Placeholder,
            play_pause_icon: PlayPauseIcon::Pause,
            bindings: Vec::new(),
            open_app: true,
        }
    }

    #[tokio::test]
    async fn test_surface_lifecycle() {
        let host = DesktopHost::new();
        assert!(!host.is_surface_visible());

        host.show_persistent_surface(content("One")).await.unwrap();
        host.show_persistent_surface(content("Two")).await.unwrap();
        assert_eq!(host.surface().unwrap().title, "Two");

        host.end_session().await.unwrap();
        assert!(host.surface().is_none());
    }

    #[tokio::test]
    async fn test_failures_are_kept() {
        let host = DesktopHost::new();
        host.playback_failed("cannot open b.mp3").await;
        assert_eq!(host.last_failure().as_deref(), Some("cannot open b.mp3"));
    }
}
