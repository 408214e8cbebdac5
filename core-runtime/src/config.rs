//! # Core Configuration Module
//!
//! Assembles the bridges and settings a playback session needs.
//!
//! ## Overview
//!
//! [`CoreConfig`] is built through [`CoreConfigBuilder`], which validates that
//! every required capability was injected before anything starts playing.
//!
//! ## Required Dependencies
//!
//! - `PlaybackEngine` - always host-provided; there is no portable default
//!
//! ## Dependencies with desktop defaults
//!
//! - `HostLifecycle` - `bridge_desktop::DesktopHost`
//! - `TrackStore` - `bridge_desktop::FsTrackStore` over [`CoreConfigBuilder::artwork_dir`]
//!   (the platform data directory when unset)
//!
//! The defaults are only available with the `desktop-shims` feature. Mobile
//! hosts inject their own service/notification shim and media store.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::CoreConfig;
//! use std::sync::Arc;
//!
//! let config = CoreConfig::builder()
//!     .engine(Arc::new(MediaPlayerEngine::new()))
//!     .host(Arc::new(ForegroundServiceHost::new()))
//!     .track_store(Arc::new(MediaStoreTracks::new()))
//!     .auto_advance_on_completion(true)
//!     .build()?;
//! ```

use crate::error::{Error, Result};
use bridge_traits::{HostLifecycle, PlaybackEngine, TrackStore};
use std::path::PathBuf;
use std::sync::Arc;

/// Channel id the playback surface is posted on unless overridden.
pub const DEFAULT_CHANNEL_ID: &str = "android_music_service";

/// Human-readable channel name shown in system settings.
pub const DEFAULT_CHANNEL_NAME: &str = "Android Music Service";

/// Everything a playback session is wired with.
#[derive(Clone)]
pub struct CoreConfig {
    /// Audio engine driven by the session (required)
    pub engine: Arc<dyn PlaybackEngine>,

    /// Service/notification shim of the host
    pub host: Arc<dyn HostLifecycle>,

    /// Artwork lookup for the playback surface
    pub track_store: Arc<dyn TrackStore>,

    pub features: FeatureFlags,

    pub notification: NotificationSettings,
}

impl std::fmt::Debug for CoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreConfig")
            .field("engine", &"PlaybackEngine { ... }")
            .field("host", &"HostLifecycle { ... }")
            .field("track_store", &"TrackStore { ... }")
            .field("features", &self.features)
            .field("notification", &self.notification)
            .finish()
    }
}

/// Behaviour switches for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    /// Advance to the next track when the engine reports natural completion.
    pub auto_advance_on_completion: bool,

    /// Push surface updates to the host after each action. Headless hosts
    /// (tests, CLI players) can turn this off.
    pub show_surface: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            auto_advance_on_completion: true,
            show_surface: true,
        }
    }
}

/// Presentation settings copied into every surface update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    pub channel_id: String,
    pub channel_name: String,
    /// Whether tapping the surface body opens the app.
    pub open_app_on_tap: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            channel_id: DEFAULT_CHANNEL_ID.to_string(),
            channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            open_app_on_tap: true,
        }
    }
}

impl NotificationSettings {
    pub fn validate(&self) -> Result<()> {
        if self.channel_id.trim().is_empty() {
            return Err(Error::Config(
                "Notification channel id cannot be empty".to_string(),
            ));
        }
        if self.channel_name.trim().is_empty() {
            return Err(Error::Config(
                "Notification channel name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl CoreConfig {
    pub fn builder() -> CoreConfigBuilder {
        CoreConfigBuilder::default()
    }

    /// Check settings that can be invalid even when every bridge is present.
    pub fn validate(&self) -> Result<()> {
        self.notification.validate()
    }
}

fn engine_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "PlaybackEngine".to_string(),
        message: "A PlaybackEngine implementation is required to play audio. \
                 Android: wrap MediaPlayer/ExoPlayer. iOS: wrap AVPlayer. \
                 Desktop: inject a decoder-backed engine."
            .to_string(),
    }
}

#[cfg(feature = "desktop-shims")]
fn provide_default_host() -> Result<Arc<dyn HostLifecycle>> {
    let host: Arc<dyn HostLifecycle> = Arc::new(bridge_desktop::DesktopHost::new());
    Ok(host)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_host() -> Result<Arc<dyn HostLifecycle>> {
    Err(Error::CapabilityMissing {
        capability: "HostLifecycle".to_string(),
        message: "A HostLifecycle implementation is required to show the playback surface. \
                 Desktop: enable the 'desktop-shims' feature to use DesktopHost. \
                 Mobile: inject the foreground service / now-playing shim."
            .to_string(),
    })
}

#[cfg(feature = "desktop-shims")]
fn provide_default_track_store(artwork_dir: Option<PathBuf>) -> Result<Arc<dyn TrackStore>> {
    let store = match artwork_dir {
        Some(dir) => bridge_desktop::FsTrackStore::new(dir),
        None => bridge_desktop::FsTrackStore::with_default_dir(),
    };
    if store.artwork_dir().as_os_str().is_empty() {
        return Err(Error::Config(
            "Artwork directory cannot be empty".to_string(),
        ));
    }
    let store: Arc<dyn TrackStore> = Arc::new(store);
    Ok(store)
}

#[cfg(not(feature = "desktop-shims"))]
fn provide_default_track_store(_artwork_dir: Option<PathBuf>) -> Result<Arc<dyn TrackStore>> {
    Err(Error::CapabilityMissing {
        capability: "TrackStore".to_string(),
        message: "A TrackStore implementation is required for album artwork. \
                 Desktop: enable the 'desktop-shims' feature and set .artwork_dir(). \
                 Mobile: inject the platform media store."
            .to_string(),
    })
}

/// Builder for [`CoreConfig`].
#[derive(Default)]
pub struct CoreConfigBuilder {
    engine: Option<Arc<dyn PlaybackEngine>>,
    host: Option<Arc<dyn HostLifecycle>>,
    track_store: Option<Arc<dyn TrackStore>>,
    artwork_dir: Option<PathBuf>,
    features: FeatureFlags,
    notification: NotificationSettings,
}

impl CoreConfigBuilder {
    /// Sets the playback engine (required).
    pub fn engine(mut self, engine: Arc<dyn PlaybackEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Sets the host lifecycle shim.
    ///
    /// Falls back to `DesktopHost` when the `desktop-shims` feature is enabled.
    pub fn host(mut self, host: Arc<dyn HostLifecycle>) -> Self {
        self.host = Some(host);
        self
    }

    /// Sets the track store used for artwork lookup.
    pub fn track_store(mut self, store: Arc<dyn TrackStore>) -> Self {
        self.track_store = Some(store);
        self
    }

    /// Directory holding `<album_id>.{jpg,jpeg,png}` files for the desktop
    /// default track store. Ignored when a track store is injected.
    pub fn artwork_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.artwork_dir = Some(path.into());
        self
    }

    /// Default: true
    pub fn auto_advance_on_completion(mut self, enabled: bool) -> Self {
        self.features.auto_advance_on_completion = enabled;
        self
    }

    /// Default: true
    pub fn show_surface(mut self, enabled: bool) -> Self {
        self.features.show_surface = enabled;
        self
    }

    pub fn features(mut self, features: FeatureFlags) -> Self {
        self.features = features;
        self
    }

    pub fn notification(mut self, settings: NotificationSettings) -> Self {
        self.notification = settings;
        self
    }

    /// Validate and assemble the configuration.
    ///
    /// # Errors
    ///
    /// - [`Error::CapabilityMissing`] when the engine is missing, or the host
    ///   or track store is missing without a desktop default
    /// - [`Error::Config`] when notification settings are invalid
    pub fn build(self) -> Result<CoreConfig> {
        let engine = self.engine.ok_or_else(engine_missing_error)?;

        let host = match self.host {
            Some(host) => host,
            None => provide_default_host()?,
        };

        let track_store = match self.track_store {
            Some(store) => store,
            None => provide_default_track_store(self.artwork_dir)?,
        };

        let config = CoreConfig {
            engine,
            host,
            track_store,
            features: self.features,
            notification: self.notification,
        };

        config.validate()?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::{AudioSource, BridgeError, CompletionHandler, SurfaceContent};
    use bytes::Bytes;
    use mockall::mock;
    use std::path::Path;
    use std::time::Duration;

    mock! {
        pub Engine {}

        #[async_trait]
        impl PlaybackEngine for Engine {
            async fn reset(&self) -> bridge_traits::Result<()>;
            async fn set_source(&self, source: AudioSource) -> bridge_traits::Result<()>;
            async fn prepare(&self) -> bridge_traits::Result<()>;
            async fn start(&self) -> bridge_traits::Result<()>;
            async fn pause(&self) -> bridge_traits::Result<()>;
            async fn seek(&self, position: Duration) -> bridge_traits::Result<()>;
            async fn stop(&self) -> bridge_traits::Result<()>;
            async fn current_position(&self) -> bridge_traits::Result<Duration>;
            async fn is_playing(&self) -> bridge_traits::Result<bool>;
            fn set_completion_handler(&self, handler: CompletionHandler);
        }
    }

    mock! {
        pub Host {}

        #[async_trait]
        impl HostLifecycle for Host {
            async fn show_persistent_surface(&self, content: SurfaceContent) -> bridge_traits::Result<()>;
            async fn end_session(&self) -> bridge_traits::Result<()>;
        }
    }

    struct EmptyTrackStore;

    #[async_trait]
    impl TrackStore for EmptyTrackStore {
        async fn album_image_path(
            &self,
            _album_id: &str,
        ) -> std::result::Result<Option<PathBuf>, BridgeError> {
            Ok(None)
        }

        async fn read_image(&self, path: &Path) -> std::result::Result<Bytes, BridgeError> {
            Err(BridgeError::NotAvailable(path.display().to_string()))
        }
    }

    fn complete_builder() -> CoreConfigBuilder {
        CoreConfig::builder()
            .engine(Arc::new(MockEngine::new()))
            .host(Arc::new(MockHost::new()))
            .track_store(Arc::new(EmptyTrackStore))
    }

    #[test]
    fn builder_requires_engine() {
        let result = CoreConfig::builder()
            .host(Arc::new(MockHost::new()))
            .track_store(Arc::new(EmptyTrackStore))
            .build();

        match result {
            Err(Error::CapabilityMissing { capability, .. }) => {
                assert_eq!(capability, "PlaybackEngine")
            }
            other => panic!("expected missing engine, got {:?}", other.map(|_| ())),
        }
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn builder_requires_host_without_desktop_shims() {
        let result = CoreConfig::builder()
            .engine(Arc::new(MockEngine::new()))
            .track_store(Arc::new(EmptyTrackStore))
            .build();

        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { ref capability, .. }) if capability == "HostLifecycle"
        ));
    }

    #[cfg(not(feature = "desktop-shims"))]
    #[test]
    fn builder_requires_track_store_without_desktop_shims() {
        let result = CoreConfig::builder()
            .engine(Arc::new(MockEngine::new()))
            .host(Arc::new(MockHost::new()))
            .artwork_dir("/tmp/artwork")
            .build();

        assert!(matches!(
            result,
            Err(Error::CapabilityMissing { ref capability, .. }) if capability == "TrackStore"
        ));
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn desktop_defaults_fill_host_and_track_store() {
        let config = CoreConfig::builder()
            .engine(Arc::new(MockEngine::new()))
            .artwork_dir(std::env::temp_dir())
            .build();

        assert!(config.is_ok());
    }

    #[cfg(feature = "desktop-shims")]
    #[test]
    fn desktop_track_store_rejects_empty_dir() {
        let result = CoreConfig::builder()
            .engine(Arc::new(MockEngine::new()))
            .artwork_dir("")
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn defaults() {
        let config = complete_builder().build().unwrap();

        assert!(config.features.auto_advance_on_completion);
        assert!(config.features.show_surface);
        assert_eq!(config.notification.channel_id, DEFAULT_CHANNEL_ID);
        assert_eq!(config.notification.channel_name, DEFAULT_CHANNEL_NAME);
        assert!(config.notification.open_app_on_tap);
    }

    #[test]
    fn feature_switches() {
        let config = complete_builder()
            .auto_advance_on_completion(false)
            .show_surface(false)
            .build()
            .unwrap();

        assert_eq!(
            config.features,
            FeatureFlags {
                auto_advance_on_completion: false,
                show_surface: false,
            }
        );
    }

    #[test]
    fn empty_channel_is_rejected() {
        let result = complete_builder()
            .notification(NotificationSettings {
                channel_id: "  ".to_string(),
                ..NotificationSettings::default()
            })
            .build();

        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn debug_hides_bridges() {
        let config = complete_builder().build().unwrap();
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("PlaybackEngine { ... }"));
        assert!(rendered.contains("android_music_service"));
    }
}
