//! Core service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (playback engine,
//! host lifecycle shim, track store) into a single playback session and keeps
//! the engine's completion listener running. Hosts forward the action intents
//! attached to their surface controls through [`CoreService::handle_intent_json`].
//! Desktop apps typically enable the `desktop-shims` feature (which depends on
//! `bridge-desktop`) so only the engine has to be provided.

pub mod error;

pub use error::{CoreError, Result};

pub use core_playback::{Action, PlaybackError, PlaybackSession, SessionStatus, Track};
pub use core_runtime::config::{CoreConfig, CoreConfigBuilder};

use bridge_traits::ActionIntent;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

#[cfg(feature = "desktop-shims")]
use bridge_traits::PlaybackEngine;

/// Primary façade exposed to host applications.
pub struct CoreService {
    session: Arc<PlaybackSession>,
    completion_listener: Option<JoinHandle<()>>,
}

impl CoreService {
    /// Create the playback session described by `config` and start listening
    /// for engine completions.
    ///
    /// # Errors
    ///
    /// [`CoreError::InitializationFailed`] when called outside a tokio
    /// runtime.
    pub fn new(config: CoreConfig) -> Result<Self> {
        tokio::runtime::Handle::try_current().map_err(|_| {
            CoreError::InitializationFailed(
                "CoreService must be created inside a tokio runtime".to_string(),
            )
        })?;

        let session = PlaybackSession::from_config(&config);
        let completion_listener = session.spawn_completion_listener();
        info!(
            auto_advance = config.features.auto_advance_on_completion,
            show_surface = config.features.show_surface,
            "Core service started"
        );

        Ok(Self {
            session,
            completion_listener,
        })
    }

    /// Shared handle to the playback session.
    pub fn session(&self) -> Arc<PlaybackSession> {
        Arc::clone(&self.session)
    }

    /// Decode a serialized action intent and run it.
    ///
    /// ```ignore
    /// core.handle_intent_json(r#"{"key":"action","value":4}"#).await?; // next
    /// ```
    ///
    /// # Errors
    ///
    /// [`PlaybackError::InvalidIntent`] for malformed JSON or a foreign key,
    /// otherwise whatever the dispatched action returns.
    pub async fn handle_intent_json(&self, raw: &str) -> Result<()> {
        let intent = ActionIntent::from_json(raw)
            .map_err(|e| PlaybackError::InvalidIntent(e.to_string()))?;
        debug!(value = intent.value, "Inbound action intent");
        self.session.dispatch_intent(&intent).await?;
        Ok(())
    }

    pub async fn dispatch(&self, action: Action) -> Result<()> {
        self.session.dispatch(action).await?;
        Ok(())
    }
}

impl Drop for CoreService {
    fn drop(&mut self) {
        if let Some(listener) = self.completion_listener.take() {
            listener.abort();
        }
    }
}

/// Convenience bootstrapper for desktop hosts: only the engine is required,
/// the host shim and artwork store come from `bridge-desktop`.
///
/// ```ignore
/// let core = core_service::bootstrap_desktop(Arc::new(MyEngine::new()))?;
/// core.session().set_playlist(tracks, 0).await;
/// core.dispatch(Action::Play).await?;
/// ```
#[cfg(feature = "desktop-shims")]
pub fn bootstrap_desktop(engine: Arc<dyn PlaybackEngine>) -> Result<CoreService> {
    let config = CoreConfig::builder().engine(engine).build()?;
    CoreService::new(config)
}
