//! Desktop player walkthrough
//!
//! Drives a playback session with a simulated engine whose tracks finish after
//! a short delay, so auto-advance, surface updates and closing can be watched
//! in the log output.
//!
//! Run with:
//! ```bash
//! cargo run -p core-service --example desktop_player
//! ```

use async_trait::async_trait;
use bridge_traits::{AudioSource, CompletionHandler, LogLevel, PlaybackEngine};
use core_runtime::logging::{init_logging, LogFormat, LoggingConfig};
use core_service::{bootstrap_desktop, Action, Track};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;

/// Engine that "plays" for a fixed time and then reports completion.
#[derive(Default)]
struct SimulatedEngine {
    playing: Arc<Mutex<bool>>,
    completion: Arc<Mutex<Option<CompletionHandler>>>,
}

#[async_trait]
impl PlaybackEngine for SimulatedEngine {
    async fn reset(&self) -> bridge_traits::Result<()> {
        Ok(())
    }

    async fn set_source(&self, source: AudioSource) -> bridge_traits::Result<()> {
        info!(%source, "Engine loaded source");
        Ok(())
    }

    async fn prepare(&self) -> bridge_traits::Result<()> {
        Ok(())
    }

    async fn start(&self) -> bridge_traits::Result<()> {
        *self.playing.lock().unwrap() = true;
        let playing = Arc::clone(&self.playing);
        let completion = Arc::clone(&self.completion);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            let finished = std::mem::replace(&mut *playing.lock().unwrap(), false);
            if finished {
                if let Some(handler) = completion.lock().unwrap().as_ref() {
                    handler();
                }
            }
        });
        Ok(())
    }

    async fn pause(&self) -> bridge_traits::Result<()> {
        *self.playing.lock().unwrap() = false;
        Ok(())
    }

    async fn seek(&self, _position: Duration) -> bridge_traits::Result<()> {
        Ok(())
    }

    async fn stop(&self) -> bridge_traits::Result<()> {
        *self.playing.lock().unwrap() = false;
        Ok(())
    }

    async fn current_position(&self) -> bridge_traits::Result<Duration> {
        Ok(Duration::from_millis(100))
    }

    async fn is_playing(&self) -> bridge_traits::Result<bool> {
        Ok(*self.playing.lock().unwrap())
    }

    fn set_completion_handler(&self, handler: CompletionHandler) {
        *self.completion.lock().unwrap() = Some(handler);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(
        LoggingConfig::default()
            .with_format(LogFormat::Compact)
            .with_level(LogLevel::Debug),
    )?;

    let core = bootstrap_desktop(Arc::new(SimulatedEngine::default()))?;
    let session = core.session();
    let mut tracks = session.subscribe_track();

    session
        .set_playlist(
            vec![
                Arc::new(Track::new("Intro", "The XX", "1", "/music/intro.mp3")),
                Arc::new(Track::new("Crystalised", "The XX", "1", "/music/crystalised.mp3")),
                Arc::new(Track::new("Islands", "The XX", "1", "/music/islands.mp3")),
            ],
            0,
        )
        .await;
    core.dispatch(Action::Play).await?;

    // Let the playlist run through once and wrap back to the first track.
    for _ in 0..4 {
        if let Some(track) = tracks.recv().await {
            info!(title = %track.title, "Now playing");
        }
    }

    core.handle_intent_json(&Action::Close.intent().to_json()?)
        .await?;
    info!(status = ?session.status().await, "Done");
    Ok(())
}
