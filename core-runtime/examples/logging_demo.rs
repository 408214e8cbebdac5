//! Logging and session-stream demonstration
//!
//! Run with:
//! ```bash
//! # Pretty format (default in debug)
//! cargo run --example logging_demo
//!
//! # JSON format
//! cargo run --example logging_demo -- json
//!
//! # Compact format with a custom filter
//! cargo run --example logging_demo -- compact "logging_demo=trace"
//! ```

use bridge_traits::LogLevel;
use core_runtime::events::ReplayLatest;
use core_runtime::logging::{init_logging, strip_path, LogFormat, LoggingConfig};
use std::env;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, PartialEq)]
enum Status {
    Playing(String),
    Paused,
}

#[instrument(skip(stream))]
fn play(stream: &ReplayLatest<Status>, location: &str) {
    let title = strip_path(location).to_string();
    let delivered = stream.emit(Status::Playing(title.clone()));
    info!(title = %title, delivered, "Playing");
}

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();

    let format = match args.get(1).map(String::as_str) {
        Some("json") => LogFormat::Json,
        Some("compact") => LogFormat::Compact,
        Some("pretty") => LogFormat::Pretty,
        _ => LogFormat::default(),
    };

    let mut config = LoggingConfig::default()
        .with_format(format)
        .with_level(LogLevel::Trace)
        .with_spans(true);
    if let Some(filter) = args.get(2) {
        config = config.with_filter(filter.clone());
    }

    if let Err(err) = init_logging(config) {
        eprintln!("Failed to initialize logging: {}", err);
        return;
    }

    info!(format = ?format, "Logging initialized");

    let stream = ReplayLatest::new();
    let mut early = stream.subscribe();

    play(&stream, "/sdcard/Music/Intro.mp3");
    stream.emit(Status::Paused);
    debug!(status = ?stream.latest(), "Latest status");

    let mut late = stream.subscribe();
    if let Some(status) = late.recv().await {
        info!(?status, "Late observer caught up");
    }

    let seen = early.drain();
    if seen.len() != 2 {
        warn!(count = seen.len(), "Early observer missed emissions");
    }
    info!(?seen, "Early observer history");
}
