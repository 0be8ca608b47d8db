//! karaplay player - demo entry point
//!
//! Drives the playback orchestrator against the in-process simulated engine:
//! shows the idle screen, then plays each requested song (transition first),
//! scripting the engine events a real engine would deliver.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use karaplay_common::config::PlayerConfig;
use karaplay_common::events::{CallbackName, PlayerEvent};
use karaplay_common::{PlaylistEntry, Song};
use karaplay_player::{
    AssTextWriter, EngineEventKind, PlaybackEngine, PlaybackOrchestrator, SimulatedEngine,
};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for karaplay-player
#[derive(Parser, Debug)]
#[command(name = "karaplay-player")]
#[command(about = "Karaoke playback orchestrator (simulated engine)")]
#[command(version)]
struct Args {
    /// Configuration file (TOML)
    #[arg(short, long, env = "KARAPLAY_CONFIG")]
    config: Option<PathBuf>,

    /// Song to play, relative to the kara folder (repeatable)
    #[arg(short, long = "song")]
    songs: Vec<PathBuf>,

    /// Simulated song length in seconds
    #[arg(long, default_value = "3")]
    song_length: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => PlayerConfig::load(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => PlayerConfig::default(),
    };

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.logging.level.as_str().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting karaplay player {}", env!("CARGO_PKG_VERSION"));
    info!("Kara folder: {}", config.kara_folder.display());

    let text_dir = tempfile::tempdir().context("Failed to create overlay directory")?;
    let engine = Arc::new(SimulatedEngine::with_options(
        config.engine.instance_parameters.clone(),
        config.fullscreen,
    ));
    let orchestrator = PlaybackOrchestrator::new(
        &config,
        engine.clone(),
        Arc::new(AssTextWriter::new(text_dir.path())),
    )
    .context("Failed to initialize playback orchestrator")?;

    for name in CallbackName::ALL {
        orchestrator.set_callback(name, log_event);
    }
    orchestrator.start().context("Failed to start playback orchestrator")?;
    orchestrator
        .play_idle_screen()
        .context("Failed to show idle screen")?;

    let song_length = Duration::from_secs(args.song_length);
    tokio::select! {
        result = run_playlist(&orchestrator, &engine, &args.songs, song_length) => result?,
        _ = signal::ctrl_c() => info!("Received Ctrl+C, shutting down"),
    }

    orchestrator
        .stop_player()
        .context("Failed to stop player")?;
    info!("Player stopped");
    Ok(())
}

fn log_event(event: &PlayerEvent) {
    match serde_json::to_string(event) {
        Ok(json) => info!("Player event: {}", json),
        Err(e) => warn!("Unserializable player event {:?}: {}", event, e),
    }
}

/// Play each song in turn, emitting the engine events by hand
async fn run_playlist(
    orchestrator: &Arc<PlaybackOrchestrator>,
    engine: &Arc<SimulatedEngine>,
    songs: &[PathBuf],
    song_length: Duration,
) -> Result<()> {
    let durations = orchestrator.durations();

    for (index, path) in songs.iter().enumerate() {
        let entry = PlaylistEntry::new(index as u64 + 1, Song::new(path));
        orchestrator
            .play_playlist_entry(&entry)
            .with_context(|| format!("Failed to play entry {}", entry.id))?;
        if orchestrator.is_idle() {
            continue;
        }

        engine.emit(EngineEventKind::MediaStarted);
        tokio::time::sleep(durations.transition).await;

        // The worker loads the song once the transition ends
        let loads = engine.load_count();
        engine.emit(EngineEventKind::MediaEnded);
        while engine.load_count() == loads {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        engine.emit(EngineEventKind::MediaStarted);

        let half = song_length / 2;
        tokio::time::sleep(half).await;
        engine.set_time(Some(half.as_millis() as u64));
        orchestrator.set_pause(true)?;
        orchestrator.set_pause(false)?;
        tokio::time::sleep(song_length - half).await;
        engine.emit(EngineEventKind::MediaEnded);

        orchestrator.play_idle_screen()?;
    }

    info!(
        "Playlist done, idle screen showing ({} engine)",
        engine.name()
    );
    Ok(())
}
