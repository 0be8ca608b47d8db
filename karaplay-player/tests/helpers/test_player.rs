//! Orchestrator test fixture
//!
//! Lays out a temporary installation (bundled backgrounds, a kara folder
//! with one song, an overlay directory) and starts an orchestrator on a
//! [`SimulatedEngine`].

use super::EventRecorder;
use karaplay_common::config::{PlayerConfig, IDLE_BG_NAME, TRANSITION_BG_NAME};
use karaplay_common::{PlaylistEntry, Song};
use karaplay_player::text::IdleContext;
use karaplay_player::{
    AssTextWriter, EngineEventKind, Error, PlaybackOrchestrator, Result, ScreenTextProvider,
    SimulatedEngine,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

/// Song present in the kara folder
pub const SONG_FILE: &str = "song.mp4";

pub struct TestPlayer {
    pub dir: TempDir,
    pub engine: Arc<SimulatedEngine>,
    pub orchestrator: Arc<PlaybackOrchestrator>,
    pub recorder: EventRecorder,
}

impl TestPlayer {
    /// Started player with default configuration
    ///
    /// Must be called from within a tokio runtime.
    pub fn start() -> Self {
        Self::start_with(|_, _| {})
    }

    /// Started player, letting the test adjust the configuration first
    pub fn start_with(configure: impl FnOnce(&mut PlayerConfig, &Path)) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut config = base_config(dir.path());
        configure(&mut config, dir.path());

        let text_provider = Arc::new(AssTextWriter::new(dir.path().join("text")));
        Self::start_in(dir, &config, text_provider)
    }

    /// Started player whose overlays always fail
    pub fn start_with_failing_text() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = base_config(dir.path());
        Self::start_in(dir, &config, Arc::new(FailingTextProvider))
    }

    fn start_in(
        dir: TempDir,
        config: &PlayerConfig,
        text_provider: Arc<dyn ScreenTextProvider>,
    ) -> Self {
        let engine = Arc::new(SimulatedEngine::new());
        let orchestrator =
            PlaybackOrchestrator::new(config, engine.clone(), text_provider).unwrap();
        let recorder = EventRecorder::new();
        recorder.install(&orchestrator);
        orchestrator.start().unwrap();

        Self {
            dir,
            engine,
            orchestrator,
            recorder,
        }
    }

    pub fn kara_folder(&self) -> PathBuf {
        self.dir.path().join("karas")
    }

    pub fn bundled_dir(&self) -> PathBuf {
        self.dir.path().join("bundled")
    }

    pub fn text_dir(&self) -> PathBuf {
        self.dir.path().join("text")
    }

    /// Entry pointing at the song of the kara folder
    pub fn entry(&self, id: u64) -> PlaylistEntry {
        PlaylistEntry::new(id, Song::new(SONG_FILE))
    }

    /// Play an entry through its transition until the song is loaded
    pub async fn play_to_song(&self, entry: &PlaylistEntry) {
        self.orchestrator.play_playlist_entry(entry).unwrap();
        self.engine.emit(EngineEventKind::MediaStarted);

        let loads = self.engine.load_count();
        self.engine.emit(EngineEventKind::MediaEnded);
        wait_until(|| self.engine.load_count() > loads).await;
        self.engine.emit(EngineEventKind::MediaStarted);
    }
}

fn base_config(root: &Path) -> PlayerConfig {
    let bundled = root.join("bundled");
    let karas = root.join("karas");
    let text = root.join("text");
    for dir in [&bundled, &karas, &text] {
        std::fs::create_dir_all(dir).unwrap();
    }
    std::fs::write(bundled.join(TRANSITION_BG_NAME), b"png").unwrap();
    std::fs::write(bundled.join(IDLE_BG_NAME), b"png").unwrap();
    std::fs::write(karas.join(SONG_FILE), b"mp4").unwrap();

    let mut config = PlayerConfig::default();
    config.kara_folder = karas;
    config.backgrounds.default_directory = Some(bundled);
    config
}

/// Overlay provider simulating a broken installation
pub struct FailingTextProvider;

impl ScreenTextProvider for FailingTextProvider {
    fn create_idle_text(&self, _context: &IdleContext) -> Result<PathBuf> {
        Err(Error::TextProvider("fonts missing".to_string()))
    }

    fn create_transition_text(&self, _entry: &PlaylistEntry) -> Result<PathBuf> {
        Err(Error::TextProvider("fonts missing".to_string()))
    }
}

/// Poll `condition` until it holds, failing the test after two seconds
pub async fn wait_until(condition: impl Fn() -> bool) {
    for _ in 0..400 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("Condition not reached within 2 seconds");
}
