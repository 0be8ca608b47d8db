//! Core orchestrator - construction, lifecycle and load operations
//!
//! **Responsibilities:**
//! - PlaybackOrchestrator struct definition and initialization
//! - Engine handler registration and worker startup
//! - Idle screen and playlist entry loads
//! - Callback/event bus notification

use crate::background::{BackgroundResolver, Backgrounds};
use crate::callbacks::{Callback, CallbackRegistry};
use crate::engine::{EngineEvent, EngineEventKind, MediaDescriptor, PlaybackEngine};
use crate::error::{Error, Result};
use crate::playback::state::{CurrentEntryRef, OrchestratorState};
use crate::playback::worker::{spawn_worker, WorkerCommand};
use crate::text::{IdleContext, ScreenTextProvider};
use karaplay_common::config::{Durations, PlayerConfig};
use karaplay_common::events::{CallbackName, EventBus, PlaybackPhase, PlayerEvent};
use karaplay_common::PlaylistEntry;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, warn};

/// Event bus buffer
const EVENT_BUS_CAPACITY: usize = 100;

/// Playback orchestrator - sequences idle, transition and song media
///
/// All mutable state sits behind `state`. Engine command sequences are
/// serialized by `command_lock`, which engine event handlers never take.
/// Neither lock is held while user callbacks run.
pub struct PlaybackOrchestrator {
    pub(super) engine: Arc<dyn PlaybackEngine>,

    pub(super) text_provider: Arc<dyn ScreenTextProvider>,

    pub(super) callbacks: CallbackRegistry,

    /// Mirror of every callback firing
    pub(super) event_bus: EventBus,

    pub(super) backgrounds: Backgrounds,

    pub(super) durations: Durations,

    /// Song paths are relative to this folder
    pub(super) kara_folder: PathBuf,

    /// Options attached to every media
    pub(super) media_parameters: Vec<String>,

    pub(super) state: Mutex<OrchestratorState>,

    pub(super) command_lock: Mutex<()>,

    pub(super) command_tx: mpsc::UnboundedSender<WorkerCommand>,

    /// Taken by `start`
    command_rx: Mutex<Option<mpsc::UnboundedReceiver<WorkerCommand>>>,
}

impl PlaybackOrchestrator {
    /// Create a new orchestrator
    ///
    /// Resolves backgrounds and durations once. A missing background is a
    /// configuration error and the only fatal failure of this layer.
    pub fn new(
        config: &PlayerConfig,
        engine: Arc<dyn PlaybackEngine>,
        text_provider: Arc<dyn ScreenTextProvider>,
    ) -> Result<Arc<Self>> {
        let backgrounds = BackgroundResolver::from_config(&config.backgrounds).resolve()?;
        let durations = config.durations.resolve();

        info!(
            "Creating playback orchestrator: transition={:?}, idle={:?}",
            durations.transition, durations.idle
        );
        debug!(
            "Backgrounds: transition={}, idle={}",
            backgrounds.transition.display(),
            backgrounds.idle.display()
        );

        let (command_tx, command_rx) = mpsc::unbounded_channel();

        Ok(Arc::new(Self {
            engine,
            text_provider,
            callbacks: CallbackRegistry::new(),
            event_bus: EventBus::new(EVENT_BUS_CAPACITY),
            backgrounds,
            durations,
            kara_folder: config.kara_folder.clone(),
            media_parameters: config.engine.media_parameters.clone(),
            state: Mutex::new(OrchestratorState::new()),
            command_lock: Mutex::new(()),
            command_tx,
            command_rx: Mutex::new(Some(command_rx)),
        }))
    }

    /// Subscribe to engine events and start the command worker
    ///
    /// Must be called from within a tokio runtime, once.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        let handle = Handle::try_current()
            .map_err(|e| Error::Internal(format!("No tokio runtime to run the worker: {}", e)))?;

        let command_rx = self
            .command_rx
            .lock()
            .take()
            .ok_or_else(|| Error::InvalidState("Orchestrator already started".to_string()))?;

        self.register_engine_handler(EngineEventKind::MediaStarted, Self::handle_media_started);
        self.register_engine_handler(EngineEventKind::MediaEnded, Self::handle_media_ended);
        self.register_engine_handler(
            EngineEventKind::EncounteredError,
            Self::handle_encountered_error,
        );

        spawn_worker(&handle, Arc::downgrade(self), command_rx);
        info!("Playback orchestrator started");
        Ok(())
    }

    fn register_engine_handler(
        self: &Arc<Self>,
        kind: EngineEventKind,
        method: fn(&Self, &EngineEvent),
    ) {
        let weak = Arc::downgrade(self);
        self.callbacks.set_engine_callback(
            self.engine.as_ref(),
            kind,
            Arc::new(move |event: &EngineEvent| {
                if let Some(orchestrator) = weak.upgrade() {
                    method(&orchestrator, event);
                }
            }),
        );
    }

    /// Assign the handler of a player callback (last registration wins)
    pub fn set_callback<F>(&self, name: CallbackName, handler: F)
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        self.callbacks.set_callback(name, handler);
    }

    pub fn get_callback(&self, name: CallbackName) -> Option<Callback> {
        self.callbacks.get_callback(name)
    }

    pub fn callbacks(&self) -> &CallbackRegistry {
        &self.callbacks
    }

    /// Receive every player event from now on
    pub fn subscribe_events(&self) -> broadcast::Receiver<PlayerEvent> {
        self.event_bus.subscribe()
    }

    pub fn backgrounds(&self) -> &Backgrounds {
        &self.backgrounds
    }

    pub fn durations(&self) -> Durations {
        self.durations
    }

    /// Broadcast an event and run its callback, if one is assigned
    ///
    /// Must not be called with `state` or `command_lock` held.
    pub(super) fn notify(&self, event: PlayerEvent) {
        self.event_bus.emit(event.clone());

        let callback = event
            .callback_name()
            .and_then(|name| self.callbacks.get_callback(name));
        if let Some(callback) = callback {
            callback(&event);
        }
    }

    pub(super) fn enqueue(&self, command: WorkerCommand) {
        if self.command_tx.send(command).is_err() {
            warn!("Command worker is gone, dropping command");
        }
    }

    fn media(&self, path: impl Into<PathBuf>) -> MediaDescriptor {
        MediaDescriptor::new(path).with_options(self.media_parameters.clone())
    }

    /// Show the idle screen
    ///
    /// Reloads when already idle. No callback fires.
    pub fn play_idle_screen(&self) -> Result<()> {
        self.load_idle_screen(None).map(|_| ())
    }

    /// Load the idle screen, only if `expected_generation` is still current
    /// and no song took over in the meantime
    ///
    /// Returns whether the idle screen was loaded.
    pub(super) fn load_idle_screen(&self, expected_generation: Option<u64>) -> Result<bool> {
        let _commands = self.command_lock.lock();

        let context = IdleContext {
            notes: vec![
                format!("{} {}", self.engine.name(), self.engine.version()),
                format!("karaplay {}", env!("CARGO_PKG_VERSION")),
            ],
        };
        let overlay = self.text_provider.create_idle_text(&context)?;

        let media = {
            let mut state = self.state.lock();
            if let Some(expected) = expected_generation {
                if state.generation != expected || state.current.playing_id.is_some() {
                    debug!("Idle screen restart superseded, skipping");
                    return Ok(false);
                }
            }

            let generation = state.next_generation();
            state.reset_to_idle();
            self.media(&self.backgrounds.idle)
                .with_display_duration(self.durations.idle)
                .with_load_id(generation)
        };

        debug!("Playing idle screen {}", media.path.display());
        self.engine.load(&media, Some(&overlay))?;
        self.engine.play()?;
        Ok(true)
    }

    /// Play a playlist entry, transition screen first
    ///
    /// A missing media file fires `could_not_play` and leaves both the
    /// orchestrator and the engine untouched. Preempts whatever is playing.
    pub fn play_playlist_entry(&self, entry: &PlaylistEntry) -> Result<()> {
        let file_path = self.kara_folder.join(&entry.song.file_path);
        if !file_path.is_file() {
            warn!("File not found '{}'", file_path.display());
            self.notify(PlayerEvent::CouldNotPlay {
                entry_id: entry.id,
                timestamp: karaplay_common::time::now(),
            });
            return Ok(());
        }

        let result = {
            let _commands = self.command_lock.lock();

            let overlay = self.text_provider.create_transition_text(entry)?;

            let (transition, generation) = {
                let mut state = self.state.lock();
                let generation = state.next_generation();
                state.current = CurrentEntryRef::transition(entry.id, self.media(&file_path));
                state.paused = false;
                state.phase = PlaybackPhase::TransitionLoading;

                let transition = self
                    .media(&self.backgrounds.transition)
                    .with_display_duration(self.durations.transition)
                    .with_load_id(generation);
                (transition, generation)
            };

            info!("Playing transition for entry {} ({})", entry.id, file_path.display());
            self.engine
                .load(&transition, Some(&overlay))
                .and_then(|_| self.engine.play())
                .map_err(|e| (e, generation))
        };

        result.map_err(|(e, generation)| {
            self.abandon_load(generation);
            e
        })
    }

    /// Forget an entry whose load the engine refused
    fn abandon_load(&self, generation: u64) {
        let mut state = self.state.lock();
        if state.generation == generation {
            state.reset_to_idle();
        }
    }
}
