//! Playback engine abstraction
//!
//! The player does not decode or render anything itself. It drives an
//! external engine through [`PlaybackEngine`] and reacts to the lifecycle
//! events the engine delivers from its own thread.

pub mod simulated;

pub use simulated::SimulatedEngine;

use crate::error::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Engine backend state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    NothingSpecial,
    Opening,
    Buffering,
    Playing,
    Paused,
    Ended,
    Error,
    Stopped,
}

/// Lifecycle events the player subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineEventKind {
    MediaStarted,
    MediaEnded,
    EncounteredError,
}

/// Event delivered by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineEvent {
    pub kind: EngineEventKind,

    /// `load_id` of the media the event concerns, as given in the
    /// [`MediaDescriptor`]. None when the engine cannot tell.
    pub load_id: Option<u64>,
}

impl EngineEvent {
    pub fn new(kind: EngineEventKind, load_id: Option<u64>) -> Self {
        Self { kind, load_id }
    }
}

/// Handler subscribed to engine events
pub type EngineHandler = Arc<dyn Fn(&EngineEvent) + Send + Sync>;

/// Media handed to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaDescriptor {
    pub path: PathBuf,

    /// Engine-specific media options
    pub options: Vec<String>,

    /// How long a still image should stay on screen
    pub display_duration: Option<Duration>,

    /// Load generation, echoed back in [`EngineEvent::load_id`]
    pub load_id: u64,
}

impl MediaDescriptor {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            options: Vec::new(),
            display_duration: None,
            load_id: 0,
        }
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = options;
        self
    }

    pub fn with_display_duration(mut self, duration: Duration) -> Self {
        self.display_duration = Some(duration);
        self
    }

    pub fn with_load_id(mut self, load_id: u64) -> Self {
        self.load_id = load_id;
        self
    }
}

/// Capability the player needs from a playback engine
///
/// Implementations deliver events on whatever thread they like, possibly
/// concurrently with calls to the other methods. Handlers must not be
/// invoked while the engine holds a lock needed by `load`/`play`/`pause`/
/// `stop`, since handlers may lead to further commands.
pub trait PlaybackEngine: Send + Sync {
    /// Engine name, shown on the idle screen
    fn name(&self) -> String;

    /// Engine version, shown on the idle screen
    fn version(&self) -> String;

    /// Replace the current media, with an optional subtitle overlay
    fn load(&self, media: &MediaDescriptor, overlay: Option<&Path>) -> Result<()>;

    fn play(&self) -> Result<()>;

    fn pause(&self) -> Result<()>;

    fn stop(&self) -> Result<()>;

    fn get_state(&self) -> EngineState;

    /// Current position in milliseconds, None when undefined
    fn get_time(&self) -> Option<u64>;

    /// Route events of `kind` to `handler`
    fn subscribe(&self, kind: EngineEventKind, handler: EngineHandler);

    /// Last diagnostic message, if any
    fn last_error_message(&self) -> Option<String>;
}
