//! In-process simulated playback engine
//!
//! Records every command and delivers lifecycle events only when asked to,
//! on the calling thread, the way a real engine delivers them on its own
//! event thread. Used for dry runs and tests.

use super::{
    EngineEvent, EngineEventKind, EngineHandler, EngineState, MediaDescriptor, PlaybackEngine,
};
use crate::error::{Error, Result};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Number of most recent loads kept by [`SimulatedEngine::loads`]
pub const MAX_LOAD_RECORDS: usize = 64;

/// A media load as received by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadRecord {
    pub media: MediaDescriptor,
    pub overlay: Option<PathBuf>,
}

#[derive(Default)]
struct SimulatedInner {
    state: Option<EngineState>,
    loads: VecDeque<LoadRecord>,
    total_loads: usize,
    instance_parameters: Vec<String>,
    fullscreen: bool,
    time_ms: Option<u64>,
    error_message: Option<String>,
    handlers: HashMap<EngineEventKind, EngineHandler>,
    play_calls: usize,
    pause_calls: usize,
    stop_calls: usize,
    fail_commands: bool,
}

/// Scripted engine
pub struct SimulatedEngine {
    inner: Mutex<SimulatedInner>,
}

impl SimulatedEngine {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SimulatedInner::default()),
        }
    }

    /// Engine created with instance parameters and output mode
    pub fn with_options(instance_parameters: Vec<String>, fullscreen: bool) -> Self {
        debug!(
            "Simulated engine parameters: {:?}, fullscreen={}",
            instance_parameters, fullscreen
        );
        Self {
            inner: Mutex::new(SimulatedInner {
                instance_parameters,
                fullscreen,
                ..Default::default()
            }),
        }
    }

    pub fn instance_parameters(&self) -> Vec<String> {
        self.inner.lock().instance_parameters.clone()
    }

    pub fn fullscreen(&self) -> bool {
        self.inner.lock().fullscreen
    }

    /// Deliver an event about the currently loaded media
    pub fn emit(&self, kind: EngineEventKind) {
        let load_id = self.inner.lock().loads.back().map(|l| l.media.load_id);
        self.deliver(EngineEvent::new(kind, load_id));
    }

    /// Deliver an event about an arbitrary load (late or unknown media)
    pub fn emit_for_load(&self, kind: EngineEventKind, load_id: Option<u64>) {
        self.deliver(EngineEvent::new(kind, load_id));
    }

    fn deliver(&self, event: EngineEvent) {
        let handler = {
            let mut inner = self.inner.lock();
            inner.state = Some(match event.kind {
                EngineEventKind::MediaStarted => EngineState::Playing,
                EngineEventKind::MediaEnded => EngineState::Ended,
                EngineEventKind::EncounteredError => EngineState::Error,
            });
            inner.handlers.get(&event.kind).cloned()
        };

        debug!("Simulated engine delivering {:?}", event);
        if let Some(handler) = handler {
            handler(&event);
        }
    }

    /// Set the position reported by `get_time`
    pub fn set_time(&self, time_ms: Option<u64>) {
        self.inner.lock().time_ms = time_ms;
    }

    /// Set the message reported by `last_error_message`
    pub fn set_error_message(&self, message: Option<&str>) {
        self.inner.lock().error_message = message.map(str::to_string);
    }

    /// Make every subsequent command fail
    pub fn set_fail_commands(&self, fail: bool) {
        self.inner.lock().fail_commands = fail;
    }

    /// Most recent loads, oldest first
    pub fn loads(&self) -> Vec<LoadRecord> {
        self.inner.lock().loads.iter().cloned().collect()
    }

    pub fn last_load(&self) -> Option<LoadRecord> {
        self.inner.lock().loads.back().cloned()
    }

    /// Total number of loads since creation
    pub fn load_count(&self) -> usize {
        self.inner.lock().total_loads
    }

    pub fn play_calls(&self) -> usize {
        self.inner.lock().play_calls
    }

    pub fn pause_calls(&self) -> usize {
        self.inner.lock().pause_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.inner.lock().stop_calls
    }

    pub fn has_handler(&self, kind: EngineEventKind) -> bool {
        self.inner.lock().handlers.contains_key(&kind)
    }

    fn check_command(inner: &SimulatedInner, command: &str) -> Result<()> {
        if inner.fail_commands {
            return Err(Error::Engine(format!("simulated {} failure", command)));
        }
        Ok(())
    }
}

impl Default for SimulatedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackEngine for SimulatedEngine {
    fn name(&self) -> String {
        "Simulated engine".to_string()
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn load(&self, media: &MediaDescriptor, overlay: Option<&Path>) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::check_command(&inner, "load")?;
        if inner.loads.len() == MAX_LOAD_RECORDS {
            inner.loads.pop_front();
        }
        inner.loads.push_back(LoadRecord {
            media: media.clone(),
            overlay: overlay.map(Path::to_path_buf),
        });
        inner.total_loads += 1;
        inner.state = Some(EngineState::NothingSpecial);
        inner.time_ms = None;
        Ok(())
    }

    fn play(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::check_command(&inner, "play")?;
        inner.play_calls += 1;
        inner.state = Some(match inner.state {
            Some(EngineState::Paused) => EngineState::Playing,
            _ => EngineState::Opening,
        });
        Ok(())
    }

    fn pause(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::check_command(&inner, "pause")?;
        inner.pause_calls += 1;
        if matches!(inner.state, Some(EngineState::Playing) | Some(EngineState::Opening)) {
            inner.state = Some(EngineState::Paused);
        }
        Ok(())
    }

    fn stop(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        Self::check_command(&inner, "stop")?;
        inner.stop_calls += 1;
        inner.state = Some(EngineState::Stopped);
        inner.time_ms = None;
        Ok(())
    }

    fn get_state(&self) -> EngineState {
        self.inner.lock().state.unwrap_or(EngineState::NothingSpecial)
    }

    fn get_time(&self) -> Option<u64> {
        self.inner.lock().time_ms
    }

    fn subscribe(&self, kind: EngineEventKind, handler: EngineHandler) {
        self.inner.lock().handlers.insert(kind, handler);
    }

    fn last_error_message(&self) -> Option<String> {
        self.inner.lock().error_message.clone()
    }
}
