//! Callback recorder

use karaplay_common::events::{CallbackName, PlayerEvent};
use karaplay_player::PlaybackOrchestrator;
use parking_lot::Mutex;
use std::sync::Arc;

/// Records every callback the orchestrator fires, in order
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<PlayerEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a recording handler for every callback name
    pub fn install(&self, orchestrator: &PlaybackOrchestrator) {
        for name in CallbackName::ALL {
            let events = Arc::clone(&self.events);
            orchestrator.set_callback(name, move |event| events.lock().push(event.clone()));
        }
    }

    pub fn events(&self) -> Vec<PlayerEvent> {
        self.events.lock().clone()
    }

    /// Callback names fired so far, in order
    pub fn names(&self) -> Vec<CallbackName> {
        self.events
            .lock()
            .iter()
            .filter_map(PlayerEvent::callback_name)
            .collect()
    }

    pub fn count(&self, name: CallbackName) -> usize {
        self.names().into_iter().filter(|n| *n == name).count()
    }

    /// Last event fired for `name`
    pub fn last(&self, name: CallbackName) -> Option<PlayerEvent> {
        self.events
            .lock()
            .iter()
            .rev()
            .find(|e| e.callback_name() == Some(name))
            .cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }
}
