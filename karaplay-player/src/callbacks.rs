//! Callback registry
//!
//! Single-slot tables: one handler per player callback name and one handler
//! per engine event kind. Registering again replaces the previous handler;
//! there is no fan-out. Listeners wanting every event use the event bus.

use crate::engine::{EngineEventKind, EngineHandler, PlaybackEngine};
use karaplay_common::events::{CallbackName, PlayerEvent};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// User-facing callback
pub type Callback = Arc<dyn Fn(&PlayerEvent) + Send + Sync>;

/// Named-slot registry for player and engine callbacks
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: RwLock<HashMap<CallbackName, Callback>>,
    engine_callbacks: RwLock<HashMap<EngineEventKind, EngineHandler>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign the handler of a callback, replacing any previous one
    pub fn set_callback<F>(&self, name: CallbackName, handler: F)
    where
        F: Fn(&PlayerEvent) + Send + Sync + 'static,
    {
        let previous = self.callbacks.write().insert(name, Arc::new(handler));
        if previous.is_some() {
            debug!("Replaced handler of callback '{}'", name);
        }
    }

    /// Handler of a callback, if assigned
    ///
    /// The handler is cloned out of the table so it can be invoked without
    /// holding the registry lock.
    pub fn get_callback(&self, name: CallbackName) -> Option<Callback> {
        self.callbacks.read().get(&name).cloned()
    }

    /// Record an engine event handler and subscribe it to the engine
    pub fn set_engine_callback(
        &self,
        engine: &dyn PlaybackEngine,
        kind: EngineEventKind,
        handler: EngineHandler,
    ) {
        self.engine_callbacks
            .write()
            .insert(kind, Arc::clone(&handler));
        engine.subscribe(kind, handler);
    }

    pub fn get_engine_callback(&self, kind: EngineEventKind) -> Option<EngineHandler> {
        self.engine_callbacks.read().get(&kind).cloned()
    }
}
