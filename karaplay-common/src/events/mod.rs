//! Event types for the karaplay event system
//!
//! Every player callback firing is mirrored as a [`PlayerEvent`] on an
//! [`EventBus`], so that listeners other than the single registered callback
//! (UI, logging, diagnostics) can observe playback.

mod playback_types;

pub use playback_types::{CallbackName, PlaybackPhase};

use crate::EntryId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Player event types
///
/// Serialized with a `type` tag for transmission to remote listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// Transition screen started for an entry
    TransitionStarted {
        entry_id: EntryId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Transition ended and the song itself is starting
    SongStarted {
        entry_id: EntryId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Song reached its end
    ///
    /// The player does not advance by itself; the listener decides what
    /// plays next.
    SongFinished {
        entry_id: EntryId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback paused
    PlaybackPaused {
        /// None when the idle screen was paused
        entry_id: Option<EntryId>,
        /// Position when paused (milliseconds)
        timing_ms: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback resumed
    PlaybackResumed {
        entry_id: Option<EntryId>,
        timing_ms: u64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Engine reported an error while playing
    PlaybackError {
        entry_id: Option<EntryId>,
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Entry media file missing, nothing was played
    CouldNotPlay {
        entry_id: EntryId,
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Background command worker failed (not tied to a callback)
    WorkerFailed {
        message: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl PlayerEvent {
    /// Callback slot this event is delivered to
    ///
    /// `WorkerFailed` has no callback; it is only broadcast.
    pub fn callback_name(&self) -> Option<CallbackName> {
        match self {
            PlayerEvent::TransitionStarted { .. } => Some(CallbackName::StartedTransition),
            PlayerEvent::SongStarted { .. } => Some(CallbackName::StartedSong),
            PlayerEvent::SongFinished { .. } => Some(CallbackName::Finished),
            PlayerEvent::PlaybackPaused { .. } => Some(CallbackName::Paused),
            PlayerEvent::PlaybackResumed { .. } => Some(CallbackName::Resumed),
            PlayerEvent::PlaybackError { .. } => Some(CallbackName::Error),
            PlayerEvent::CouldNotPlay { .. } => Some(CallbackName::CouldNotPlay),
            PlayerEvent::WorkerFailed { .. } => None,
        }
    }

    /// Entry the event refers to, if any
    pub fn entry_id(&self) -> Option<EntryId> {
        match self {
            PlayerEvent::TransitionStarted { entry_id, .. }
            | PlayerEvent::SongStarted { entry_id, .. }
            | PlayerEvent::SongFinished { entry_id, .. }
            | PlayerEvent::CouldNotPlay { entry_id, .. } => Some(*entry_id),
            PlayerEvent::PlaybackPaused { entry_id, .. }
            | PlayerEvent::PlaybackResumed { entry_id, .. }
            | PlayerEvent::PlaybackError { entry_id, .. } => *entry_id,
            PlayerEvent::WorkerFailed { .. } => None,
        }
    }

    /// Playback position carried by pause/resume events
    pub fn timing_ms(&self) -> Option<u64> {
        match self {
            PlayerEvent::PlaybackPaused { timing_ms, .. }
            | PlayerEvent::PlaybackResumed { timing_ms, .. } => Some(*timing_ms),
            _ => None,
        }
    }

    /// Error message carried by failure events
    pub fn message(&self) -> Option<&str> {
        match self {
            PlayerEvent::PlaybackError { message, .. }
            | PlayerEvent::WorkerFailed { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Broadcast bus for player events
///
/// Lagging receivers lose the oldest events; emitting never blocks.
pub struct EventBus {
    tx: broadcast::Sender<PlayerEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Examples
    ///
    /// ```
    /// use karaplay_common::events::EventBus;
    ///
    /// let event_bus = EventBus::new(100);
    /// assert_eq!(event_bus.capacity(), 100);
    /// ```
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the number of subscribers that received it. Having no
    /// subscriber is normal and not an error.
    pub fn emit(&self, event: PlayerEvent) -> usize {
        self.tx.send(event).unwrap_or(0)
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
