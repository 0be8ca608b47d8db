//! Orchestrator state
//!
//! Everything the orchestrator mutates lives in [`OrchestratorState`] and is
//! only touched under the orchestrator's state lock.

use crate::engine::{EngineEvent, MediaDescriptor};
use karaplay_common::events::PlaybackPhase;
use karaplay_common::EntryId;

/// Identity of the entry currently being played
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentEntryRef {
    /// None exactly when no song (as opposed to the idle screen) is active
    pub playing_id: Option<EntryId>,

    /// Transition screen showing, song not started yet.
    /// Implies `playing_id.is_some()`.
    pub in_transition: bool,

    /// Song media waiting for the transition to end
    pub pending_media: Option<MediaDescriptor>,
}

impl CurrentEntryRef {
    /// Entry whose transition is about to play
    pub fn transition(entry_id: EntryId, song_media: MediaDescriptor) -> Self {
        Self {
            playing_id: Some(entry_id),
            in_transition: true,
            pending_media: Some(song_media),
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug)]
pub(crate) struct OrchestratorState {
    pub phase: PlaybackPhase,
    pub current: CurrentEntryRef,
    pub paused: bool,

    /// Load generation, bumped on every load, when a transition hands over
    /// to its song, when media ends or fails, and on stop
    pub generation: u64,
}

impl OrchestratorState {
    pub fn new() -> Self {
        Self {
            phase: PlaybackPhase::Idle,
            current: CurrentEntryRef::default(),
            paused: false,
            generation: 0,
        }
    }

    /// Start a new load generation and return it
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Whether an engine event belongs to a superseded load
    ///
    /// Events without a load id cannot be attributed and are accepted,
    /// except after a stop.
    pub fn is_stale(&self, event: &EngineEvent) -> bool {
        if self.phase == PlaybackPhase::Stopped {
            return true;
        }
        matches!(event.load_id, Some(load_id) if load_id != self.generation)
    }

    /// Forget the current entry and go back to an idle-eligible state
    pub fn reset_to_idle(&mut self) {
        self.current.clear();
        self.paused = false;
        self.phase = PlaybackPhase::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::EngineEventKind;

    #[test]
    fn test_initial_state() {
        let state = OrchestratorState::new();
        assert_eq!(state.phase, PlaybackPhase::Idle);
        assert_eq!(state.current, CurrentEntryRef::default());
        assert!(!state.paused);
        assert_eq!(state.generation, 0);
    }

    #[test]
    fn test_generation_is_monotonic() {
        let mut state = OrchestratorState::new();
        let first = state.next_generation();
        let second = state.next_generation();
        assert!(second > first);
        assert_eq!(state.generation, second);
    }

    #[test]
    fn test_stale_detection() {
        let mut state = OrchestratorState::new();
        let generation = state.next_generation();

        let current = EngineEvent::new(EngineEventKind::MediaEnded, Some(generation));
        let old = EngineEvent::new(EngineEventKind::MediaEnded, Some(generation - 1));
        let unknown = EngineEvent::new(EngineEventKind::MediaEnded, None);

        assert!(!state.is_stale(&current));
        assert!(state.is_stale(&old));
        assert!(!state.is_stale(&unknown));

        state.phase = PlaybackPhase::Stopped;
        assert!(state.is_stale(&current));
        assert!(state.is_stale(&unknown));
    }

    #[test]
    fn test_transition_identity_and_reset() {
        let mut state = OrchestratorState::new();
        state.current = CurrentEntryRef::transition(EntryId(42), MediaDescriptor::new("song.mp4"));
        state.phase = PlaybackPhase::TransitionLoading;
        state.paused = true;

        assert!(state.current.in_transition);
        assert_eq!(state.current.playing_id, Some(EntryId(42)));

        state.reset_to_idle();
        assert_eq!(state.current.playing_id, None);
        assert!(!state.current.in_transition);
        assert!(state.current.pending_media.is_none());
        assert!(!state.paused);
        assert_eq!(state.phase, PlaybackPhase::Idle);
    }
}
