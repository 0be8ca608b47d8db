//! Playback-related type definitions
//!
//! Supporting types for player callbacks and the orchestrator state machine.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of a user-facing player callback
///
/// Each name owns exactly one handler slot in the callback registry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CallbackName {
    StartedTransition,
    StartedSong,
    Finished,
    Paused,
    Resumed,
    Error,
    CouldNotPlay,
}

impl CallbackName {
    /// All callback names, in lifecycle order
    pub const ALL: [CallbackName; 7] = [
        CallbackName::StartedTransition,
        CallbackName::StartedSong,
        CallbackName::Finished,
        CallbackName::Paused,
        CallbackName::Resumed,
        CallbackName::Error,
        CallbackName::CouldNotPlay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CallbackName::StartedTransition => "started_transition",
            CallbackName::StartedSong => "started_song",
            CallbackName::Finished => "finished",
            CallbackName::Paused => "paused",
            CallbackName::Resumed => "resumed",
            CallbackName::Error => "error",
            CallbackName::CouldNotPlay => "could_not_play",
        }
    }
}

impl std::fmt::Display for CallbackName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CallbackName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CallbackName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| Error::InvalidInput(format!("Unknown callback name: {}", s)))
    }
}

/// Orchestrator playback phase
///
/// Pause is tracked separately so that resuming returns to the exact phase
/// that was paused.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackPhase {
    /// Idle screen (or nothing) on screen, no song current
    Idle,
    /// Transition screen requested, engine not started yet
    TransitionLoading,
    /// Transition screen showing
    TransitionPlaying,
    /// Song media handed to the engine
    SongPlaying,
    /// Player stopped by request
    Stopped,
}

impl std::fmt::Display for PlaybackPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PlaybackPhase::Idle => write!(f, "idle"),
            PlaybackPhase::TransitionLoading => write!(f, "transition_loading"),
            PlaybackPhase::TransitionPlaying => write!(f, "transition_playing"),
            PlaybackPhase::SongPlaying => write!(f, "song_playing"),
            PlaybackPhase::Stopped => write!(f, "stopped"),
        }
    }
}
