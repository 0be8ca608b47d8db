//! Playback control - pause, resume, timing, stop and status queries

use super::PlaybackOrchestrator;
use crate::engine::EngineState;
use crate::error::Result;
use crate::playback::state::CurrentEntryRef;
use karaplay_common::events::{PlaybackPhase, PlayerEvent};
use karaplay_common::time::now;
use karaplay_common::EntryId;
use tracing::{debug, info, warn};

impl PlaybackOrchestrator {
    /// Pause (`true`) or resume (`false`) whatever is on screen
    ///
    /// Asking for the current pause state again does nothing and fires no
    /// callback.
    pub fn set_pause(&self, pause: bool) -> Result<()> {
        let entry_id = {
            let _commands = self.command_lock.lock();

            let entry_id = {
                let mut state = self.state.lock();
                if state.paused == pause {
                    debug!("Player already {}", if pause { "paused" } else { "playing" });
                    return Ok(());
                }
                state.paused = pause;
                state.current.playing_id
            };

            let result = if pause {
                self.engine.pause()
            } else {
                self.engine.play()
            };

            if let Err(e) = result {
                warn!("Engine refused to {}: {}", if pause { "pause" } else { "resume" }, e);
                self.state.lock().paused = !pause;
                return Err(e);
            }
            entry_id
        };

        let timing_ms = self.get_timing();
        let timestamp = now();
        if pause {
            info!("Paused entry {:?} at {} ms", entry_id, timing_ms);
            self.notify(PlayerEvent::PlaybackPaused {
                entry_id,
                timing_ms,
                timestamp,
            });
        } else {
            info!("Resumed entry {:?} at {} ms", entry_id, timing_ms);
            self.notify(PlayerEvent::PlaybackResumed {
                entry_id,
                timing_ms,
                timestamp,
            });
        }
        Ok(())
    }

    /// Position in the current song, in milliseconds
    ///
    /// 0 while the transition screen shows or when the engine has no
    /// position.
    pub fn get_timing(&self) -> u64 {
        if self.state.lock().current.in_transition {
            return 0;
        }
        self.engine.get_time().unwrap_or(0)
    }

    pub fn is_paused(&self) -> bool {
        let paused = self.state.lock().paused;
        paused || self.engine.get_state() == EngineState::Paused
    }

    /// No song is current (idle screen, stopped, or nothing loaded yet)
    pub fn is_idle(&self) -> bool {
        self.state.lock().current.playing_id.is_none()
    }

    /// Stop the engine and forget the current entry
    ///
    /// Events for anything loaded before are ignored from now on. The
    /// orchestrator can be used again afterwards.
    pub fn stop_player(&self) -> Result<()> {
        let _commands = self.command_lock.lock();

        {
            let mut state = self.state.lock();
            state.next_generation();
            state.current.clear();
            state.paused = false;
            state.phase = PlaybackPhase::Stopped;
        }

        info!("Stopping player");
        self.engine.stop()
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.state.lock().phase
    }

    pub fn playing_id(&self) -> Option<EntryId> {
        self.state.lock().current.playing_id
    }

    pub fn in_transition(&self) -> bool {
        self.state.lock().current.in_transition
    }

    /// Snapshot of the current entry identity
    pub fn current_entry(&self) -> CurrentEntryRef {
        self.state.lock().current.clone()
    }

    /// Current load generation
    pub fn load_generation(&self) -> u64 {
        self.state.lock().generation
    }
}
