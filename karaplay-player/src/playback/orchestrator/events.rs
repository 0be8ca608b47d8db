//! Engine event handlers and deferred commands
//!
//! Handlers run on the engine's event thread. They update state under the
//! state lock, notify listeners once the lock is released, and hand any
//! further engine command to the worker.

use super::PlaybackOrchestrator;
use crate::engine::{EngineEvent, MediaDescriptor};
use crate::playback::worker::WorkerCommand;
use karaplay_common::events::{PlaybackPhase, PlayerEvent};
use karaplay_common::time::now;
use karaplay_common::EntryId;
use tracing::{debug, error, info, warn};

/// Message reported when the engine gives no diagnostic
const NO_ERROR_DETAIL: &str = "No detail";

/// What a media end means for the current entry
enum EndAction {
    /// Transition over, song must start
    StartSong {
        entry_id: EntryId,
        media: Option<MediaDescriptor>,
        generation: u64,
    },
    /// Song over
    Finished(EntryId),
    /// Idle screen over, loop it
    RestartIdle(u64),
    Nothing,
}

impl PlaybackOrchestrator {
    /// Engine started rendering the current media
    pub fn handle_media_started(&self, event: &EngineEvent) {
        let started_transition = {
            let mut state = self.state.lock();
            if state.is_stale(event) {
                debug!("Ignoring stale media start {:?}", event.load_id);
                return;
            }

            match state.phase {
                // Engines report a start again on resume; only the first counts
                PlaybackPhase::TransitionLoading if state.current.in_transition => {
                    state.phase = PlaybackPhase::TransitionPlaying;
                    state.current.playing_id
                }
                _ if !state.current.in_transition && state.current.playing_id.is_some() => {
                    state.phase = PlaybackPhase::SongPlaying;
                    None
                }
                _ => None,
            }
        };

        if let Some(entry_id) = started_transition {
            info!("Transition screen started for entry {}", entry_id);
            self.notify(PlayerEvent::TransitionStarted {
                entry_id,
                timestamp: now(),
            });
        }
    }

    /// Engine reached the end of the current media
    pub fn handle_media_ended(&self, event: &EngineEvent) {
        let action = {
            let mut state = self.state.lock();
            if state.is_stale(event) {
                debug!("Ignoring stale media end {:?}", event.load_id);
                return;
            }

            if state.current.in_transition {
                state.current.in_transition = false;
                state.phase = PlaybackPhase::SongPlaying;
                // The song owns a new generation from here on, so late
                // transition events are stale even before the song loads
                let generation = state.next_generation();
                match state.current.playing_id {
                    Some(entry_id) => EndAction::StartSong {
                        entry_id,
                        media: state
                            .current
                            .pending_media
                            .take()
                            .map(|media| media.with_load_id(generation)),
                        generation,
                    },
                    None => EndAction::Nothing,
                }
            } else if let Some(entry_id) = state.current.playing_id {
                state.next_generation();
                state.reset_to_idle();
                EndAction::Finished(entry_id)
            } else if state.phase == PlaybackPhase::Idle {
                EndAction::RestartIdle(state.generation)
            } else {
                EndAction::Nothing
            }
        };

        match action {
            EndAction::StartSong {
                entry_id,
                media,
                generation,
            } => {
                info!("Transition over, starting song of entry {}", entry_id);
                self.notify(PlayerEvent::SongStarted {
                    entry_id,
                    timestamp: now(),
                });
                match media {
                    Some(media) => self.enqueue(WorkerCommand::PlayMedia { media, generation }),
                    None => warn!("No song media pending for entry {}", entry_id),
                }
            }
            EndAction::Finished(entry_id) => {
                info!("Song of entry {} finished", entry_id);
                self.notify(PlayerEvent::SongFinished {
                    entry_id,
                    timestamp: now(),
                });
            }
            EndAction::RestartIdle(generation) => {
                debug!("Idle screen ended, looping");
                self.enqueue(WorkerCommand::PlayIdle { generation });
            }
            EndAction::Nothing => {}
        }
    }

    /// Engine failed to play the current media
    ///
    /// Always returns to an idle-eligible state. The idle screen is not
    /// restarted; the listener decides.
    pub fn handle_encountered_error(&self, event: &EngineEvent) {
        let message = self
            .engine
            .last_error_message()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| NO_ERROR_DETAIL.to_string());

        let entry_id = {
            let mut state = self.state.lock();
            if state.is_stale(event) {
                debug!("Ignoring stale engine error {:?}", event.load_id);
                return;
            }

            let entry_id = state.current.playing_id;
            state.next_generation();
            state.reset_to_idle();
            entry_id
        };

        error!("Error while playing entry {:?}: {}", entry_id, message);
        self.notify(PlayerEvent::PlaybackError {
            entry_id,
            message,
            timestamp: now(),
        });
    }

    /// Execute a deferred command (worker side)
    pub(crate) fn run_command(&self, command: WorkerCommand) {
        match command {
            WorkerCommand::PlayMedia { media, generation } => {
                self.play_pending_media(media, generation)
            }
            WorkerCommand::PlayIdle { generation } => self.restart_idle_screen(generation),
        }
    }

    /// Load the song claimed by `generation`
    ///
    /// A pause requested after the transition ended holds: the song is
    /// loaded but not played until resumed.
    fn play_pending_media(&self, media: MediaDescriptor, generation: u64) {
        let failure = {
            let _commands = self.command_lock.lock();

            let (entry_id, paused) = {
                let state = self.state.lock();
                if state.generation != generation || state.phase != PlaybackPhase::SongPlaying {
                    debug!("Song load for generation {} superseded, skipping", generation);
                    return;
                }
                (state.current.playing_id, state.paused)
            };

            info!("Playing song {}", media.path.display());
            let result = self.engine.load(&media, None).and_then(|_| {
                if paused {
                    debug!("Player paused, song loaded without playing");
                    Ok(())
                } else {
                    self.engine.play()
                }
            });
            result.err().map(|e| (e, entry_id))
        };

        if let Some((e, entry_id)) = failure {
            error!("Failed to start song: {}", e);
            let cleared = {
                let mut state = self.state.lock();
                let current = state.generation == generation;
                if current {
                    state.next_generation();
                    state.reset_to_idle();
                }
                current
            };
            if cleared {
                self.notify(PlayerEvent::PlaybackError {
                    entry_id,
                    message: e.to_string(),
                    timestamp: now(),
                });
            }
        }
    }

    fn restart_idle_screen(&self, generation: u64) {
        if let Err(e) = self.load_idle_screen(Some(generation)) {
            error!("Failed to restart idle screen: {}", e);
            self.notify(PlayerEvent::WorkerFailed {
                message: e.to_string(),
                timestamp: now(),
            });
        }
    }
}
