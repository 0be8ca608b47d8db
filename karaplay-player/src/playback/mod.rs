//! Playback orchestration: state machine, engine event handling and the
//! command worker

pub mod orchestrator;
pub mod state;
pub(crate) mod worker;

pub use orchestrator::PlaybackOrchestrator;
pub use state::CurrentEntryRef;
