//! Test helper modules for karaplay-player integration tests
//!
//! Provides reusable test infrastructure components:
//! - TestPlayer: Orchestrator wired to a simulated engine in a temp directory
//! - EventRecorder: Captures every callback firing
//! - FailingTextProvider: Overlay provider that always fails

pub mod recorder;
pub mod test_player;

pub use recorder::EventRecorder;
pub use test_player::{wait_until, FailingTextProvider, TestPlayer, SONG_FILE};
