//! Playback orchestrator
//!
//! **Module Structure:**
//! - `core.rs`: Construction, startup, idle and playlist entry loads
//! - `events.rs`: Engine event handlers and worker commands
//! - `control.rs`: Pause/resume, timing, stop and status accessors

mod control;
mod core;
mod events;

pub use self::core::PlaybackOrchestrator;
