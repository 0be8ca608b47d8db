//! # karaplay Player Library (karaplay-player)
//!
//! Playback orchestration for a karaoke player.
//!
//! **Purpose:** Sequence the idle screen, transition screens and songs on an
//! external playback engine, react to the engine's events and notify
//! listeners of every state change.
//!
//! **Architecture:** [`PlaybackOrchestrator`] drives a [`PlaybackEngine`]
//! trait object. Engine events arrive on the engine's thread; follow-up
//! engine commands run on a tokio command worker.

pub mod background;
pub mod callbacks;
pub mod engine;
pub mod error;
pub mod playback;
pub mod text;

pub use background::{BackgroundResolver, Backgrounds};
pub use callbacks::{Callback, CallbackRegistry};
pub use engine::{EngineEvent, EngineEventKind, MediaDescriptor, PlaybackEngine, SimulatedEngine};
pub use error::{Error, Result};
pub use playback::PlaybackOrchestrator;
pub use text::{AssTextWriter, IdleContext, ScreenTextProvider};
