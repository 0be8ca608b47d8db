//! # karaplay Common Library
//!
//! Shared code for the karaplay player crates:
//! - Error types
//! - TOML configuration loading
//! - Playlist entry model
//! - Player event types (PlayerEvent enum) and EventBus
//! - Timestamp helpers

pub mod config;
pub mod entry;
pub mod error;
pub mod events;
pub mod time;

pub use entry::{EntryId, PlaylistEntry, Song};
pub use error::{Error, Result};
