//! Playlist entry model
//!
//! Entries arrive from the server-sync layer as JSON and are handed to the
//! player unchanged. The song metadata is opaque to the player and only
//! passed through to overlay rendering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Opaque identifier of a playlist entry
///
/// Used to correlate player callbacks with server-side state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntryId {
    fn from(id: u64) -> Self {
        EntryId(id)
    }
}

/// Song carried by a playlist entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    /// Media file, relative to the karaoke folder unless absolute
    pub file_path: PathBuf,

    /// Everything else the server sent (title, artists, works...)
    #[serde(flatten)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
}

impl Song {
    /// Create a song with no metadata
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            metadata: serde_json::Map::new(),
        }
    }

    /// Title from metadata, if the server provided one
    pub fn title(&self) -> Option<&str> {
        self.metadata.get("title").and_then(|v| v.as_str())
    }
}

/// A single queued request to play a song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaylistEntry {
    pub id: EntryId,
    pub song: Song,
}

impl PlaylistEntry {
    pub fn new(id: impl Into<EntryId>, song: Song) -> Self {
        Self {
            id: id.into(),
            song,
        }
    }
}
