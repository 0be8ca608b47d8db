//! Screen text (overlay) provider
//!
//! The orchestrator asks a [`ScreenTextProvider`] for a subtitle file to lay
//! over the idle and transition backgrounds. Rendering is the provider's
//! business; a failure means a broken installation and is not retried.

use crate::error::Result;
use karaplay_common::PlaylistEntry;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Idle overlay file name
pub const IDLE_TEXT_NAME: &str = "idle.ass";

/// Transition overlay file name
pub const TRANSITION_TEXT_NAME: &str = "transition.ass";

/// Information shown on the idle screen
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdleContext {
    /// Free-form lines (engine and player versions)
    pub notes: Vec<String>,
}

/// Produces overlay files for the idle and transition screens
pub trait ScreenTextProvider: Send + Sync {
    fn create_idle_text(&self, context: &IdleContext) -> Result<PathBuf>;

    fn create_transition_text(&self, entry: &PlaylistEntry) -> Result<PathBuf>;
}

const ASS_HEADER: &str = "[Script Info]
ScriptType: v4.00+
PlayResX: 1280
PlayResY: 720

[V4+ Styles]
Format: Name, Fontname, Fontsize, PrimaryColour, SecondaryColour, OutlineColour, BackColour, Bold, Italic, Underline, StrikeOut, ScaleX, ScaleY, Spacing, Angle, BorderStyle, Outline, Shadow, Alignment, MarginL, MarginR, MarginV, Encoding
Style: Default,Sans,42,&H00FFFFFF,&H000000FF,&H00000000,&H80000000,0,0,0,0,100,100,0,0,1,2,0,5,20,20,20,1

[Events]
Format: Layer, Start, End, Style, Name, MarginL, MarginR, MarginV, Effect, Text
";

/// Writes bare ASS overlays into a directory
///
/// The same two files are rewritten on every call.
pub struct AssTextWriter {
    output_dir: PathBuf,
}

impl AssTextWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write(&self, name: &str, lines: &[String]) -> Result<PathBuf> {
        let mut content = String::from(ASS_HEADER);
        for line in lines {
            content.push_str("Dialogue: 0,0:00:00.00,9:59:59.99,Default,,0,0,0,,");
            content.push_str(&escape_ass(line));
            content.push('\n');
        }

        let path = self.output_dir.join(name);
        std::fs::write(&path, content)?;
        debug!("Created screen text file in {}", path.display());
        Ok(path)
    }
}

impl ScreenTextProvider for AssTextWriter {
    fn create_idle_text(&self, context: &IdleContext) -> Result<PathBuf> {
        self.write(IDLE_TEXT_NAME, &context.notes)
    }

    fn create_transition_text(&self, entry: &PlaylistEntry) -> Result<PathBuf> {
        let title = entry
            .song
            .title()
            .map(str::to_string)
            .or_else(|| {
                entry
                    .song
                    .file_path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .unwrap_or_default();

        self.write(TRANSITION_TEXT_NAME, &[title])
    }
}

// Braces start override blocks and newlines end the event line
fn escape_ass(text: &str) -> String {
    text.replace('{', "\\{")
        .replace('}', "\\}")
        .replace('\n', "\\N")
}

#[cfg(test)]
mod tests {
    use super::*;
    use karaplay_common::Song;

    #[test]
    fn test_idle_text_contains_notes() {
        let dir = tempfile::tempdir().unwrap();
        let writer = AssTextWriter::new(dir.path());
        let context = IdleContext {
            notes: vec!["Engine 1.0".to_string(), "karaplay 0.1.0".to_string()],
        };

        let path = writer.create_idle_text(&context).unwrap();

        assert_eq!(path, dir.path().join(IDLE_TEXT_NAME));
        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.starts_with("[Script Info]"));
        assert!(content.contains("Engine 1.0"));
        assert!(content.contains("karaplay 0.1.0"));
    }

    #[test]
    fn test_transition_text_uses_title() {
        let dir = tempfile::tempdir().unwrap();
        let writer = AssTextWriter::new(dir.path());
        let mut song = Song::new("songs/opening.mkv");
        song.metadata
            .insert("title".to_string(), serde_json::json!("Opening {1}"));
        let entry = PlaylistEntry::new(1, song);

        let path = writer.create_transition_text(&entry).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains("Opening \\{1\\}"));
    }

    #[test]
    fn test_transition_text_falls_back_to_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let writer = AssTextWriter::new(dir.path());
        let entry = PlaylistEntry::new(2, Song::new("songs/ending.mkv"));

        let path = writer.create_transition_text(&entry).unwrap();

        let content = std::fs::read_to_string(path).unwrap();
        assert!(content.contains(",,ending"));
    }

    #[test]
    fn test_missing_output_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let writer = AssTextWriter::new(dir.path().join("absent"));
        assert!(writer.create_idle_text(&IdleContext::default()).is_err());
    }
}
