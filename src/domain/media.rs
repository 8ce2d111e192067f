use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Kind of source recording a run starts from. Video runs get an audio
/// extraction stage and a remux at assembly time; audio runs skip both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaKind {
    Audio,
    Video,
}

impl MediaKind {
    pub fn from_extension(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "mp4" | "mkv" | "avi" | "mov" | "webm" => Some(Self::Video),
            "mp3" | "wav" | "aac" | "flac" | "ogg" | "m4a" => Some(Self::Audio),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Audio => "audio",
            MediaKind::Video => "video",
        }
    }
}

impl std::fmt::Display for MediaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceMedia {
    pub path: PathBuf,
    pub kind: MediaKind,
}

impl SourceMedia {
    pub fn new(path: PathBuf, kind: MediaKind) -> Self {
        Self { path, kind }
    }

    /// Classifies the source by file extension.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        let kind = MediaKind::from_extension(&path)?;
        Some(Self { path, kind })
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }
}
