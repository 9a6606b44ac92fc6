use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use uuid::Uuid;

/// Stable identity of a playlist entry, independent of its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Stream properties read when the entry was created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioProperties {
    pub sample_rate: Option<u32>,
    pub channels: Option<u8>,
    pub duration: Option<Duration>,
}

/// An image embedded in the file's tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artwork {
    pub mime_type: Option<String>,
    pub data: Vec<u8>,
}

/// Tag metadata read when the entry was created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub artwork: Vec<Artwork>,
}

#[derive(Debug, Clone)]
pub struct TrackEntry {
    pub id: EntryId,
    pub path: PathBuf,
    pub properties: AudioProperties,
    pub metadata: TrackMetadata,
    /// Label shown in the playlist.
    pub display: String,
}

impl TrackEntry {
    /// Tag title, falling back to the file stem.
    pub fn title(&self) -> String {
        super::display::title_or_stem(&self.path, &self.metadata)
    }

    pub fn has_artwork(&self) -> bool {
        !self.metadata.artwork.is_empty()
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

/// Notification sent to playlist observers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaylistChange {
    Added(Vec<EntryId>),
    Removed(Vec<EntryId>),
}
