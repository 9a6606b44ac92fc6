use std::path::{Path, PathBuf};
use std::time::Duration;

use lofty::prelude::{Accessor, AudioFile, TaggedFileExt};
use thiserror::Error;

use crate::config::TrackDisplayField;

use super::display::compose_label;
use super::model::{Artwork, AudioProperties, EntryId, TrackEntry, TrackMetadata};

/// Tags or properties of a file could not be read. The entry still exists.
#[derive(Debug, Clone, Error)]
#[error("could not read tags from {path:?}: {reason}")]
pub struct ReadWarning {
    pub path: PathBuf,
    pub reason: String,
}

/// A freshly built entry plus whatever went wrong while reading it.
#[derive(Debug)]
pub struct Probed {
    pub entry: TrackEntry,
    pub warning: Option<ReadWarning>,
}

fn non_empty(v: Option<std::borrow::Cow<'_, str>>) -> Option<String> {
    v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Read properties and metadata of `path` and build a playlist entry.
///
/// Never fails: unreadable files produce an entry with default properties and
/// metadata and a [`ReadWarning`].
pub fn probe(path: &Path, fields: &[TrackDisplayField], sep: &str) -> Probed {
    let mut properties = AudioProperties::default();
    let mut metadata = TrackMetadata::default();
    let mut warning = None;

    match lofty::read_from_path(path) {
        Ok(tagged) => {
            let props = tagged.properties();
            properties.sample_rate = props.sample_rate();
            properties.channels = props.channels();
            properties.duration = Some(props.duration()).filter(|d| *d > Duration::ZERO);

            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                metadata.title = non_empty(tag.title());
                metadata.artist = non_empty(tag.artist());
                metadata.album = non_empty(tag.album());
                metadata.artwork = tag
                    .pictures()
                    .iter()
                    .map(|p| Artwork {
                        mime_type: p.mime_type().map(|m| m.as_str().to_string()),
                        data: p.data().to_vec(),
                    })
                    .collect();
            }
        }
        Err(e) => {
            warning = Some(ReadWarning {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    }

    let display = compose_label(path, &metadata, None, fields, sep);

    Probed {
        entry: TrackEntry {
            id: EntryId::new(),
            path: path.to_path_buf(),
            properties,
            metadata,
            display,
        },
        warning,
    }
}
