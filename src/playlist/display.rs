use std::path::Path;

use crate::config::TrackDisplayField;

use super::model::TrackMetadata;

fn trimmed(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

fn file_stem(path: &Path) -> Option<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.trim().is_empty())
}

/// Tag title of a file, falling back to its file stem.
pub(super) fn title_or_stem(path: &Path, metadata: &TrackMetadata) -> String {
    trimmed(metadata.title.as_deref())
        .or_else(|| file_stem(path))
        .unwrap_or("UNKNOWN")
        .to_string()
}

/// Join the configured `fields` of a track with `sep`.
///
/// `label` is what [`TrackDisplayField::Display`] expands to. While the label
/// itself is being composed it is `None` and the field reads as artist then
/// title. Falls back to the title when no field produced anything.
pub fn compose_label(
    path: &Path,
    metadata: &TrackMetadata,
    label: Option<&str>,
    fields: &[TrackDisplayField],
    sep: &str,
) -> String {
    let title = title_or_stem(path, metadata);
    let artist = trimmed(metadata.artist.as_deref());
    let album = trimmed(metadata.album.as_deref());

    let mut parts: Vec<String> = Vec::new();
    for field in fields {
        match field {
            TrackDisplayField::Display => match label {
                Some(l) => parts.extend(trimmed(Some(l)).map(str::to_string)),
                None => {
                    parts.extend(artist.map(str::to_string));
                    parts.push(title.clone());
                }
            },
            TrackDisplayField::Title => parts.push(title.clone()),
            TrackDisplayField::Artist => parts.extend(artist.map(str::to_string)),
            TrackDisplayField::Album => parts.extend(album.map(str::to_string)),
            TrackDisplayField::Filename => parts.extend(file_stem(path).map(str::to_string)),
            TrackDisplayField::Path => parts.push(path.display().to_string()),
        }
    }

    if parts.is_empty() {
        title
    } else {
        parts.join(sep)
    }
}
