use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::{FormatSettings, PlaylistSettings};

fn is_audio_file(path: &Path, formats: &FormatSettings) -> bool {
    let exts: Vec<String> = formats
        .all_extensions()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect();

    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            exts.iter().any(|e| e == &ext)
        })
        .unwrap_or(false)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|s| s.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Absolute, symlink-resolved form of `path`, so one file always maps to
/// one playlist entry whatever directory segue runs from.
fn absolute_root(path: &Path) -> PathBuf {
    path.canonicalize()
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

/// Expand `root` into the audio files to add to the playlist.
///
/// Paths come back absolute. Anything that is not a directory is returned
/// as is, whatever its extension; directories are walked and filtered by
/// the known extensions, sorted by path.
pub fn collect_audio_files(
    root: &Path,
    settings: &PlaylistSettings,
    formats: &FormatSettings,
) -> Vec<PathBuf> {
    let root = absolute_root(root);
    if !root.is_dir() {
        return vec![root];
    }

    let mut walker = WalkDir::new(&root).follow_links(settings.follow_links);

    // Non-recursive = only the root directory.
    let depth_cap = if settings.recursive {
        settings.max_depth
    } else {
        Some(1)
    };
    if let Some(d) = depth_cap {
        walker = walker.max_depth(d);
    }

    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_entry(|e| settings.include_hidden || e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(Result::ok)
        .filter(|e| e.path().is_file() && is_audio_file(e.path(), formats))
        .map(|e| e.into_path())
        .collect();

    files.sort();
    files
}
