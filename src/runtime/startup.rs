use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::app::App;
use crate::config::Settings;
use crate::playlist::{Playlist, collect_audio_files};
use crate::session::Session;

/// Read the previous session, treating any problem as an empty one.
pub fn load_session(path: Option<&Path>) -> Session {
    let Some(path) = path else {
        return Session::default();
    };
    match Session::load(path) {
        Ok(session) => {
            info!(entries = session.playlist.len(), "session restored");
            session
        }
        Err(e) => {
            warn!(error = %e, "ignoring session file");
            Session::default()
        }
    }
}

/// Build the startup playlist: the restored session first, then whatever
/// was given on the command line.
///
/// Returns whether the playlist differs from the saved session.
pub fn build_playlist(settings: &Settings, session: &Session, cli_paths: &[PathBuf]) -> (Playlist, bool) {
    let mut playlist = Playlist::new(&settings.playlist);

    let (present, missing): (Vec<&PathBuf>, Vec<&PathBuf>) =
        session.playlist.iter().partition(|p| p.exists());
    for path in &missing {
        warn!(path = %path.display(), "restored entry no longer exists");
    }
    let restored = playlist.add(present.into_iter().cloned());
    for warning in &restored.warnings {
        warn!("{warning}");
    }

    let mut added = 0;
    for root in cli_paths {
        if !root.exists() {
            warn!(path = %root.display(), "no such file or directory");
            continue;
        }
        let report = playlist.add(collect_audio_files(root, &settings.playlist, &settings.formats));
        for warning in &report.warnings {
            warn!("{warning}");
        }
        added += report.added.len();
    }

    (playlist, added > 0 || !missing.is_empty())
}

/// Persist the playlist when it changed during this run.
pub fn save_session(path: &Path, app: &App) {
    if !app.playlist_changed {
        return;
    }
    let session = Session {
        playlist: app.playlist.paths(),
    };
    match session.save(path) {
        Ok(()) => info!(path = %path.display(), entries = session.playlist.len(), "session saved"),
        Err(e) => warn!(error = %e, "failed to save session"),
    }
}
