use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use tracing::{debug, info};

use crate::config::{PlaylistSettings, TrackDisplayField};
use crate::engine::{Engine, EngineError};

use super::model::{Direction, EntryId, PlaylistChange, TrackEntry};
use super::probe::{ReadWarning, probe};

/// Outcome of [`Playlist::add`].
#[derive(Debug, Default)]
pub struct AddReport {
    /// Ids of the appended entries, in playlist order.
    pub added: Vec<EntryId>,
    /// Files whose tags could not be read. They were added anyway.
    pub warnings: Vec<ReadWarning>,
}

/// Ordered collection of track entries. Insertion order is playback order.
///
/// Paths are unique: adding a path that is already present does nothing.
pub struct Playlist {
    entries: Vec<TrackEntry>,
    display_fields: Vec<TrackDisplayField>,
    display_separator: String,
    observers: Vec<Sender<PlaylistChange>>,
}

impl Playlist {
    pub fn new(settings: &PlaylistSettings) -> Self {
        Self {
            entries: Vec::new(),
            display_fields: settings.display_fields.clone(),
            display_separator: settings.display_separator.clone(),
            observers: Vec::new(),
        }
    }

    /// Register an observer. Every add or remove that changes the playlist
    /// sends one [`PlaylistChange`] to each live receiver.
    pub fn subscribe(&mut self) -> Receiver<PlaylistChange> {
        let (tx, rx) = mpsc::channel();
        self.observers.push(tx);
        rx
    }

    fn notify(&mut self, change: PlaylistChange) {
        // Receivers that were dropped are forgotten.
        self.observers.retain(|tx| tx.send(change.clone()).is_ok());
    }

    /// Append an entry for every path not already present.
    pub fn add<I, P>(&mut self, paths: I) -> AddReport
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut report = AddReport::default();
        let mut seen: HashSet<PathBuf> = self.entries.iter().map(|e| e.path.clone()).collect();

        for path in paths {
            let path = path.into();
            if !seen.insert(path.clone()) {
                debug!(path = %path.display(), "already in playlist");
                continue;
            }

            let probed = probe(&path, &self.display_fields, &self.display_separator);
            report.added.push(probed.entry.id);
            report.warnings.extend(probed.warning);
            self.entries.push(probed.entry);
        }

        if !report.added.is_empty() {
            info!(count = report.added.len(), "added to playlist");
            self.notify(PlaylistChange::Added(report.added.clone()));
        }
        report
    }

    /// Remove the entries for `paths`.
    ///
    /// When an entry is the engine's now-playing item the engine is stopped
    /// before the entry goes away. If stopping fails, that entry and the rest
    /// of `paths` stay in the playlist and the error is returned.
    pub fn remove<E: Engine>(
        &mut self,
        paths: &[PathBuf],
        engine: &mut E,
    ) -> Result<Vec<TrackEntry>, EngineError> {
        let mut removed: Vec<TrackEntry> = Vec::new();
        let mut outcome = Ok(());

        for path in paths {
            let Some(index) = self.position(path) else {
                continue;
            };

            if engine.now_playing().as_deref() == Some(path.as_path()) {
                debug!(path = %path.display(), "stopping playback of removed entry");
                if let Err(e) = engine.stop() {
                    outcome = Err(e);
                    break;
                }
            }

            let entry = self.entries.remove(index);
            self.notify(PlaylistChange::Removed(vec![entry.id]));
            removed.push(entry);
        }

        if !removed.is_empty() {
            info!(count = removed.len(), "removed from playlist");
        }

        outcome.map(|()| removed)
    }

    /// First entry whose path equals `path`.
    pub fn lookup(&self, path: &Path) -> Option<&TrackEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    pub fn position(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.path == path)
    }

    /// The entry adjacent to `path` in playlist order.
    ///
    /// `None` at either end of the playlist, or when `path` is not present.
    pub fn neighbor(&self, path: &Path, direction: Direction) -> Option<&TrackEntry> {
        let index = self.position(path)?;
        match direction {
            Direction::Next => self.entries.get(index + 1),
            Direction::Previous => index.checked_sub(1).and_then(|i| self.entries.get(i)),
        }
    }

    pub fn get(&self, index: usize) -> Option<&TrackEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[TrackEntry] {
        &self.entries
    }

    /// Paths in playlist order, for persisting.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Playlist {
    fn default() -> Self {
        Self::new(&PlaylistSettings::default())
    }
}
