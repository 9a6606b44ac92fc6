//! Application model: `App` and the state the UI reads from it.
//!
//! `App` lives on the control thread. It owns the playlist and mirrors what
//! the engine reports, so drawing never has to ask the engine anything.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::engine::PlaybackState;
use crate::playlist::{EntryId, Playlist, PlaylistChange, TrackMetadata};

/// Message shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

/// What key presses currently edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    /// Typing a file or directory path to add.
    AddPath(String),
}

/// Snapshot of the entry the engine is rendering.
#[derive(Debug, Clone)]
pub struct NowPlaying {
    /// `None` once the entry is no longer in the playlist.
    pub id: Option<EntryId>,
    pub path: PathBuf,
    pub label: String,
    pub title: String,
    pub metadata: TrackMetadata,
    pub duration: Option<Duration>,
}

impl NowPlaying {
    pub fn has_artwork(&self) -> bool {
        !self.metadata.artwork.is_empty()
    }
}

/// The main application model.
pub struct App {
    pub playlist: Playlist,
    pub selected: usize,
    pub playback: PlaybackState,
    pub now_playing: Option<NowPlaying>,
    pub status: Option<Status>,
    pub input: InputMode,

    pub follow_playback: bool,
    pub details_window: bool,
    /// The playlist changed since the session was restored.
    pub playlist_changed: bool,

    changes: Receiver<PlaylistChange>,
}

impl App {
    /// Create an `App` around `playlist` and start observing it.
    pub fn new(mut playlist: Playlist, follow_playback: bool) -> Self {
        let changes = playlist.subscribe();
        Self {
            playlist,
            selected: 0,
            playback: PlaybackState::Idle,
            now_playing: None,
            status: None,
            input: InputMode::Normal,
            follow_playback,
            details_window: false,
            playlist_changed: false,
            changes,
        }
    }

    pub fn toggle_details_window(&mut self) {
        self.details_window = !self.details_window;
    }

    pub fn set_info(&mut self, msg: impl Into<String>) {
        self.status = Some(Status::Info(msg.into()));
    }

    pub fn set_error(&mut self, msg: impl Into<String>) {
        self.status = Some(Status::Error(msg.into()));
    }

    pub fn clear_status(&mut self) {
        self.status = None;
    }

    /// Enable following playback (cursor follows the now-playing entry).
    pub fn follow_playback_on(&mut self) {
        self.follow_playback = true;
        self.follow_now_playing();
    }

    pub fn follow_playback_off(&mut self) {
        self.follow_playback = false;
    }

    /// Set the selected index, clamped to the playlist.
    pub fn set_selected(&mut self, idx: usize) {
        self.selected = idx.min(self.playlist.len().saturating_sub(1));
    }

    /// Move selection down one entry. Stops at the last entry.
    pub fn next(&mut self) {
        self.set_selected(self.selected.saturating_add(1));
    }

    /// Move selection up one entry. Stops at the first entry.
    pub fn prev(&mut self) {
        self.set_selected(self.selected.saturating_sub(1));
    }

    pub fn select_first(&mut self) {
        self.set_selected(0);
    }

    pub fn select_last(&mut self) {
        self.set_selected(self.playlist.len().saturating_sub(1));
    }

    /// Path of the selected entry.
    pub fn selected_path(&self) -> Option<&Path> {
        self.playlist.get(self.selected).map(|e| e.path.as_path())
    }

    /// Index of the now-playing entry in the playlist.
    pub fn now_playing_index(&self) -> Option<usize> {
        let id = self.now_playing.as_ref()?.id?;
        self.playlist.entries().iter().position(|e| e.id == id)
    }

    /// Rebuild the now-playing snapshot for `path` and, when following
    /// playback, move the selection onto it.
    pub fn refresh_now_playing(&mut self, path: Option<&Path>) {
        self.now_playing = path.map(|p| match self.playlist.lookup(p) {
            Some(entry) => NowPlaying {
                id: Some(entry.id),
                path: entry.path.clone(),
                label: entry.display.clone(),
                title: entry.title(),
                metadata: entry.metadata.clone(),
                duration: entry.properties.duration,
            },
            None => {
                let name = p
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| p.display().to_string());
                NowPlaying {
                    id: None,
                    path: p.to_path_buf(),
                    label: name.clone(),
                    title: name,
                    metadata: TrackMetadata::default(),
                    duration: None,
                }
            }
        });
        self.follow_now_playing();
    }

    fn follow_now_playing(&mut self) {
        if !self.follow_playback {
            return;
        }
        if let Some(idx) = self.now_playing_index() {
            self.selected = idx;
        }
    }

    /// Forget the now-playing entry and show the engine as idle.
    pub fn reset_playback(&mut self) {
        self.playback = PlaybackState::Idle;
        self.now_playing = None;
    }

    /// Apply pending playlist notifications. Returns whether any arrived.
    pub fn apply_playlist_changes(&mut self) -> bool {
        let mut changed = false;
        while let Ok(change) = self.changes.try_recv() {
            tracing::trace!(?change, "playlist changed");
            changed = true;
        }
        if changed {
            self.playlist_changed = true;
            self.set_selected(self.selected);
            // Entries may have left; keep the snapshot's id honest.
            let path = self.now_playing.as_ref().map(|np| np.path.clone());
            if let Some(path) = path {
                let id = self.playlist.lookup(&path).map(|e| e.id);
                if let Some(np) = self.now_playing.as_mut() {
                    np.id = id;
                }
            }
        }
        changed
    }

    /// Start typing a path to add.
    pub fn begin_add_path(&mut self) {
        self.input = InputMode::AddPath(String::new());
    }

    pub fn push_input_char(&mut self, c: char) {
        if let InputMode::AddPath(buf) = &mut self.input {
            buf.push(c);
        }
    }

    pub fn pop_input_char(&mut self) {
        if let InputMode::AddPath(buf) = &mut self.input {
            buf.pop();
        }
    }

    pub fn cancel_input(&mut self) {
        self.input = InputMode::Normal;
    }

    /// Leave input mode, returning the typed path when it is not blank.
    pub fn take_input(&mut self) -> Option<PathBuf> {
        match std::mem::take(&mut self.input) {
            InputMode::AddPath(buf) => {
                let trimmed = buf.trim();
                (!trimmed.is_empty()).then(|| expand_home(trimmed))
            }
            InputMode::Normal => None,
        }
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(rest);
        }
    }
    PathBuf::from(path)
}
