//! Applies user commands and engine events to the [`App`].
//!
//! Everything here runs on the control thread. The engine's own thread only
//! ever talks to it through [`EngineEvent`]s drained by the runtime.

use std::path::PathBuf;
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::config::{FormatSettings, PlaylistSettings, Settings};
use crate::engine::{DecoderFactory, Engine, EngineEvent, PlaybackState};
use crate::playlist::{Direction, collect_audio_files};
use crate::sequencer::{Advance, SequenceError, Sequencer};

use super::model::App;

/// User actions, independent of the key that triggered them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCmd {
    /// Add files or directories to the end of the playlist.
    Add(Vec<PathBuf>),
    RemoveSelected,
    PlaySelected,
    PlayPause,
    Stop,
    SkipForward,
    SkipBackward,
    /// Seek relative to the current position, in seconds.
    SeekBy(i64),
    Quit,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owns the engine and decides what each command or event does to it.
pub struct Controller<E, F> {
    engine: E,
    factory: F,
    sequencer: Sequencer,
    playlist_settings: PlaylistSettings,
    formats: FormatSettings,
}

impl<E, F> Controller<E, F>
where
    E: Engine,
    F: DecoderFactory<Decoder = E::Decoder>,
{
    pub fn new(engine: E, factory: F, settings: &Settings) -> Self {
        Self {
            engine,
            factory,
            sequencer: Sequencer::new(settings.audio.dop_enabled),
            playlist_settings: settings.playlist.clone(),
            formats: settings.formats.clone(),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Apply a user command.
    pub fn handle(&mut self, app: &mut App, cmd: ControlCmd) -> Flow {
        debug!(?cmd, "command");
        match cmd {
            ControlCmd::Add(paths) => self.add(app, paths),
            ControlCmd::RemoveSelected => self.remove_selected(app),
            ControlCmd::PlaySelected => self.play_selected(app),
            ControlCmd::PlayPause => self.play_pause(app),
            ControlCmd::Stop => {
                if let Err(e) = self.engine.stop() {
                    error!(error = %e, "stop failed");
                    app.set_error(e.to_string());
                }
            }
            ControlCmd::SkipForward => {
                let result = self
                    .sequencer
                    .skip(Direction::Next, &app.playlist, &mut self.engine, &self.factory);
                report(app, result);
            }
            ControlCmd::SkipBackward => {
                let result = self.sequencer.skip(
                    Direction::Previous,
                    &app.playlist,
                    &mut self.engine,
                    &self.factory,
                );
                report(app, result);
            }
            ControlCmd::SeekBy(secs) => self.seek_by(app, secs),
            ControlCmd::Quit => return Flow::Quit,
        }

        app.apply_playlist_changes();
        self.sync(app);
        Flow::Continue
    }

    /// Apply an event the engine sent from its own thread.
    pub fn on_event(&mut self, app: &mut App, event: EngineEvent) {
        match event {
            EngineEvent::DecodingComplete { path } => {
                let result = self.sequencer.on_decoding_complete(
                    &app.playlist,
                    &mut self.engine,
                    &self.factory,
                    &path,
                );
                report(app, result);
            }
            EngineEvent::NowPlayingChanged { current, previous } => {
                debug!(?current, ?previous, "now playing changed");
                app.refresh_now_playing(current.as_deref());
            }
            EngineEvent::PlaybackStateChanged(state) => {
                app.playback = state;
            }
            EngineEvent::EncounteredError(msg) => {
                error!(error = %msg, "engine error");
                if let Err(e) = self.engine.stop() {
                    warn!(error = %e, "stop after engine error failed");
                }
                app.reset_playback();
                app.set_error(msg);
            }
        }
    }

    /// Mirror the engine's state into `app`.
    ///
    /// Engine events carry the same information; this covers the window
    /// before they are drained.
    fn sync(&self, app: &mut App) {
        app.playback = self.engine.playback_state();
        let current = self.engine.now_playing();
        let shown = app.now_playing.as_ref().map(|np| &np.path);
        if shown != current.as_ref() {
            app.refresh_now_playing(current.as_deref());
        }
    }

    fn add(&mut self, app: &mut App, roots: Vec<PathBuf>) {
        let (roots, missing): (Vec<PathBuf>, Vec<PathBuf>) =
            roots.into_iter().partition(|root| root.exists());
        if let Some(first) = missing.first() {
            warn!(count = missing.len(), "skipping paths that do not exist");
            app.set_error(format!("No such file or directory: {}", first.display()));
            if roots.is_empty() {
                return;
            }
        }

        let paths: Vec<PathBuf> = roots
            .iter()
            .flat_map(|root| collect_audio_files(root, &self.playlist_settings, &self.formats))
            .collect();
        if paths.is_empty() {
            app.set_info("No audio files found");
            return;
        }

        let report = app.playlist.add(paths);
        for warning in &report.warnings {
            warn!("{warning}");
        }
        match (report.added.len(), report.warnings.len()) {
            (0, _) => app.set_info("Already in playlist"),
            (n, 0) => app.set_info(format!("Added {n} entries")),
            (n, w) => app.set_info(format!("Added {n} entries ({w} without tags)")),
        }
    }

    fn remove_selected(&mut self, app: &mut App) {
        let Some(path) = app.selected_path().map(|p| p.to_path_buf()) else {
            return;
        };
        if let Err(e) = app.playlist.remove(&[path], &mut self.engine) {
            error!(error = %e, "remove failed");
            app.set_error(e.to_string());
        }
    }

    fn play_selected(&mut self, app: &mut App) {
        let result = match app.playlist.get(app.selected) {
            Some(entry) => self
                .sequencer
                .play_entry(entry, &mut self.engine, &self.factory),
            None => return,
        };
        report(app, result);
    }

    fn play_pause(&mut self, app: &mut App) {
        let result = match self.engine.playback_state() {
            PlaybackState::Playing => self.engine.pause(),
            PlaybackState::Paused => self.engine.resume(),
            PlaybackState::Stopped if self.engine.now_playing().is_some() => self.engine.resume(),
            PlaybackState::Stopped | PlaybackState::Idle => {
                self.play_selected(app);
                return;
            }
        };
        if let Err(e) = result {
            error!(error = %e, "play/pause failed");
            app.set_error(e.to_string());
        }
    }

    fn seek_by(&mut self, app: &mut App, secs: i64) {
        if self.engine.now_playing().is_none() {
            return;
        }
        if !self.engine.supports_seeking() {
            app.set_info("Seeking is not supported for this item");
            return;
        }

        let elapsed = self.engine.position().elapsed;
        let step = Duration::from_secs(secs.unsigned_abs());
        let target = if secs < 0 {
            elapsed.saturating_sub(step)
        } else {
            elapsed.saturating_add(step)
        };
        if let Err(e) = self.engine.seek(target) {
            error!(error = %e, "seek failed");
            app.set_error(e.to_string());
        }
    }
}

/// Surface the outcome of a sequencing call.
fn report(app: &mut App, result: Result<Advance, SequenceError>) {
    match result {
        Ok(Advance::Unsupported(path)) => {
            warn!(path = %path.display(), "no decoder for format");
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            app.set_error(format!("No decoder for {name}"));
        }
        Ok(Advance::Started(_) | Advance::Loaded(_)) => app.clear_status(),
        Ok(Advance::Queued(_) | Advance::NoNeighbor) => {}
        Err(e) => {
            error!(error = %e, "sequencing failed");
            app.set_error(e.to_string());
        }
    }
}
