//! Recording engine and factory used by tests across the crate.

use std::path::{Path, PathBuf};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use super::error::{DecodeError, EngineError};
use super::resolve::DecoderKind;
use super::traits::{DecoderFactory, DsdPacking, Engine, FormatFamily};
use super::types::{PlaybackState, Position};
use crate::playlist::PlaylistChange;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Play(PathBuf),
    Enqueue { path: PathBuf, immediate: bool },
    Pause,
    Resume,
    Stop,
    Seek(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MockDecoder {
    pub path: PathBuf,
    pub kind: DecoderKind,
}

#[derive(Debug, Default)]
pub(crate) struct MockEngine {
    pub calls: Vec<Call>,
    /// Every decoder handed over, in order.
    pub received: Vec<MockDecoder>,
    pub state: PlaybackState,
    pub now_playing: Option<PathBuf>,
    pub queued: Option<PathBuf>,
    pub seekable: bool,
    pub position: Position,
    pub fail_stop: bool,
    /// Playlist notifications to drain whenever `stop` runs.
    pub watch: Option<Receiver<PlaylistChange>>,
    pub seen_at_stop: Vec<PlaylistChange>,
}

impl MockEngine {
    /// An engine rendering `path`.
    pub fn playing(path: &str) -> Self {
        Self {
            state: PlaybackState::Playing,
            now_playing: Some(PathBuf::from(path)),
            ..Self::default()
        }
    }

    /// An engine with `path` loaded but paused.
    pub fn paused(path: &str) -> Self {
        Self {
            state: PlaybackState::Paused,
            now_playing: Some(PathBuf::from(path)),
            ..Self::default()
        }
    }

    /// Calls that hand a decoder to the engine.
    pub fn decoder_calls(&self) -> Vec<&Call> {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Play(_) | Call::Enqueue { .. }))
            .collect()
    }
}

impl Engine for MockEngine {
    type Decoder = MockDecoder;

    fn play(&mut self, decoder: MockDecoder) -> Result<(), EngineError> {
        self.calls.push(Call::Play(decoder.path.clone()));
        self.received.push(decoder.clone());
        self.now_playing = Some(decoder.path);
        self.queued = None;
        self.state = PlaybackState::Playing;
        Ok(())
    }

    fn enqueue(&mut self, decoder: MockDecoder, immediate: bool) -> Result<(), EngineError> {
        self.calls.push(Call::Enqueue {
            path: decoder.path.clone(),
            immediate,
        });
        self.received.push(decoder.clone());
        if immediate || self.now_playing.is_none() {
            self.now_playing = Some(decoder.path);
            self.queued = None;
            if self.state == PlaybackState::Idle {
                self.state = PlaybackState::Stopped;
            }
        } else {
            self.queued = Some(decoder.path);
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.calls.push(Call::Pause);
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
        Ok(())
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.calls.push(Call::Resume);
        if self.now_playing.is_some() {
            self.state = PlaybackState::Playing;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.calls.push(Call::Stop);
        if let Some(rx) = &self.watch {
            self.seen_at_stop.extend(rx.try_iter());
        }
        if self.fail_stop {
            return Err(EngineError::Disconnected);
        }
        self.now_playing = None;
        self.queued = None;
        self.state = PlaybackState::Idle;
        Ok(())
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        self.calls.push(Call::Seek(position));
        self.position.elapsed = position;
        Ok(())
    }

    fn playback_state(&self) -> PlaybackState {
        self.state
    }

    fn now_playing(&self) -> Option<PathBuf> {
        self.now_playing.clone()
    }

    fn supports_seeking(&self) -> bool {
        self.seekable
    }

    fn position(&self) -> Position {
        self.position
    }
}

#[derive(Debug)]
pub(crate) struct MockFactory {
    pub pcm: Vec<&'static str>,
    pub dsd: Vec<&'static str>,
    /// Paths whose decoder construction fails.
    pub broken: Vec<PathBuf>,
}

impl Default for MockFactory {
    fn default() -> Self {
        Self {
            pcm: vec!["flac", "mp3", "wav"],
            dsd: vec!["dsf", "dff"],
            broken: Vec::new(),
        }
    }
}

impl MockFactory {
    pub fn with_broken(path: &str) -> Self {
        Self {
            broken: vec![PathBuf::from(path)],
            ..Self::default()
        }
    }

    fn open(&self, path: &Path, kind: DecoderKind) -> Result<MockDecoder, DecodeError> {
        if self.broken.iter().any(|b| b == path) {
            return Err(DecodeError::Format {
                path: path.to_path_buf(),
                reason: "corrupt stream".to_string(),
            });
        }
        Ok(MockDecoder {
            path: path.to_path_buf(),
            kind,
        })
    }
}

impl DecoderFactory for MockFactory {
    type Decoder = MockDecoder;

    fn supports(&self, family: FormatFamily, extension: &str) -> bool {
        match family {
            FormatFamily::Pcm => self.pcm.contains(&extension),
            FormatFamily::Dsd => self.dsd.contains(&extension),
        }
    }

    fn open_pcm(&self, path: &Path) -> Result<MockDecoder, DecodeError> {
        self.open(path, DecoderKind::Pcm)
    }

    fn open_dsd(&self, path: &Path, packing: DsdPacking) -> Result<MockDecoder, DecodeError> {
        self.open(path, DecoderKind::Dsd(packing))
    }
}
