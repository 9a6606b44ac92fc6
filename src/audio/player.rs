use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::config::AudioSettings;
use crate::engine::{Engine, EngineError, EngineEvent, PlaybackState, Position};

use super::decoder::RodioDecoder;
use super::thread::{ThreadChannels, spawn_audio_thread};
use super::types::{AudioCmd, PlaybackHandle, PlaybackInfo};

/// [`Engine`] backed by a rodio sink on a dedicated thread.
///
/// Every command waits for the audio thread to apply it, so state queries
/// made right after a command already reflect it.
pub struct RodioEngine {
    tx: Sender<AudioCmd>,
    acks: Receiver<Result<(), EngineError>>,
    playback: PlaybackHandle,
    join: Option<JoinHandle<()>>,
}

impl RodioEngine {
    /// Open the default output device and start the audio thread.
    ///
    /// Lifecycle events are sent to `events`.
    pub fn spawn(settings: &AudioSettings, events: Sender<EngineEvent>) -> Result<Self, EngineError> {
        let (tx, commands) = mpsc::channel::<AudioCmd>();
        let (ack_tx, acks) = mpsc::channel();
        let (ready_tx, ready) = mpsc::channel();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlaybackInfo::default()));

        let join = spawn_audio_thread(
            ThreadChannels {
                commands,
                acks: ack_tx,
                events,
                ready: ready_tx,
            },
            playback.clone(),
            Duration::from_millis(settings.gapless_lookahead_ms),
        );
        ready.recv().map_err(|_| EngineError::Disconnected)??;

        Ok(Self {
            tx,
            acks,
            playback,
            join: Some(join),
        })
    }

    fn request(&mut self, cmd: AudioCmd) -> Result<(), EngineError> {
        self.tx.send(cmd).map_err(|_| EngineError::Disconnected)?;
        self.acks.recv().map_err(|_| EngineError::Disconnected)?
    }

    /// Current state as last published by the audio thread.
    pub fn snapshot(&self) -> PlaybackInfo {
        self.playback
            .lock()
            .map(|info| info.clone())
            .unwrap_or_default()
    }

    /// Fade out, stop the audio thread and wait for it.
    pub fn quit_softly(&mut self, fade_out: Duration) {
        let _ = self.tx.send(AudioCmd::Quit {
            fade_out_ms: fade_out.as_millis() as u64,
        });

        if let Some(h) = self.join.take() {
            let _ = h.join();
        }
    }
}

impl Engine for RodioEngine {
    type Decoder = RodioDecoder;

    fn play(&mut self, decoder: RodioDecoder) -> Result<(), EngineError> {
        self.request(AudioCmd::Play(decoder))
    }

    fn enqueue(&mut self, decoder: RodioDecoder, immediate: bool) -> Result<(), EngineError> {
        self.request(AudioCmd::Enqueue { decoder, immediate })
    }

    fn pause(&mut self) -> Result<(), EngineError> {
        self.request(AudioCmd::Pause)
    }

    fn resume(&mut self) -> Result<(), EngineError> {
        self.request(AudioCmd::Resume)
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.request(AudioCmd::Stop)
    }

    fn seek(&mut self, position: Duration) -> Result<(), EngineError> {
        self.request(AudioCmd::Seek(position))
    }

    fn playback_state(&self) -> PlaybackState {
        self.snapshot().state
    }

    fn now_playing(&self) -> Option<PathBuf> {
        self.snapshot().now_playing
    }

    fn supports_seeking(&self) -> bool {
        self.snapshot().seekable
    }

    fn position(&self) -> Position {
        let info = self.snapshot();
        Position {
            elapsed: info.elapsed,
            total: info.total,
        }
    }
}
