use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::Duration;

use rodio::{OutputStreamBuilder, Sink};

use crate::engine::{EngineError, EngineEvent, PlaybackState};

use super::decoder::RodioDecoder;
use super::timeline::{Handover, QueuedItem, Timeline};
use super::types::{AudioCmd, PlaybackHandle};

const TICK: Duration = Duration::from_millis(100);

pub(super) struct ThreadChannels {
    pub commands: Receiver<AudioCmd>,
    pub acks: Sender<Result<(), EngineError>>,
    pub events: Sender<EngineEvent>,
    pub ready: Sender<Result<(), EngineError>>,
}

pub(super) fn spawn_audio_thread(
    channels: ThreadChannels,
    playback_info: PlaybackHandle,
    lookahead: Duration,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let ThreadChannels {
            commands,
            acks,
            events,
            ready,
        } = channels;

        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready.send(Err(EngineError::Output(e.to_string())));
                return;
            }
        };
        // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
        // but noisy for a TUI app.
        stream.log_on_drop(false);

        let sink = Sink::connect_new(stream.mixer());
        sink.pause();
        let _ = ready.send(Ok(()));
        tracing::debug!("audio output opened");

        let mut audio = AudioThread {
            sink,
            timeline: Timeline::default(),
            state: PlaybackState::Idle,
            events,
            playback_info,
            lookahead,
        };

        loop {
            match commands.recv_timeout(TICK) {
                Ok(AudioCmd::Quit { fade_out_ms }) => {
                    audio.shutdown(fade_out_ms);
                    break;
                }
                Ok(cmd) => {
                    let result = audio.apply(cmd);
                    audio.publish();
                    if acks.send(result).is_err() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => audio.tick(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        tracing::debug!("audio thread finished");
    })
}

struct AudioThread {
    sink: Sink,
    timeline: Timeline,
    state: PlaybackState,
    events: Sender<EngineEvent>,
    playback_info: PlaybackHandle,
    lookahead: Duration,
}

impl AudioThread {
    fn emit(&self, event: EngineEvent) {
        // The control side may already be gone during shutdown.
        let _ = self.events.send(event);
    }

    fn set_state(&mut self, state: PlaybackState) {
        if self.state != state {
            self.state = state;
            self.emit(EngineEvent::PlaybackStateChanged(state));
        }
    }

    fn announce(&self, handover: Handover) {
        if handover.previous == handover.current {
            return;
        }
        self.emit(EngineEvent::NowPlayingChanged {
            current: handover.current,
            previous: handover.previous,
        });
    }

    fn append(&self, decoder: RodioDecoder) -> QueuedItem {
        tracing::debug!(path = %decoder.path().display(), total = ?decoder.total, "appending to sink");
        let item = QueuedItem {
            path: decoder.path,
            total: decoder.total,
        };
        self.sink.append(decoder.source);
        item
    }

    fn replace(&mut self, decoder: RodioDecoder) {
        self.sink.clear();
        let item = self.append(decoder);
        let handover = self.timeline.replace(item);
        self.announce(handover);
    }

    fn apply(&mut self, cmd: AudioCmd) -> Result<(), EngineError> {
        match cmd {
            AudioCmd::Play(decoder) => {
                self.replace(decoder);
                self.sink.play();
                self.set_state(PlaybackState::Playing);
            }
            AudioCmd::Enqueue {
                decoder,
                immediate: true,
            } => {
                // `clear` pauses the sink; only resume what was audible.
                let was_playing = self.state == PlaybackState::Playing;
                self.replace(decoder);
                if was_playing {
                    self.sink.play();
                } else if self.state == PlaybackState::Idle {
                    self.set_state(PlaybackState::Stopped);
                }
            }
            AudioCmd::Enqueue {
                decoder,
                immediate: false,
            } => {
                let item = self.append(decoder);
                if let Some(handover) = self.timeline.push(item) {
                    self.announce(handover);
                    if self.state == PlaybackState::Idle {
                        self.set_state(PlaybackState::Stopped);
                    }
                }
            }
            AudioCmd::Pause => {
                if self.state == PlaybackState::Playing {
                    self.sink.pause();
                    self.set_state(PlaybackState::Paused);
                }
            }
            AudioCmd::Resume => {
                if self.timeline.current().is_some() && self.state != PlaybackState::Playing {
                    self.sink.play();
                    self.set_state(PlaybackState::Playing);
                }
            }
            AudioCmd::Stop => {
                self.sink.clear();
                if let Some(handover) = self.timeline.clear() {
                    self.announce(handover);
                }
                self.set_state(PlaybackState::Idle);
            }
            AudioCmd::Seek(position) => {
                if self.timeline.current().is_some() {
                    self.sink
                        .try_seek(position)
                        .map_err(|e| EngineError::Seek(e.to_string()))?;
                }
            }
            AudioCmd::Quit { .. } => {}
        }
        Ok(())
    }

    fn tick(&mut self) {
        for handover in self.timeline.reconcile(self.sink.len()) {
            tracing::debug!(
                previous = ?handover.previous,
                current = ?handover.current,
                "item finished"
            );
            self.announce(handover);
        }

        let mut due = None;
        if self.timeline.current().is_none() {
            if self.state != PlaybackState::Idle {
                self.sink.pause();
                self.set_state(PlaybackState::Idle);
            }
        } else if self.state == PlaybackState::Playing {
            due = self.timeline.successor_due(self.sink.get_pos(), self.lookahead);
        }

        // The control side checks the request against the published item.
        self.publish();
        if let Some(path) = due {
            self.emit(EngineEvent::DecodingComplete { path });
        }
    }

    fn publish(&self) {
        let current = self.timeline.current();
        let now_playing: Option<PathBuf> = current.map(|i| i.path.clone());
        let total = current.and_then(|i| i.total);
        let elapsed = if current.is_some() {
            self.sink.get_pos()
        } else {
            Duration::ZERO
        };

        if let Ok(mut info) = self.playback_info.lock() {
            info.state = self.state;
            info.now_playing = now_playing;
            info.elapsed = elapsed;
            info.total = total;
            info.seekable = total.is_some();
        }
    }

    fn shutdown(&mut self, fade_out_ms: u64) {
        if self.state == PlaybackState::Playing {
            fade_out_sink(&self.sink, fade_out_ms);
        }
        self.sink.stop();
        // Update shared state so the UI doesn't keep showing Playing.
        if let Ok(mut info) = self.playback_info.lock() {
            info.state = PlaybackState::Idle;
        }
    }
}

fn fade_out_sink(sink: &Sink, fade_out_ms: u64) {
    if fade_out_ms == 0 {
        sink.set_volume(0.0);
        return;
    }
    let steps: u64 = 20;
    let step_ms = (fade_out_ms / steps).max(1);
    for step in 1..=steps {
        let t = step as f32 / steps as f32;
        sink.set_volume(1.0 - t);
        thread::sleep(Duration::from_millis(step_ms));
    }
    sink.set_volume(0.0);
}
