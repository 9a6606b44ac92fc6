//! Commands and shared state of the audio thread.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::engine::PlaybackState;

use super::decoder::RodioDecoder;

pub(super) enum AudioCmd {
    /// Replace everything with this decoder and start rendering.
    Play(RodioDecoder),
    /// Queue behind the current item, or replace it when `immediate`.
    Enqueue {
        decoder: RodioDecoder,
        immediate: bool,
    },
    Pause,
    Resume,
    /// Stop and unload everything.
    Stop,
    /// Seek within the current item.
    Seek(Duration),
    /// Quit the audio thread, optionally fading out over `fade_out_ms` milliseconds.
    Quit { fade_out_ms: u64 },
}

/// Snapshot of the audio thread's state, shared with the control side.
#[derive(Debug, Clone, Default)]
pub struct PlaybackInfo {
    pub state: PlaybackState,
    /// Path of the item at the head of the sink.
    pub now_playing: Option<PathBuf>,
    /// Position within the current item.
    pub elapsed: Duration,
    pub total: Option<Duration>,
    /// Whether the current item reported its length, which seeking needs.
    pub seekable: bool,
}

pub(super) type PlaybackHandle = Arc<Mutex<PlaybackInfo>>;
