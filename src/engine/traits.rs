use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{DecodeError, EngineError};
use super::types::{PlaybackState, Position};

/// Playback control primitives and queries of an audio engine.
///
/// The engine owns decoders once they are handed over; the caller never sees
/// them again.
pub trait Engine {
    type Decoder;

    /// Drop whatever is loaded or queued and start rendering `decoder`.
    fn play(&mut self, decoder: Self::Decoder) -> Result<(), EngineError>;

    /// Queue `decoder`.
    ///
    /// With `immediate == false` it follows the current item with no gap.
    /// With `immediate == true` it replaces the current item and the queue,
    /// keeping the playing/paused/stopped state as it was.
    fn enqueue(&mut self, decoder: Self::Decoder, immediate: bool) -> Result<(), EngineError>;

    fn pause(&mut self) -> Result<(), EngineError>;

    /// Continue a paused item, or start a loaded one.
    fn resume(&mut self) -> Result<(), EngineError>;

    /// Stop rendering and unload everything.
    fn stop(&mut self) -> Result<(), EngineError>;

    fn seek(&mut self, position: Duration) -> Result<(), EngineError>;

    fn playback_state(&self) -> PlaybackState;

    /// Path of the item currently loaded, if any.
    fn now_playing(&self) -> Option<PathBuf>;

    fn supports_seeking(&self) -> bool;

    fn position(&self) -> Position;

    fn is_playing(&self) -> bool {
        self.playback_state() == PlaybackState::Playing
    }

    fn is_paused(&self) -> bool {
        self.playback_state() == PlaybackState::Paused
    }

    fn is_stopped(&self) -> bool {
        matches!(
            self.playback_state(),
            PlaybackState::Idle | PlaybackState::Stopped
        )
    }
}

/// Format families a [`DecoderFactory`] can construct decoders for.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FormatFamily {
    /// Anything that decodes to PCM.
    Pcm,
    /// 1-bit DSD bitstreams.
    Dsd,
}

/// How a DSD stream reaches a PCM-only output path.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DsdPacking {
    /// Pack the native bitstream into PCM frames (DSD over PCM).
    Dop,
    /// Convert the bitstream to PCM locally.
    PcmConversion,
}

/// Decoder construction side of the engine.
pub trait DecoderFactory {
    type Decoder;

    /// Whether `extension` (lowercase, no dot) belongs to `family`.
    fn supports(&self, family: FormatFamily, extension: &str) -> bool;

    fn open_pcm(&self, path: &Path) -> Result<Self::Decoder, DecodeError>;

    fn open_dsd(&self, path: &Path, packing: DsdPacking) -> Result<Self::Decoder, DecodeError>;
}
