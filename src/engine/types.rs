use std::path::PathBuf;
use std::time::Duration;

/// What the engine is doing with its current item.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlaybackState {
    /// Nothing is loaded.
    #[default]
    Idle,
    /// An item is loaded but rendering has not started.
    Stopped,
    Playing,
    Paused,
}

impl PlaybackState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Stopped => "Stopped",
            Self::Playing => "Playing",
            Self::Paused => "Paused",
        }
    }
}

/// Playback position of the current item.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Position {
    pub elapsed: Duration,
    /// Total length, when the decoder knows it.
    pub total: Option<Duration>,
}

impl Position {
    pub fn remaining(&self) -> Option<Duration> {
        self.total.map(|t| t.saturating_sub(self.elapsed))
    }

    /// Fraction of the item played, in `0.0..=1.0`.
    pub fn progress(&self) -> Option<f64> {
        let total = self.total?;
        if total.is_zero() {
            return None;
        }
        Some((self.elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0))
    }
}

/// Notifications an engine sends from its own thread.
///
/// They travel over a channel and are applied on the control thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The decoder for `path` is about to run out of data; a successor can be
    /// queued now for gapless continuation.
    DecodingComplete { path: PathBuf },
    /// The item being rendered changed.
    NowPlayingChanged {
        current: Option<PathBuf>,
        previous: Option<PathBuf>,
    },
    PlaybackStateChanged(PlaybackState),
    /// A runtime failure during playback.
    EncounteredError(String),
}
