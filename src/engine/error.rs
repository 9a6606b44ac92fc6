use std::path::PathBuf;

use thiserror::Error;

/// Failure to construct a decoder for a playlist entry.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The file could not be opened or read.
    #[error("cannot open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The format family matched but this codec variant cannot be handled.
    #[error("unsupported codec variant in {path:?}: {reason}")]
    Unsupported { path: PathBuf, reason: String },

    /// The stream is malformed or the decoder rejected it.
    #[error("cannot decode {path:?}: {reason}")]
    Format { path: PathBuf, reason: String },
}

/// Failure of an engine control primitive.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine's thread is gone.
    #[error("audio engine is not running")]
    Disconnected,

    /// The output device could not be opened.
    #[error("audio output unavailable: {0}")]
    Output(String),

    /// The current item refused to seek.
    #[error("seek failed: {0}")]
    Seek(String),
}
