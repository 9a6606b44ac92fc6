//! `rodio`-backed implementation of the engine contract.
//!
//! A dedicated audio thread owns the output stream and a single `Sink`.
//! Items appended to the sink play back to back, which is what makes queued
//! successors gapless. The control side talks to the thread over a command
//! channel and reads a shared [`PlaybackInfo`] snapshot for queries.

mod decoder;
mod player;
mod thread;
mod timeline;
mod types;

pub use decoder::{RodioDecoder, RodioFactory};
pub use player::RodioEngine;
pub use types::PlaybackInfo;

#[cfg(test)]
mod tests;
