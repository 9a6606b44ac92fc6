//! Audio engine contract.
//!
//! Everything that actually produces sound lives behind the [`Engine`] and
//! [`DecoderFactory`] traits. This module also owns the events an engine
//! reports back and the policy that picks a decoder for a path.

mod error;
mod resolve;
mod traits;
mod types;

pub use error::{DecodeError, EngineError};
pub use resolve::{DecoderKind, resolve_decoder};
pub use traits::{DecoderFactory, DsdPacking, Engine, FormatFamily};
pub use types::{EngineEvent, PlaybackState, Position};

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
mod tests;
