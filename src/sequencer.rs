//! Gapless sequencing: what to hand the engine next.
//!
//! The sequencer keeps no playback state of its own. Each call looks at the
//! playlist and the engine as they are and issues at most one play or
//! enqueue command.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};

use crate::engine::{DecodeError, DecoderFactory, Engine, EngineError, resolve_decoder};
use crate::playlist::{Direction, EntryId, Playlist, TrackEntry};

/// What a sequencing call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// The entry was queued behind the current item.
    Queued(EntryId),
    /// Playback switched to the entry right away.
    Started(EntryId),
    /// The entry replaced the current item; playback stays paused or stopped.
    Loaded(EntryId),
    /// There is no entry to move to.
    NoNeighbor,
    /// No decoder handles the entry's format.
    Unsupported(PathBuf),
}

#[derive(Debug, Error)]
pub enum SequenceError {
    #[error(transparent)]
    Decoder(#[from] DecodeError),
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sequencer {
    dop_enabled: bool,
}

impl Sequencer {
    pub fn new(dop_enabled: bool) -> Self {
        Self { dop_enabled }
    }

    fn open<F: DecoderFactory>(
        &self,
        factory: &F,
        entry: &TrackEntry,
    ) -> Result<Option<F::Decoder>, DecodeError> {
        resolve_decoder(factory, &entry.path, self.dop_enabled)
    }

    /// The engine is about to run out of data for `finished`: queue the entry
    /// after it for gapless continuation.
    ///
    /// Current playback is never touched, whatever the outcome. A report for
    /// an item the engine is no longer rendering is stale and ignored.
    pub fn on_decoding_complete<E, F>(
        &self,
        playlist: &Playlist,
        engine: &mut E,
        factory: &F,
        finished: &Path,
    ) -> Result<Advance, SequenceError>
    where
        E: Engine,
        F: DecoderFactory<Decoder = E::Decoder>,
    {
        if engine.now_playing().as_deref() != Some(finished) {
            debug!(path = %finished.display(), "stale decoding-complete, ignoring");
            return Ok(Advance::NoNeighbor);
        }

        let Some(next) = playlist.neighbor(finished, Direction::Next) else {
            debug!(path = %finished.display(), "end of playlist, nothing to queue");
            return Ok(Advance::NoNeighbor);
        };

        let Some(decoder) = self.open(factory, next)? else {
            return Ok(Advance::Unsupported(next.path.clone()));
        };

        engine.enqueue(decoder, false)?;
        info!(path = %next.path.display(), "queued for gapless playback");
        Ok(Advance::Queued(next.id))
    }

    /// Move to the neighbor of the now-playing entry.
    ///
    /// While playing, the neighbor replaces the current item and starts at
    /// once. Otherwise it is enqueued for immediate playback, which keeps
    /// the engine paused or stopped.
    pub fn skip<E, F>(
        &self,
        direction: Direction,
        playlist: &Playlist,
        engine: &mut E,
        factory: &F,
    ) -> Result<Advance, SequenceError>
    where
        E: Engine,
        F: DecoderFactory<Decoder = E::Decoder>,
    {
        let Some(current) = engine.now_playing() else {
            return Ok(Advance::NoNeighbor);
        };
        let Some(target) = playlist.neighbor(&current, direction) else {
            debug!(path = %current.display(), ?direction, "no neighbor to skip to");
            return Ok(Advance::NoNeighbor);
        };

        let Some(decoder) = self.open(factory, target)? else {
            return Ok(Advance::Unsupported(target.path.clone()));
        };

        if engine.is_playing() {
            engine.play(decoder)?;
            info!(path = %target.path.display(), "skipped");
            Ok(Advance::Started(target.id))
        } else {
            engine.enqueue(decoder, true)?;
            info!(path = %target.path.display(), "skipped without resuming");
            Ok(Advance::Loaded(target.id))
        }
    }

    /// Start playing `entry`, replacing whatever the engine has.
    pub fn play_entry<E, F>(
        &self,
        entry: &TrackEntry,
        engine: &mut E,
        factory: &F,
    ) -> Result<Advance, SequenceError>
    where
        E: Engine,
        F: DecoderFactory<Decoder = E::Decoder>,
    {
        let Some(decoder) = self.open(factory, entry)? else {
            return Ok(Advance::Unsupported(entry.path.clone()));
        };

        engine.play(decoder)?;
        info!(path = %entry.path.display(), "playing");
        Ok(Advance::Started(entry.id))
    }
}

#[cfg(test)]
mod tests;
