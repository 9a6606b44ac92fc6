//! Bookkeeping of what sits in the sink, in order.
//!
//! The sink only tells how many items it still holds. The timeline mirrors
//! those items by path so the thread can tell which one is playing, notice
//! when the head finished, and decide when to ask for a successor.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct QueuedItem {
    pub path: PathBuf,
    pub total: Option<Duration>,
}

/// The head of the sink changed from `previous` to `current`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct Handover {
    pub previous: Option<PathBuf>,
    pub current: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub(super) struct Timeline {
    items: VecDeque<QueuedItem>,
    /// The head already asked for a successor.
    successor_requested: bool,
}

impl Timeline {
    pub fn current(&self) -> Option<&QueuedItem> {
        self.items.front()
    }

    fn current_path(&self) -> Option<PathBuf> {
        self.items.front().map(|i| i.path.clone())
    }

    /// Drop everything and make `item` the head.
    pub fn replace(&mut self, item: QueuedItem) -> Handover {
        let previous = self.current_path();
        self.items.clear();
        self.items.push_back(item);
        self.successor_requested = false;
        Handover {
            previous,
            current: self.current_path(),
        }
    }

    /// Append `item`. Returns a handover when it became the head.
    pub fn push(&mut self, item: QueuedItem) -> Option<Handover> {
        let was_empty = self.items.is_empty();
        self.items.push_back(item);
        if !was_empty {
            return None;
        }
        self.successor_requested = false;
        Some(Handover {
            previous: None,
            current: self.current_path(),
        })
    }

    pub fn clear(&mut self) -> Option<Handover> {
        let previous = self.current_path()?;
        self.items.clear();
        self.successor_requested = false;
        Some(Handover {
            previous: Some(previous),
            current: None,
        })
    }

    /// Forget finished items so that no more than `live` remain.
    ///
    /// `live` is the sink's own count. It may briefly read high right after
    /// a clear, so only a count below ours is acted on.
    pub fn reconcile(&mut self, live: usize) -> Vec<Handover> {
        let mut handovers = Vec::new();
        while self.items.len() > live {
            let previous = self.items.pop_front().map(|i| i.path);
            self.successor_requested = false;
            handovers.push(Handover {
                previous,
                current: self.current_path(),
            });
        }
        handovers
    }

    /// Path of the head, once, when it is the last queued item and has no
    /// more than `lookahead` left. Items of unknown length ask right away.
    pub fn successor_due(&mut self, elapsed: Duration, lookahead: Duration) -> Option<PathBuf> {
        if self.successor_requested || self.items.len() != 1 {
            return None;
        }
        let head = self.items.front()?;
        let due = match head.total {
            Some(total) => total.saturating_sub(elapsed) <= lookahead,
            None => true,
        };
        if !due {
            return None;
        }
        self.successor_requested = true;
        Some(head.path.clone())
    }
}
