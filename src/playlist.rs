//! Playlist store: the ordered list of track entries the player works through.
//!
//! Entries are probed once when added (tags and stream properties via
//! `lofty`) and never change afterwards. Observers subscribe to a channel of
//! [`PlaylistChange`] notifications to know when to redraw.

mod display;
mod expand;
mod model;
mod probe;
mod store;

pub use display::compose_label;
pub use expand::collect_audio_files;
pub use model::*;
pub use probe::{Probed, ReadWarning, probe};
pub use store::{AddReport, Playlist};
