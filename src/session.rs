//! Playlist persistence between runs.
//!
//! The session is plain data: loaded once at startup, handed to the playlist,
//! and written back at shutdown.

use std::env;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot access session file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed session file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("cannot serialize session: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// State restored on the next start.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Session {
    /// Playlist paths in playback order.
    pub playlist: Vec<PathBuf>,
}

impl Session {
    /// Read the session at `path`. A missing file is an empty session.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        toml::from_str(&text).map_err(|source| SessionError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write the session to `path`, creating parent directories.
    ///
    /// The file is replaced atomically so a crash never leaves half a session.
    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        let io_err = |source: io::Error| SessionError::Io {
            path: path.to_path_buf(),
            source,
        };

        let text = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, text).map_err(io_err)?;
        fs::rename(&tmp, path).map_err(io_err)?;
        Ok(())
    }
}

/// Resolve the session path from `SEGUE_SESSION_PATH` or XDG defaults.
pub fn resolve_session_path() -> Option<PathBuf> {
    session_path_from(
        env::var_os("SEGUE_SESSION_PATH"),
        env::var_os("XDG_STATE_HOME"),
        env::var_os("HOME"),
    )
}

/// `$XDG_STATE_HOME/segue/session.toml`, or `~/.local/state/segue/session.toml`
/// when `XDG_STATE_HOME` is not set.
fn session_path_from(
    explicit: Option<OsString>,
    state_home: Option<OsString>,
    home: Option<OsString>,
) -> Option<PathBuf> {
    if let Some(p) = explicit.filter(|p| !p.is_empty()) {
        return Some(PathBuf::from(p));
    }
    let state_home = match state_home.filter(|p| !p.is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => PathBuf::from(home?).join(".local").join("state"),
    };
    Some(state_home.join("segue").join("session.toml"))
}
