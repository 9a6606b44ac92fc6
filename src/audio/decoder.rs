//! Decoder construction on top of `rodio::Decoder`.

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Duration;

use rodio::{Decoder, Source};

use crate::config::FormatSettings;
use crate::engine::{DecodeError, DecoderFactory, DsdPacking, FormatFamily};

/// An opened, not yet playing, audio file.
pub struct RodioDecoder {
    pub(super) path: PathBuf,
    pub(super) source: Decoder<BufReader<File>>,
    pub(super) total: Option<Duration>,
}

impl RodioDecoder {
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl fmt::Debug for RodioDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RodioDecoder")
            .field("path", &self.path)
            .field("total", &self.total)
            .finish_non_exhaustive()
    }
}

fn normalize(exts: &[String]) -> Vec<String> {
    exts.iter()
        .map(|e| e.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|e| !e.is_empty())
        .collect()
}

/// Opens files with `rodio`'s decoders.
///
/// Only the PCM family is actually decodable; DSD files are recognized so the
/// user learns why they do not play.
#[derive(Debug, Clone)]
pub struct RodioFactory {
    pcm: Vec<String>,
    dsd: Vec<String>,
}

impl RodioFactory {
    pub fn new(formats: &FormatSettings) -> Self {
        Self {
            pcm: normalize(&formats.pcm_extensions),
            dsd: normalize(&formats.dsd_extensions),
        }
    }

    fn open_file(path: &Path) -> Result<File, DecodeError> {
        File::open(path).map_err(|source| DecodeError::Open {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DecoderFactory for RodioFactory {
    type Decoder = RodioDecoder;

    fn supports(&self, family: FormatFamily, extension: &str) -> bool {
        let exts = match family {
            FormatFamily::Pcm => &self.pcm,
            FormatFamily::Dsd => &self.dsd,
        };
        exts.iter().any(|e| e == extension)
    }

    fn open_pcm(&self, path: &Path) -> Result<RodioDecoder, DecodeError> {
        let file = Self::open_file(path)?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| DecodeError::Format {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let total = source.total_duration();

        Ok(RodioDecoder {
            path: path.to_path_buf(),
            source,
            total,
        })
    }

    fn open_dsd(&self, path: &Path, packing: DsdPacking) -> Result<RodioDecoder, DecodeError> {
        Self::open_file(path)?;
        let reason = match packing {
            DsdPacking::Dop => "DSD over PCM output is not available with this engine",
            DsdPacking::PcmConversion => "DSD to PCM conversion is not available with this engine",
        };
        Err(DecodeError::Unsupported {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        })
    }
}
