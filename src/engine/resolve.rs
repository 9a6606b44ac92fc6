use std::path::Path;

use tracing::debug;

use super::error::DecodeError;
use super::traits::{DecoderFactory, DsdPacking, FormatFamily};

/// The decoder path chosen for a file.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecoderKind {
    Pcm,
    Dsd(DsdPacking),
}

impl DecoderKind {
    /// Classify `path` by extension. The PCM family is checked first.
    pub fn for_path<F: DecoderFactory>(factory: &F, path: &Path, dop_enabled: bool) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();

        if factory.supports(FormatFamily::Pcm, &ext) {
            Some(Self::Pcm)
        } else if factory.supports(FormatFamily::Dsd, &ext) {
            let packing = if dop_enabled {
                DsdPacking::Dop
            } else {
                DsdPacking::PcmConversion
            };
            Some(Self::Dsd(packing))
        } else {
            None
        }
    }
}

/// Construct a decoder for `path`.
///
/// `Ok(None)` means no format family claims the file; that is a normal
/// outcome the caller reports, not a failure.
pub fn resolve_decoder<F: DecoderFactory>(
    factory: &F,
    path: &Path,
    dop_enabled: bool,
) -> Result<Option<F::Decoder>, DecodeError> {
    let Some(kind) = DecoderKind::for_path(factory, path, dop_enabled) else {
        debug!(path = %path.display(), "no decoder claims this file");
        return Ok(None);
    };

    debug!(path = %path.display(), ?kind, "opening decoder");
    let decoder = match kind {
        DecoderKind::Pcm => factory.open_pcm(path)?,
        DecoderKind::Dsd(packing) => factory.open_dsd(path, packing)?,
    };
    Ok(Some(decoder))
}
