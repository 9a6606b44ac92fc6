use std::path::Path;
use std::time::Duration;

use super::mock::MockFactory;
use super::*;

#[test]
fn pcm_extensions_resolve_to_the_pcm_decoder() {
    let factory = MockFactory::default();
    for dop in [false, true] {
        let d = resolve_decoder(&factory, Path::new("/music/a.flac"), dop)
            .unwrap()
            .unwrap();
        assert_eq!(d.kind, DecoderKind::Pcm);
    }
}

#[test]
fn extension_match_ignores_case() {
    let factory = MockFactory::default();
    let d = resolve_decoder(&factory, Path::new("/music/A.FLAC"), false)
        .unwrap()
        .unwrap();
    assert_eq!(d.kind, DecoderKind::Pcm);
}

#[test]
fn dsd_extensions_split_on_the_dop_flag() {
    let factory = MockFactory::default();

    let packed = resolve_decoder(&factory, Path::new("/music/a.dsf"), true)
        .unwrap()
        .unwrap();
    assert_eq!(packed.kind, DecoderKind::Dsd(DsdPacking::Dop));

    let converted = resolve_decoder(&factory, Path::new("/music/a.dff"), false)
        .unwrap()
        .unwrap();
    assert_eq!(converted.kind, DecoderKind::Dsd(DsdPacking::PcmConversion));
}

#[test]
fn pcm_family_wins_when_both_claim_an_extension() {
    let factory = MockFactory {
        pcm: vec!["dsf"],
        ..MockFactory::default()
    };
    let d = resolve_decoder(&factory, Path::new("/music/a.dsf"), true)
        .unwrap()
        .unwrap();
    assert_eq!(d.kind, DecoderKind::Pcm);
}

#[test]
fn unknown_extensions_yield_no_decoder_without_error() {
    let factory = MockFactory::default();
    assert!(matches!(
        resolve_decoder(&factory, Path::new("/music/notes.txt"), false),
        Ok(None)
    ));
    assert!(matches!(
        resolve_decoder(&factory, Path::new("/music/no_extension"), true),
        Ok(None)
    ));
}

#[test]
fn construction_failures_are_errors() {
    let factory = MockFactory::with_broken("/music/bad.flac");
    let err = resolve_decoder(&factory, Path::new("/music/bad.flac"), false).unwrap_err();
    assert!(matches!(err, DecodeError::Format { .. }));
}

#[test]
fn position_reports_remaining_and_progress() {
    let p = Position {
        elapsed: Duration::from_secs(30),
        total: Some(Duration::from_secs(120)),
    };
    assert_eq!(p.remaining(), Some(Duration::from_secs(90)));
    assert_eq!(p.progress(), Some(0.25));

    let overrun = Position {
        elapsed: Duration::from_secs(130),
        total: Some(Duration::from_secs(120)),
    };
    assert_eq!(overrun.remaining(), Some(Duration::ZERO));
    assert_eq!(overrun.progress(), Some(1.0));

    let unknown = Position {
        elapsed: Duration::from_secs(5),
        total: None,
    };
    assert_eq!(unknown.remaining(), None);
    assert_eq!(unknown.progress(), None);
}
