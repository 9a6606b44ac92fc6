use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use super::decoder::RodioFactory;
use super::timeline::{Handover, QueuedItem, Timeline};
use crate::config::FormatSettings;
use crate::engine::{DecodeError, DecoderFactory, DsdPacking, FormatFamily};

fn item(path: &str, secs: Option<u64>) -> QueuedItem {
    QueuedItem {
        path: PathBuf::from(path),
        total: secs.map(Duration::from_secs),
    }
}

fn some(path: &str) -> Option<PathBuf> {
    Some(PathBuf::from(path))
}

const LOOKAHEAD: Duration = Duration::from_secs(5);

#[test]
fn replace_reports_the_previous_head() {
    let mut timeline = Timeline::default();
    let first = timeline.replace(item("a.flac", Some(60)));
    assert_eq!(
        first,
        Handover {
            previous: None,
            current: some("a.flac")
        }
    );

    timeline.push(item("b.flac", Some(60)));
    let second = timeline.replace(item("c.flac", Some(60)));
    assert_eq!(
        second,
        Handover {
            previous: some("a.flac"),
            current: some("c.flac")
        }
    );
    // The queued successor went away with the old head.
    assert!(timeline.reconcile(1).is_empty());
    assert_eq!(timeline.current().map(|i| i.path.clone()), some("c.flac"));
}

#[test]
fn push_only_hands_over_when_nothing_was_loaded() {
    let mut timeline = Timeline::default();
    assert_eq!(
        timeline.push(item("a.flac", None)),
        Some(Handover {
            previous: None,
            current: some("a.flac")
        })
    );
    assert_eq!(timeline.push(item("b.flac", None)), None);
}

#[test]
fn reconcile_pops_finished_items_in_order() {
    let mut timeline = Timeline::default();
    timeline.replace(item("a.flac", Some(60)));
    timeline.push(item("b.flac", Some(60)));

    assert!(timeline.reconcile(2).is_empty());
    // A sink count that reads high never drops anything.
    assert!(timeline.reconcile(3).is_empty());

    assert_eq!(
        timeline.reconcile(1),
        vec![Handover {
            previous: some("a.flac"),
            current: some("b.flac")
        }]
    );
    assert_eq!(
        timeline.reconcile(0),
        vec![Handover {
            previous: some("b.flac"),
            current: None
        }]
    );
    assert!(timeline.current().is_none());
}

#[test]
fn clear_on_an_empty_timeline_reports_nothing() {
    let mut timeline = Timeline::default();
    assert_eq!(timeline.clear(), None);

    timeline.replace(item("a.flac", None));
    assert_eq!(
        timeline.clear(),
        Some(Handover {
            previous: some("a.flac"),
            current: None
        })
    );
}

#[test]
fn successor_is_requested_once_inside_the_lookahead() {
    let mut timeline = Timeline::default();
    timeline.replace(item("a.flac", Some(60)));

    assert_eq!(timeline.successor_due(Duration::from_secs(10), LOOKAHEAD), None);
    assert_eq!(
        timeline.successor_due(Duration::from_secs(56), LOOKAHEAD),
        some("a.flac")
    );
    assert_eq!(timeline.successor_due(Duration::from_secs(58), LOOKAHEAD), None);
}

#[test]
fn successor_is_not_requested_while_one_is_queued() {
    let mut timeline = Timeline::default();
    timeline.replace(item("a.flac", Some(60)));
    timeline.push(item("b.flac", Some(60)));

    assert_eq!(timeline.successor_due(Duration::from_secs(59), LOOKAHEAD), None);

    // Once the successor is the head it asks for its own.
    timeline.reconcile(1);
    assert_eq!(timeline.successor_due(Duration::from_secs(1), LOOKAHEAD), None);
    assert_eq!(
        timeline.successor_due(Duration::from_secs(57), LOOKAHEAD),
        some("b.flac")
    );
}

#[test]
fn unknown_length_requests_the_successor_right_away() {
    let mut timeline = Timeline::default();
    timeline.replace(item("stream.ogg", None));
    assert_eq!(
        timeline.successor_due(Duration::ZERO, LOOKAHEAD),
        some("stream.ogg")
    );
}

#[test]
fn replacing_the_head_rearms_the_request() {
    let mut timeline = Timeline::default();
    timeline.replace(item("a.flac", None));
    assert!(timeline.successor_due(Duration::ZERO, LOOKAHEAD).is_some());

    timeline.replace(item("b.flac", None));
    assert_eq!(timeline.successor_due(Duration::ZERO, LOOKAHEAD), some("b.flac"));
}

#[test]
fn factory_supports_configured_extensions_by_family() {
    let formats = FormatSettings {
        pcm_extensions: vec![".FLAC".into(), "mp3".into(), " ".into()],
        dsd_extensions: vec!["dsf".into()],
    };
    let factory = RodioFactory::new(&formats);

    assert!(factory.supports(FormatFamily::Pcm, "flac"));
    assert!(factory.supports(FormatFamily::Pcm, "mp3"));
    assert!(!factory.supports(FormatFamily::Pcm, "dsf"));
    assert!(factory.supports(FormatFamily::Dsd, "dsf"));
    assert!(!factory.supports(FormatFamily::Dsd, "dff"));
    assert!(!factory.supports(FormatFamily::Pcm, ""));
}

#[test]
fn opening_a_missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let factory = RodioFactory::new(&FormatSettings::default());

    let err = factory.open_pcm(&dir.path().join("gone.flac")).unwrap_err();
    assert!(matches!(err, DecodeError::Open { .. }));
}

#[test]
fn opening_garbage_is_a_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("noise.mp3");
    fs::write(&path, b"definitely not audio").unwrap();
    let factory = RodioFactory::new(&FormatSettings::default());

    let err = factory.open_pcm(&path).unwrap_err();
    assert!(matches!(err, DecodeError::Format { .. }));
}

#[test]
fn dsd_files_are_reported_as_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.dsf");
    fs::write(&path, b"DSD ").unwrap();
    let factory = RodioFactory::new(&FormatSettings::default());

    for packing in [DsdPacking::Dop, DsdPacking::PcmConversion] {
        let err = factory.open_dsd(&path, packing).unwrap_err();
        assert!(matches!(err, DecodeError::Unsupported { .. }));
    }
}
