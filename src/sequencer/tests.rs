use std::path::{Path, PathBuf};

use super::*;
use crate::engine::mock::{Call, MockEngine, MockFactory};
use crate::engine::{DecoderKind, DsdPacking, PlaybackState};
use crate::playlist::Playlist;

fn p(s: &str) -> PathBuf {
    PathBuf::from(s)
}

fn playlist(paths: &[&str]) -> Playlist {
    let mut playlist = Playlist::default();
    playlist.add(paths.iter().copied());
    playlist
}

fn id_of(playlist: &Playlist, path: &str) -> EntryId {
    playlist.lookup(Path::new(path)).unwrap().id
}

#[test]
fn decoding_complete_enqueues_the_next_entry_exactly_once() {
    let playlist = playlist(&["a.flac", "b.flac", "c.flac"]);
    let mut engine = MockEngine::playing("a.flac");
    let factory = MockFactory::default();

    let advance = Sequencer::new(false)
        .on_decoding_complete(&playlist, &mut engine, &factory, Path::new("a.flac"))
        .unwrap();

    assert_eq!(advance, Advance::Queued(id_of(&playlist, "b.flac")));
    assert_eq!(
        engine.calls,
        vec![Call::Enqueue {
            path: p("b.flac"),
            immediate: false
        }]
    );
    // Current playback untouched.
    assert_eq!(engine.now_playing, Some(p("a.flac")));
    assert_eq!(engine.state, PlaybackState::Playing);
}

#[test]
fn decoding_complete_at_the_end_of_the_playlist_queues_nothing() {
    let playlist = playlist(&["a.flac", "b.flac"]);
    let mut engine = MockEngine::playing("b.flac");

    let advance = Sequencer::default()
        .on_decoding_complete(&playlist, &mut engine, &MockFactory::default(), Path::new("b.flac"))
        .unwrap();

    assert_eq!(advance, Advance::NoNeighbor);
    assert!(engine.calls.is_empty());
}

#[test]
fn decoding_complete_with_a_broken_successor_reports_and_keeps_playing() {
    let playlist = playlist(&["a.flac", "b.flac"]);
    let mut engine = MockEngine::playing("a.flac");
    let factory = MockFactory::with_broken("b.flac");

    let err = Sequencer::default()
        .on_decoding_complete(&playlist, &mut engine, &factory, Path::new("a.flac"))
        .unwrap_err();

    assert!(matches!(err, SequenceError::Decoder(_)));
    assert!(engine.calls.is_empty());
    assert_eq!(engine.state, PlaybackState::Playing);
}

#[test]
fn decoding_complete_with_an_unsupported_successor_is_not_an_error() {
    let playlist = playlist(&["a.flac", "b.xyz"]);
    let mut engine = MockEngine::playing("a.flac");

    let advance = Sequencer::default()
        .on_decoding_complete(&playlist, &mut engine, &MockFactory::default(), Path::new("a.flac"))
        .unwrap();

    assert_eq!(advance, Advance::Unsupported(p("b.xyz")));
    assert!(engine.calls.is_empty());
}

#[test]
fn decoding_complete_passes_the_dop_choice_to_the_factory() {
    let playlist = playlist(&["a.flac", "b.dsf"]);
    let factory = MockFactory::default();

    for (dop, packing) in [(true, DsdPacking::Dop), (false, DsdPacking::PcmConversion)] {
        let mut engine = MockEngine::playing("a.flac");
        Sequencer::new(dop)
            .on_decoding_complete(&playlist, &mut engine, &factory, Path::new("a.flac"))
            .unwrap();
        assert_eq!(engine.queued, Some(p("b.dsf")));
        assert_eq!(engine.received[0].kind, DecoderKind::Dsd(packing));
    }
}

#[test]
fn skip_forward_at_the_last_entry_is_a_no_op() {
    let playlist = playlist(&["a.flac"]);
    let mut engine = MockEngine::playing("a.flac");

    let advance = Sequencer::default()
        .skip(Direction::Next, &playlist, &mut engine, &MockFactory::default())
        .unwrap();

    assert_eq!(advance, Advance::NoNeighbor);
    assert!(engine.decoder_calls().is_empty());
    assert!(engine.calls.is_empty());
}

#[test]
fn skip_backward_at_the_first_entry_is_a_no_op() {
    let playlist = playlist(&["a.flac", "b.flac"]);
    let mut engine = MockEngine::paused("a.flac");

    let advance = Sequencer::default()
        .skip(Direction::Previous, &playlist, &mut engine, &MockFactory::default())
        .unwrap();

    assert_eq!(advance, Advance::NoNeighbor);
    assert!(engine.calls.is_empty());
}

#[test]
fn skip_with_nothing_loaded_is_a_no_op() {
    let playlist = playlist(&["a.flac", "b.flac"]);
    let mut engine = MockEngine::default();

    let advance = Sequencer::default()
        .skip(Direction::Next, &playlist, &mut engine, &MockFactory::default())
        .unwrap();

    assert_eq!(advance, Advance::NoNeighbor);
    assert!(engine.calls.is_empty());
}

#[test]
fn skip_while_playing_replaces_and_plays() {
    let playlist = playlist(&["a.flac", "b.flac", "c.flac"]);
    let mut engine = MockEngine::playing("b.flac");

    let advance = Sequencer::default()
        .skip(Direction::Previous, &playlist, &mut engine, &MockFactory::default())
        .unwrap();

    assert_eq!(advance, Advance::Started(id_of(&playlist, "a.flac")));
    assert_eq!(engine.calls, vec![Call::Play(p("a.flac"))]);
    assert_eq!(engine.state, PlaybackState::Playing);
}

#[test]
fn skip_while_paused_enqueues_immediately_without_resuming() {
    let playlist = playlist(&["a.flac", "b.flac"]);
    let mut engine = MockEngine::paused("a.flac");

    let advance = Sequencer::default()
        .skip(Direction::Next, &playlist, &mut engine, &MockFactory::default())
        .unwrap();

    assert_eq!(advance, Advance::Loaded(id_of(&playlist, "b.flac")));
    assert_eq!(
        engine.calls,
        vec![Call::Enqueue {
            path: p("b.flac"),
            immediate: true
        }]
    );
    assert_eq!(engine.state, PlaybackState::Paused);
    assert_eq!(engine.now_playing, Some(p("b.flac")));
}

#[test]
fn skip_supersedes_a_queued_successor() {
    let playlist = playlist(&["a.flac", "b.flac", "c.flac"]);
    let mut engine = MockEngine::playing("a.flac");
    let factory = MockFactory::default();
    let sequencer = Sequencer::default();

    sequencer
        .on_decoding_complete(&playlist, &mut engine, &factory, Path::new("a.flac"))
        .unwrap();
    assert_eq!(engine.queued, Some(p("b.flac")));

    sequencer
        .skip(Direction::Next, &playlist, &mut engine, &factory)
        .unwrap();
    assert_eq!(engine.queued, None);
    assert_eq!(engine.now_playing, Some(p("b.flac")));
}

#[test]
fn decoding_complete_for_a_superseded_item_is_ignored() {
    let playlist = playlist(&["a.flac", "b.flac", "c.flac"]);
    let mut engine = MockEngine::playing("a.flac");
    let factory = MockFactory::default();
    let sequencer = Sequencer::default();

    sequencer
        .skip(Direction::Next, &playlist, &mut engine, &factory)
        .unwrap();
    let advance = sequencer
        .on_decoding_complete(&playlist, &mut engine, &factory, Path::new("a.flac"))
        .unwrap();

    assert_eq!(advance, Advance::NoNeighbor);
    assert_eq!(engine.calls, vec![Call::Play(p("b.flac"))]);
    assert_eq!(engine.queued, None);
}

#[test]
fn decoding_complete_after_stop_loads_nothing() {
    let playlist = playlist(&["a.flac", "b.flac"]);
    let mut engine = MockEngine::playing("a.flac");
    engine.stop().unwrap();

    let advance = Sequencer::default()
        .on_decoding_complete(&playlist, &mut engine, &MockFactory::default(), Path::new("a.flac"))
        .unwrap();

    assert_eq!(advance, Advance::NoNeighbor);
    assert_eq!(engine.calls, vec![Call::Stop]);
    assert_eq!(engine.now_playing, None);
}

#[test]
fn skip_with_a_broken_target_aborts_only_the_skip() {
    let playlist = playlist(&["a.flac", "b.flac"]);
    let mut engine = MockEngine::playing("a.flac");

    let err = Sequencer::default()
        .skip(Direction::Next, &playlist, &mut engine, &MockFactory::with_broken("b.flac"))
        .unwrap_err();

    assert!(matches!(err, SequenceError::Decoder(_)));
    assert!(engine.calls.is_empty());
    assert_eq!(engine.now_playing, Some(p("a.flac")));
}

#[test]
fn play_entry_starts_the_entry() {
    let playlist = playlist(&["a.flac", "b.mp3"]);
    let mut engine = MockEngine::default();
    let entry = playlist.lookup(Path::new("b.mp3")).unwrap();

    let advance = Sequencer::default()
        .play_entry(entry, &mut engine, &MockFactory::default())
        .unwrap();

    assert_eq!(advance, Advance::Started(entry.id));
    assert_eq!(engine.calls, vec![Call::Play(p("b.mp3"))]);
}

#[test]
fn play_entry_with_unknown_format_reports_unsupported() {
    let playlist = playlist(&["notes.txt"]);
    let mut engine = MockEngine::default();
    let entry = playlist.get(0).unwrap();

    let advance = Sequencer::default()
        .play_entry(entry, &mut engine, &MockFactory::default())
        .unwrap();

    assert_eq!(advance, Advance::Unsupported(p("notes.txt")));
    assert!(engine.calls.is_empty());
}
