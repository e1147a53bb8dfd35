// Transport behaviour of the playlist controller against a recording backend.

mod common;

use common::{Call, MockBackend, PlayBehavior};
use futures::executor::{block_on, LocalPool};
use futures::task::LocalSpawnExt;
use galaxy_core::*;
use std::rc::Rc;

fn abc() -> TrackCatalog {
    TrackCatalog::from_ids(["a", "b", "c"])
}

fn controller(backend: &MockBackend) -> PlaylistController<MockBackend> {
    PlaylistController::new(backend.clone(), abc())
}

#[test]
fn starts_with_no_track_and_nothing_playing() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    let s = ctl.state();
    assert_eq!(s.current_track, None);
    assert!(!s.is_playing);
    assert_eq!(s.current_index, 0);
    assert!(s.enabled);
    assert!((s.volume - 0.5).abs() < 1e-6);
}

#[test]
fn play_then_switch_stops_previous_first() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);

    let out = block_on(ctl.play_track("a".into()));
    assert_eq!(out, TransportOutcome::Started("a".into()));
    let s = ctl.state();
    assert_eq!(s.current_track, Some("a".into()));
    assert!(s.is_playing);
    assert_eq!(s.current_index, 0);

    backend.clear_calls();
    block_on(ctl.play_track("b".into()));
    assert_eq!(
        backend.calls(),
        vec![Call::Stop("a".into()), Call::Play("b".into())]
    );
    let s = ctl.state();
    assert_eq!(s.current_track, Some("b".into()));
    assert!(s.is_playing);
    assert_eq!(s.current_index, 1);
    assert_eq!(backend.playing(), vec!["b".to_string()]);
}

#[test]
fn rejected_play_leaves_state_unchanged() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    block_on(ctl.play_track("c".into()));
    let before = ctl.state();

    backend.push_behavior(PlayBehavior::Reject("decode error"));
    let out = block_on(ctl.play_track("missing".into()));
    match out {
        TransportOutcome::Failed(AudioError::Rejected { track, reason }) => {
            assert_eq!(track, "missing".into());
            assert_eq!(reason, "decode error");
        }
        other => panic!("expected failure, got {:?}", other),
    }
    assert_eq!(ctl.state(), before);
}

#[test]
fn disabled_play_issues_no_backend_calls() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    ctl.set_enabled(false);
    backend.clear_calls();
    let before = ctl.state();

    let out = block_on(ctl.play_track("a".into()));
    assert_eq!(out, TransportOutcome::Ignored(IgnoreReason::Disabled));
    assert!(backend.calls().is_empty());
    assert_eq!(ctl.state(), before);
}

#[test]
fn transport_before_initialization_is_a_silent_no_op() {
    let backend = MockBackend::uninitialized();
    let ctl = controller(&backend);

    assert_eq!(
        block_on(ctl.play_track("a".into())),
        TransportOutcome::Ignored(IgnoreReason::NotInitialized)
    );
    assert_eq!(
        block_on(ctl.next_track()),
        TransportOutcome::Ignored(IgnoreReason::NotInitialized)
    );
    assert_eq!(
        ctl.pause_track(),
        TransportOutcome::Ignored(IgnoreReason::NotInitialized)
    );
    assert!(backend.calls().is_empty());

    assert!(ctl.initialize());
    assert_eq!(
        block_on(ctl.play_track("a".into())),
        TransportOutcome::Started("a".into())
    );
}

#[test]
fn initialize_pushes_mirrored_settings() {
    let backend = MockBackend::uninitialized();
    let ctl = controller(&backend);
    ctl.set_volume(0.8);
    backend.clear_calls();
    ctl.initialize();
    assert_eq!(
        backend.calls(),
        vec![Call::SetVolume(0.8), Call::SetEnabled(true)]
    );
}

#[test]
fn pause_twice_is_idempotent() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    block_on(ctl.play_track("b".into()));

    assert_eq!(ctl.pause_track(), TransportOutcome::Paused);
    assert!(!ctl.state().is_playing);
    assert_eq!(ctl.pause_track(), TransportOutcome::Paused);
    assert!(!ctl.state().is_playing);
    assert_eq!(ctl.state().current_track, Some("b".into()));
    assert!(backend.playing().is_empty());
}

#[test]
fn pause_without_track_is_a_no_op() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    assert_eq!(
        ctl.pause_track(),
        TransportOutcome::Ignored(IgnoreReason::NoCurrentTrack)
    );
    assert!(backend.calls().is_empty());
}

#[test]
fn resume_replays_current_track() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    assert_eq!(
        block_on(ctl.resume_track()),
        TransportOutcome::Ignored(IgnoreReason::NoCurrentTrack)
    );

    block_on(ctl.play_track("c".into()));
    ctl.pause_track();
    backend.clear_calls();
    assert_eq!(
        block_on(ctl.resume_track()),
        TransportOutcome::Started("c".into())
    );
    // Paused, so nothing to stop before playing.
    assert_eq!(backend.calls(), vec![Call::Play("c".into())]);
    assert_eq!(ctl.state().current_index, 2);
}

#[test]
fn previous_from_first_wraps_to_last() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    block_on(ctl.play_track("a".into()));
    block_on(ctl.previous_track());
    let s = ctl.state();
    assert_eq!(s.current_index, 2);
    assert_eq!(s.current_track, Some("c".into()));
}

#[test]
fn next_from_last_wraps_to_first() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    block_on(ctl.play_track("c".into()));
    block_on(ctl.next_track());
    assert_eq!(ctl.state().current_index, 0);
    assert_eq!(ctl.state().current_track, Some("a".into()));
}

#[test]
fn traversal_index_always_in_range() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    // Deterministic pseudo-random walk of next/previous.
    let mut x: u32 = 0x1234_5678;
    let mut expected = 0usize;
    for _ in 0..200 {
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        if x & 1 == 0 {
            block_on(ctl.next_track());
            expected = (expected + 1) % 3;
        } else {
            block_on(ctl.previous_track());
            expected = (expected + 2) % 3;
        }
        let idx = ctl.state().current_index;
        assert!(idx < 3);
        assert_eq!(idx, expected);
    }
}

#[test]
fn unknown_track_plays_but_keeps_index() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    block_on(ctl.play_track("b".into()));
    let out = block_on(ctl.play_track("bonus".into()));
    assert_eq!(out, TransportOutcome::Started("bonus".into()));
    let s = ctl.state();
    assert_eq!(s.current_track, Some("bonus".into()));
    assert_eq!(s.current_index, 1);
}

#[test]
fn empty_catalog_traversal_is_ignored() {
    let backend = MockBackend::ready();
    let ctl = PlaylistController::new(backend.clone(), TrackCatalog::default());
    assert_eq!(
        block_on(ctl.next_track()),
        TransportOutcome::Ignored(IgnoreReason::EmptyCatalog)
    );
    assert_eq!(
        block_on(ctl.previous_track()),
        TransportOutcome::Ignored(IgnoreReason::EmptyCatalog)
    );
    assert!(backend.calls().is_empty());
}

#[test]
fn disabling_mutes_without_stopping() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    block_on(ctl.play_track("a".into()));
    backend.clear_calls();

    ctl.set_enabled(false);
    assert_eq!(backend.calls(), vec![Call::SetEnabled(false)]);
    let s = ctl.state();
    assert!(!s.enabled);
    assert!(s.is_playing);
    assert_eq!(s.current_track, Some("a".into()));
    assert_eq!(backend.playing(), vec!["a".to_string()]);
}

#[test]
fn volume_is_clamped_and_forwarded() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    ctl.set_volume(1.7);
    assert_eq!(ctl.state().volume, 1.0);
    ctl.set_volume(-0.3);
    assert_eq!(ctl.state().volume, 0.0);
    assert_eq!(
        ctl.set_volume(f32::NAN),
        TransportOutcome::Ignored(IgnoreReason::InvalidVolume)
    );
    assert_eq!(ctl.state().volume, 0.0);
    assert_eq!(
        backend.calls(),
        vec![Call::SetVolume(1.0), Call::SetVolume(0.0)]
    );
}

#[test]
fn at_most_one_track_sounds_across_a_session() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    block_on(ctl.play_track("a".into()));
    block_on(ctl.next_track());
    block_on(ctl.next_track());
    block_on(ctl.previous_track());
    ctl.pause_track();
    block_on(ctl.resume_track());
    assert_eq!(backend.playing(), vec!["b".to_string()]);
}

#[test]
fn stale_success_does_not_overwrite_newer_request() {
    let backend = MockBackend::ready();
    let ctl = Rc::new(controller(&backend));
    let gate_a = backend.gate("a");
    let gate_b = backend.gate("b");

    let mut pool = LocalPool::new();
    let spawner = pool.spawner();
    let outcomes = Rc::new(std::cell::RefCell::new(Vec::new()));
    for id in ["a", "b"] {
        let ctl = ctl.clone();
        let outcomes = outcomes.clone();
        spawner
            .spawn_local(async move {
                let out = ctl.play_track(id.into()).await;
                outcomes.borrow_mut().push((id, out));
            })
            .expect("spawn");
    }
    pool.run_until_stalled();
    assert!(outcomes.borrow().is_empty());

    // Newer request settles first, then the stale one.
    gate_b.send(Ok(())).expect("gate b");
    pool.run_until_stalled();
    gate_a.send(Ok(())).expect("gate a");
    pool.run_until_stalled();

    let outcomes = outcomes.borrow();
    assert_eq!(outcomes[0], ("b", TransportOutcome::Started("b".into())));
    assert_eq!(outcomes[1], ("a", TransportOutcome::Superseded));
    let s = ctl.state();
    assert_eq!(s.current_track, Some("b".into()));
    assert_eq!(s.current_index, 1);
    // The stale source was silenced again.
    assert_eq!(backend.playing(), vec!["b".to_string()]);
}

#[test]
fn pause_while_play_in_flight_wins() {
    let backend = MockBackend::ready();
    let ctl = Rc::new(controller(&backend));
    block_on(ctl.play_track("a".into()));
    let gate = backend.gate("b");

    let mut pool = LocalPool::new();
    let task_ctl = ctl.clone();
    pool.spawner()
        .spawn_local(async move {
            task_ctl.next_track().await;
        })
        .expect("spawn");
    pool.run_until_stalled();

    ctl.pause_track();
    gate.send(Ok(())).expect("gate");
    pool.run_until_stalled();

    let s = ctl.state();
    assert!(!s.is_playing);
    assert_eq!(s.current_track, Some("a".into()));
    assert!(backend.playing().is_empty());
}

type Outcomes = Rc<std::cell::RefCell<Vec<TransportOutcome>>>;

fn spawn_play(
    pool: &LocalPool,
    ctl: &Rc<PlaylistController<MockBackend>>,
    outcomes: &Outcomes,
    id: &'static str,
) {
    let ctl = ctl.clone();
    let outcomes = outcomes.clone();
    pool.spawner()
        .spawn_local(async move {
            let out = ctl.play_track(id.into()).await;
            outcomes.borrow_mut().push(out);
        })
        .expect("spawn");
}

#[test]
fn rejected_restart_silences_earlier_success() {
    let backend = MockBackend::ready();
    let ctl = Rc::new(controller(&backend));
    let outcomes = Outcomes::default();
    let mut pool = LocalPool::new();

    let gate = backend.gate("a");
    spawn_play(&pool, &ctl, &outcomes, "a");
    pool.run_until_stalled();
    backend.push_behavior(PlayBehavior::Reject("decode"));
    spawn_play(&pool, &ctl, &outcomes, "a");
    pool.run_until_stalled();
    gate.send(Ok(())).expect("gate");
    pool.run_until_stalled();

    let outcomes = outcomes.borrow();
    assert!(matches!(outcomes[0], TransportOutcome::Failed(_)));
    assert_eq!(outcomes[1], TransportOutcome::Superseded);
    let s = ctl.state();
    assert_eq!(s.current_track, None);
    assert!(!s.is_playing);
    assert!(backend.playing().is_empty());
}

#[test]
fn earlier_success_waits_for_restart_then_stops_if_it_fails() {
    let backend = MockBackend::ready();
    let ctl = Rc::new(controller(&backend));
    let outcomes = Outcomes::default();
    let mut pool = LocalPool::new();

    let first = backend.gate("a");
    spawn_play(&pool, &ctl, &outcomes, "a");
    pool.run_until_stalled();
    let second = backend.gate("a");
    spawn_play(&pool, &ctl, &outcomes, "a");
    pool.run_until_stalled();

    first.send(Ok(())).expect("first");
    pool.run_until_stalled();
    // Still sounding while the restart is pending.
    assert_eq!(backend.playing(), vec!["a".to_string()]);

    second
        .send(Err(AudioError::Rejected {
            track: "a".into(),
            reason: "decode".into(),
        }))
        .expect("second");
    pool.run_until_stalled();

    let outcomes = outcomes.borrow();
    assert_eq!(outcomes[0], TransportOutcome::Superseded);
    assert!(matches!(outcomes[1], TransportOutcome::Failed(_)));
    assert!(!ctl.state().is_playing);
    assert!(backend.playing().is_empty());
}

#[test]
fn earlier_success_is_kept_when_restart_succeeds() {
    let backend = MockBackend::ready();
    let ctl = Rc::new(controller(&backend));
    let outcomes = Outcomes::default();
    let mut pool = LocalPool::new();

    let first = backend.gate("a");
    spawn_play(&pool, &ctl, &outcomes, "a");
    pool.run_until_stalled();
    let second = backend.gate("a");
    spawn_play(&pool, &ctl, &outcomes, "a");
    pool.run_until_stalled();
    first.send(Ok(())).expect("first");
    second.send(Ok(())).expect("second");
    pool.run_until_stalled();

    assert_eq!(ctl.state().current_track, Some("a".into()));
    assert!(ctl.state().is_playing);
    assert!(backend.playing().iter().all(|t| t == "a"));
    assert_eq!(ctl.pause_track(), TransportOutcome::Paused);
    assert!(backend.playing().is_empty());
}

#[test]
fn pause_during_first_play_cancels_it() {
    let backend = MockBackend::ready();
    let ctl = Rc::new(controller(&backend));
    let outcomes = Outcomes::default();
    let mut pool = LocalPool::new();

    let gate = backend.gate("a");
    spawn_play(&pool, &ctl, &outcomes, "a");
    pool.run_until_stalled();
    assert_eq!(ctl.pause_track(), TransportOutcome::Paused);
    gate.send(Ok(())).expect("gate");
    pool.run_until_stalled();

    assert_eq!(outcomes.borrow()[0], TransportOutcome::Superseded);
    let s = ctl.state();
    assert_eq!(s.current_track, None);
    assert!(!s.is_playing);
    assert!(backend.playing().is_empty());
}

#[test]
fn shutdown_stops_output() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    block_on(ctl.play_track("a".into()));
    ctl.shutdown();
    assert!(!ctl.state().is_playing);
    assert!(backend.playing().is_empty());
}

#[test]
fn toggle_playback_cycles_play_pause_resume() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    assert_eq!(
        block_on(ctl.toggle_playback()),
        TransportOutcome::Started("a".into())
    );
    assert_eq!(block_on(ctl.toggle_playback()), TransportOutcome::Paused);
    assert_eq!(
        block_on(ctl.toggle_playback()),
        TransportOutcome::Started("a".into())
    );
}

#[test]
fn execute_dispatches_commands() {
    let backend = MockBackend::ready();
    let ctl = controller(&backend);
    block_on(ctl.execute(TransportCommand::Next));
    assert_eq!(ctl.state().current_track, Some("b".into()));
    block_on(ctl.execute(TransportCommand::ToggleEnabled));
    assert!(!ctl.state().enabled);
    block_on(ctl.execute(TransportCommand::VolumeUp));
    assert!((ctl.state().volume - 0.55).abs() < 1e-6);
    block_on(ctl.execute(TransportCommand::VolumeDown));
    block_on(ctl.execute(TransportCommand::VolumeDown));
    assert!((ctl.state().volume - 0.45).abs() < 1e-6);
}

#[test]
fn transport_keys_map_to_commands() {
    assert_eq!(
        TransportCommand::from_key(" "),
        Some(TransportCommand::TogglePlayback)
    );
    assert_eq!(
        TransportCommand::from_key("ArrowRight"),
        Some(TransportCommand::Next)
    );
    assert_eq!(TransportCommand::from_key("B"), Some(TransportCommand::Previous));
    assert_eq!(
        TransportCommand::from_key("m"),
        Some(TransportCommand::ToggleEnabled)
    );
    assert_eq!(TransportCommand::from_key("="), Some(TransportCommand::VolumeUp));
    assert_eq!(TransportCommand::from_key("_"), Some(TransportCommand::VolumeDown));
    assert_eq!(TransportCommand::from_key("x"), None);
}

#[test]
fn current_info_follows_soundtrack() {
    let backend = MockBackend::ready();
    let ctl = PlaylistController::new(backend, TrackCatalog::soundtrack());
    assert!(ctl.current_info().is_none());
    block_on(ctl.next_track());
    let info = ctl.current_info().expect("info");
    assert_eq!(info.id, "mystic_plains".into());
    assert_eq!(info.category, TrackCategory::Mystic);
}
