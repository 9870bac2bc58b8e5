//! Wave and round breakdown

use arblog::{MissionKind, Phase, PhaseKind};

use crate::helpers::{keep_all, parse, LogBuilder, NODE};

fn open_mission() -> LogBuilder {
    LogBuilder::new()
        .mission_name(100.0, "Hydron (Sedna)")
        .host_loading(100.5, NODE)
        .started(110.0)
}

fn close(log: LogBuilder) -> LogBuilder {
    log.ending(400.0).end(401.0, NODE)
}

fn drones(mut log: LogBuilder, from: f64, n: u32) -> LogBuilder {
    for i in 0..n {
        log = log.shield_drone(from + i as f64 * 0.1);
    }
    log
}

fn counts(phases: &[Phase]) -> Vec<(PhaseKind, u32, u32)> {
    phases.iter().map(|p| (p.kind, p.index, p.count)).collect()
}

#[test]
fn four_waves_make_two_rounds() {
    let mut log = open_mission();
    log = drones(log.wave(111.0, 1), 112.0, 2);
    log = drones(log.wave(150.0, 2), 151.0, 1);
    log = log.wave(190.0, 3);
    log = drones(log.wave(230.0, 4), 231.0, 3);
    let result = parse(&close(log), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(m.mission_kind, MissionKind::WaveBased);
    assert_eq!(m.wave_count, Some(4));
    assert_eq!(m.round_count, 2);
    assert_eq!(
        counts(&m.phases),
        vec![
            (PhaseKind::Wave, 1, 2),
            (PhaseKind::Wave, 2, 1),
            (PhaseKind::Wave, 3, 0),
            (PhaseKind::Wave, 4, 3),
        ]
    );
    assert_eq!(m.shield_drone_count, 6);
}

#[test]
fn drones_before_first_wave_fold_into_wave_one() {
    let mut log = drones(open_mission(), 111.0, 4);
    log = drones(log.wave(120.0, 1), 121.0, 1);
    let result = parse(&close(log), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(counts(&m.phases), vec![(PhaseKind::Wave, 1, 5)]);
    assert_eq!(m.round_count, 1);
}

#[test]
fn wave_zero_is_ignored() {
    let log = drones(open_mission().wave(111.0, 0), 112.0, 2);
    let result = parse(&close(log), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(m.mission_kind, MissionKind::Unclassified);
    assert_eq!(m.wave_count, None);
    assert_eq!(counts(&m.phases), vec![(PhaseKind::Round, 1, 2)]);
}

#[test]
fn pending_folds_into_first_round() {
    let mut log = drones(open_mission(), 111.0, 7);
    log = drones(log.round(120.0), 121.0, 3);
    let result = parse(&close(log), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(m.mission_kind, MissionKind::RoundBased);
    assert_eq!(m.round_count, 1);
    assert_eq!(counts(&m.phases), vec![(PhaseKind::Round, 1, 7)]);
    assert_eq!(m.shield_drone_count, 10);
}

#[test]
fn rounds_count_completed_boundaries() {
    let mut log = drones(open_mission(), 111.0, 2);
    log = drones(log.round(150.0), 151.0, 4);
    log = drones(log.round(200.0), 201.0, 1);
    log = log.round(250.0);
    let result = parse(&close(log), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(m.round_count, 3);
    assert_eq!(
        counts(&m.phases),
        vec![
            (PhaseKind::Round, 1, 2),
            (PhaseKind::Round, 2, 4),
            (PhaseKind::Round, 3, 1),
        ]
    );
}

#[test]
fn fallback_marker_classifies_rounds_without_primary() {
    // The reward screen also appears in missions that are not round-based;
    // without any other phase marker it is still taken as a round boundary.
    let mut log = drones(open_mission(), 111.0, 1);
    log = drones(log.reward_transition(150.0), 151.0, 2);
    let result = parse(&close(log), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(m.mission_kind, MissionKind::RoundBased);
    assert_eq!(m.round_count, 1);
    assert_eq!(counts(&m.phases), vec![(PhaseKind::Round, 1, 1)]);
    assert_eq!(m.shield_drone_count, 3);
}

#[test]
fn fallback_marker_ignored_once_primary_seen() {
    let log = open_mission()
        .round(150.0)
        .reward_transition(151.0)
        .round(200.0)
        .reward_transition(201.0);
    let result = parse(&close(log), &keep_all(1));

    assert_eq!(result.missions[0].round_count, 2);
}

#[test]
fn fallback_marker_ignored_in_wave_missions() {
    let log = open_mission()
        .wave(111.0, 1)
        .reward_transition(150.0)
        .wave(151.0, 2);
    let result = parse(&close(log), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(m.mission_kind, MissionKind::WaveBased);
    assert_eq!(m.wave_count, Some(2));
    assert_eq!(m.round_count, 1);
}

#[test]
fn no_phase_signal_means_no_rounds() {
    let result = parse(&close(open_mission()), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(m.mission_kind, MissionKind::Unclassified);
    assert_eq!(m.round_count, 0);
    assert!(m.phases.is_empty());
}

#[test]
fn implausible_wave_index_is_ignored() {
    let mut log = drones(open_mission(), 111.0, 2);
    log = log.wave(112.0, u32::MAX);
    log = drones(log.wave(120.0, 1_000_000), 121.0, 1);
    let result = parse(&close(log), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(m.mission_kind, MissionKind::Unclassified);
    assert_eq!(m.wave_count, None);
    assert_eq!(counts(&m.phases), vec![(PhaseKind::Round, 1, 3)]);
}

#[test]
fn primary_round_marker_in_wave_mission_keeps_waves() {
    let mut log = drones(open_mission().wave(111.0, 1), 112.0, 1);
    log = log.wave(150.0, 2).wave(190.0, 3).round(200.0);
    log = drones(log.wave(210.0, 4), 211.0, 2);
    let result = parse(&close(log), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(m.mission_kind, MissionKind::WaveBased);
    assert_eq!(m.wave_count, Some(4));
    assert_eq!(m.round_count, 2);
    assert_eq!(
        counts(&m.phases),
        vec![
            (PhaseKind::Wave, 1, 1),
            (PhaseKind::Wave, 2, 0),
            (PhaseKind::Wave, 3, 0),
            (PhaseKind::Wave, 4, 2),
        ]
    );
}

#[test]
fn wave_marker_after_rounds_reclassifies_mission() {
    // Known misclassification risk: a wave marker wins over earlier round
    // boundaries, so the round breakdown is replaced by waves.
    let mut log = drones(open_mission(), 111.0, 2);
    log = drones(log.round(150.0), 151.0, 1);
    log = drones(log.wave(200.0, 1), 201.0, 3);
    let result = parse(&close(log), &keep_all(1));

    let m = &result.missions[0];
    assert_eq!(m.mission_kind, MissionKind::WaveBased);
    assert_eq!(m.wave_count, Some(1));
    assert_eq!(m.round_count, 1);
    assert_eq!(counts(&m.phases), vec![(PhaseKind::Wave, 1, 5)]);
    assert_eq!(m.shield_drone_count, 6);
}
