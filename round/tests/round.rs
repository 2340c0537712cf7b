use std::time::Duration;

use bead_hunt_core::{
    BeadId, BeadKind, BeadSeed, BeadSymbol, Command, Event, GridPoint, GridSize, Level,
    MoveDirection, RoundOutcome, RoundSetup, RoundStatus, RoundTuning, Trajectory,
};
use bead_hunt_round::{self as round, query, Round, RoundError};

const TARGET: BeadId = BeadId::new(0);
const DECOY_A: BeadId = BeadId::new(1);
const DECOY_B: BeadId = BeadId::new(2);
const DECOY_C: BeadId = BeadId::new(3);

fn test_level() -> Level {
    Level::new(5, 3, 3, Duration::from_millis(460), 5).expect("valid level")
}

fn trajectory(directions: [MoveDirection; 3]) -> Trajectory {
    Trajectory::from_moves(
        directions
            .into_iter()
            .map(bead_hunt_core::Move::with_direction)
            .collect(),
    )
}

fn seed(id: BeadId, kind: BeadKind, glyph: char, moves: [MoveDirection; 3], x: u32, y: u32) -> BeadSeed {
    BeadSeed {
        id,
        kind,
        symbol: BeadSymbol::new(glyph),
        trajectory: trajectory(moves),
        start: GridPoint::new(x, y),
    }
}

// Hand-picked so no two beads share a cell at any time slot.
fn test_setup() -> RoundSetup {
    use MoveDirection::{East, North, South, West};
    RoundSetup {
        level: test_level(),
        grid: GridSize::square(5),
        beads: vec![
            seed(TARGET, BeadKind::Target, 'a', [East, East, North], 0, 0),
            seed(DECOY_A, BeadKind::Decoy, 'b', [North, North, East], 0, 1),
            seed(DECOY_B, BeadKind::Decoy, 'c', [South, South, West], 4, 4),
            seed(DECOY_C, BeadKind::Decoy, 'd', [West, North, North], 3, 0),
        ],
        tray_order: vec![DECOY_B, TARGET, DECOY_C, DECOY_A],
    }
}

fn running_round() -> (Round, Vec<Event>) {
    let mut game = Round::new(test_setup(), RoundTuning::default()).expect("valid setup");
    let mut events = Vec::new();
    round::apply(&mut game, Command::Start, &mut events);
    assert_eq!(events, vec![Event::RoundStarted]);
    (game, events)
}

fn tick(game: &mut Round, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    round::apply(
        game,
        Command::Tick {
            dt: Duration::from_millis(millis),
        },
        &mut events,
    );
    events
}

fn select(game: &mut Round, bead: BeadId) -> Vec<Event> {
    let mut events = Vec::new();
    round::apply(game, Command::Select { bead }, &mut events);
    events
}

#[test]
fn first_cycle_target_selection_wins_with_full_budget() {
    let (mut game, _) = running_round();

    let _ = tick(&mut game, 1000);
    let events = select(&mut game, TARGET);

    assert!(events.contains(&Event::BeadSelected {
        bead: TARGET,
        kind: BeadKind::Target,
    }));
    assert!(events.contains(&Event::RoundWon { score: 5 }));
    assert!(events.contains(&Event::BeadsRevealed));
    assert!(!events.iter().any(|event| matches!(event, Event::StarConsumed { .. })));
    assert_eq!(query::status(&game), RoundStatus::Won);
    assert_eq!(query::outcome(&game), Some(RoundOutcome::Won { score: 5 }));
    assert_eq!(query::outcome(&game).and_then(|o| o.score()), Some(5));
}

#[test]
fn unanswered_cycles_exhaust_the_budget() {
    let (mut game, _) = running_round();
    let mut consumed_remaining = Vec::new();
    let mut ticks = 0;

    while query::status(&game) == RoundStatus::Running {
        ticks += 1;
        assert!(ticks < 2000, "round failed to terminate");
        for event in tick(&mut game, 500) {
            match event {
                Event::StarConsumed { remaining } => consumed_remaining.push(remaining),
                Event::RoundWon { .. } => panic!("round won without any selection"),
                _ => {}
            }
        }
    }

    assert_eq!(query::status(&game), RoundStatus::Lost);
    assert_eq!(query::outcome(&game), Some(RoundOutcome::Lost));
    assert_eq!(query::outcome(&game).and_then(|o| o.score()), None);
    // One star per lap across all four beads, never double-consumed.
    assert_eq!(consumed_remaining, vec![4, 3, 2, 1, 0]);
    assert_eq!(query::stars_remaining(&game), 0);
}

#[test]
fn wrong_guesses_consume_immediately_and_the_round_loops() {
    let (mut game, _) = running_round();

    let _ = tick(&mut game, 100);
    let events = select(&mut game, DECOY_A);
    assert!(events.contains(&Event::DecoyHidden { bead: DECOY_A }));
    assert!(events.contains(&Event::StarConsumed { remaining: 4 }));
    assert_eq!(query::status(&game), RoundStatus::Running);

    let _ = tick(&mut game, 100);
    let events = select(&mut game, DECOY_B);
    assert!(events.contains(&Event::StarConsumed { remaining: 3 }));
    assert_eq!(query::status(&game), RoundStatus::Running);

    let _ = tick(&mut game, 100);
    let events = select(&mut game, TARGET);
    assert!(events.contains(&Event::RoundWon { score: 3 }));
    assert_eq!(query::outcome(&game), Some(RoundOutcome::Won { score: 3 }));
}

#[test]
fn hidden_decoys_are_removed_from_play() {
    let (mut game, _) = running_round();

    let _ = select(&mut game, DECOY_A);
    let repeat = select(&mut game, DECOY_A);
    assert!(repeat.is_empty(), "hidden beads must not fire signals");

    let view = query::bead_view(&game);
    let hidden = view
        .iter()
        .find(|snapshot| snapshot.id == DECOY_A)
        .expect("bead present in view");
    assert!(hidden.hidden);

    // A hidden decoy's timeline is detached: ticking far past a full lap
    // produces no cycle completion for it.
    let events = tick(&mut game, 10_000);
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::CycleCompleted { bead, .. } if *bead == DECOY_A)));
}

#[test]
fn wrong_guess_on_the_last_star_loses_the_round() {
    let tuning = RoundTuning {
        total_stars: 1,
        ..RoundTuning::default()
    };
    let mut game = Round::new(test_setup(), tuning).expect("valid setup");
    let mut events = Vec::new();
    round::apply(&mut game, Command::Start, &mut events);

    let events = select(&mut game, DECOY_C);
    assert!(events.contains(&Event::DecoyHidden { bead: DECOY_C }));
    assert!(events.contains(&Event::StarConsumed { remaining: 0 }));
    assert!(events.contains(&Event::RoundLost));
    assert_eq!(query::outcome(&game), Some(RoundOutcome::Lost));
}

#[test]
fn signals_after_round_end_are_stale_no_ops() {
    let (mut game, _) = running_round();
    let _ = select(&mut game, TARGET);
    assert_eq!(query::status(&game), RoundStatus::Won);

    assert!(tick(&mut game, 5_000).is_empty());
    assert!(select(&mut game, DECOY_A).is_empty());
    assert!(select(&mut game, TARGET).is_empty());
    assert_eq!(query::outcome(&game), Some(RoundOutcome::Won { score: 5 }));
}

#[test]
fn commands_before_start_are_no_ops() {
    let mut game = Round::new(test_setup(), RoundTuning::default()).expect("valid setup");
    assert!(tick(&mut game, 5_000).is_empty());
    assert!(select(&mut game, TARGET).is_empty());
    assert_eq!(query::status(&game), RoundStatus::NotStarted);
}

#[test]
fn last_instant_correct_click_is_not_penalized() {
    let (mut game, _) = running_round();

    // Lap 0 elapses 2380 ms in: fade 500 + traverse 3 * 460 + fade 500.
    let events = tick(&mut game, 2400);
    assert!(events.contains(&Event::StarConsumed { remaining: 4 }));

    let events = select(&mut game, TARGET);
    assert!(events.contains(&Event::StarRestored { remaining: 5 }));
    assert!(events.contains(&Event::RoundWon { score: 5 }));
}

#[test]
fn cycle_penalty_stands_once_another_tick_passed() {
    let (mut game, _) = running_round();

    let events = tick(&mut game, 2400);
    assert!(events.contains(&Event::StarConsumed { remaining: 4 }));

    let _ = tick(&mut game, 50);
    let events = select(&mut game, TARGET);
    assert!(!events.iter().any(|event| matches!(event, Event::StarRestored { .. })));
    assert!(events.contains(&Event::RoundWon { score: 4 }));
}

#[test]
fn wrong_guess_penalty_is_never_restored() {
    let (mut game, _) = running_round();

    let _ = tick(&mut game, 100);
    let events = select(&mut game, DECOY_A);
    assert!(events.contains(&Event::StarConsumed { remaining: 4 }));

    let events = select(&mut game, TARGET);
    assert!(!events.iter().any(|event| matches!(event, Event::StarRestored { .. })));
    assert!(events.contains(&Event::RoundWon { score: 4 }));
}

#[test]
fn budget_is_monotone_and_never_negative() {
    let (mut game, _) = running_round();
    let mut last = query::stars_remaining(&game);

    let _ = select(&mut game, DECOY_A);
    for _ in 0..200 {
        let _ = tick(&mut game, 500);
        let now = query::stars_remaining(&game);
        assert!(now <= last, "stars increased without a winning selection");
        last = now;
        if query::status(&game) != RoundStatus::Running {
            break;
        }
    }
    assert_eq!(query::status(&game), RoundStatus::Lost);
}

fn rejection(setup: RoundSetup) -> RoundError {
    Round::new(setup, RoundTuning::default()).expect_err("setup must be rejected")
}

#[test]
fn setup_without_a_target_is_rejected() {
    let mut setup = test_setup();
    setup.beads.retain(|bead| bead.kind == BeadKind::Decoy);
    assert_eq!(rejection(setup), RoundError::MissingTarget);
}

#[test]
fn setup_with_two_targets_is_rejected() {
    let mut setup = test_setup();
    setup.beads[1].kind = BeadKind::Target;
    assert_eq!(rejection(setup), RoundError::MultipleTargets);
}

#[test]
fn setup_with_duplicate_ids_is_rejected() {
    let mut setup = test_setup();
    setup.beads[2].id = DECOY_A;
    assert_eq!(rejection(setup), RoundError::DuplicateBeadId { bead: DECOY_A });
}

#[test]
fn setup_leaving_the_grid_is_rejected() {
    use MoveDirection::East;
    let mut setup = test_setup();
    setup.beads[0] = seed(TARGET, BeadKind::Target, 'a', [East, East, East], 3, 0);
    assert_eq!(rejection(setup), RoundError::OutOfBounds { bead: TARGET });
}

#[test]
fn setup_with_wrong_trajectory_length_is_rejected() {
    let mut setup = test_setup();
    setup.beads[0].trajectory = Trajectory::from_moves(vec![bead_hunt_core::Move::with_direction(
        MoveDirection::East,
    )]);
    assert_eq!(
        rejection(setup),
        RoundError::TrajectoryLengthMismatch { bead: TARGET }
    );
}
