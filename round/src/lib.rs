#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative round state management for Bead Hunt.
//!
//! A [`Round`] owns every bead's animation timeline, the star countdown and
//! the win/lose resolution. Adapters mutate it exclusively through
//! [`apply`], which processes one [`Command`] and broadcasts the resulting
//! [`Event`] values; read access goes through the [`query`] module. All
//! processing is single-threaded and deterministic: commands apply in
//! submission order, and any signal arriving after the round reached a
//! terminal state is a silent no-op.

use std::collections::HashSet;
use std::time::Duration;

use bead_hunt_core::{
    BeadId, BeadKind, BeadSymbol, Command, Event, GridPoint, GridSize, Level, RoundOutcome,
    RoundSetup, RoundStatus, RoundTuning, Trajectory, WELCOME_BANNER,
};
use thiserror::Error;

mod countdown;
mod timeline;

pub use countdown::Countdown;

use timeline::{CycleCompletion, CycleTimeline};

/// Errors raised while validating a [`RoundSetup`] into a playable round.
///
/// Every variant is a configuration error: fatal, never retried, and
/// guaranteed to abort before any bead starts animating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RoundError {
    /// The setup contains no target bead.
    #[error("round setup contains no target bead")]
    MissingTarget,
    /// The setup contains more than one target bead.
    #[error("round setup contains more than one target bead")]
    MultipleTargets,
    /// Two beads share the same identifier.
    #[error("bead id {} appears more than once", .bead.get())]
    DuplicateBeadId {
        /// Identifier that appeared twice.
        bead: BeadId,
    },
    /// A bead's trajectory length differs from the level's move count.
    #[error("bead {} trajectory length differs from the level move count", .bead.get())]
    TrajectoryLengthMismatch {
        /// Offending bead.
        bead: BeadId,
    },
    /// A bead leaves the grid at some time slot.
    #[error("bead {} leaves the grid during its trajectory", .bead.get())]
    OutOfBounds {
        /// Offending bead.
        bead: BeadId,
    },
}

#[derive(Clone, Debug)]
struct Bead {
    id: BeadId,
    kind: BeadKind,
    symbol: BeadSymbol,
    // Absolute cell per time slot; slot 0 is the start.
    cells: Vec<GridPoint>,
    timeline: CycleTimeline,
    hidden: bool,
}

impl Bead {
    fn from_seed(
        id: BeadId,
        kind: BeadKind,
        symbol: BeadSymbol,
        trajectory: &Trajectory,
        start: GridPoint,
        grid: GridSize,
        level: &Level,
        tuning: &RoundTuning,
    ) -> Result<Self, RoundError> {
        if trajectory.len() != level.num_moves() as usize {
            return Err(RoundError::TrajectoryLengthMismatch { bead: id });
        }
        let cells = trajectory
            .cells_from(start)
            .ok_or(RoundError::OutOfBounds { bead: id })?;
        if cells.iter().any(|cell| !grid.contains(*cell)) {
            return Err(RoundError::OutOfBounds { bead: id });
        }
        Ok(Self {
            id,
            kind,
            symbol,
            cells,
            timeline: CycleTimeline::new(level, tuning),
            hidden: false,
        })
    }
}

/// Represents the authoritative state of one Bead Hunt round.
#[derive(Clone, Debug)]
pub struct Round {
    banner: &'static str,
    level: Level,
    grid: GridSize,
    beads: Vec<Bead>,
    tray_order: Vec<BeadId>,
    countdown: Countdown,
    status: RoundStatus,
    outcome: Option<RoundOutcome>,
    seen_iterations: HashSet<u32>,
    tick_index: u64,
    last_cycle_star_tick: Option<u64>,
}

impl Round {
    /// Validates the setup and creates a round ready to start.
    ///
    /// No partial round escapes a failed validation; on error the caller
    /// must treat the level attempt as not built and persist nothing.
    pub fn new(setup: RoundSetup, tuning: RoundTuning) -> Result<Self, RoundError> {
        let mut targets = 0usize;
        let mut ids: HashSet<BeadId> = HashSet::new();
        for seed in &setup.beads {
            if !ids.insert(seed.id) {
                return Err(RoundError::DuplicateBeadId { bead: seed.id });
            }
            if seed.kind == BeadKind::Target {
                targets += 1;
            }
        }
        match targets {
            0 => return Err(RoundError::MissingTarget),
            1 => {}
            _ => return Err(RoundError::MultipleTargets),
        }

        let beads = setup
            .beads
            .iter()
            .map(|seed| {
                Bead::from_seed(
                    seed.id,
                    seed.kind,
                    seed.symbol,
                    &seed.trajectory,
                    seed.start,
                    setup.grid,
                    &setup.level,
                    &tuning,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            banner: WELCOME_BANNER,
            level: setup.level,
            grid: setup.grid,
            beads,
            tray_order: setup.tray_order,
            countdown: Countdown::new(tuning.total_stars),
            status: RoundStatus::NotStarted,
            outcome: None,
            seen_iterations: HashSet::new(),
            tick_index: 0,
            last_cycle_star_tick: None,
        })
    }

    fn start(&mut self, out_events: &mut Vec<Event>) {
        if self.status != RoundStatus::NotStarted {
            return;
        }
        self.status = RoundStatus::Running;
        out_events.push(Event::RoundStarted);
    }

    fn tick(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.status != RoundStatus::Running {
            return;
        }
        self.tick_index += 1;
        out_events.push(Event::TimeAdvanced { dt });

        let mut completions: Vec<(BeadId, CycleCompletion)> = Vec::new();
        let mut scratch = Vec::new();
        for bead in &mut self.beads {
            if bead.hidden {
                continue;
            }
            scratch.clear();
            bead.timeline.advance(dt, &mut scratch);
            for completion in scratch.drain(..) {
                completions.push((bead.id, completion));
            }
        }

        for (bead, completion) in completions {
            if self.status != RoundStatus::Running {
                // The round ended mid-tick; everything after is stale.
                break;
            }
            out_events.push(Event::CycleCompleted {
                bead,
                iteration: completion.iteration,
                playback_rate: completion.playback_rate,
            });
            // One star per lap across all beads: the first bead to finish an
            // iteration consumes it, later beads finishing the same lap do
            // not.
            if self.seen_iterations.insert(completion.iteration) {
                self.consume_star(StarTrigger::CycleElapsed, out_events);
            }
        }
    }

    fn select(&mut self, bead: BeadId, out_events: &mut Vec<Event>) {
        if self.status != RoundStatus::Running {
            return;
        }
        let Some(index) = self.beads.iter().position(|candidate| candidate.id == bead) else {
            return;
        };
        if self.beads[index].hidden {
            return;
        }
        let kind = self.beads[index].kind;
        out_events.push(Event::BeadSelected { bead, kind });
        match kind {
            BeadKind::Target => self.win(out_events),
            BeadKind::Decoy => {
                self.beads[index].hidden = true;
                self.beads[index].timeline.finalize();
                out_events.push(Event::DecoyHidden { bead });
                self.consume_star(StarTrigger::WrongGuess, out_events);
            }
        }
    }

    fn win(&mut self, out_events: &mut Vec<Event>) {
        // Win takes priority over a cycle penalty from the same instant: a
        // star consumed by a lap that elapsed in the current tick is given
        // back before the score is read.
        if self.last_cycle_star_tick == Some(self.tick_index) {
            self.countdown.restore_one();
            self.last_cycle_star_tick = None;
            out_events.push(Event::StarRestored {
                remaining: self.countdown.remaining(),
            });
        }
        let score = self.countdown.remaining();
        self.status = RoundStatus::Won;
        self.outcome = Some(RoundOutcome::Won { score });
        self.finalize_beads();
        out_events.push(Event::RoundWon { score });
        out_events.push(Event::BeadsRevealed);
    }

    fn lose(&mut self, out_events: &mut Vec<Event>) {
        self.status = RoundStatus::Lost;
        self.outcome = Some(RoundOutcome::Lost);
        self.finalize_beads();
        out_events.push(Event::RoundLost);
    }

    fn consume_star(&mut self, trigger: StarTrigger, out_events: &mut Vec<Event>) {
        let has_remaining = self.countdown.consume_one();
        if trigger == StarTrigger::CycleElapsed {
            self.last_cycle_star_tick = Some(self.tick_index);
        }
        out_events.push(Event::StarConsumed {
            remaining: self.countdown.remaining(),
        });
        if !has_remaining {
            self.lose(out_events);
        }
    }

    fn finalize_beads(&mut self) {
        for bead in &mut self.beads {
            bead.timeline.finalize();
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StarTrigger {
    CycleElapsed,
    WrongGuess,
}

/// Applies the provided command to the round, mutating state deterministically.
pub fn apply(round: &mut Round, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Start => round.start(out_events),
        Command::Tick { dt } => round.tick(dt, out_events),
        Command::Select { bead } => round.select(bead, out_events),
    }
}

/// Query functions that provide read-only access to the round state.
pub mod query {
    use super::Round;
    use bead_hunt_core::{
        BeadId, BeadSnapshot, BeadView, CyclePhase, GridPoint, GridSize, Level, RoundOutcome,
        RoundStatus,
    };

    /// Retrieves the welcome banner adapters may display to players.
    #[must_use]
    pub fn welcome_banner(round: &Round) -> &'static str {
        round.banner
    }

    /// Current lifecycle state of the round.
    #[must_use]
    pub fn status(round: &Round) -> RoundStatus {
        round.status
    }

    /// Final outcome once the round reached a terminal state.
    #[must_use]
    pub fn outcome(round: &Round) -> Option<RoundOutcome> {
        round.outcome
    }

    /// Level the round is played at.
    #[must_use]
    pub fn level(round: &Round) -> Level {
        round.level
    }

    /// Grid every bead stays inside at every time slot.
    #[must_use]
    pub fn grid(round: &Round) -> GridSize {
        round.grid
    }

    /// Stars still available on the countdown.
    #[must_use]
    pub fn stars_remaining(round: &Round) -> u32 {
        round.countdown.remaining()
    }

    /// Shuffled order in which the selection tray presents bead avatars.
    #[must_use]
    pub fn tray_order(round: &Round) -> &[BeadId] {
        &round.tray_order
    }

    /// Captures a read-only view of all beads in deterministic order.
    ///
    /// The `cell_from`/`cell_to`/`move_progress` fields describe the move
    /// segment a traversing bead currently occupies so presentation layers
    /// can interpolate a continuous position between the two cells.
    #[must_use]
    pub fn bead_view(round: &Round) -> BeadView {
        let snapshots = round
            .beads
            .iter()
            .map(|bead| {
                let phase = bead.timeline.phase();
                let phase_progress = bead.timeline.phase_progress();
                let (cell_from, cell_to, move_progress) =
                    segment_for(&bead.cells, phase, phase_progress);
                BeadSnapshot {
                    id: bead.id,
                    kind: bead.kind,
                    symbol: bead.symbol,
                    phase,
                    iteration: bead.timeline.iteration(),
                    playback_rate: bead.timeline.playback_rate(),
                    phase_progress,
                    cell_from,
                    cell_to,
                    move_progress,
                    hidden: bead.hidden,
                }
            })
            .collect();
        BeadView::from_snapshots(snapshots)
    }

    fn segment_for(
        cells: &[GridPoint],
        phase: CyclePhase,
        phase_progress: f64,
    ) -> (GridPoint, GridPoint, f64) {
        let first = cells[0];
        let last = cells[cells.len() - 1];
        match phase {
            CyclePhase::FadingIn | CyclePhase::Resting | CyclePhase::Finalized => {
                (first, first, 0.0)
            }
            CyclePhase::FadingOut => (last, last, 0.0),
            CyclePhase::Traversing => {
                let segments = cells.len() - 1;
                let exact = phase_progress * segments as f64;
                let index = (exact.floor() as usize).min(segments - 1);
                let fraction = (exact - index as f64).clamp(0.0, 1.0);
                (cells[index], cells[index + 1], fraction)
            }
        }
    }
}
