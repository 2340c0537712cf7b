#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Bead Hunt engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative round, and pure systems. Adapters submit [`Command`] values
//! describing ticks and player selections, the round executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values for
//! systems and presentation layers to react to deterministically. Systems
//! consume event streams, query immutable snapshots, and respond exclusively
//! with data or new command batches.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Bead Hunt.";

/// Number of stars a round starts with unless tuning overrides it.
pub const TOTAL_NUM_STARS: u32 = 5;

/// Base duration of the fade-in and fade-out phases of a bead cycle.
pub const FADE_DURATION: Duration = Duration::from_millis(500);

/// Base pause between the end of one bead cycle and the start of the next.
pub const PAUSE_BETWEEN_CYCLES: Duration = Duration::from_millis(400);

/// Factor applied to every bead's playback rate after each completed cycle.
///
/// Values below 1.0 stretch later cycles, deliberately easing the puzzle the
/// longer the player watches.
pub const CYCLE_SLOWDOWN_FACTOR: f64 = 0.9;

/// Single step of a trajectory along the grid.
///
/// The twelve compass values cover single and double orthogonal/diagonal
/// steps; [`MoveDirection::Stay`] keeps the bead on its current cell for one
/// time slot. Unknown directions cannot be represented: the enum is
/// exhaustive, and deserializing anything else fails at the serde layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveDirection {
    /// One cell toward increasing row indices.
    North,
    /// One cell toward decreasing row indices.
    South,
    /// One cell toward increasing column indices.
    East,
    /// One cell toward decreasing column indices.
    West,
    /// One cell north and one cell east in a single step.
    NorthEast,
    /// One cell north and one cell west in a single step.
    NorthWest,
    /// One cell south and one cell east in a single step.
    SouthEast,
    /// One cell south and one cell west in a single step.
    SouthWest,
    /// Two cells north in a single step.
    DoubleNorth,
    /// Two cells south in a single step.
    DoubleSouth,
    /// Two cells east in a single step.
    DoubleEast,
    /// Two cells west in a single step.
    DoubleWest,
    /// No movement for one time slot.
    Stay,
}

impl MoveDirection {
    /// Signed column delta contributed by one step in this direction.
    #[must_use]
    pub const fn dx(self) -> i32 {
        match self {
            Self::East | Self::NorthEast | Self::SouthEast => 1,
            Self::West | Self::NorthWest | Self::SouthWest => -1,
            Self::DoubleEast => 2,
            Self::DoubleWest => -2,
            Self::North | Self::South | Self::DoubleNorth | Self::DoubleSouth | Self::Stay => 0,
        }
    }

    /// Signed row delta contributed by one step in this direction.
    #[must_use]
    pub const fn dy(self) -> i32 {
        match self {
            Self::North | Self::NorthEast | Self::NorthWest => 1,
            Self::South | Self::SouthEast | Self::SouthWest => -1,
            Self::DoubleNorth => 2,
            Self::DoubleSouth => -2,
            Self::East | Self::West | Self::DoubleEast | Self::DoubleWest | Self::Stay => 0,
        }
    }
}

/// Rotation component of a move.
///
/// Spin is part of a move's identity (two trajectories differing only in
/// spin are distinct) but contributes nothing to position math.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveSpin {
    /// No rotation.
    #[default]
    None,
    /// Half turn clockwise over the step.
    HalfClockwise,
    /// Half turn counter-clockwise over the step.
    HalfCounterClockwise,
}

/// Scale component of a move; identity-relevant, position-neutral like spin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveGrow {
    /// No size change.
    #[default]
    None,
    /// The bead shrinks over the step.
    Shrink,
    /// The bead enlarges over the step.
    Enlarge,
}

/// One trajectory step combining direction, spin and grow dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    direction: MoveDirection,
    spin: MoveSpin,
    grow: MoveGrow,
}

impl Move {
    /// Creates a move with explicit values for every dimension.
    #[must_use]
    pub const fn new(direction: MoveDirection, spin: MoveSpin, grow: MoveGrow) -> Self {
        Self {
            direction,
            spin,
            grow,
        }
    }

    /// Creates a move that only travels, with neutral spin and grow.
    #[must_use]
    pub const fn with_direction(direction: MoveDirection) -> Self {
        Self::new(direction, MoveSpin::None, MoveGrow::None)
    }

    /// Direction component of the move.
    #[must_use]
    pub const fn direction(&self) -> MoveDirection {
        self.direction
    }

    /// Spin component of the move.
    #[must_use]
    pub const fn spin(&self) -> MoveSpin {
        self.spin
    }

    /// Grow component of the move.
    #[must_use]
    pub const fn grow(&self) -> MoveGrow {
        self.grow
    }

    /// Signed column delta of the move.
    #[must_use]
    pub const fn dx(&self) -> i32 {
        self.direction.dx()
    }

    /// Signed row delta of the move.
    #[must_use]
    pub const fn dy(&self) -> i32 {
        self.direction.dy()
    }
}

/// Ordered sequence of moves a bead performs over a round.
///
/// Trajectories compare structurally over the full move list, which is the
/// equality the round-wide uniqueness invariant relies on.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Trajectory {
    moves: Vec<Move>,
}

impl Trajectory {
    /// Creates a trajectory from the provided move sequence.
    #[must_use]
    pub fn from_moves(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    /// Moves composing the trajectory, in traversal order.
    #[must_use]
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of moves in the trajectory.
    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Reports whether the trajectory contains no moves.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Replays the trajectory from `start`, returning the absolute cell for
    /// every time slot: slot 0 is the start, slot `k` the cell after the
    /// `k`-th move. A trajectory of only [`MoveDirection::Stay`] steps still
    /// yields one cell per slot.
    ///
    /// Returns `None` when any step underflows the coordinate space; bounds
    /// against a concrete grid are the caller's concern.
    #[must_use]
    pub fn cells_from(&self, start: GridPoint) -> Option<Vec<GridPoint>> {
        let mut cells = Vec::with_capacity(self.moves.len() + 1);
        let mut current = start;
        cells.push(current);
        for step in &self.moves {
            current = current.offset_by(step.dx(), step.dy())?;
            cells.push(current);
        }
        Some(cells)
    }
}

/// Location of a single grid cell expressed as column and row offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    x: u32,
    y: u32,
}

impl GridPoint {
    /// Creates a new grid point.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Zero-based column offset of the cell.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// Zero-based row offset of the cell.
    #[must_use]
    pub const fn y(&self) -> u32 {
        self.y
    }

    /// Returns the point displaced by the provided deltas, or `None` when
    /// either coordinate would leave the unsigned coordinate space.
    #[must_use]
    pub fn offset_by(self, dx: i32, dy: i32) -> Option<Self> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Self { x, y })
    }
}

/// Dimensions of the play grid measured in whole cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    height: u32,
}

impl GridSize {
    /// Creates a grid with explicit dimensions.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Creates the square grid used by every shipped level.
    #[must_use]
    pub const fn square(size: u32) -> Self {
        Self::new(size, size)
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Reports whether the point lies inside the grid bounds.
    #[must_use]
    pub const fn contains(&self, point: GridPoint) -> bool {
        point.x() < self.width && point.y() < self.height
    }
}

/// Unique identifier assigned to a bead within one round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BeadId(u32);

impl BeadId {
    /// Creates a new bead identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Role a bead plays within a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeadKind {
    /// The one bead whose trajectory the player must recognize.
    Target,
    /// A distractor bead with its own generated trajectory.
    Decoy,
}

/// Visual tag displayed for a bead; orthogonal to all round logic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BeadSymbol(char);

impl BeadSymbol {
    /// Creates a symbol from a single scalar glyph.
    #[must_use]
    pub const fn new(glyph: char) -> Self {
        Self(glyph)
    }

    /// Retrieves the glyph.
    #[must_use]
    pub const fn get(&self) -> char {
        self.0
    }
}

/// Phase of a bead's repeating animation cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CyclePhase {
    /// The bead grows in at its start cell.
    FadingIn,
    /// The bead walks its trajectory cell by cell.
    Traversing,
    /// The bead shrinks out at its final cell.
    FadingOut,
    /// Pause between cycles before the next, slower fade-in.
    Resting,
    /// The timeline is detached; no further phases or signals occur.
    Finalized,
}

/// Static parameters of one playable level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level {
    size: u32,
    num_moves: u32,
    num_decoys: u32,
    time_per_move: Duration,
    cycles_allowed: u32,
}

impl Level {
    /// Creates a level after validating its parameters.
    ///
    /// A zero grid size, zero move count or zero per-move duration can never
    /// produce a playable round and is rejected before any setup begins.
    pub fn new(
        size: u32,
        num_moves: u32,
        num_decoys: u32,
        time_per_move: Duration,
        cycles_allowed: u32,
    ) -> Result<Self, LevelError> {
        if size == 0 {
            return Err(LevelError::ZeroGridSize);
        }
        if num_moves == 0 {
            return Err(LevelError::ZeroMoves);
        }
        if time_per_move.is_zero() {
            return Err(LevelError::ZeroTimePerMove);
        }
        Ok(Self {
            size,
            num_moves,
            num_decoys,
            time_per_move,
            cycles_allowed,
        })
    }

    /// Side length of the square play grid.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Number of moves in every trajectory of the level.
    #[must_use]
    pub const fn num_moves(&self) -> u32 {
        self.num_moves
    }

    /// Number of decoy beads accompanying the target.
    #[must_use]
    pub const fn num_decoys(&self) -> u32 {
        self.num_decoys
    }

    /// Wall-clock time a bead spends on a single move while traversing.
    #[must_use]
    pub const fn time_per_move(&self) -> Duration {
        self.time_per_move
    }

    /// Animation cycles the level nominally allows before a forced timeout.
    ///
    /// Informational: the authoritative end conditions are budget exhaustion
    /// and correct selection.
    #[must_use]
    pub const fn cycles_allowed(&self) -> u32 {
        self.cycles_allowed
    }

    /// Grid implied by the level's size.
    #[must_use]
    pub const fn grid(&self) -> GridSize {
        GridSize::square(self.size)
    }
}

/// Errors raised while validating level parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum LevelError {
    /// The grid must contain at least one cell.
    #[error("level grid size must be positive")]
    ZeroGridSize,
    /// Trajectories must contain at least one move.
    #[error("level move count must be positive")]
    ZeroMoves,
    /// Traversal requires a positive per-move duration.
    #[error("level time per move must be positive")]
    ZeroTimePerMove,
}

/// Timing and budget knobs shared by every bead timeline of a round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundTuning {
    /// Base duration of the fade-in and fade-out phases.
    pub fade: Duration,
    /// Base pause between consecutive cycles.
    pub rest: Duration,
    /// Playback-rate multiplier applied after each completed cycle; values
    /// in `(0, 1]` slow later cycles down.
    pub slowdown_factor: f64,
    /// Stars the countdown starts with.
    pub total_stars: u32,
}

impl Default for RoundTuning {
    fn default() -> Self {
        Self {
            fade: FADE_DURATION,
            rest: PAUSE_BETWEEN_CYCLES,
            slowdown_factor: CYCLE_SLOWDOWN_FACTOR,
            total_stars: TOTAL_NUM_STARS,
        }
    }
}

/// Fully resolved description of one bead before the round starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BeadSeed {
    /// Identifier the round will know the bead by.
    pub id: BeadId,
    /// Role of the bead.
    pub kind: BeadKind,
    /// Glyph shown for the bead and its tray avatar.
    pub symbol: BeadSymbol,
    /// Move sequence the bead will traverse each cycle.
    pub trajectory: Trajectory,
    /// Starting cell of the traversal.
    pub start: GridPoint,
}

/// Complete, validated input for constructing a round.
///
/// Produced by the bootstrap system and consumed by `Round::new`; the
/// generation registries are scoped to setup and discarded once this value
/// exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoundSetup {
    /// Level the round is played at.
    pub level: Level,
    /// Grid every bead stays inside at every time slot.
    pub grid: GridSize,
    /// All beads of the round, exactly one of which is the target.
    pub beads: Vec<BeadSeed>,
    /// Shuffled order in which the selection tray shows bead avatars.
    pub tray_order: Vec<BeadId>,
}

impl RoundSetup {
    /// Returns the seed of the target bead, if present.
    #[must_use]
    pub fn target(&self) -> Option<&BeadSeed> {
        self.beads.iter().find(|seed| seed.kind == BeadKind::Target)
    }
}

/// Lifecycle states of a round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundStatus {
    /// Constructed but not yet animating.
    NotStarted,
    /// Beads are cycling and selections are accepted.
    Running,
    /// The target was selected; terminal.
    Won,
    /// The budget ran out; terminal.
    Lost,
}

/// Final result of a finished round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RoundOutcome {
    /// The player spotted the target with `score` stars remaining.
    Won {
        /// Stars left on the countdown, the level's recorded score.
        score: u32,
    },
    /// The budget ran out first; callers record no score.
    Lost,
}

impl RoundOutcome {
    /// Stars earned by the round, if any.
    #[must_use]
    pub const fn score(&self) -> Option<u32> {
        match self {
            Self::Won { score } => Some(*score),
            Self::Lost => None,
        }
    }
}

/// Commands that express all permissible round mutations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Starts every bead's animation cycle and opens the round for play.
    Start,
    /// Advances the simulated clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Reports that the player selected a bead, through either its primary
    /// grid representation or its tray avatar.
    Select {
        /// Identifier of the selected bead.
        bead: BeadId,
    },
}

/// Events broadcast by the round after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// The round transitioned from `NotStarted` to `Running`.
    RoundStarted,
    /// The simulated clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// A bead finished a full fade-in/traverse/fade-out cycle.
    CycleCompleted {
        /// Bead whose cycle elapsed.
        bead: BeadId,
        /// Zero-based index of the completed cycle.
        iteration: u32,
        /// Playback rate the completed cycle ran at.
        playback_rate: f64,
    },
    /// The player selected a bead while the round was running.
    BeadSelected {
        /// Bead that was selected.
        bead: BeadId,
        /// Role of the selected bead.
        kind: BeadKind,
    },
    /// A wrongly guessed decoy and its tray avatar were hidden in lockstep.
    DecoyHidden {
        /// Bead that was hidden.
        bead: BeadId,
    },
    /// The countdown consumed one star.
    StarConsumed {
        /// Stars left after the consumption.
        remaining: u32,
    },
    /// A same-instant cycle penalty was undone by a winning selection.
    StarRestored {
        /// Stars left after the restore.
        remaining: u32,
    },
    /// The target was selected; the round is over.
    RoundWon {
        /// Stars remaining, recorded as the level score.
        score: u32,
    },
    /// The budget ran out; the round is over with no score.
    RoundLost,
    /// Every bead's true role may now be disclosed to the player.
    BeadsRevealed,
}

/// Immutable representation of a single bead's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeadSnapshot {
    /// Unique identifier assigned to the bead.
    pub id: BeadId,
    /// Role of the bead. Presentation layers must not disclose it before
    /// [`Event::BeadsRevealed`] has been observed.
    pub kind: BeadKind,
    /// Glyph shown for the bead.
    pub symbol: BeadSymbol,
    /// Phase the bead's timeline currently occupies.
    pub phase: CyclePhase,
    /// Zero-based index of the cycle currently running.
    pub iteration: u32,
    /// Playback rate of the current cycle.
    pub playback_rate: f64,
    /// Completed fraction of the current phase, clamped to `0.0..=1.0`.
    pub phase_progress: f64,
    /// Cell the bead is moving away from in the current time slot.
    pub cell_from: GridPoint,
    /// Cell the bead is moving toward in the current time slot.
    pub cell_to: GridPoint,
    /// Completed fraction of the current move segment, clamped to `0.0..=1.0`.
    pub move_progress: f64,
    /// Whether the bead was hidden by a wrong guess.
    pub hidden: bool,
}

/// Read-only snapshot describing all beads of a round.
#[derive(Clone, Debug, Default)]
pub struct BeadView {
    snapshots: Vec<BeadSnapshot>,
}

impl BeadView {
    /// Creates a new bead view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<BeadSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = &BeadSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<BeadSnapshot> {
        self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};

    #[test]
    fn double_moves_advance_two_cells() {
        assert_eq!(MoveDirection::DoubleEast.dx(), 2);
        assert_eq!(MoveDirection::DoubleSouth.dy(), -2);
        assert_eq!(MoveDirection::Stay.dx(), 0);
        assert_eq!(MoveDirection::Stay.dy(), 0);
    }

    #[test]
    fn diagonals_contribute_to_both_axes() {
        let step = Move::with_direction(MoveDirection::NorthWest);
        assert_eq!(step.dx(), -1);
        assert_eq!(step.dy(), 1);
    }

    #[test]
    fn trajectories_differing_only_in_spin_are_distinct() {
        let travel = Trajectory::from_moves(vec![Move::with_direction(MoveDirection::North)]);
        let spinning = Trajectory::from_moves(vec![Move::new(
            MoveDirection::North,
            MoveSpin::HalfClockwise,
            MoveGrow::None,
        )]);
        assert_ne!(travel, spinning);
    }

    #[test]
    fn cells_from_replays_every_time_slot() {
        let trajectory = Trajectory::from_moves(vec![
            Move::with_direction(MoveDirection::East),
            Move::with_direction(MoveDirection::DoubleNorth),
            Move::with_direction(MoveDirection::Stay),
        ]);
        let cells = trajectory
            .cells_from(GridPoint::new(1, 0))
            .expect("trajectory stays in the coordinate space");
        assert_eq!(
            cells,
            vec![
                GridPoint::new(1, 0),
                GridPoint::new(2, 0),
                GridPoint::new(2, 2),
                GridPoint::new(2, 2),
            ]
        );
    }

    #[test]
    fn cells_from_rejects_coordinate_underflow() {
        let trajectory = Trajectory::from_moves(vec![Move::with_direction(MoveDirection::West)]);
        assert!(trajectory.cells_from(GridPoint::new(0, 3)).is_none());
    }

    #[test]
    fn level_validation_rejects_degenerate_parameters() {
        let zero_size = Level::new(0, 3, 3, Duration::from_millis(400), 5);
        assert_eq!(zero_size, Err(LevelError::ZeroGridSize));

        let zero_moves = Level::new(5, 0, 3, Duration::from_millis(400), 5);
        assert_eq!(zero_moves, Err(LevelError::ZeroMoves));

        let zero_time = Level::new(5, 3, 3, Duration::ZERO, 5);
        assert_eq!(zero_time, Err(LevelError::ZeroTimePerMove));
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn trajectory_round_trips_through_bincode() {
        let trajectory = Trajectory::from_moves(vec![
            Move::with_direction(MoveDirection::SouthEast),
            Move::new(
                MoveDirection::Stay,
                MoveSpin::HalfClockwise,
                MoveGrow::Shrink,
            ),
        ]);
        assert_round_trip(&trajectory);
    }

    #[test]
    fn level_round_trips_through_bincode() {
        let level = Level::new(5, 3, 3, Duration::from_millis(460), 5).expect("valid level");
        assert_round_trip(&level);
    }
}
