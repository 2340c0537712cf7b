#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Start-position allocation and collision rejection for one round.
//!
//! The system decomposes a trajectory into per-axis excursions to find every
//! start cell that keeps the whole traversal inside the grid, samples one
//! uniformly, and maintains a per-time-slot occupancy registry so that no
//! two beads ever share a cell at the same slot. The registry is scoped to
//! one round's setup and discarded afterwards.

use std::collections::HashSet;

use bead_hunt_core::{GridPoint, GridSize, Trajectory};
use rand::Rng;
use thiserror::Error;

/// Reasons a start allocation or occupancy registration may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Error)]
pub enum PlacementError {
    /// The trajectory's excursion exceeds the grid on some axis; no start
    /// cell can keep it in bounds. The caller must regenerate the
    /// trajectory, not the start.
    #[error("no start cell keeps the trajectory inside the grid")]
    Unroutable,
    /// A replayed cell left the grid, which a correctly allocated start
    /// rules out. Fatal input error, never retried.
    #[error("trajectory leaves the grid when replayed from the start cell")]
    OutOfBounds,
    /// Some time slot's cell is already taken by another bead. Recoverable:
    /// the caller discards the start and retries.
    #[error("another bead already occupies a cell at the same time slot")]
    Occupied,
}

/// Inclusive span of legal start coordinates along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxisSpan {
    min: u32,
    max: u32,
}

impl AxisSpan {
    /// Creates a span from inclusive bounds.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Smallest legal coordinate.
    #[must_use]
    pub const fn min(&self) -> u32 {
        self.min
    }

    /// Largest legal coordinate.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }
}

/// Legal start cells of a trajectory, one span per axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartRange {
    x: AxisSpan,
    y: AxisSpan,
}

impl StartRange {
    /// Span of legal column offsets.
    #[must_use]
    pub const fn x(&self) -> AxisSpan {
        self.x
    }

    /// Span of legal row offsets.
    #[must_use]
    pub const fn y(&self) -> AxisSpan {
        self.y
    }
}

/// Computes the inclusive range of start cells from which the whole
/// trajectory stays inside the grid.
///
/// Each axis is analysed independently: the cumulative excursion of the
/// trajectory's per-axis deltas yields the most negative and most positive
/// offsets ever reached, and the start coordinate must absorb both. Double
/// moves advance two cells; diagonal moves contribute to both axes.
pub fn start_range(grid: GridSize, trajectory: &Trajectory) -> Result<StartRange, PlacementError> {
    let x = axis_span(
        grid.width(),
        trajectory.moves().iter().map(|step| step.dx()),
    )?;
    let y = axis_span(
        grid.height(),
        trajectory.moves().iter().map(|step| step.dy()),
    )?;
    Ok(StartRange { x, y })
}

/// Samples a start cell uniformly from the trajectory's legal range.
pub fn allocate_start<R: Rng + ?Sized>(
    rng: &mut R,
    grid: GridSize,
    trajectory: &Trajectory,
) -> Result<GridPoint, PlacementError> {
    let range = start_range(grid, trajectory)?;
    let x = rng.gen_range(range.x().min()..=range.x().max());
    let y = rng.gen_range(range.y().min()..=range.y().max());
    Ok(GridPoint::new(x, y))
}

fn axis_span(axis_len: u32, deltas: impl Iterator<Item = i32>) -> Result<AxisSpan, PlacementError> {
    let mut position: i64 = 0;
    let mut lowest: i64 = 0;
    let mut highest: i64 = 0;
    for delta in deltas {
        position += i64::from(delta);
        lowest = lowest.min(position);
        highest = highest.max(position);
    }
    // The start must absorb the most negative excursion and still leave
    // room for the most positive one on the last cell of the axis.
    let min = -lowest;
    let max = i64::from(axis_len) - 1 - highest.max(0);
    if max < min {
        return Err(PlacementError::Unroutable);
    }
    Ok(AxisSpan::new(min as u32, max as u32))
}

/// Per-time-slot occupancy registry shared by all beads of one round.
#[derive(Clone, Debug, Default)]
pub struct Placement {
    // One cell set per time slot; slot 0 holds the start cells.
    slots: Vec<HashSet<GridPoint>>,
}

impl Placement {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replays the trajectory from `start` and claims the visited cell of
    /// every time slot.
    ///
    /// Registration is two-phase: every slot is checked before any cell is
    /// claimed, so a rejected attempt leaves the registry exactly as it was
    /// and the caller can retry with a fresh start or trajectory.
    pub fn register(
        &mut self,
        start: GridPoint,
        trajectory: &Trajectory,
        grid: GridSize,
    ) -> Result<(), PlacementError> {
        let cells = trajectory
            .cells_from(start)
            .ok_or(PlacementError::OutOfBounds)?;
        if cells.iter().any(|cell| !grid.contains(*cell)) {
            return Err(PlacementError::OutOfBounds);
        }
        if self.slots.len() < cells.len() {
            self.slots.resize_with(cells.len(), HashSet::new);
        }
        for (slot, cell) in cells.iter().enumerate() {
            if self.slots[slot].contains(cell) {
                return Err(PlacementError::Occupied);
            }
        }
        for (slot, cell) in cells.iter().enumerate() {
            let _ = self.slots[slot].insert(*cell);
        }
        Ok(())
    }

    /// Reports whether a cell is already claimed at the given time slot.
    #[must_use]
    pub fn is_registered(&self, slot: usize, cell: GridPoint) -> bool {
        self.slots
            .get(slot)
            .map_or(false, |cells| cells.contains(&cell))
    }

    /// Number of cells claimed at the given time slot.
    #[must_use]
    pub fn claimed_at(&self, slot: usize) -> usize {
        self.slots.get(slot).map_or(0, HashSet::len)
    }
}
