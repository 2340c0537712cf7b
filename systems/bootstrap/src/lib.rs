#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic round construction for Bead Hunt.
//!
//! The bootstrap system turns a validated level, the journey's allowed-move
//! set, the caller-supplied target trajectory and a symbol pool into a
//! complete [`RoundSetup`]: unique trajectories and collision-free starts
//! for every bead, derived from one global seed. All randomness flows
//! through independent ChaCha streams labeled per concern, so identical
//! inputs always produce identical rounds.

use bead_hunt_core::{
    BeadId, BeadKind, BeadSeed, BeadSymbol, GridPoint, GridSize, Level, Move, RoundSetup,
    Trajectory,
};
use bead_hunt_system_placement::{self as placement, Placement, PlacementError};
use bead_hunt_system_trajectory::{GenerationError, TrajectoryGeneration};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};
use thiserror::Error;

const RNG_STREAM_TRAJECTORIES: &str = "trajectories";
const RNG_STREAM_PLACEMENT: &str = "placement";
const RNG_STREAM_TRAY: &str = "tray";

/// Errors raised while building a round.
///
/// Any variant aborts the level attempt before a round exists; callers must
/// surface a "level could not be built" condition and persist nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The target trajectory's length differs from the level's move count.
    #[error("target trajectory has {actual} moves, the level expects {expected}")]
    TargetLengthMismatch {
        /// Move count demanded by the level.
        expected: u32,
        /// Move count of the supplied target trajectory.
        actual: usize,
    },
    /// The symbol pool cannot cover the target plus every decoy.
    #[error("round needs {required} symbols, only {available} available")]
    NotEnoughSymbols {
        /// Symbols the round requires.
        required: usize,
        /// Symbols the caller supplied.
        available: usize,
    },
    /// Trajectory generation failed or ran out of unique sequences.
    #[error(transparent)]
    Generation(#[from] GenerationError),
    /// A fatal placement failure, such as a target trajectory whose
    /// excursion no start cell of the grid can absorb.
    #[error(transparent)]
    Placement(#[from] PlacementError),
    /// No collision-free start was found for the target.
    #[error("no collision-free start for the target within {attempts} attempts")]
    TargetPlacementExhausted {
        /// Start samples tried before giving up.
        attempts: usize,
    },
    /// A decoy could not be placed even after discarding and redrawing its
    /// trajectory. A grid too small for the requested bead count is the
    /// realistic cause.
    #[error("no placeable decoy trajectory within {attempts} trajectory attempts")]
    DecoysExhausted {
        /// Trajectories tried for the failing decoy before giving up.
        attempts: usize,
    },
}

/// Retry budgets for round construction.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    /// Trajectories drawn for one decoy before setup fails.
    pub max_trajectory_attempts: usize,
    /// Start cells sampled for one trajectory before it is discarded.
    pub max_start_attempts: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_trajectory_attempts: 16,
            max_start_attempts: 64,
        }
    }
}

/// Deterministic system that assembles complete round setups.
#[derive(Clone, Copy, Debug, Default)]
pub struct Bootstrap {
    config: Config,
}

impl Bootstrap {
    /// Creates a bootstrap system using the supplied retry budgets.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    /// Builds a complete round from the level parameters and one global
    /// seed.
    ///
    /// The target trajectory is registered before any decoy is drawn; each
    /// decoy then draws a round-unique trajectory and samples starts until
    /// its whole traversal is collision free, discarding the trajectory and
    /// redrawing when the grid cannot host it. Both loops are bounded by
    /// the configured budgets.
    pub fn build_round(
        &self,
        level: &Level,
        allowed_moves: &[Move],
        target_trajectory: Trajectory,
        symbols: &[BeadSymbol],
        seed: u64,
    ) -> Result<RoundSetup, SetupError> {
        let grid = level.grid();
        let required = level.num_decoys() as usize + 1;
        if symbols.len() < required {
            return Err(SetupError::NotEnoughSymbols {
                required,
                available: symbols.len(),
            });
        }
        if target_trajectory.len() != level.num_moves() as usize {
            return Err(SetupError::TargetLengthMismatch {
                expected: level.num_moves(),
                actual: target_trajectory.len(),
            });
        }

        let mut trajectory_rng = stream_rng(seed, RNG_STREAM_TRAJECTORIES);
        let mut placement_rng = stream_rng(seed, RNG_STREAM_PLACEMENT);
        let mut tray_rng = stream_rng(seed, RNG_STREAM_TRAY);

        let mut generation = TrajectoryGeneration::new();
        let mut occupancy = Placement::new();

        generation.register_target(target_trajectory.clone())?;
        let target_start = self
            .place_with_retries(&mut placement_rng, &mut occupancy, grid, &target_trajectory)
            .map_err(|failure| match failure {
                PlaceFailure::Fatal(error) => SetupError::Placement(error),
                PlaceFailure::Exhausted => SetupError::TargetPlacementExhausted {
                    attempts: self.config.max_start_attempts,
                },
            })?;

        let mut pending: Vec<(BeadKind, Trajectory, GridPoint)> =
            vec![(BeadKind::Target, target_trajectory, target_start)];

        for _ in 0..level.num_decoys() {
            let mut placed = None;
            for _ in 0..self.config.max_trajectory_attempts {
                let candidate =
                    generation.draw_unique(&mut trajectory_rng, allowed_moves, level.num_moves())?;
                match self.place_with_retries(&mut placement_rng, &mut occupancy, grid, &candidate)
                {
                    Ok(start) => {
                        generation.commit(candidate.clone())?;
                        placed = Some((candidate, start));
                        break;
                    }
                    Err(PlaceFailure::Fatal(PlacementError::Unroutable))
                    | Err(PlaceFailure::Exhausted) => {
                        // Discard the trajectory; the registries are intact.
                        continue;
                    }
                    Err(PlaceFailure::Fatal(error)) => return Err(SetupError::Placement(error)),
                }
            }
            let (trajectory, start) = placed.ok_or(SetupError::DecoysExhausted {
                attempts: self.config.max_trajectory_attempts,
            })?;
            pending.push((BeadKind::Decoy, trajectory, start));
        }

        // Shuffle creation order so identifiers do not encode roles, then
        // hand out ids and shuffled symbols.
        pending.shuffle(&mut tray_rng);
        let mut pool: Vec<BeadSymbol> = symbols.to_vec();
        pool.shuffle(&mut tray_rng);

        let beads: Vec<BeadSeed> = pending
            .into_iter()
            .zip(pool)
            .enumerate()
            .map(|(index, ((kind, trajectory, start), symbol))| BeadSeed {
                id: BeadId::new(index as u32),
                kind,
                symbol,
                trajectory,
                start,
            })
            .collect();

        let mut tray_order: Vec<BeadId> = beads.iter().map(|seed| seed.id).collect();
        tray_order.shuffle(&mut tray_rng);

        Ok(RoundSetup {
            level: *level,
            grid,
            beads,
            tray_order,
        })
    }

    fn place_with_retries(
        &self,
        rng: &mut ChaCha8Rng,
        occupancy: &mut Placement,
        grid: GridSize,
        trajectory: &Trajectory,
    ) -> Result<GridPoint, PlaceFailure> {
        for _ in 0..self.config.max_start_attempts {
            let start = placement::allocate_start(rng, grid, trajectory)
                .map_err(PlaceFailure::Fatal)?;
            match occupancy.register(start, trajectory, grid) {
                Ok(()) => return Ok(start),
                Err(PlacementError::Occupied) => continue,
                Err(error) => return Err(PlaceFailure::Fatal(error)),
            }
        }
        Err(PlaceFailure::Exhausted)
    }
}

#[derive(Clone, Copy, Debug)]
enum PlaceFailure {
    Fatal(PlacementError),
    Exhausted,
}

/// Derives the seed of one labeled random stream from the global seed.
fn stream_rng(global_seed: u64, label: &str) -> ChaCha8Rng {
    let mut hasher = Sha256::new();
    hasher.update(global_seed.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    ChaCha8Rng::seed_from_u64(u64::from_le_bytes(bytes))
}
