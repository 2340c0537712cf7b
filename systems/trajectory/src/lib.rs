#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round-unique trajectory generation for decoy beads.
//!
//! The target's trajectory is chosen by the caller before any decoy exists;
//! this system only guarantees that every decoy draws a move sequence no
//! other bead of the round already uses. Uniqueness is structural equality
//! over the full ordered move list, so trajectories differing only in spin
//! or grow still count as distinct.

use bead_hunt_core::{Move, Trajectory};
use rand::Rng;
use thiserror::Error;

/// Whole-sequence redraws attempted before generation gives up.
///
/// A pathological configuration (tiny allowed-move set, many decoys) runs
/// out of unique sequences; the cap turns that into a typed error instead
/// of a hang.
pub const MAX_DRAW_ATTEMPTS: usize = 64;

/// Errors raised while generating decoy trajectories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// A decoy draw was requested before the target trajectory existed.
    /// Programming error in the caller's sequencing; never retried.
    #[error("decoy trajectories require the target trajectory to be registered first")]
    TargetNotRegistered,
    /// The target trajectory was registered twice.
    #[error("the round already has a target trajectory")]
    TargetAlreadyRegistered,
    /// The allowed-move set is empty; nothing can be drawn from it.
    #[error("the allowed-move set is empty")]
    NoAllowedMoves,
    /// A trajectory with zero moves was requested.
    #[error("trajectories must contain at least one move")]
    ZeroMoves,
    /// A duplicate of an already registered trajectory was committed.
    #[error("trajectory duplicates an already registered one")]
    Duplicate,
    /// Every redraw produced an already registered sequence.
    #[error("no unique trajectory found within {attempts} redraws")]
    Exhausted {
        /// Redraws performed before giving up.
        attempts: usize,
    },
}

/// Per-round registry of accepted trajectories, target first.
#[derive(Clone, Debug, Default)]
pub struct TrajectoryGeneration {
    registered: Vec<Trajectory>,
}

impl TrajectoryGeneration {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the caller-supplied target trajectory.
    ///
    /// Must happen exactly once, before any decoy is drawn.
    pub fn register_target(&mut self, trajectory: Trajectory) -> Result<(), GenerationError> {
        if !self.registered.is_empty() {
            return Err(GenerationError::TargetAlreadyRegistered);
        }
        self.registered.push(trajectory);
        Ok(())
    }

    /// Draws a decoy trajectory of `num_moves` uniform picks (with
    /// replacement) from `allowed_moves`, redrawing the entire sequence on
    /// any structural match with a registered trajectory.
    ///
    /// The draw does not register the result; callers validate placement
    /// first and [`commit`](Self::commit) on success, so a trajectory that
    /// turns out to be unroutable never pollutes the registry.
    pub fn draw_unique<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        allowed_moves: &[Move],
        num_moves: u32,
    ) -> Result<Trajectory, GenerationError> {
        if self.registered.is_empty() {
            return Err(GenerationError::TargetNotRegistered);
        }
        if allowed_moves.is_empty() {
            return Err(GenerationError::NoAllowedMoves);
        }
        if num_moves == 0 {
            return Err(GenerationError::ZeroMoves);
        }
        for _ in 0..MAX_DRAW_ATTEMPTS {
            let moves = (0..num_moves)
                .map(|_| allowed_moves[rng.gen_range(0..allowed_moves.len())])
                .collect();
            let candidate = Trajectory::from_moves(moves);
            if !self.registered.contains(&candidate) {
                return Ok(candidate);
            }
        }
        Err(GenerationError::Exhausted {
            attempts: MAX_DRAW_ATTEMPTS,
        })
    }

    /// Registers an accepted decoy trajectory before the next bead is
    /// generated.
    pub fn commit(&mut self, trajectory: Trajectory) -> Result<(), GenerationError> {
        if self.registered.is_empty() {
            return Err(GenerationError::TargetNotRegistered);
        }
        if self.registered.contains(&trajectory) {
            return Err(GenerationError::Duplicate);
        }
        self.registered.push(trajectory);
        Ok(())
    }

    /// Trajectories accepted so far, target first.
    #[must_use]
    pub fn registered(&self) -> &[Trajectory] {
        &self.registered
    }
}
