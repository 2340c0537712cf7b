//! Caller-side chooser for the target trajectory.
//!
//! The shipped game presents a roulette that cycles through the journey's
//! allowed moves and locks in whichever move is showing when the player
//! clicks, once per trajectory slot. Headless, that timing amounts to a
//! uniform pick per slot, which is exactly what this module draws.

use bead_hunt_core::{Move, Trajectory};
use rand::Rng;

/// Rolls the target trajectory: `num_moves` uniform picks from the
/// journey's allowed moves.
pub(crate) fn roll_target<R: Rng + ?Sized>(
    rng: &mut R,
    allowed_moves: &[Move],
    num_moves: u32,
) -> Trajectory {
    debug_assert!(!allowed_moves.is_empty(), "roulette needs options to spin");
    let moves = (0..num_moves)
        .map(|_| allowed_moves[rng.gen_range(0..allowed_moves.len())])
        .collect();
    Trajectory::from_moves(moves)
}
