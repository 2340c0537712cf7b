//! The shipped journey catalog.
//!
//! Journeys group levels sharing an allowed-move set and a decoy/size/move
//! profile; within a journey only the per-move duration tightens from level
//! to level. The catalog is owned by the caller side of the engine — the
//! round consumes the resulting [`Level`] values read-only.

use std::time::Duration;

use bead_hunt_core::{
    BeadSymbol, Level, LevelError, Move, MoveDirection, MoveGrow, MoveSpin,
};

/// Levels per journey; per-move durations ramp down 20 ms per level.
pub(crate) const LEVELS_PER_JOURNEY: u32 = 9;

const RAMP_STEP_MS: u64 = 20;
const CYCLES_ALLOWED: u32 = 5;

/// One themed journey of the shipped game.
pub(crate) struct Journey {
    pub(crate) number: u32,
    pub(crate) allowed_moves: Vec<Move>,
    pub(crate) size: u32,
    pub(crate) num_moves: u32,
    pub(crate) num_decoys: u32,
    pub(crate) symbols: Vec<BeadSymbol>,
    first_level_time: Duration,
}

impl Journey {
    /// Builds the level value object for a one-based level number.
    pub(crate) fn level(&self, number: u32) -> Result<Level, LevelError> {
        let step = u64::from(number.clamp(1, LEVELS_PER_JOURNEY) - 1) * RAMP_STEP_MS;
        let time_per_move = self.first_level_time - Duration::from_millis(step);
        Level::new(
            self.size,
            self.num_moves,
            self.num_decoys,
            time_per_move,
            CYCLES_ALLOWED,
        )
    }
}

fn directions(values: &[MoveDirection]) -> Vec<Move> {
    values.iter().copied().map(Move::with_direction).collect()
}

fn symbols(glyphs: &[char]) -> Vec<BeadSymbol> {
    glyphs.iter().copied().map(BeadSymbol::new).collect()
}

/// All journeys of the shipped game, in play order.
pub(crate) fn journeys() -> Vec<Journey> {
    use MoveDirection::{
        DoubleEast, DoubleNorth, DoubleSouth, DoubleWest, East, North, NorthEast, NorthWest,
        South, SouthEast, SouthWest, West,
    };
    let spin = |direction, spin| Move::new(direction, spin, MoveGrow::None);
    let pirouette = |spin, grow| Move::new(MoveDirection::Stay, spin, grow);
    vec![
        Journey {
            number: 1,
            allowed_moves: directions(&[North, South, West, East]),
            size: 5,
            num_moves: 3,
            num_decoys: 3,
            symbols: symbols(&['🩳', '🏖', '👙', '🌞', '🍦', '🩴', '🏝', '🪸', '🐚']),
            first_level_time: Duration::from_millis(460),
        },
        Journey {
            number: 2,
            allowed_moves: directions(&[NorthEast, NorthWest, SouthEast, SouthWest]),
            size: 5,
            num_moves: 3,
            num_decoys: 4,
            symbols: symbols(&['🌨', '❄', '⛄', '⛸', '🛷']),
            first_level_time: Duration::from_millis(440),
        },
        Journey {
            number: 3,
            allowed_moves: directions(&[
                North,
                South,
                West,
                East,
                DoubleNorth,
                DoubleSouth,
                DoubleWest,
                DoubleEast,
            ]),
            size: 6,
            num_moves: 3,
            num_decoys: 5,
            symbols: symbols(&['🛰', '🌒', '🚀', '🛸', '👽', '🪐']),
            first_level_time: Duration::from_millis(420),
        },
        Journey {
            number: 4,
            allowed_moves: vec![
                spin(North, MoveSpin::HalfClockwise),
                spin(South, MoveSpin::HalfCounterClockwise),
                spin(East, MoveSpin::HalfClockwise),
                spin(West, MoveSpin::HalfCounterClockwise),
                spin(South, MoveSpin::HalfClockwise),
                spin(East, MoveSpin::HalfCounterClockwise),
                spin(West, MoveSpin::HalfClockwise),
                spin(North, MoveSpin::HalfCounterClockwise),
            ],
            size: 5,
            num_moves: 3,
            num_decoys: 6,
            symbols: symbols(&['🍒', '🍓', '🍋', '🍍', '🍉', '🥝', '🍌', '🫐', '🍈']),
            first_level_time: Duration::from_millis(420),
        },
        Journey {
            number: 5,
            allowed_moves: vec![
                spin(North, MoveSpin::HalfClockwise),
                spin(South, MoveSpin::HalfCounterClockwise),
                spin(East, MoveSpin::HalfClockwise),
                spin(West, MoveSpin::HalfCounterClockwise),
                spin(South, MoveSpin::HalfClockwise),
                spin(East, MoveSpin::HalfCounterClockwise),
                spin(West, MoveSpin::HalfClockwise),
                spin(North, MoveSpin::HalfCounterClockwise),
                spin(DoubleNorth, MoveSpin::HalfClockwise),
                spin(DoubleSouth, MoveSpin::HalfCounterClockwise),
                spin(DoubleEast, MoveSpin::HalfClockwise),
                spin(DoubleWest, MoveSpin::HalfCounterClockwise),
                spin(DoubleSouth, MoveSpin::HalfClockwise),
                spin(DoubleEast, MoveSpin::HalfCounterClockwise),
                spin(DoubleWest, MoveSpin::HalfClockwise),
                spin(DoubleNorth, MoveSpin::HalfCounterClockwise),
            ],
            size: 6,
            num_moves: 3,
            num_decoys: 6,
            // Six decoys plus the target need seven glyphs.
            symbols: symbols(&['🍭', '🥮', '🍩', '🎂', '🍪', '🍫', '🍬']),
            first_level_time: Duration::from_millis(420),
        },
        Journey {
            number: 6,
            allowed_moves: vec![
                pirouette(MoveSpin::HalfClockwise, MoveGrow::None),
                pirouette(MoveSpin::HalfClockwise, MoveGrow::Shrink),
                pirouette(MoveSpin::HalfClockwise, MoveGrow::Enlarge),
                pirouette(MoveSpin::HalfCounterClockwise, MoveGrow::None),
                pirouette(MoveSpin::HalfCounterClockwise, MoveGrow::Shrink),
                pirouette(MoveSpin::HalfCounterClockwise, MoveGrow::Enlarge),
            ],
            size: 5,
            num_moves: 3,
            num_decoys: 6,
            symbols: symbols(&['🌶', '🌽', '🥔', '🥑', '🥕', '🫘', '🥦']),
            first_level_time: Duration::from_millis(400),
        },
        Journey {
            number: 7,
            allowed_moves: directions(&[North, South, West, East]),
            size: 10,
            num_moves: 4,
            num_decoys: 8,
            symbols: symbols(&['🪸', '🩳', '🏖', '👙', '🌞', '🍦', '🩴', '🏝', '🐚']),
            first_level_time: Duration::from_millis(400),
        },
    ]
}
