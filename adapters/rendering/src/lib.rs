#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Bead Hunt adapters.
//!
//! The round exposes discrete state: per-bead phases, the current move
//! segment and a progress fraction. This crate turns that into a continuous
//! [`Scene`] — interpolated positions, fade scales, the star bar and the
//! selection tray — that concrete presentation backends can draw however
//! they like. A plain-text renderer is provided for terminal adapters.

use anyhow::Result as AnyResult;
use bead_hunt_core::{BeadId, BeadKind, BeadSnapshot, BeadSymbol, BeadView, CyclePhase, GridSize};
use glam::Vec2;

/// One bead prepared for drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BeadSprite {
    /// Identifier of the bead within the round.
    pub id: BeadId,
    /// Glyph drawn for the bead.
    pub symbol: BeadSymbol,
    /// Continuous position in cell coordinates; the origin is the grid's
    /// south-west corner and whole numbers lie on cell centres.
    pub position: Vec2,
    /// Draw scale in `0.0..=1.0`, animating the fades.
    pub scale: f32,
    /// Whether the bead should be drawn at all this frame.
    pub visible: bool,
}

/// One slot of the selection tray, the bead's secondary representation.
///
/// The tray fires the same selection signal as the grid sprite and hides in
/// lockstep with it after a wrong guess.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TraySlot {
    /// Bead the slot selects.
    pub id: BeadId,
    /// Glyph shown in the slot.
    pub symbol: BeadSymbol,
    /// Whether the slot was hidden by a wrong guess.
    pub hidden: bool,
    /// Role of the bead, disclosed only once the round revealed it.
    pub revealed_kind: Option<BeadKind>,
}

/// Scene description combining the grid, the beads, the tray and the stars.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Grid the beads move on.
    pub grid: GridSize,
    /// Beads prepared for drawing, in deterministic id order.
    pub beads: Vec<BeadSprite>,
    /// Tray slots in their shuffled presentation order.
    pub tray: Vec<TraySlot>,
    /// Stars still available.
    pub stars_remaining: u32,
    /// Stars the round started with.
    pub stars_total: u32,
}

/// Composes a drawable scene from round queries.
///
/// `revealed` discloses bead roles in the tray and keeps finalized beads on
/// screen; before the reveal, finalized and resting beads are faded out.
#[must_use]
pub fn compose_scene(
    grid: GridSize,
    view: &BeadView,
    tray_order: &[BeadId],
    stars_remaining: u32,
    stars_total: u32,
    revealed: bool,
) -> Scene {
    let beads: Vec<BeadSprite> = view
        .iter()
        .map(|snapshot| sprite_for(snapshot, revealed))
        .collect();
    let tray = tray_order
        .iter()
        .filter_map(|id| {
            view.iter()
                .find(|snapshot| snapshot.id == *id)
                .map(|snapshot| TraySlot {
                    id: snapshot.id,
                    symbol: snapshot.symbol,
                    hidden: snapshot.hidden,
                    revealed_kind: revealed.then_some(snapshot.kind),
                })
        })
        .collect();
    Scene {
        grid,
        beads,
        tray,
        stars_remaining,
        stars_total,
    }
}

fn sprite_for(snapshot: &BeadSnapshot, revealed: bool) -> BeadSprite {
    let from = Vec2::new(snapshot.cell_from.x() as f32, snapshot.cell_from.y() as f32);
    let to = Vec2::new(snapshot.cell_to.x() as f32, snapshot.cell_to.y() as f32);
    let position = from.lerp(to, snapshot.move_progress as f32);
    let scale = match snapshot.phase {
        CyclePhase::FadingIn => snapshot.phase_progress as f32,
        CyclePhase::Traversing => 1.0,
        CyclePhase::FadingOut => 1.0 - snapshot.phase_progress as f32,
        CyclePhase::Resting => 0.0,
        CyclePhase::Finalized => {
            if revealed {
                1.0
            } else {
                0.0
            }
        }
    };
    BeadSprite {
        id: snapshot.id,
        symbol: snapshot.symbol,
        position,
        scale,
        visible: !snapshot.hidden && scale > 0.0,
    }
}

/// Renders the scene as plain text for terminal presentation.
///
/// Rows print north to south so increasing row offsets point up, matching
/// the move directions. Each visible bead lands on its nearest cell.
#[must_use]
pub fn render_text(scene: &Scene) -> String {
    let width = scene.grid.width() as usize;
    let height = scene.grid.height() as usize;
    let mut cells = vec![vec!['.'; width]; height];

    for bead in &scene.beads {
        if !bead.visible {
            continue;
        }
        let x = bead.position.x.round() as usize;
        let y = bead.position.y.round() as usize;
        if x < width && y < height {
            cells[y][x] = bead.symbol.get();
        }
    }

    let mut out = String::new();
    for row in cells.iter().rev() {
        for cell in row {
            out.push(*cell);
            out.push(' ');
        }
        let _ = out.pop();
        out.push('\n');
    }

    out.push_str("stars: ");
    for index in 0..scene.stars_total {
        out.push(if index < scene.stars_remaining {
            '*'
        } else {
            '-'
        });
    }
    out.push('\n');

    out.push_str("tray:");
    for slot in &scene.tray {
        out.push(' ');
        if slot.hidden {
            out.push('.');
        } else {
            out.push(slot.symbol.get());
        }
        if slot.revealed_kind == Some(BeadKind::Target) {
            out.push('!');
        }
    }
    out.push('\n');
    out
}

/// Presentation backend capable of displaying Bead Hunt scenes.
pub trait PresentationBackend {
    /// Presents one composed scene to the player.
    fn present(&mut self, scene: &Scene) -> AnyResult<()>;
}
