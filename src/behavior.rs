//! Per-kind movement policies, dispatched on [`ElementKind`].

use crate::element::ElementKind;
use crate::movement::{
    try_lateral_wiggle, try_move, try_slide_movement, try_solid_diagonal_movement, MoveContext,
};
use crate::random;

const UP: isize = -1;
const DOWN: isize = 1;

/// Resolve the cell at `(x, y)` for this tick. Returns whether it moved.
///
/// A cell that was already claimed this tick (something swapped into its
/// place) has moved once and is left alone. Cells that do not move stay as
/// the scheduler's baseline copy.
pub fn step_cell(ctx: &mut MoveContext<'_>, x: isize, y: isize) -> bool {
    if ctx.next.is_written(x, y) {
        return false;
    }
    match ctx.source(x, y).kind {
        ElementKind::Empty | ElementKind::ImmovableSolid => false,
        ElementKind::MovableSolid => step_movable_solid(ctx, x, y),
        ElementKind::Liquid => step_liquid(ctx, x, y),
        ElementKind::Gas => step_gas(ctx, x, y),
    }
}

fn step_movable_solid(ctx: &mut MoveContext<'_>, x: isize, y: isize) -> bool {
    if try_move(ctx, x, y, 0, DOWN) {
        return true;
    }
    try_solid_diagonal_movement(ctx, x, y, random::lateral_dirs())
}

fn step_liquid(ctx: &mut MoveContext<'_>, x: isize, y: isize) -> bool {
    if try_move(ctx, x, y, 0, DOWN) {
        return true;
    }
    let reach = ctx.config.liquid_dispersion;
    let dirs = random::lateral_dirs();
    try_slide_movement(ctx, x, y, DOWN, reach, dirs)
        || try_slide_movement(ctx, x, y, 0, reach, dirs)
}

fn step_gas(ctx: &mut MoveContext<'_>, x: isize, y: isize) -> bool {
    let roll = random::percent_roll();
    let reach = ctx.config.gas_dispersion;
    let dirs = random::lateral_dirs();

    if roll < ctx.config.gas_rise_chance && try_move(ctx, x, y, 0, UP) {
        return true;
    }
    if try_slide_movement(ctx, x, y, UP, reach, dirs) {
        return true;
    }
    // Coin-gated so blocked gas does not flicker back and forth every tick.
    if random::coin_flip() && try_lateral_wiggle(ctx, x, y, dirs) {
        return true;
    }
    if try_slide_movement(ctx, x, y, 0, reach, dirs) {
        return true;
    }
    roll >= ctx.config.gas_settle_threshold() && try_move(ctx, x, y, 0, DOWN)
}
