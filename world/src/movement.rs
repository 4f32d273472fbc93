//! Per-tick character kinematics: move first, then correct.
//!
//! Characters translate along their committed direction, get clamped back
//! to the cell center when a wall blocks the edge ahead, and commit their
//! pending direction at the moment they cross a cell center. Running the
//! correction after the translation keeps the step independent of how far
//! a character moves in one tick.

use glam::Vec2;
use maze_chase_core::{Direction, EdgeType};

use crate::characters::Body;
use crate::grid::Grid;

/// Advances `body` by `speed` pixels along its committed direction.
///
/// Returns whether the character entered a different cell this tick.
pub(crate) fn step(grid: &Grid, body: &mut Body, speed: f32) -> bool {
    let previous = body.position;
    body.position += body.direction.unit() * speed;

    let center = grid.cell_center(body.cell);
    if grid.edge(body.cell, body.direction) != Some(EdgeType::Passage) {
        body.position = clamp_past_center(body.position, center, body.direction);
    }

    let wants_turn =
        body.pending != body.direction && grid.edge(body.cell, body.pending) == Some(EdgeType::Passage);
    if wants_turn && crossed_center(previous, body.position, center, body.direction) {
        // Snap the travel axis so the turn starts from the center; a
        // straight-running character keeps its past-center overshoot.
        match body.direction {
            Direction::Left | Direction::Right => body.position.x = center.x,
            Direction::Up | Direction::Down => body.position.y = center.y,
        }
        body.direction = body.pending;
    }

    let cell = grid.cell_at(body.position);
    let cell_changed = cell != body.cell;
    body.cell = cell;
    cell_changed
}

/// Steers `body` directly toward a pixel target, ignoring walls.
///
/// Used for dead enemies returning to the den. Returns `true` once the
/// target is reached; the position is snapped exactly onto it so callers
/// can compare with equality.
pub(crate) fn steer_toward(grid: &Grid, body: &mut Body, target: Vec2, speed: f32) -> bool {
    let offset = target - body.position;
    if offset.length() <= speed {
        body.position = target;
        body.cell = grid.cell_at(body.position);
        return true;
    }
    body.position += offset.normalize() * speed;
    body.cell = grid.cell_at(body.position);
    false
}

/// Pulls a position back to the cell center if it overshot it along
/// `direction`. Positions short of the center are untouched, which lets a
/// character finish approaching a wall before stopping flush against it.
fn clamp_past_center(position: Vec2, center: Vec2, direction: Direction) -> Vec2 {
    let mut clamped = position;
    match direction {
        Direction::Right => clamped.x = clamped.x.min(center.x),
        Direction::Left => clamped.x = clamped.x.max(center.x),
        Direction::Up => clamped.y = clamped.y.min(center.y),
        Direction::Down => clamped.y = clamped.y.max(center.y),
    }
    clamped
}

/// Whether the move from `previous` to `current` passed the cell center
/// along `direction`, including the stationary case of sitting exactly on
/// it (a wall-clamped character must still be allowed to turn).
fn crossed_center(previous: Vec2, current: Vec2, center: Vec2, direction: Direction) -> bool {
    let (prev, curr, mark) = match direction {
        Direction::Right => (previous.x, current.x, center.x),
        Direction::Up => (previous.y, current.y, center.y),
        Direction::Left => (-previous.x, -current.x, -center.x),
        Direction::Down => (-previous.y, -current.y, -center.y),
    };
    (curr >= mark && mark > prev) || (curr == mark && prev == mark)
}
