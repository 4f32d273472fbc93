//! Character state and spawn layout.

use std::time::Duration;

use glam::Vec2;
use maze_chase_core::{CellCoord, Direction, EnemyKind, EnemyMode, PursuitMode};

use crate::grid::Grid;

/// Base player speed in pixels per tick at the reference 60 Hz rate.
pub(crate) const PLAYER_BASE_SPEED: f32 = 2.0;
/// Base enemy speed; slightly below the player so escapes stay possible.
pub(crate) const ENEMY_BASE_SPEED: f32 = 1.8;
/// Warning lead time before the powerup wears off.
pub(crate) const POWERUP_END_WARNING: Duration = Duration::from_millis(500);

/// Shared kinematic state of a character on the grid.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Body {
    /// Continuous pixel position.
    pub(crate) position: Vec2,
    /// Cell currently containing `position`.
    pub(crate) cell: CellCoord,
    /// Committed direction of travel.
    pub(crate) direction: Direction,
    /// Requested direction, committed the next time a cell center is crossed.
    pub(crate) pending: Direction,
}

impl Body {
    fn spawned_at(grid: &Grid, cell: CellCoord) -> Self {
        Self {
            position: grid.cell_center(cell),
            cell,
            direction: Direction::Right,
            pending: Direction::Right,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Player {
    pub(crate) body: Body,
    pub(crate) powered_up: bool,
    pub(crate) alive: bool,
}

impl Player {
    pub(crate) fn spawn(grid: &Grid) -> Self {
        Self {
            body: Body::spawned_at(grid, grid.player_start),
            powered_up: false,
            alive: true,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Enemy {
    pub(crate) kind: EnemyKind,
    pub(crate) body: Body,
    pub(crate) mode: EnemyMode,
    /// The alternation leg this enemy rejoins when frightened/dead clears.
    pub(crate) pursuit: PursuitMode,
}

impl Enemy {
    pub(crate) fn spawn(grid: &Grid, kind: EnemyKind) -> Self {
        let cell = match kind {
            EnemyKind::Chaser | EnemyKind::Ambusher => grid.den.center,
            EnemyKind::Flanker => grid.den.right,
            EnemyKind::Lurker => grid.den.left,
        };
        Self {
            kind,
            body: Body::spawned_at(grid, cell),
            mode: EnemyMode::Dormant,
            pursuit: PursuitMode::Scatter,
        }
    }

    /// Seconds after a spawn before this enemy is released from the den.
    pub(crate) fn release_delay(kind: EnemyKind) -> Duration {
        match kind {
            EnemyKind::Chaser => Duration::from_secs(2),
            EnemyKind::Ambusher => Duration::from_secs(5),
            EnemyKind::Flanker => Duration::from_secs(8),
            EnemyKind::Lurker => Duration::from_secs(11),
        }
    }
}
