#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze-chase simulation.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values. Systems consume
//! event streams and read-only views, and respond exclusively with new
//! command batches.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Cardinal movement directions available to all characters.
///
/// The grid is oriented with `y` growing upward, so [`Direction::Up`] steps
/// toward increasing row indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing row indices.
    Up,
    /// Movement toward decreasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// All directions in the fixed enemy-AI priority order.
    ///
    /// The chooser iterates this order and keeps the last candidate whose
    /// distance is less than *or equal to* the running best, which makes the
    /// effective tie-break priority up, left, down, right.
    pub const PRIORITY_ORDER: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Unit grid step for the direction.
    #[must_use]
    pub const fn vector(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Unit pixel-space step for the direction.
    #[must_use]
    pub fn unit(self) -> Vec2 {
        let (x, y) = self.vector();
        Vec2::new(x as f32, y as f32)
    }

    /// Rotation applied when presenting a character facing this direction.
    #[must_use]
    pub const fn angle_degrees(self) -> f32 {
        match self {
            Direction::Left => 0.0,
            Direction::Down => 90.0,
            Direction::Right => 180.0,
            Direction::Up => 270.0,
        }
    }

    /// Returns the opposing direction; a total involution.
    #[must_use]
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Index of the direction within a cell's edge slot array.
    #[must_use]
    pub const fn edge_slot(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }
}

/// Location of a grid cell expressed as signed column and row coordinates.
///
/// Coordinates are signed because AI target positions are deliberately
/// allowed to lie outside the grid; they act as a pull toward a corner.
/// Lookups against an actual grid bounds-check and treat off-grid cells as
/// absent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    x: i32,
    y: i32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Returns the neighboring coordinate one step in the given direction.
    #[must_use]
    pub const fn step(self, direction: Direction) -> CellCoord {
        let (dx, dy) = direction.vector();
        CellCoord::new(self.x + dx, self.y + dy)
    }

    /// Straight-line distance between two coordinates.
    ///
    /// The enemy chooser ranks candidate cells by this distance, matching the
    /// reference arcade rule (not a shortest-path search).
    #[must_use]
    pub fn distance(self, other: CellCoord) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Classification of one of a cell's four edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EdgeType {
    /// The edge has not been decided yet; only observable during carving.
    Unset,
    /// Characters may cross this edge.
    Passage,
    /// Characters are blocked by this edge.
    Wall,
}

/// Kind of pellet occupying a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PelletKind {
    /// Ordinary pellet worth the configured pellet score.
    Normal,
    /// Power pellet; consuming it frightens the enemies.
    Power,
}

/// The four enemy roles, in release order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Targets the player directly while chasing (red).
    Chaser,
    /// Targets two cells ahead of the player's facing (pink).
    Ambusher,
    /// Targets the ambush point reflected through the chaser (blue).
    Flanker,
    /// Targets the player only beyond a distance threshold (orange).
    Lurker,
}

impl EnemyKind {
    /// All enemy kinds in their fixed processing order.
    pub const ALL: [EnemyKind; 4] = [
        EnemyKind::Chaser,
        EnemyKind::Ambusher,
        EnemyKind::Flanker,
        EnemyKind::Lurker,
    ];
}

/// The scatter/chase leg an enemy's alternation timer belongs to.
///
/// Stored separately from [`EnemyMode`] so that a frightened or dead enemy
/// resumes the correct leg once its overlay state clears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PursuitMode {
    /// Pulled toward a fixed corner.
    Scatter,
    /// Pulled toward a target computed from the player.
    Chase,
}

impl PursuitMode {
    /// Returns the other leg of the alternation.
    #[must_use]
    pub const fn flipped(self) -> PursuitMode {
        match self {
            PursuitMode::Scatter => PursuitMode::Chase,
            PursuitMode::Chase => PursuitMode::Scatter,
        }
    }
}

/// Behavioral mode of a single enemy.
///
/// The mode is a single enum rather than independent flags so that illegal
/// combinations (dead and frightened at once) are unrepresentable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyMode {
    /// Waiting inside the den for the release timer.
    Dormant,
    /// Pulled toward the enemy's fixed corner.
    Scatter,
    /// Pulled toward the enemy's computed target.
    Chase,
    /// Fleeing randomly; vulnerable to the powered-up player.
    Frightened,
    /// Eaten; steering straight back to the den center.
    Dead,
}

impl EnemyMode {
    /// Whether the enemy is in one of the two target-seeking modes.
    #[must_use]
    pub const fn is_pursuing(self) -> bool {
        matches!(self, EnemyMode::Scatter | EnemyMode::Chase)
    }
}

impl From<PursuitMode> for EnemyMode {
    fn from(pursuit: PursuitMode) -> Self {
        match pursuit {
            PursuitMode::Scatter => EnemyMode::Scatter,
            PursuitMode::Chase => EnemyMode::Chase,
        }
    }
}

/// Per-level difficulty knobs supplied by the embedding game.
///
/// The core consumes these values; it does not decide their progression
/// curve across levels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DifficultyConfig {
    /// Multiplier applied to every character's base speed.
    pub speed_multiplier: f32,
    /// Length of each scatter leg.
    pub scatter_duration: Duration,
    /// Length of each chase leg.
    pub chase_duration: Duration,
    /// Length of the frightened period after a power pellet.
    pub powerup_duration: Duration,
    /// Number of power pellets spawned into the maze.
    pub powerup_limit: u32,
    /// Score value reported when a pellet is consumed.
    pub pellet_value: u32,
    /// Score value reported when a frightened enemy is eaten.
    pub kill_value: u32,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.0,
            scatter_duration: Duration::from_secs(7),
            chase_duration: Duration::from_secs(15),
            powerup_duration: Duration::from_secs(10),
            powerup_limit: 6,
            pellet_value: 10,
            kill_value: 100,
        }
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Writes the player's pending direction; input capture is external.
    SetPlayerDirection {
        /// Direction resolved from the external input gesture.
        direction: Direction,
    },
    /// Writes an enemy's pending direction; emitted by the AI system.
    SetEnemyDirection {
        /// Enemy whose intent is being set.
        enemy: EnemyKind,
        /// Direction the enemy should attempt next.
        direction: Direction,
    },
    /// Advances the simulation by exactly one tick.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Resets characters after a life is lost; pellet state persists.
    ResetCharacters,
    /// Rebuilds the maze and characters for the next level.
    AdvanceLevel {
        /// Seed for the regenerated maze.
        seed: u64,
        /// Difficulty knobs for the new level.
        difficulty: DifficultyConfig,
    },
}

/// Events broadcast by the world after processing commands.
///
/// These are the audio/scoring boundary: sound playback and the running
/// score/life totals live outside the core and subscribe to this stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Event {
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// The player consumed a pellet.
    PelletEaten {
        /// Cell the pellet occupied.
        cell: CellCoord,
        /// Kind of pellet consumed.
        kind: PelletKind,
        /// Score value to credit.
        value: u32,
    },
    /// A power pellet took effect; enemies outside the den are frightened.
    PowerupActivated,
    /// The powerup is about to end; presentation may start flashing.
    PowerupEnding,
    /// The powerup wore off; scatter/chase alternation resumed.
    PowerupEnded,
    /// An enemy left the den for the first time this life.
    EnemyReleased {
        /// Enemy that was released.
        enemy: EnemyKind,
    },
    /// An enemy's behavioral mode changed.
    ModeChanged {
        /// Enemy whose mode changed.
        enemy: EnemyKind,
        /// Mode that became active.
        mode: EnemyMode,
    },
    /// A frightened enemy was eaten by the powered-up player.
    EnemyKilled {
        /// Enemy that was eaten.
        enemy: EnemyKind,
        /// Score value to credit.
        value: u32,
    },
    /// The player collided with a live enemy; a life should be deducted.
    PlayerKilled,
    /// Every pellet has been consumed.
    LevelCleared,
}

/// The three cells composing the enemy den.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DenCells {
    /// Center cell; owns the one-way exit through its up edge.
    pub center: CellCoord,
    /// Cell immediately left of the center.
    pub left: CellCoord,
    /// Cell immediately right of the center.
    pub right: CellCoord,
}

impl DenCells {
    /// Whether the given coordinate is one of the three den cells.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        cell == self.center || cell == self.left || cell == self.right
    }
}

/// Read-only view of the maze structure exposed to systems and adapters.
#[derive(Clone, Copy, Debug)]
pub struct MazeView<'a> {
    columns: i32,
    rows: i32,
    cell_size: f32,
    origin: Vec2,
    edges: &'a [EdgeType],
    pellets: &'a [Option<PelletKind>],
    den: DenCells,
}

impl<'a> MazeView<'a> {
    /// Creates a view over borrowed maze storage.
    ///
    /// `edges` holds four entries per cell in [`Direction::edge_slot`] order;
    /// `pellets` holds one entry per cell. Both are indexed row-major.
    #[must_use]
    pub fn new(
        columns: i32,
        rows: i32,
        cell_size: f32,
        origin: Vec2,
        edges: &'a [EdgeType],
        pellets: &'a [Option<PelletKind>],
        den: DenCells,
    ) -> Self {
        Self {
            columns,
            rows,
            cell_size,
            origin,
            edges,
            pellets,
            den,
        }
    }

    /// Number of columns in the maze.
    #[must_use]
    pub const fn columns(&self) -> i32 {
        self.columns
    }

    /// Number of rows in the maze.
    #[must_use]
    pub const fn rows(&self) -> i32 {
        self.rows
    }

    /// Side length of a single square cell in pixel units.
    #[must_use]
    pub const fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Pixel-space offset of the grid's lower-left corner.
    #[must_use]
    pub const fn origin(&self) -> Vec2 {
        self.origin
    }

    /// The den region.
    #[must_use]
    pub const fn den(&self) -> DenCells {
        self.den
    }

    /// Whether the coordinate lies inside the grid bounds.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        0 <= cell.x() && cell.x() < self.columns && 0 <= cell.y() && cell.y() < self.rows
    }

    /// The edge type of `cell` in `direction`, or `None` off-grid.
    #[must_use]
    pub fn edge(&self, cell: CellCoord, direction: Direction) -> Option<EdgeType> {
        let index = self.cell_index(cell)? * 4 + direction.edge_slot();
        self.edges.get(index).copied()
    }

    /// The pellet occupying `cell`, if any.
    #[must_use]
    pub fn pellet(&self, cell: CellCoord) -> Option<PelletKind> {
        let index = self.cell_index(cell)?;
        self.pellets.get(index).copied().flatten()
    }

    /// Pixel coordinate of the center of `cell`.
    #[must_use]
    pub fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.origin
            + Vec2::new(
                (cell.x() as f32 + 0.5) * self.cell_size,
                (cell.y() as f32 + 0.5) * self.cell_size,
            )
    }

    fn cell_index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some((cell.y() * self.columns + cell.x()) as usize)
    }
}

/// Immutable representation of the player's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerSnapshot {
    /// Grid cell currently occupied by the player.
    pub cell: CellCoord,
    /// Continuous pixel position.
    pub position: Vec2,
    /// Committed direction of travel.
    pub direction: Direction,
    /// Pending direction awaiting a legal commit point.
    pub pending: Direction,
    /// Whether a power pellet is currently in effect.
    pub powered_up: bool,
    /// Whether the player is alive; false after a fatal collision until reset.
    pub alive: bool,
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Which enemy this snapshot describes.
    pub kind: EnemyKind,
    /// Grid cell currently occupied by the enemy.
    pub cell: CellCoord,
    /// Continuous pixel position.
    pub position: Vec2,
    /// Committed direction of travel.
    pub direction: Direction,
    /// Pending direction awaiting a legal commit point.
    pub pending: Direction,
    /// Current behavioral mode.
    pub mode: EnemyMode,
    /// The scatter/chase leg the paused alternation belongs to.
    pub pursuit: PursuitMode,
}

/// Errors raised while constructing a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The requested dimensions cannot accommodate the den with its padding.
    #[error("grid of {columns}x{rows} is too small for den placement (minimum 5x4)")]
    GridTooSmall {
        /// Requested number of columns.
        columns: i32,
        /// Requested number of rows.
        rows: i32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::DeserializeOwned;

    #[test]
    fn opposite_is_an_involution() {
        for direction in Direction::PRIORITY_ORDER {
            assert_eq!(direction.opposite().opposite(), direction);
        }
    }

    #[test]
    fn vectors_are_unit_grid_steps() {
        assert_eq!(Direction::Up.vector(), (0, 1));
        assert_eq!(Direction::Down.vector(), (0, -1));
        assert_eq!(Direction::Left.vector(), (-1, 0));
        assert_eq!(Direction::Right.vector(), (1, 0));
    }

    #[test]
    fn angles_match_presentation_table() {
        assert_eq!(Direction::Left.angle_degrees(), 0.0);
        assert_eq!(Direction::Down.angle_degrees(), 90.0);
        assert_eq!(Direction::Right.angle_degrees(), 180.0);
        assert_eq!(Direction::Up.angle_degrees(), 270.0);
    }

    #[test]
    fn step_moves_one_cell() {
        let origin = CellCoord::new(3, 3);
        assert_eq!(origin.step(Direction::Up), CellCoord::new(3, 4));
        assert_eq!(origin.step(Direction::Right), CellCoord::new(4, 3));
        assert_eq!(origin.step(Direction::Down), CellCoord::new(3, 2));
        assert_eq!(origin.step(Direction::Left), CellCoord::new(2, 3));
    }

    #[test]
    fn distance_is_euclidean() {
        let a = CellCoord::new(0, 0);
        let b = CellCoord::new(3, 4);
        assert!((a.distance(b) - 5.0).abs() < f32::EPSILON);
        assert!((b.distance(a) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn pursuit_flip_alternates() {
        assert_eq!(PursuitMode::Scatter.flipped(), PursuitMode::Chase);
        assert_eq!(PursuitMode::Chase.flipped(), PursuitMode::Scatter);
    }

    #[test]
    fn maze_view_rejects_off_grid_lookups() {
        let edges = vec![EdgeType::Wall; 4];
        let pellets = vec![None];
        let den = DenCells {
            center: CellCoord::new(0, 0),
            left: CellCoord::new(-1, 0),
            right: CellCoord::new(1, 0),
        };
        let view = MazeView::new(1, 1, 32.0, Vec2::ZERO, &edges, &pellets, den);
        assert_eq!(view.edge(CellCoord::new(1, 0), Direction::Up), None);
        assert_eq!(view.edge(CellCoord::new(0, -1), Direction::Up), None);
        assert_eq!(
            view.edge(CellCoord::new(0, 0), Direction::Up),
            Some(EdgeType::Wall)
        );
    }

    fn assert_round_trip<T>(value: &T)
    where
        T: serde::Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn cell_coord_round_trips_through_bincode() {
        assert_round_trip(&CellCoord::new(-1, 12));
    }

    #[test]
    fn difficulty_config_round_trips_through_bincode() {
        assert_round_trip(&DifficultyConfig::default());
    }

    #[test]
    fn enemy_mode_round_trips_through_bincode() {
        assert_round_trip(&EnemyMode::Frightened);
    }
}
