#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for maze-chase adapters.
//!
//! The simulation is presented declaratively: adapters compose a [`Scene`]
//! from world queries each frame; drawing it is the adapter's business.

use glam::Vec2;
use maze_chase_core::{
    CellCoord, Direction, EdgeType, EnemyKind, EnemyMode, EnemySnapshot, MazeView, PelletKind,
    PlayerSnapshot,
};

/// RGBA color used when presenting frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    /// Red channel intensity in the range 0.0..=1.0.
    pub red: f32,
    /// Green channel intensity in the range 0.0..=1.0.
    pub green: f32,
    /// Blue channel intensity in the range 0.0..=1.0.
    pub blue: f32,
    /// Alpha channel intensity in the range 0.0..=1.0.
    pub alpha: f32,
}

impl Color {
    /// Creates a new color from floating point channels.
    #[must_use]
    pub const fn new(red: f32, green: f32, blue: f32, alpha: f32) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    /// Creates an opaque color from byte RGB values.
    #[must_use]
    pub const fn from_rgb_u8(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: red as f32 / 255.0,
            green: green as f32 / 255.0,
            blue: blue as f32 / 255.0,
            alpha: 1.0,
        }
    }

}

/// Pixel-space line segment tracing one wall edge of a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSegment {
    /// Start corner of the segment.
    pub from: Vec2,
    /// End corner of the segment.
    pub to: Vec2,
}

/// Static maze geometry prepared for drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct MazePresentation {
    /// Total width of the maze in pixels.
    pub width: f32,
    /// Total height of the maze in pixels.
    pub height: f32,
    /// Wall edges expressed as drawable segments.
    pub walls: Vec<WallSegment>,
    /// Color used when drawing wall segments.
    pub wall_color: Color,
}

impl MazePresentation {
    /// Traces every wall edge in the view into drawable segments.
    ///
    /// Interior walls are shared between two cells and produce a segment
    /// from each side; backends draw them on top of each other, which is
    /// cheaper than deduplicating and visually identical. The one-sided
    /// den exit produces no segment from the den side, exactly matching
    /// its passability.
    #[must_use]
    pub fn from_view(view: &MazeView<'_>, wall_color: Color) -> Self {
        let size = view.cell_size();
        let mut walls = Vec::new();
        for x in 0..view.columns() {
            for y in 0..view.rows() {
                let cell = CellCoord::new(x, y);
                let corner = view.origin() + Vec2::new(x as f32 * size, y as f32 * size);
                for direction in Direction::PRIORITY_ORDER {
                    if view.edge(cell, direction) != Some(EdgeType::Wall) {
                        continue;
                    }
                    walls.push(wall_segment(corner, size, direction));
                }
            }
        }
        Self {
            width: view.columns() as f32 * size,
            height: view.rows() as f32 * size,
            walls,
            wall_color,
        }
    }
}

/// Segment covering one edge of the cell whose lower-left corner is given.
fn wall_segment(corner: Vec2, size: f32, direction: Direction) -> WallSegment {
    let (from, to) = match direction {
        Direction::Up => (corner + Vec2::new(0.0, size), corner + Vec2::new(size, size)),
        Direction::Down => (corner, corner + Vec2::new(size, 0.0)),
        Direction::Left => (corner, corner + Vec2::new(0.0, size)),
        Direction::Right => (
            corner + Vec2::new(size, 0.0),
            corner + Vec2::new(size, size),
        ),
    };
    WallSegment { from, to }
}

/// Uneaten pellet rendered as a filled circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PelletPresentation {
    /// Center of the pellet in pixel space.
    pub position: Vec2,
    /// Radius of the pellet in pixels.
    pub radius: f32,
    /// Fill color.
    pub color: Color,
}

/// Relative pellet radii; power pellets read clearly at a glance.
const NORMAL_PELLET_SCALE: f32 = 0.1;
const POWER_PELLET_SCALE: f32 = 0.25;

/// Collects every remaining pellet in the view.
#[must_use]
pub fn pellet_presentations(view: &MazeView<'_>, color: Color) -> Vec<PelletPresentation> {
    let size = view.cell_size();
    let mut pellets = Vec::new();
    for x in 0..view.columns() {
        for y in 0..view.rows() {
            let cell = CellCoord::new(x, y);
            let Some(kind) = view.pellet(cell) else {
                continue;
            };
            let scale = match kind {
                PelletKind::Normal => NORMAL_PELLET_SCALE,
                PelletKind::Power => POWER_PELLET_SCALE,
            };
            pellets.push(PelletPresentation {
                position: view.cell_center(cell),
                radius: size * scale,
                color,
            });
        }
    }
    pellets
}

/// A character rendered as an oriented sprite.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterPresentation {
    /// Center of the sprite in pixel space.
    pub position: Vec2,
    /// Sprite rotation derived from the facing direction.
    pub angle_degrees: f32,
    /// Fill color.
    pub color: Color,
    /// Whether the sprite should render as disembodied eyes.
    pub eyes_only: bool,
}

/// Fill color of the player sprite.
#[must_use]
pub const fn player_color() -> Color {
    Color::from_rgb_u8(255, 220, 40)
}

/// Fill color for an enemy, honoring frightened and dead overrides.
#[must_use]
pub fn enemy_color(kind: EnemyKind, mode: EnemyMode) -> Color {
    match mode {
        EnemyMode::Frightened => Color::from_rgb_u8(40, 60, 220),
        EnemyMode::Dead => Color::from_rgb_u8(230, 230, 230),
        _ => match kind {
            EnemyKind::Chaser => Color::from_rgb_u8(230, 40, 40),
            EnemyKind::Ambusher => Color::from_rgb_u8(250, 150, 190),
            EnemyKind::Flanker => Color::from_rgb_u8(70, 190, 230),
            EnemyKind::Lurker => Color::from_rgb_u8(250, 170, 60),
        },
    }
}

/// Builds the player's sprite descriptor.
#[must_use]
pub fn player_presentation(player: &PlayerSnapshot) -> CharacterPresentation {
    CharacterPresentation {
        position: player.position,
        angle_degrees: player.direction.angle_degrees(),
        color: player_color(),
        eyes_only: false,
    }
}

/// Builds one sprite descriptor per enemy.
#[must_use]
pub fn enemy_presentations(enemies: &[EnemySnapshot]) -> Vec<CharacterPresentation> {
    enemies
        .iter()
        .map(|enemy| CharacterPresentation {
            position: enemy.position,
            angle_degrees: enemy.direction.angle_degrees(),
            color: enemy_color(enemy.kind, enemy.mode),
            eyes_only: enemy.mode == EnemyMode::Dead,
        })
        .collect()
}

/// Scene description combining the maze, pellets and characters.
#[derive(Clone, Debug, PartialEq)]
pub struct Scene {
    /// Maze geometry.
    pub maze: MazePresentation,
    /// Remaining pellets.
    pub pellets: Vec<PelletPresentation>,
    /// The player sprite.
    pub player: CharacterPresentation,
    /// Enemy sprites in release order.
    pub enemies: Vec<CharacterPresentation>,
}

impl Scene {
    /// Composes a complete scene from world queries.
    #[must_use]
    pub fn compose(
        view: &MazeView<'_>,
        player: &PlayerSnapshot,
        enemies: &[EnemySnapshot],
        wall_color: Color,
        pellet_color: Color,
    ) -> Self {
        Self {
            maze: MazePresentation::from_view(view, wall_color),
            pellets: pellet_presentations(view, pellet_color),
            player: player_presentation(player),
            enemies: enemy_presentations(enemies),
        }
    }
}
