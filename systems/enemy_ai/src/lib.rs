#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Enemy steering system.
//!
//! A pure system: it reads the maze view and character snapshots and emits
//! [`Command::SetEnemyDirection`] intents. It never mutates the world, so
//! the world applies intents on the following tick; directions only commit
//! at cell centers, which makes that latency unobservable.

use maze_chase_core::{
    CellCoord, Command, Direction, EdgeType, EnemyKind, EnemyMode, EnemySnapshot, MazeView,
    PlayerSnapshot,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Distance in cells below which the lurker retreats to its corner.
const LURKER_RETREAT_DISTANCE: f32 = 4.0;
/// How many cells ahead of the player the ambush point sits.
const AMBUSH_LEAD: i32 = 2;

/// Steering brain for all four enemies.
///
/// Owns its own RNG stream so frightened wandering is reproducible from
/// the seed independently of maze generation.
#[derive(Clone, Debug)]
pub struct EnemyAi {
    rng: ChaCha8Rng,
}

impl EnemyAi {
    /// Creates the system with a deterministic random stream.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Emits one direction intent per steerable enemy.
    pub fn handle(
        &mut self,
        maze: &MazeView<'_>,
        player: &PlayerSnapshot,
        enemies: &[EnemySnapshot],
        out_commands: &mut Vec<Command>,
    ) {
        for enemy in enemies {
            let Some(direction) = self.steer(maze, player, enemies, enemy) else {
                continue;
            };
            out_commands.push(Command::SetEnemyDirection {
                enemy: enemy.kind,
                direction,
            });
        }
    }

    fn steer(
        &mut self,
        maze: &MazeView<'_>,
        player: &PlayerSnapshot,
        enemies: &[EnemySnapshot],
        enemy: &EnemySnapshot,
    ) -> Option<Direction> {
        match enemy.mode {
            EnemyMode::Dead => None,
            EnemyMode::Dormant => {
                // Pace back and forth inside the den until released.
                if maze.edge(enemy.cell, enemy.direction) == Some(EdgeType::Passage) {
                    None
                } else {
                    Some(enemy.direction.opposite())
                }
            }
            EnemyMode::Frightened => Some(self.flee(maze, enemy)),
            EnemyMode::Scatter | EnemyMode::Chase => {
                // The den exit is the center's up edge; everything else is
                // sealed, so the way out is unconditional.
                if enemy.cell == maze.den().center {
                    return Some(Direction::Up);
                }
                let target = pursuit_target(maze, player, enemies, enemy);
                Some(choose_direction(maze, enemy, |cell| cell.distance(target)))
            }
        }
    }

    fn flee(&mut self, maze: &MazeView<'_>, enemy: &EnemySnapshot) -> Direction {
        let candidates = legal_directions(maze, enemy);
        if candidates.is_empty() {
            return enemy.direction.opposite();
        }
        candidates[self.rng.gen_range(0..candidates.len())]
    }
}

/// Cell an enemy in scatter or chase is pulled toward.
///
/// Scatter corners deliberately lie one cell outside the grid so the pull
/// never resolves and the enemy orbits the corner instead of parking.
fn pursuit_target(
    maze: &MazeView<'_>,
    player: &PlayerSnapshot,
    enemies: &[EnemySnapshot],
    enemy: &EnemySnapshot,
) -> CellCoord {
    let columns = maze.columns();
    let rows = maze.rows();
    match (enemy.kind, enemy.mode) {
        (EnemyKind::Chaser, EnemyMode::Chase) => player.cell,
        (EnemyKind::Chaser, _) => CellCoord::new(columns + 1, rows + 1),
        (EnemyKind::Ambusher, EnemyMode::Chase) => ambush_point(player),
        (EnemyKind::Ambusher, _) => CellCoord::new(-1, rows + 1),
        (EnemyKind::Flanker, EnemyMode::Chase) => {
            let ambush = ambush_point(player);
            let anchor = enemies
                .iter()
                .find(|other| other.kind == EnemyKind::Chaser)
                .map_or(ambush, |chaser| chaser.cell);
            // The ambush point reflected through the chaser's position.
            CellCoord::new(
                2 * ambush.x() - anchor.x(),
                2 * ambush.y() - anchor.y(),
            )
        }
        (EnemyKind::Flanker, _) => CellCoord::new(columns + 1, -1),
        (EnemyKind::Lurker, EnemyMode::Chase) => {
            if enemy.cell.distance(player.cell) > LURKER_RETREAT_DISTANCE {
                player.cell
            } else {
                CellCoord::new(-1, -1)
            }
        }
        (EnemyKind::Lurker, _) => CellCoord::new(-1, -1),
    }
}

fn ambush_point(player: &PlayerSnapshot) -> CellCoord {
    let (dx, dy) = player.direction.vector();
    CellCoord::new(
        player.cell.x() + AMBUSH_LEAD * dx,
        player.cell.y() + AMBUSH_LEAD * dy,
    )
}

/// Directions an enemy may steer into: open edges, excluding the reverse
/// of its travel unless it is inside the den.
fn legal_directions(maze: &MazeView<'_>, enemy: &EnemySnapshot) -> Vec<Direction> {
    let reverse = enemy.direction.opposite();
    let in_den = maze.den().contains(enemy.cell);
    Direction::PRIORITY_ORDER
        .into_iter()
        .filter(|direction| {
            maze.edge(enemy.cell, *direction) == Some(EdgeType::Passage)
                && (in_den || *direction != reverse)
        })
        .collect()
}

/// Greedy single-step chooser: ranks each legal neighbor by `score` and
/// keeps the last candidate at or below the running best, so ties resolve
/// to the direction latest in [`Direction::PRIORITY_ORDER`].
fn choose_direction<F>(maze: &MazeView<'_>, enemy: &EnemySnapshot, score: F) -> Direction
where
    F: Fn(CellCoord) -> f32,
{
    let mut best: Option<(f32, Direction)> = None;
    for direction in legal_directions(maze, enemy) {
        let candidate = score(enemy.cell.step(direction));
        match best {
            Some((current, _)) if candidate > current => {}
            _ => best = Some((candidate, direction)),
        }
    }
    match best {
        Some((_, direction)) => direction,
        // Fully boxed in; reversing is the only way back out.
        None => enemy.direction.opposite(),
    }
}
