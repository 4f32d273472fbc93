#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative simulation state for maze-chase.
//!
//! The world owns the carved maze, both character kinds, and the timer
//! queue. All mutation flows through [`apply`]; adapters and systems read
//! state exclusively through the [`query`] module. The simulation clock
//! only advances inside [`Command::Tick`], so identical command sequences
//! reproduce identical worlds.

use std::time::Duration;

use glam::Vec2;
use maze_chase_core::{
    Command, DifficultyConfig, EnemyKind, EnemyMode, Event, GenerationError, PelletKind,
    PursuitMode,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

mod characters;
mod grid;
mod maze;
mod movement;
mod timers;

use characters::{Enemy, Player, ENEMY_BASE_SPEED, PLAYER_BASE_SPEED, POWERUP_END_WARNING};
use grid::Grid;
use timers::{TimerKey, TimerQueue};

/// Side length of a maze cell in pixels.
const CELL_SIZE: f32 = 32.0;
/// Reference tick rate the base speeds are calibrated against.
const REFERENCE_TICK_HZ: f32 = 60.0;

/// Complete simulation state for one level in progress.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    player: Player,
    /// Indexed in [`EnemyKind::ALL`] order.
    enemies: [Enemy; 4],
    timers: TimerQueue,
    clock: Duration,
    config: DifficultyConfig,
    pellets_remaining: u32,
    /// Set after a fatal collision or a cleared level; ticks become no-ops
    /// until the embedding game resets or advances.
    halted: bool,
}

impl World {
    /// Generates a level and spawns all characters.
    pub fn new(
        columns: i32,
        rows: i32,
        seed: u64,
        config: DifficultyConfig,
    ) -> Result<World, GenerationError> {
        let mut rng = maze_rng(seed);
        let grid = maze::generate(
            columns,
            rows,
            CELL_SIZE,
            Vec2::ZERO,
            config.powerup_limit,
            &mut rng,
        )?;
        let mut world = World {
            player: Player::spawn(&grid),
            enemies: EnemyKind::ALL.map(|kind| Enemy::spawn(&grid, kind)),
            pellets_remaining: grid.pellet_count(),
            grid,
            timers: TimerQueue::default(),
            clock: Duration::ZERO,
            config,
            halted: false,
        };
        world.arm_spawn_timers();
        Ok(world)
    }

    fn arm_spawn_timers(&mut self) {
        for kind in EnemyKind::ALL {
            self.timers
                .schedule(TimerKey::Release(kind), self.clock, Enemy::release_delay(kind));
            self.timers.schedule(
                TimerKey::ModeFlip(kind),
                self.clock,
                self.config.scatter_duration,
            );
        }
    }

    fn enemy_mut(&mut self, kind: EnemyKind) -> &mut Enemy {
        &mut self.enemies[enemy_index(kind)]
    }

    fn leg_duration(&self, pursuit: PursuitMode) -> Duration {
        match pursuit {
            PursuitMode::Scatter => self.config.scatter_duration,
            PursuitMode::Chase => self.config.chase_duration,
        }
    }
}

fn enemy_index(kind: EnemyKind) -> usize {
    match kind {
        EnemyKind::Chaser => 0,
        EnemyKind::Ambusher => 1,
        EnemyKind::Flanker => 2,
        EnemyKind::Lurker => 3,
    }
}

/// Derives a labeled generator stream from the level seed, so adding new
/// randomized concerns later cannot perturb maze layout for a given seed.
fn maze_rng(seed: u64) -> ChaCha8Rng {
    let mut hasher = Sha256::new();
    hasher.update(b"maze");
    hasher.update(seed.to_le_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    ChaCha8Rng::seed_from_u64(u64::from_le_bytes(bytes))
}

/// Executes one command against the world, appending resulting events.
///
/// This is the sole mutation entry point.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::SetPlayerDirection { direction } => {
            world.player.body.pending = direction;
        }
        Command::SetEnemyDirection { enemy, direction } => {
            world.enemy_mut(enemy).body.pending = direction;
        }
        Command::Tick { dt } => tick(world, dt, out_events),
        Command::ResetCharacters => reset_characters(world, out_events),
        Command::AdvanceLevel { seed, difficulty } => {
            advance_level(world, seed, difficulty, out_events);
        }
    }
}

fn tick(world: &mut World, dt: Duration, out_events: &mut Vec<Event>) {
    if world.halted {
        return;
    }
    world.clock += dt;
    out_events.push(Event::TimeAdvanced { dt });

    let scale = dt.as_secs_f32() * REFERENCE_TICK_HZ * world.config.speed_multiplier;

    if world.player.alive {
        let _ = movement::step(&world.grid, &mut world.player.body, PLAYER_BASE_SPEED * scale);
    }

    move_enemies(world, ENEMY_BASE_SPEED * scale, out_events);
    consume_pellet(world, out_events);
    resolve_collisions(world, out_events);
    fire_due_timers(world, out_events);
}

fn move_enemies(world: &mut World, speed: f32, out_events: &mut Vec<Event>) {
    for index in 0..world.enemies.len() {
        let enemy = &mut world.enemies[index];
        if enemy.mode == EnemyMode::Dead {
            let home = world.grid.cell_center(world.grid.den.center);
            if movement::steer_toward(&world.grid, &mut enemy.body, home, speed) {
                enemy.mode = enemy.pursuit.into();
                out_events.push(Event::ModeChanged {
                    enemy: enemy.kind,
                    mode: enemy.mode,
                });
            }
        } else {
            let _ = movement::step(&world.grid, &mut enemy.body, speed);
        }
    }
}

fn consume_pellet(world: &mut World, out_events: &mut Vec<Event>) {
    if !world.player.alive {
        return;
    }
    let cell = world.player.body.cell;
    let Some(kind) = world.grid.take_pellet(cell) else {
        return;
    };
    world.pellets_remaining -= 1;
    out_events.push(Event::PelletEaten {
        cell,
        kind,
        value: world.config.pellet_value,
    });
    if kind == PelletKind::Power {
        activate_powerup(world, out_events);
    }
    if world.pellets_remaining == 0 {
        world.halted = true;
        out_events.push(Event::LevelCleared);
    }
}

fn resolve_collisions(world: &mut World, out_events: &mut Vec<Event>) {
    if !world.player.alive {
        return;
    }
    let player_cell = world.player.body.cell;
    for index in 0..world.enemies.len() {
        let enemy = &mut world.enemies[index];
        if enemy.body.cell != player_cell {
            continue;
        }
        if world.player.powered_up && enemy.mode == EnemyMode::Frightened {
            enemy.mode = EnemyMode::Dead;
            out_events.push(Event::ModeChanged {
                enemy: enemy.kind,
                mode: EnemyMode::Dead,
            });
            out_events.push(Event::EnemyKilled {
                enemy: enemy.kind,
                value: world.config.kill_value,
            });
        } else if enemy.mode != EnemyMode::Dead {
            world.player.alive = false;
            world.halted = true;
            out_events.push(Event::PlayerKilled);
            break;
        }
    }
}

fn fire_due_timers(world: &mut World, out_events: &mut Vec<Event>) {
    for key in world.timers.due(world.clock) {
        match key {
            TimerKey::Release(kind) => {
                let enemy = world.enemy_mut(kind);
                enemy.mode = enemy.pursuit.into();
                let mode = enemy.mode;
                out_events.push(Event::EnemyReleased { enemy: kind });
                out_events.push(Event::ModeChanged { enemy: kind, mode });
            }
            TimerKey::ModeFlip(kind) => {
                let enemy = world.enemy_mut(kind);
                enemy.pursuit = enemy.pursuit.flipped();
                let pursuit = enemy.pursuit;
                if enemy.mode.is_pursuing() {
                    enemy.mode = pursuit.into();
                    // Mode flips are the one legal reversal outside the den.
                    enemy.body.direction = enemy.body.direction.opposite();
                    enemy.body.pending = enemy.body.direction;
                    let mode = enemy.mode;
                    out_events.push(Event::ModeChanged { enemy: kind, mode });
                }
                let delay = world.leg_duration(pursuit);
                world
                    .timers
                    .schedule(TimerKey::ModeFlip(kind), world.clock, delay);
            }
            TimerKey::PowerupWarning => out_events.push(Event::PowerupEnding),
            TimerKey::PowerupEnd => end_powerup(world, out_events),
        }
    }
}

fn activate_powerup(world: &mut World, out_events: &mut Vec<Event>) {
    world.player.powered_up = true;
    // A second pellet during an active powerup restarts the full period.
    world.timers.schedule(
        TimerKey::PowerupEnd,
        world.clock,
        world.config.powerup_duration,
    );
    world.timers.schedule(
        TimerKey::PowerupWarning,
        world.clock,
        world
            .config
            .powerup_duration
            .saturating_sub(POWERUP_END_WARNING),
    );

    for index in 0..world.enemies.len() {
        let kind = world.enemies[index].kind;
        // No-op when already paused, so the stored remainder survives
        // overlapping pellets.
        world.timers.pause(TimerKey::ModeFlip(kind), world.clock);
        let in_den = world.grid.den.contains(world.enemies[index].body.cell);
        let enemy = &mut world.enemies[index];
        if enemy.mode.is_pursuing() && !in_den {
            enemy.mode = EnemyMode::Frightened;
            out_events.push(Event::ModeChanged {
                enemy: kind,
                mode: EnemyMode::Frightened,
            });
        }
    }
    out_events.push(Event::PowerupActivated);
}

fn end_powerup(world: &mut World, out_events: &mut Vec<Event>) {
    world.player.powered_up = false;
    for index in 0..world.enemies.len() {
        let kind = world.enemies[index].kind;
        world.timers.resume(TimerKey::ModeFlip(kind), world.clock);
        let enemy = &mut world.enemies[index];
        if enemy.mode == EnemyMode::Frightened {
            enemy.mode = enemy.pursuit.into();
            let mode = enemy.mode;
            out_events.push(Event::ModeChanged { enemy: kind, mode });
        }
    }
    out_events.push(Event::PowerupEnded);
}

fn reset_characters(world: &mut World, out_events: &mut Vec<Event>) {
    world.timers.clear();
    world.player = Player::spawn(&world.grid);
    world.enemies = EnemyKind::ALL.map(|kind| Enemy::spawn(&world.grid, kind));
    world.halted = false;
    world.arm_spawn_timers();
    for kind in EnemyKind::ALL {
        out_events.push(Event::ModeChanged {
            enemy: kind,
            mode: EnemyMode::Dormant,
        });
    }
}

fn advance_level(
    world: &mut World,
    seed: u64,
    difficulty: DifficultyConfig,
    out_events: &mut Vec<Event>,
) {
    let mut rng = maze_rng(seed);
    // Dimensions were validated when the world was first constructed.
    let grid = maze::generate(
        world.grid.columns,
        world.grid.rows,
        world.grid.cell_size,
        world.grid.origin,
        difficulty.powerup_limit,
        &mut rng,
    )
    .expect("dimensions already validated");
    world.config = difficulty;
    world.pellets_remaining = grid.pellet_count();
    world.grid = grid;
    reset_characters(world, out_events);
}

/// Read-only accessors used by systems and adapters.
pub mod query {
    use maze_chase_core::{EnemySnapshot, MazeView, PlayerSnapshot};
    use std::time::Duration;

    use crate::World;

    /// Borrowed view of the maze structure.
    #[must_use]
    pub fn maze_view(world: &World) -> MazeView<'_> {
        world.grid.view()
    }

    /// Snapshot of the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: world.player.body.cell,
            position: world.player.body.position,
            direction: world.player.body.direction,
            pending: world.player.body.pending,
            powered_up: world.player.powered_up,
            alive: world.player.alive,
        }
    }

    /// Snapshots of all four enemies in [`maze_chase_core::EnemyKind::ALL`] order.
    #[must_use]
    pub fn enemies(world: &World) -> [EnemySnapshot; 4] {
        world.enemies.map(|enemy| EnemySnapshot {
            kind: enemy.kind,
            cell: enemy.body.cell,
            position: enemy.body.position,
            direction: enemy.body.direction,
            pending: enemy.body.pending,
            mode: enemy.mode,
            pursuit: enemy.pursuit,
        })
    }

    /// Number of pellets still uneaten.
    #[must_use]
    pub fn pellets_remaining(world: &World) -> u32 {
        world.pellets_remaining
    }

    /// Total simulated time advanced so far.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }

    /// Whether the simulation has stopped pending a reset or level advance.
    #[must_use]
    pub fn is_halted(world: &World) -> bool {
        world.halted
    }
}
