#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter running a headless maze-chase session.
//!
//! Without a display the player is steered by a seeded autopilot, which
//! keeps runs reproducible; the loop prints notable events as they occur
//! and a summary when the session ends.

use std::time::Duration;

use anyhow::{bail, Result};
use clap::Parser;
use maze_chase_core::{Command, DifficultyConfig, Direction, Event};
use maze_chase_rendering::{Color, Scene};
use maze_chase_system_enemy_ai::EnemyAi;
use maze_chase_world::{apply, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Fixed simulation step.
const TICK: Duration = Duration::from_nanos(16_666_667);
/// How often the autopilot re-rolls the player's direction.
const AUTOPILOT_PERIOD: u32 = 30;

#[derive(Debug, Parser)]
#[command(name = "maze-chase", about = "Headless maze-chase simulation runner")]
struct Args {
    /// Number of maze columns.
    #[arg(long, default_value_t = 16)]
    columns: i32,
    /// Number of maze rows.
    #[arg(long, default_value_t = 12)]
    rows: i32,
    /// Seed for maze generation and both random streams.
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Maximum number of ticks to simulate.
    #[arg(long, default_value_t = 7200)]
    ticks: u32,
    /// Lives before the session ends.
    #[arg(long, default_value_t = 3)]
    lives: u32,
}

fn main() -> Result<()> {
    let args = Args::parse();
    if args.lives == 0 {
        bail!("at least one life is required");
    }

    let config = DifficultyConfig::default();
    let mut world = World::new(args.columns, args.rows, args.seed, config)?;
    let mut ai = EnemyAi::new(args.seed);
    let mut autopilot = ChaCha8Rng::seed_from_u64(args.seed);

    let scene = Scene::compose(
        &query::maze_view(&world),
        &query::player(&world),
        &query::enemies(&world),
        Color::from_rgb_u8(40, 40, 200),
        Color::from_rgb_u8(255, 255, 255),
    );
    println!(
        "maze {}x{}: {} wall segments, {} pellets",
        args.columns,
        args.rows,
        scene.maze.walls.len(),
        scene.pellets.len()
    );

    let mut score: u64 = 0;
    let mut lives = args.lives;
    let mut commands = Vec::new();
    let mut events = Vec::new();

    for tick in 0..args.ticks {
        if tick % AUTOPILOT_PERIOD == 0 {
            let direction = random_direction(&mut autopilot);
            apply(&mut world, Command::SetPlayerDirection { direction }, &mut events);
        }

        commands.clear();
        {
            let maze = query::maze_view(&world);
            let player = query::player(&world);
            let enemies = query::enemies(&world);
            ai.handle(&maze, &player, &enemies, &mut commands);
        }
        for command in commands.drain(..) {
            apply(&mut world, command, &mut events);
        }

        events.clear();
        apply(&mut world, Command::Tick { dt: TICK }, &mut events);
        for event in &events {
            score += report(*event);
        }

        if events.contains(&Event::LevelCleared) {
            println!("level cleared after {tick} ticks");
            break;
        }
        if events.contains(&Event::PlayerKilled) {
            lives -= 1;
            if lives == 0 {
                println!("out of lives after {tick} ticks");
                break;
            }
            println!("{lives} lives remaining");
            apply(&mut world, Command::ResetCharacters, &mut events);
        }
    }

    println!(
        "final score {score}, {} pellets left, clock {:.1}s",
        query::pellets_remaining(&world),
        query::clock(&world).as_secs_f32()
    );
    Ok(())
}

/// Returns the score credited by the event, printing the notable ones.
fn report(event: Event) -> u64 {
    match event {
        Event::PelletEaten { value, .. } => u64::from(value),
        Event::EnemyKilled { enemy, value } => {
            println!("ate {enemy:?} (+{value})");
            u64::from(value)
        }
        Event::PowerupActivated => {
            println!("powerup!");
            0
        }
        Event::PowerupEnded => {
            println!("powerup over");
            0
        }
        Event::EnemyReleased { enemy } => {
            println!("{enemy:?} released");
            0
        }
        Event::PlayerKilled => {
            println!("caught!");
            0
        }
        _ => 0,
    }
}

fn random_direction<R: Rng>(rng: &mut R) -> Direction {
    Direction::PRIORITY_ORDER[rng.gen_range(0..4)]
}
