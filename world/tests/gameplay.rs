//! End-to-end checks driving the world purely through commands and queries.

use std::time::Duration;

use maze_chase_core::{Command, DifficultyConfig, EnemyKind, Event, GenerationError};
use maze_chase_world::{apply, query, World};

const TICK: Duration = Duration::from_millis(50);

fn run_ticks(world: &mut World, count: u32) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..count {
        apply(world, Command::Tick { dt: TICK }, &mut events);
    }
    events
}

#[test]
fn construction_rejects_undersized_grids() {
    let result = World::new(4, 3, 1, DifficultyConfig::default());
    assert_eq!(
        result.err(),
        Some(GenerationError::GridTooSmall {
            columns: 4,
            rows: 3
        })
    );
}

#[test]
fn enemies_are_released_in_kind_order() {
    let mut world = World::new(12, 9, 42, DifficultyConfig::default()).expect("valid dimensions");
    // 12 seconds covers the last release at 11s.
    let events = run_ticks(&mut world, 240);

    let releases: Vec<EnemyKind> = events
        .iter()
        .filter_map(|event| match event {
            Event::EnemyReleased { enemy } => Some(*enemy),
            _ => None,
        })
        .collect();
    assert_eq!(releases, EnemyKind::ALL.to_vec());
}

#[test]
fn identical_seeds_and_commands_reproduce_identical_worlds() {
    let mut first = World::new(12, 9, 7, DifficultyConfig::default()).expect("valid dimensions");
    let mut second = World::new(12, 9, 7, DifficultyConfig::default()).expect("valid dimensions");

    let first_events = run_ticks(&mut first, 200);
    let second_events = run_ticks(&mut second, 200);

    assert_eq!(first_events, second_events);
    assert_eq!(query::player(&first), query::player(&second));
    assert_eq!(query::enemies(&first), query::enemies(&second));
    assert_eq!(
        query::pellets_remaining(&first),
        query::pellets_remaining(&second)
    );
    assert_eq!(query::clock(&first), query::clock(&second));
}

#[test]
fn the_clock_advances_only_through_ticks() {
    let mut world = World::new(12, 9, 3, DifficultyConfig::default()).expect("valid dimensions");
    assert_eq!(query::clock(&world), Duration::ZERO);

    let mut events = Vec::new();
    apply(&mut world, Command::ResetCharacters, &mut events);
    assert_eq!(query::clock(&world), Duration::ZERO);

    let _ = run_ticks(&mut world, 3);
    assert_eq!(query::clock(&world), TICK * 3);
    assert!(!query::is_halted(&world));
}

#[test]
fn pellet_totals_match_the_maze_contents() {
    let config = DifficultyConfig::default();
    let world = World::new(12, 9, 11, config).expect("valid dimensions");
    let view = query::maze_view(&world);

    let mut counted = 0;
    for x in 0..view.columns() {
        for y in 0..view.rows() {
            if view
                .pellet(maze_chase_core::CellCoord::new(x, y))
                .is_some()
            {
                counted += 1;
            }
        }
    }
    assert_eq!(counted, query::pellets_remaining(&world));
    // Three den cells plus the player start never hold pellets.
    assert_eq!(counted, 12 * 9 - 4);
}
