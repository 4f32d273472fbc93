//! Procedural maze generation: growing-tree carving, dead-end removal,
//! den placement, and pellet seeding.

use glam::Vec2;
use maze_chase_core::{CellCoord, DenCells, Direction, EdgeType, GenerationError, PelletKind};
use rand::Rng;

use crate::grid::Grid;

/// Smallest grid that can host the den with its padding; see `carve_den`.
pub(crate) const MIN_COLUMNS: i32 = 5;
pub(crate) const MIN_ROWS: i32 = 4;

/// Clearance kept between the den and the grid boundary.
const DEN_PADDING_X: i32 = 1;
const DEN_PADDING_Y: i32 = 1;

/// Builds a complete level grid from the given dimensions and RNG.
///
/// Fails fast when the dimensions cannot satisfy den placement instead of
/// retrying forever.
pub(crate) fn generate<R: Rng>(
    columns: i32,
    rows: i32,
    cell_size: f32,
    origin: Vec2,
    powerup_limit: u32,
    rng: &mut R,
) -> Result<Grid, GenerationError> {
    if columns < MIN_COLUMNS || rows < MIN_ROWS {
        return Err(GenerationError::GridTooSmall { columns, rows });
    }

    let mut grid = Grid::with_unset_edges(columns, rows, cell_size, origin);
    carve_maze(&mut grid, rng);
    remove_dead_ends(&mut grid, rng);
    carve_den(&mut grid, rng);
    grid.player_start = choose_player_start(&grid, rng);
    place_pellets(&mut grid, powerup_limit, rng);
    Ok(grid)
}

/// Growing-tree carve over the whole grid.
///
/// The frontier is treated as a stack: always expanding from the *last*
/// active cell. That index choice is what produces long corridors with
/// occasional branching; a queue or a random index yields a different
/// texture and is not equivalent.
pub(crate) fn carve_maze<R: Rng>(grid: &mut Grid, rng: &mut R) {
    let mut visited = vec![false; (grid.columns * grid.rows) as usize];
    let mut active: Vec<CellCoord> = Vec::new();

    let start = random_cell(grid, rng);
    if let Some(index) = grid.cell_index(start) {
        visited[index] = true;
    }
    active.push(start);

    while let Some(&cell) = active.last() {
        let unset = grid.unset_directions(cell);
        let Some(&direction) = pick(rng, &unset) else {
            // Every edge of this cell is decided; its subtree is exhausted.
            let _ = active.pop();
            continue;
        };

        let neighbor = cell.step(direction);
        if !grid.contains(neighbor) {
            grid.set_edge(cell, direction, EdgeType::Wall);
            continue;
        }

        let neighbor_index = grid
            .cell_index(neighbor)
            .expect("neighbor bounds checked above");
        if visited[neighbor_index] {
            // Opening this edge would close a cycle.
            grid.set_wall_paired(cell, direction);
        } else {
            visited[neighbor_index] = true;
            grid.set_edge(cell, direction, EdgeType::Passage);
            grid.set_edge(neighbor, direction.opposite(), EdgeType::Passage);
            active.push(neighbor);
        }
    }
}

/// Opens one wall of every single-cell dead end.
///
/// Enemies are forbidden from reversing outside the den, so a strict dead
/// end would trap them. Boundary walls cannot be opened; such candidates
/// are discarded and another wall is drawn. A cell whose walls are all
/// boundary edges (only possible on degenerate grids like 2x1) is left
/// unchanged rather than retried forever.
pub(crate) fn remove_dead_ends<R: Rng>(grid: &mut Grid, rng: &mut R) {
    for x in 0..grid.columns {
        for y in 0..grid.rows {
            let cell = CellCoord::new(x, y);
            let mut walls = grid.wall_directions(cell);
            if (walls.len() as i32) < 3 {
                continue;
            }

            while !walls.is_empty() {
                let index = rng.gen_range(0..walls.len());
                let direction = walls.swap_remove(index);
                if grid.try_set_passage_paired(cell, direction) {
                    break;
                }
            }
        }
    }
}

/// Carves the three-cell enemy den with its one-way exit.
pub(crate) fn carve_den<R: Rng>(grid: &mut Grid, rng: &mut R) {
    // One extra column of margin on each side for the left/right den cells.
    let center = CellCoord::new(
        rng.gen_range(DEN_PADDING_X + 1..grid.columns - DEN_PADDING_X - 1),
        rng.gen_range(DEN_PADDING_Y..grid.rows - DEN_PADDING_Y),
    );
    let den = DenCells {
        center,
        left: center.step(Direction::Left),
        right: center.step(Direction::Right),
    };
    grid.den = den;

    seal_cell(grid, den.center, &[Direction::Down, Direction::Up]);
    seal_cell(
        grid,
        den.left,
        &[Direction::Up, Direction::Down, Direction::Left],
    );
    seal_cell(
        grid,
        den.right,
        &[Direction::Up, Direction::Down, Direction::Right],
    );

    // The one-way exit: only the center's own side of the up edge opens,
    // so the cell above keeps its down wall and nothing can enter.
    grid.set_edge(den.center, Direction::Up, EdgeType::Passage);

    clear_ring_around_den(grid, den);
}

/// Sets the listed edges of a cell to walls and every other edge to a
/// passage, updating partners where they exist.
fn seal_cell(grid: &mut Grid, cell: CellCoord, walls: &[Direction]) {
    for direction in Direction::PRIORITY_ORDER {
        if walls.contains(&direction) {
            grid.set_wall_paired(cell, direction);
        } else {
            let _ = grid.try_set_passage_paired(cell, direction);
        }
    }
}

/// Guarantees free circulation around the den.
///
/// Every cell orthogonally adjacent to the den gets its edges parallel to
/// the den face opened, so dead-end removal cannot be undone by the den
/// walls and the player can always run a full lap around it.
fn clear_ring_around_den(grid: &mut Grid, den: DenCells) {
    for den_cell in [den.center, den.left, den.right] {
        for direction in Direction::PRIORITY_ORDER {
            let adjacent = den_cell.step(direction);
            if den.contains(adjacent) || !grid.contains(adjacent) {
                continue;
            }

            let lateral: [Direction; 2] = match direction {
                Direction::Up | Direction::Down => [Direction::Left, Direction::Right],
                Direction::Left | Direction::Right => [Direction::Down, Direction::Up],
            };
            for edge_direction in lateral {
                let _ = grid.try_set_passage_paired(adjacent, edge_direction);
            }
        }
    }
}

fn choose_player_start<R: Rng>(grid: &Grid, rng: &mut R) -> CellCoord {
    loop {
        let cell = random_cell(grid, rng);
        if !grid.den.contains(cell) {
            return cell;
        }
    }
}

/// Seeds a normal pellet in every ordinary cell, then upgrades randomly
/// chosen pellets to power pellets up to the configured limit.
fn place_pellets<R: Rng>(grid: &mut Grid, powerup_limit: u32, rng: &mut R) {
    for x in 0..grid.columns {
        for y in 0..grid.rows {
            let cell = CellCoord::new(x, y);
            if grid.den.contains(cell) || cell == grid.player_start {
                continue;
            }
            if let Some(index) = grid.cell_index(cell) {
                grid.pellets[index] = Some(PelletKind::Normal);
            }
        }
    }

    // Cap at the number of pellet cells so the draw loop terminates.
    let eligible = grid.pellet_count();
    let target = powerup_limit.min(eligible);
    let mut upgraded = 0;
    while upgraded < target {
        let cell = random_cell(grid, rng);
        if grid.pellet(cell) == Some(PelletKind::Normal) {
            if let Some(index) = grid.cell_index(cell) {
                grid.pellets[index] = Some(PelletKind::Power);
                upgraded += 1;
            }
        }
    }
}

fn random_cell<R: Rng>(grid: &Grid, rng: &mut R) -> CellCoord {
    CellCoord::new(
        rng.gen_range(0..grid.columns),
        rng.gen_range(0..grid.rows),
    )
}

fn pick<'a, R: Rng, T>(rng: &mut R, candidates: &'a [T]) -> Option<&'a T> {
    if candidates.is_empty() {
        return None;
    }
    candidates.get(rng.gen_range(0..candidates.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::VecDeque;

    fn generated(columns: i32, rows: i32, seed: u64) -> Grid {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        generate(columns, rows, 32.0, Vec2::ZERO, 4, &mut rng).expect("valid dimensions")
    }

    fn is_den_exit(grid: &Grid, cell: CellCoord, direction: Direction) -> bool {
        cell == grid.den.center && direction == Direction::Up
    }

    #[test]
    fn rejects_grids_too_small_for_the_den() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let result = generate(4, 4, 32.0, Vec2::ZERO, 4, &mut rng);
        assert_eq!(
            result.err(),
            Some(GenerationError::GridTooSmall {
                columns: 4,
                rows: 4
            })
        );
    }

    #[test]
    fn every_edge_is_decided_after_generation() {
        let grid = generated(12, 9, 7);
        assert!(grid.edges.iter().all(|edge| *edge != EdgeType::Unset));
    }

    #[test]
    fn edges_are_symmetric_except_the_den_exit() {
        let grid = generated(14, 10, 21);
        for x in 0..grid.columns {
            for y in 0..grid.rows {
                let cell = CellCoord::new(x, y);
                for direction in Direction::PRIORITY_ORDER {
                    let neighbor = cell.step(direction);
                    if !grid.contains(neighbor) {
                        assert_eq!(
                            grid.edge(cell, direction),
                            Some(EdgeType::Wall),
                            "boundary edge of {cell:?} {direction:?} must be a wall"
                        );
                        continue;
                    }
                    if is_den_exit(&grid, cell, direction)
                        || is_den_exit(&grid, neighbor, direction.opposite())
                    {
                        continue;
                    }
                    assert_eq!(
                        grid.edge(cell, direction),
                        grid.edge(neighbor, direction.opposite()),
                        "asymmetric edge between {cell:?} and {neighbor:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn every_cell_is_reachable() {
        let grid = generated(12, 9, 3);
        let mut seen = vec![false; (grid.columns * grid.rows) as usize];
        let mut queue = VecDeque::new();
        // Start outside the den; its interior is only reachable one-way in
        // reverse, so walk outward from the exit's landing cell instead.
        let start = grid.den.center;
        seen[grid.cell_index(start).expect("den in bounds")] = true;
        queue.push_back(start);

        while let Some(cell) = queue.pop_front() {
            for direction in Direction::PRIORITY_ORDER {
                if grid.edge(cell, direction) != Some(EdgeType::Passage) {
                    continue;
                }
                let neighbor = cell.step(direction);
                let Some(index) = grid.cell_index(neighbor) else {
                    continue;
                };
                if !seen[index] {
                    seen[index] = true;
                    queue.push_back(neighbor);
                }
            }
        }

        assert!(seen.iter().all(|cell| *cell), "maze has unreachable cells");
    }

    #[test]
    fn no_dead_ends_outside_the_den() {
        let grid = generated(16, 12, 99);
        for x in 0..grid.columns {
            for y in 0..grid.rows {
                let cell = CellCoord::new(x, y);
                if grid.den.contains(cell) {
                    continue;
                }
                let walls = grid.wall_directions(cell).len();
                assert!(
                    walls <= 2,
                    "{cell:?} has {walls} walls after dead-end removal"
                );
            }
        }
    }

    #[test]
    fn den_is_sealed_with_a_single_one_way_exit() {
        let grid = generated(12, 9, 5);
        let den = grid.den;

        // Side cells: sealed except toward the center.
        assert_eq!(grid.edge(den.left, Direction::Up), Some(EdgeType::Wall));
        assert_eq!(grid.edge(den.left, Direction::Down), Some(EdgeType::Wall));
        assert_eq!(grid.edge(den.left, Direction::Left), Some(EdgeType::Wall));
        assert_eq!(
            grid.edge(den.left, Direction::Right),
            Some(EdgeType::Passage)
        );
        assert_eq!(grid.edge(den.right, Direction::Up), Some(EdgeType::Wall));
        assert_eq!(grid.edge(den.right, Direction::Down), Some(EdgeType::Wall));
        assert_eq!(grid.edge(den.right, Direction::Right), Some(EdgeType::Wall));
        assert_eq!(
            grid.edge(den.right, Direction::Left),
            Some(EdgeType::Passage)
        );

        // Center: open to both sides, walled below, one-way exit above.
        assert_eq!(
            grid.edge(den.center, Direction::Left),
            Some(EdgeType::Passage)
        );
        assert_eq!(
            grid.edge(den.center, Direction::Right),
            Some(EdgeType::Passage)
        );
        assert_eq!(grid.edge(den.center, Direction::Down), Some(EdgeType::Wall));
        assert_eq!(
            grid.edge(den.center, Direction::Up),
            Some(EdgeType::Passage)
        );
        let above = den.center.step(Direction::Up);
        assert_eq!(
            grid.edge(above, Direction::Down),
            Some(EdgeType::Wall),
            "the cell above the den must not admit entry"
        );
    }

    #[test]
    fn two_by_one_carve_yields_one_passage_and_survives_dead_end_pass() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut grid = Grid::with_unset_edges(2, 1, 32.0, Vec2::ZERO);
        carve_maze(&mut grid, &mut rng);
        remove_dead_ends(&mut grid, &mut rng);

        let left = CellCoord::new(0, 0);
        let right = CellCoord::new(1, 0);
        assert_eq!(grid.edge(left, Direction::Right), Some(EdgeType::Passage));
        assert_eq!(grid.edge(right, Direction::Left), Some(EdgeType::Passage));
        for (cell, boundary) in [
            (left, [Direction::Up, Direction::Down, Direction::Left]),
            (right, [Direction::Up, Direction::Down, Direction::Right]),
        ] {
            for direction in boundary {
                assert_eq!(grid.edge(cell, direction), Some(EdgeType::Wall));
            }
        }
    }

    #[test]
    fn pellets_skip_den_and_player_start() {
        let grid = generated(12, 9, 13);
        for cell in [
            grid.den.center,
            grid.den.left,
            grid.den.right,
            grid.player_start,
        ] {
            assert_eq!(grid.pellet(cell), None);
        }
        let expected = (grid.columns * grid.rows - 4) as u32;
        assert_eq!(grid.pellet_count(), expected);
    }

    #[test]
    fn power_pellet_count_matches_the_limit() {
        let grid = generated(12, 9, 17);
        let power = grid
            .pellets
            .iter()
            .filter(|slot| **slot == Some(PelletKind::Power))
            .count();
        assert_eq!(power, 4);
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let first = generated(12, 9, 42);
        let second = generated(12, 9, 42);
        assert_eq!(first.edges, second.edges);
        assert_eq!(first.pellets, second.pellets);
        assert_eq!(first.den, second.den);
        assert_eq!(first.player_start, second.player_start);
    }
}
