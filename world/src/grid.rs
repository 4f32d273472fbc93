//! Dense cell/edge storage for a generated level.

use glam::Vec2;
use maze_chase_core::{CellCoord, DenCells, Direction, EdgeType, MazeView, PelletKind};

/// Owns the carved maze: per-cell edge types, pellet state, the den region,
/// and the pixel metadata used for coordinate conversion.
///
/// A grid is constructed once per level by the generator and never mutated
/// structurally afterwards; only pellets are consumed.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    pub(crate) columns: i32,
    pub(crate) rows: i32,
    pub(crate) cell_size: f32,
    pub(crate) origin: Vec2,
    /// Four entries per cell in [`Direction::edge_slot`] order, row-major.
    pub(crate) edges: Vec<EdgeType>,
    pub(crate) pellets: Vec<Option<PelletKind>>,
    pub(crate) den: DenCells,
    pub(crate) player_start: CellCoord,
}

impl Grid {
    pub(crate) fn with_unset_edges(columns: i32, rows: i32, cell_size: f32, origin: Vec2) -> Self {
        let cells = (columns * rows) as usize;
        Self {
            columns,
            rows,
            cell_size,
            origin,
            edges: vec![EdgeType::Unset; cells * 4],
            pellets: vec![None; cells],
            den: DenCells {
                center: CellCoord::new(0, 0),
                left: CellCoord::new(-1, 0),
                right: CellCoord::new(1, 0),
            },
            player_start: CellCoord::new(0, 0),
        }
    }

    pub(crate) fn view(&self) -> MazeView<'_> {
        MazeView::new(
            self.columns,
            self.rows,
            self.cell_size,
            self.origin,
            &self.edges,
            &self.pellets,
            self.den,
        )
    }

    pub(crate) fn contains(&self, cell: CellCoord) -> bool {
        0 <= cell.x() && cell.x() < self.columns && 0 <= cell.y() && cell.y() < self.rows
    }

    pub(crate) fn cell_index(&self, cell: CellCoord) -> Option<usize> {
        if !self.contains(cell) {
            return None;
        }
        Some((cell.y() * self.columns + cell.x()) as usize)
    }

    pub(crate) fn edge(&self, cell: CellCoord, direction: Direction) -> Option<EdgeType> {
        let index = self.cell_index(cell)? * 4 + direction.edge_slot();
        self.edges.get(index).copied()
    }

    /// Writes one side of an edge without touching the neighbor's partner.
    ///
    /// Used for boundary walls (no partner exists) and for the den's
    /// deliberately one-sided exit passage.
    pub(crate) fn set_edge(&mut self, cell: CellCoord, direction: Direction, edge: EdgeType) {
        if let Some(index) = self.cell_index(cell) {
            self.edges[index * 4 + direction.edge_slot()] = edge;
        }
    }

    /// Writes both sides of an interior edge, upholding the symmetry
    /// invariant. The neighbor side is skipped at the grid boundary.
    pub(crate) fn set_wall_paired(&mut self, cell: CellCoord, direction: Direction) {
        self.set_edge(cell, direction, EdgeType::Wall);
        let neighbor = cell.step(direction);
        if self.contains(neighbor) {
            self.set_edge(neighbor, direction.opposite(), EdgeType::Wall);
        }
    }

    /// Attempts to open both sides of an interior edge as a passage.
    ///
    /// Returns `false` without writing anything when the neighbor does not
    /// exist; a passage leading off-grid would be unrecoverable.
    pub(crate) fn try_set_passage_paired(&mut self, cell: CellCoord, direction: Direction) -> bool {
        let neighbor = cell.step(direction);
        if !self.contains(neighbor) {
            return false;
        }
        self.set_edge(cell, direction, EdgeType::Passage);
        self.set_edge(neighbor, direction.opposite(), EdgeType::Passage);
        true
    }

    /// Directions whose edges are currently walls for the given cell.
    pub(crate) fn wall_directions(&self, cell: CellCoord) -> Vec<Direction> {
        Direction::PRIORITY_ORDER
            .into_iter()
            .filter(|direction| self.edge(cell, *direction) == Some(EdgeType::Wall))
            .collect()
    }

    /// Directions whose edges have not yet been decided for the given cell.
    pub(crate) fn unset_directions(&self, cell: CellCoord) -> Vec<Direction> {
        Direction::PRIORITY_ORDER
            .into_iter()
            .filter(|direction| self.edge(cell, *direction) == Some(EdgeType::Unset))
            .collect()
    }

    pub(crate) fn cell_center(&self, cell: CellCoord) -> Vec2 {
        self.origin
            + Vec2::new(
                (cell.x() as f32 + 0.5) * self.cell_size,
                (cell.y() as f32 + 0.5) * self.cell_size,
            )
    }

    /// Converts a continuous pixel position back to the cell containing it.
    pub(crate) fn cell_at(&self, position: Vec2) -> CellCoord {
        let local = position - self.origin;
        let x = (local.x / self.cell_size).floor() as i32;
        let y = (local.y / self.cell_size).floor() as i32;
        CellCoord::new(x.clamp(0, self.columns - 1), y.clamp(0, self.rows - 1))
    }

    pub(crate) fn pellet(&self, cell: CellCoord) -> Option<PelletKind> {
        let index = self.cell_index(cell)?;
        self.pellets.get(index).copied().flatten()
    }

    /// Removes and returns the pellet at the cell, if one remains.
    pub(crate) fn take_pellet(&mut self, cell: CellCoord) -> Option<PelletKind> {
        let index = self.cell_index(cell)?;
        self.pellets.get_mut(index).and_then(Option::take)
    }

    pub(crate) fn pellet_count(&self) -> u32 {
        self.pellets.iter().filter(|slot| slot.is_some()).count() as u32
    }
}
