//! Square matrix of cells with spawn and occupancy queries.

use std::collections::BTreeSet;

use tilemerge_core::{Axis, BoardView, CellCoord, CellId, GameError, EMPTY_TILE, MAX_GRID_SIZE};

use crate::cell::Cell;

/// The N×N board.
///
/// Cells live in a fixed arena for the lifetime of the grid; a separate
/// position index maps every (row, column) to the cell currently claiming it.
/// Merges rewrite cell coordinates in place, so the index is only accurate
/// after [`Grid::reindex`] runs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    size: u32,
    cells: Vec<Cell>,
    slots: Vec<usize>,
}

impl Grid {
    /// Builds a `size`×`size` grid of empty cells at their canonical positions.
    pub fn empty_of_size(size: u32) -> Result<Self, GameError> {
        if size == 0 || size > MAX_GRID_SIZE {
            return Err(GameError::InvalidGridSize { size });
        }

        let capacity = slot_capacity(size);
        let mut cells = Vec::with_capacity(capacity);
        for row in 0..size {
            for column in 0..size {
                let id = CellId::new(row * size + column);
                cells.push(Cell::empty(id, CellCoord::new(row, column)));
            }
        }

        let mut grid = Self {
            size,
            cells,
            slots: vec![0; capacity],
        };
        grid.reindex();
        Ok(grid)
    }

    /// Builds a grid from a square matrix of tile values.
    pub fn from_rows(rows: &[&[u32]]) -> Result<Self, GameError> {
        let size = u32::try_from(rows.len()).map_err(|_| GameError::MalformedGrid)?;
        let mut grid = Self::empty_of_size(size)?;

        for (row_index, row) in rows.iter().enumerate() {
            if row.len() != rows.len() {
                return Err(GameError::MalformedGrid);
            }
            for (column_index, value) in row.iter().enumerate() {
                let index = row_index * rows.len() + column_index;
                grid.cells[index].set_value(*value)?;
            }
        }

        Ok(grid)
    }

    /// Edge length of the board.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Returns the cell claiming the provided position.
    #[must_use]
    pub fn cell(&self, at: CellCoord) -> Option<&Cell> {
        self.arena_index(at).map(|index| &self.cells[index])
    }

    /// Returns the value stored at the provided position.
    #[must_use]
    pub fn value(&self, at: CellCoord) -> Option<u32> {
        self.cell(at).map(Cell::value)
    }

    /// Iterates the cells in row-major position order.
    pub fn cells(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.slots.iter().map(move |index| &self.cells[*index])
    }

    /// Positions holding a tile.
    #[must_use]
    pub fn occupied_coordinates(&self) -> BTreeSet<CellCoord> {
        self.cells()
            .filter(|cell| !cell.is_empty())
            .map(Cell::coord)
            .collect()
    }

    /// Positions holding no tile, in row-major order.
    #[must_use]
    pub fn empty_coordinates(&self) -> Vec<CellCoord> {
        self.cells()
            .filter(|cell| cell.is_empty())
            .map(Cell::coord)
            .collect()
    }

    /// Reports whether at least one cell is empty.
    #[must_use]
    pub fn has_empty_cell(&self) -> bool {
        self.cells.iter().any(Cell::is_empty)
    }

    /// Reports whether two orthogonal neighbours hold the same tile.
    #[must_use]
    pub fn has_adjacent_match(&self) -> bool {
        for row in 0..self.size {
            for column in 0..self.size {
                let Some(value) = self.value(CellCoord::new(row, column)) else {
                    continue;
                };
                if value == EMPTY_TILE {
                    continue;
                }
                if self.value(CellCoord::new(row, column + 1)) == Some(value)
                    || self.value(CellCoord::new(row + 1, column)) == Some(value)
                {
                    return true;
                }
            }
        }
        false
    }

    /// Largest tile on the board, zero when the board is empty.
    #[must_use]
    pub fn highest_tile(&self) -> u32 {
        self.cells
            .iter()
            .map(Cell::value)
            .max()
            .unwrap_or(EMPTY_TILE)
    }

    /// Rebuilds the position index from the cells' current coordinates.
    pub fn reindex(&mut self) {
        for (index, cell) in self.cells.iter().enumerate() {
            if let Some(slot) = slot_index(self.size, cell.coord()) {
                self.slots[slot] = index;
            }
        }
        debug_assert!(
            self.slots
                .iter()
                .enumerate()
                .all(|(slot, index)| slot_index(self.size, self.cells[*index].coord())
                    == Some(slot)),
            "two cells claim the same position"
        );
    }

    /// Commits every dirty cell and resets the rest.
    ///
    /// Returns whether any cell was dirty, which is exactly when the move
    /// changed the board.
    pub fn commit_dirty(&mut self) -> bool {
        let mut changed = false;
        for cell in &mut self.cells {
            if cell.is_dirty() {
                cell.commit();
                changed = true;
            } else {
                cell.reset();
            }
        }
        self.reindex();
        changed
    }

    /// Captures the tile values as an immutable snapshot.
    #[must_use]
    pub fn view(&self) -> BoardView {
        BoardView::new(self.size, self.cells().map(Cell::value).collect())
    }

    /// Copies the tile values into one vector per row.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.view().rows()
    }

    /// Stores a freshly spawned tile in an empty cell.
    pub(crate) fn place(&mut self, at: CellCoord, value: u32) -> Result<CellId, GameError> {
        if value != 2 && value != 4 {
            return Err(GameError::InvalidValue { value });
        }
        let index = self.arena_index(at).ok_or(GameError::SpawnFailed)?;
        let cell = &mut self.cells[index];
        if !cell.is_empty() {
            return Err(GameError::SpawnFailed);
        }
        cell.set_value(value)?;
        Ok(cell.id())
    }

    /// Arena indices of the cells forming line `index` of `axis`, in natural order.
    pub(crate) fn line(&self, axis: Axis, index: u32) -> Vec<usize> {
        (0..self.size)
            .filter_map(|offset| {
                let at = match axis {
                    Axis::Row => CellCoord::new(index, offset),
                    Axis::Column => CellCoord::new(offset, index),
                };
                self.arena_index(at)
            })
            .collect()
    }

    pub(crate) fn arena_index(&self, at: CellCoord) -> Option<usize> {
        slot_index(self.size, at).map(|slot| self.slots[slot])
    }

    pub(crate) fn arena_cell(&self, index: usize) -> &Cell {
        &self.cells[index]
    }

    pub(crate) fn arena_cell_mut(&mut self, index: usize) -> &mut Cell {
        &mut self.cells[index]
    }

    /// Borrows two distinct arena cells mutably.
    pub(crate) fn arena_pair_mut(&mut self, first: usize, second: usize) -> (&mut Cell, &mut Cell) {
        debug_assert_ne!(first, second, "arena_pair_mut requires distinct cells");
        if first < second {
            let (head, tail) = self.cells.split_at_mut(second);
            (&mut head[first], &mut tail[0])
        } else {
            let (head, tail) = self.cells.split_at_mut(first);
            (&mut tail[0], &mut head[second])
        }
    }

    pub(crate) fn arena_cells(&self) -> &[Cell] {
        &self.cells
    }
}

fn slot_capacity(size: u32) -> usize {
    let size = size as usize;
    size * size
}

fn slot_index(size: u32, at: CellCoord) -> Option<usize> {
    if at.row() < size && at.column() < size {
        let row = usize::try_from(at.row()).ok()?;
        let column = usize::try_from(at.column()).ok()?;
        let width = usize::try_from(size).ok()?;
        Some(row * width + column)
    } else {
        None
    }
}
