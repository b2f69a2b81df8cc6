//! Single grid slot and the per-move bookkeeping it carries.

use tilemerge_core::{is_valid_tile_value, Axis, CellCoord, CellId, GameError, EMPTY_TILE};

/// One slot of the board.
///
/// Besides its value a cell records the coordinates proposed for it while a
/// move resolves. Proposals accumulate in order and only the most recent one
/// is authoritative; they are discarded once the move is committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    id: CellId,
    row: u32,
    column: u32,
    value: u32,
    combined: bool,
    pending_rows: Vec<u32>,
    pending_columns: Vec<u32>,
}

impl Cell {
    /// Creates an empty cell positioned at `at`.
    #[must_use]
    pub fn empty(id: CellId, at: CellCoord) -> Self {
        Self {
            id,
            row: at.row(),
            column: at.column(),
            value: EMPTY_TILE,
            combined: false,
            pending_rows: Vec::new(),
            pending_columns: Vec::new(),
        }
    }

    /// Identifier assigned when the grid was built.
    #[must_use]
    pub const fn id(&self) -> CellId {
        self.id
    }

    /// Current position of the cell.
    #[must_use]
    pub const fn coord(&self) -> CellCoord {
        CellCoord::new(self.row, self.column)
    }

    /// Tile value, zero when the cell is empty.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.value
    }

    /// Reports whether the cell holds no tile.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.value == EMPTY_TILE
    }

    /// Whether this cell already absorbed a neighbour during the current move.
    #[must_use]
    pub const fn combined_this_turn(&self) -> bool {
        self.combined
    }

    /// Stores a new tile value.
    ///
    /// Values other than zero or a power of two no smaller than 2 are
    /// rejected with [`GameError::InvalidValue`] and leave the cell untouched.
    pub fn set_value(&mut self, value: u32) -> Result<(), GameError> {
        if !is_valid_tile_value(value) {
            return Err(GameError::InvalidValue { value });
        }
        self.value = value;
        Ok(())
    }

    /// Proposes a new row for the cell. Row 0 is a valid proposal.
    pub fn push_pending_row(&mut self, row: u32) {
        self.pending_rows.push(row);
    }

    /// Proposes a new column for the cell. Column 0 is a valid proposal.
    pub fn push_pending_column(&mut self, column: u32) {
        self.pending_columns.push(column);
    }

    /// Proposes the coordinate a tile travels along when lines of `axis` slide.
    pub fn push_pending_along(&mut self, axis: Axis, index: u32) {
        match axis {
            Axis::Row => self.push_pending_column(index),
            Axis::Column => self.push_pending_row(index),
        }
    }

    /// Reports whether any coordinate was proposed since the last commit.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.pending_rows.is_empty() || !self.pending_columns.is_empty()
    }

    /// Authoritative position for the current move.
    ///
    /// Each axis uses its latest proposal and falls back to the current
    /// coordinate when nothing was proposed.
    #[must_use]
    pub fn resolved_coords(&self) -> CellCoord {
        let row = self.pending_rows.last().copied().unwrap_or(self.row);
        let column = self.pending_columns.last().copied().unwrap_or(self.column);
        CellCoord::new(row, column)
    }

    /// Reports whether both cells hold the same tile and neither merged yet.
    #[must_use]
    pub fn can_merge_with(&self, other: &Cell) -> bool {
        !self.is_empty()
            && self.value == other.value
            && self.value <= u32::MAX / 2
            && !self.combined
            && !other.combined
    }

    /// Moves this cell into `target`'s slot.
    ///
    /// The two cells trade coordinates, so the previous occupant of the slot
    /// ends up where this cell came from. When both hold the same tile and
    /// neither merged this move, the target is emptied and this cell doubles.
    /// Returns the pre-merge value when a merge happened.
    pub fn merge_into(&mut self, target: &mut Cell) -> Option<u32> {
        std::mem::swap(&mut self.row, &mut target.row);
        std::mem::swap(&mut self.column, &mut target.column);

        if !self.can_merge_with(target) {
            return None;
        }

        let absorbed = self.value;
        target.value = EMPTY_TILE;
        target.reset();
        self.value = absorbed * 2;
        self.combined = true;
        Some(absorbed)
    }

    /// Makes the resolved position permanent and clears per-move state.
    pub fn commit(&mut self) {
        let resolved = self.resolved_coords();
        self.row = resolved.row();
        self.column = resolved.column();
        self.reset();
    }

    /// Clears pending proposals and the combined flag, keeping the value.
    pub fn reset(&mut self) {
        self.combined = false;
        self.pending_rows.clear();
        self.pending_columns.clear();
    }
}
