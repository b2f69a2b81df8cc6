//! Directional slide/merge algorithm.
//!
//! A move processes every line of the requested axis independently. Each line
//! is resolved through repeated passes: a pass scans adjacent pairs in travel
//! order and proposes at most one shift, either sliding a tile into the empty
//! slot ahead of it or merging it with an equal neighbour. The proposal is
//! applied immediately and the grid reindexed, and passes continue until one
//! proposes nothing. A tile therefore advances a single slot per pass, which
//! lets leftover tiles keep sliding after a merge without ever merging twice.

use tilemerge_core::{Axis, CellCoord, CellId, Direction};

use crate::{cell::Cell, grid::Grid};

/// A tile that changed position during a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    /// Cell that carries the tile.
    pub cell: CellId,
    /// Position at the start of the move.
    pub from: CellCoord,
    /// Position after the move.
    pub to: CellCoord,
    /// Whether the tile absorbed an equal neighbour.
    pub merged: bool,
    /// Tile value after the move.
    pub value: u32,
}

/// A tile consumed by a merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Absorption {
    /// Cell whose tile disappeared.
    pub cell: CellId,
    /// Position at the start of the move.
    pub from: CellCoord,
    /// Final position of the tile it merged into.
    pub into: CellCoord,
}

/// Everything a move changed, before the grid is committed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Moved tiles ordered by final position, row-major.
    pub transitions: Vec<Transition>,
    /// Consumed tiles ordered by the position they merged into.
    pub absorptions: Vec<Absorption>,
    /// Points earned by the move.
    pub score_delta: u64,
}

impl MoveOutcome {
    /// Reports whether any tile moved.
    #[must_use]
    pub fn changed(&self) -> bool {
        !self.transitions.is_empty()
    }
}

/// Executes moves against a grid it does not own.
#[derive(Clone, Copy, Debug)]
pub struct MoveEngine {
    score_multiplier: u64,
}

impl MoveEngine {
    /// Creates an engine awarding `score_multiplier` times the pre-merge value per merge.
    #[must_use]
    pub const fn new(score_multiplier: u64) -> Self {
        Self { score_multiplier }
    }

    /// Slides the grid toward `direction`.
    pub fn apply(&self, grid: &mut Grid, direction: Direction) -> MoveOutcome {
        self.move_along_axis(grid, direction.axis(), direction.is_reversed())
    }

    /// Resolves every line of `axis`, travelling toward the highest index when `reverse` is set.
    ///
    /// Cells are left dirty; the caller commits them once it has consumed the
    /// outcome.
    pub fn move_along_axis(&self, grid: &mut Grid, axis: Axis, reverse: bool) -> MoveOutcome {
        let origins: Vec<CellCoord> = grid.arena_cells().iter().map(Cell::coord).collect();
        let mut absorbed: Vec<(usize, usize)> = Vec::new();
        let mut score_delta = 0_u64;

        for line in 0..grid.size() {
            let gained = self.resolve_line(grid, axis, line, reverse, &mut absorbed);
            score_delta = score_delta.saturating_add(gained);
        }

        let mut transitions: Vec<Transition> = grid
            .arena_cells()
            .iter()
            .zip(origins.iter())
            .filter(|(cell, origin)| cell.is_dirty() && cell.coord() != **origin)
            .map(|(cell, origin)| Transition {
                cell: cell.id(),
                from: *origin,
                to: cell.coord(),
                merged: cell.combined_this_turn(),
                value: cell.value(),
            })
            .collect();
        transitions.sort_by_key(|transition| transition.to);

        let mut absorptions: Vec<Absorption> = absorbed
            .into_iter()
            .map(|(consumed, survivor)| Absorption {
                cell: grid.arena_cell(consumed).id(),
                from: origins[consumed],
                into: grid.arena_cell(survivor).coord(),
            })
            .collect();
        absorptions.sort_by_key(|absorption| (absorption.into, absorption.from));

        MoveOutcome {
            transitions,
            absorptions,
            score_delta,
        }
    }

    fn resolve_line(
        &self,
        grid: &mut Grid,
        axis: Axis,
        line: u32,
        reverse: bool,
        absorbed: &mut Vec<(usize, usize)>,
    ) -> u64 {
        let mut gained = 0_u64;
        loop {
            let mut order = grid.line(axis, line);
            if reverse {
                order.reverse();
            }
            let proposed = propose_shift(grid, axis, &order);
            if reverse {
                order.reverse();
            }

            for index in order {
                if grid.arena_cell(index).is_dirty() {
                    let points = self.transition(grid, index, absorbed);
                    gained = gained.saturating_add(points);
                }
            }

            if !proposed {
                return gained;
            }
        }
    }

    /// Moves a dirty cell into the slot it resolved to and reindexes the grid.
    fn transition(&self, grid: &mut Grid, index: usize, absorbed: &mut Vec<(usize, usize)>) -> u64 {
        let cell = grid.arena_cell(index);
        let target = cell.resolved_coords();
        if target == cell.coord() {
            return 0;
        }
        let Some(occupant) = grid.arena_index(target) else {
            return 0;
        };

        let (source, destination) = grid.arena_pair_mut(index, occupant);
        let merged = source.merge_into(destination);
        grid.reindex();

        match merged {
            Some(value) => {
                absorbed.push((occupant, index));
                u64::from(value).saturating_mul(self.score_multiplier)
            }
            None => 0,
        }
    }
}

/// Scans one pass over `order` and records at most one proposed shift.
fn propose_shift(grid: &mut Grid, axis: Axis, order: &[usize]) -> bool {
    for pair in order.windows(2) {
        let (earlier, later) = (pair[0], pair[1]);
        let ahead = grid.arena_cell(earlier);
        let behind = grid.arena_cell(later);

        let slides = !behind.is_empty() && ahead.is_empty();
        if slides || ahead.can_merge_with(behind) {
            let slot = along(axis, ahead.coord());
            grid.arena_cell_mut(later).push_pending_along(axis, slot);
            return true;
        }
    }
    false
}

fn along(axis: Axis, at: CellCoord) -> u32 {
    match axis {
        Axis::Row => at.column(),
        Axis::Column => at.row(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_row(values: &[u32]) -> Grid {
        let size = values.len();
        let mut rows: Vec<Vec<u32>> = vec![vec![0; size]; size];
        rows[0] = values.to_vec();
        let borrowed: Vec<&[u32]> = rows.iter().map(Vec::as_slice).collect();
        Grid::from_rows(&borrowed).expect("grid")
    }

    fn first_row_after(values: &[u32], direction: Direction) -> (Vec<u32>, MoveOutcome) {
        let mut grid = single_row(values);
        let outcome = MoveEngine::new(2).apply(&mut grid, direction);
        let _ = grid.commit_dirty();
        (grid.rows()[0].clone(), outcome)
    }

    #[test]
    fn pair_merges_toward_origin() {
        let (row, outcome) = first_row_after(&[2, 2, 0, 0], Direction::Left);
        assert_eq!(row, vec![4, 0, 0, 0]);
        assert_eq!(outcome.score_delta, 4);
    }

    #[test]
    fn leftover_tile_slides_without_triple_merge() {
        let (row, outcome) = first_row_after(&[2, 0, 2, 2], Direction::Left);
        assert_eq!(row, vec![4, 2, 0, 0]);
        assert_eq!(outcome.score_delta, 4);
    }

    #[test]
    fn three_equal_tiles_merge_the_leading_pair() {
        let (row, _) = first_row_after(&[2, 2, 2, 0], Direction::Left);
        assert_eq!(row, vec![4, 2, 0, 0]);

        let (row, _) = first_row_after(&[0, 2, 2, 2], Direction::Right);
        assert_eq!(row, vec![0, 0, 2, 4]);
    }

    #[test]
    fn merged_tile_does_not_merge_again() {
        let (row, outcome) = first_row_after(&[4, 0, 2, 2], Direction::Left);
        assert_eq!(row, vec![4, 4, 0, 0]);
        assert_eq!(outcome.score_delta, 4);
    }

    #[test]
    fn tile_slides_across_several_slots() {
        let (row, outcome) = first_row_after(&[0, 0, 0, 8], Direction::Left);
        assert_eq!(row, vec![8, 0, 0, 0]);
        assert_eq!(outcome.transitions.len(), 1);
        let transition = outcome.transitions[0];
        assert_eq!(transition.from, CellCoord::new(0, 3));
        assert_eq!(transition.to, CellCoord::new(0, 0));
        assert!(!transition.merged);
    }

    #[test]
    fn blocked_line_produces_no_transitions() {
        let (row, outcome) = first_row_after(&[2, 4, 8, 16], Direction::Left);
        assert_eq!(row, vec![2, 4, 8, 16]);
        assert!(!outcome.changed());
        assert_eq!(outcome.score_delta, 0);
    }

    #[test]
    fn absorption_points_at_surviving_tile() {
        let (_, outcome) = first_row_after(&[0, 2, 0, 2], Direction::Right);
        assert_eq!(outcome.absorptions.len(), 1);
        let absorption = outcome.absorptions[0];
        assert_eq!(absorption.into, CellCoord::new(0, 3));
        assert_eq!(absorption.from, CellCoord::new(0, 3));
        let survivor = outcome
            .transitions
            .iter()
            .find(|transition| transition.merged)
            .expect("merged transition");
        assert_eq!(survivor.from, CellCoord::new(0, 1));
        assert_eq!(survivor.to, CellCoord::new(0, 3));
        assert_eq!(survivor.value, 4);
    }
}
