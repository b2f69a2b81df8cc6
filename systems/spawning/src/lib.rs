#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting tile spawn commands.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tilemerge_core::{BoardView, CellCoord, Command, DEFAULT_TWO_PROBABILITY};

const SMALL_TILE: u32 = 2;
const LARGE_TILE: u32 = 4;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    two_probability: f64,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided tile odds and seed.
    ///
    /// Probabilities outside `0.0..=1.0` are clamped; NaN falls back to the
    /// default odds.
    #[must_use]
    pub fn new(two_probability: f64, rng_seed: u64) -> Self {
        let two_probability = if two_probability.is_nan() {
            DEFAULT_TWO_PROBABILITY
        } else {
            two_probability.clamp(0.0, 1.0)
        };
        Self {
            two_probability,
            rng_seed,
        }
    }
}

/// Pure system that picks where new tiles appear and what they are worth.
#[derive(Debug)]
pub struct Spawning {
    two_probability: f64,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            two_probability: config.two_probability,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Emits up to `count` spawn commands targeting distinct empty cells.
    ///
    /// Fewer commands are emitted when the board runs out of empty cells.
    pub fn handle(&mut self, board: &BoardView, count: u32, out: &mut Vec<Command>) {
        let mut claimed: Vec<CellCoord> = Vec::new();
        let available = board.empty_cells().len();

        for _ in 0..count {
            if claimed.len() >= available {
                return;
            }
            let cell = self.select_cell(board, &claimed);
            let value = self.next_value();
            claimed.push(cell);
            out.push(Command::SpawnTile { cell, value });
        }
    }

    /// Rejection-samples positions until an unclaimed empty one turns up.
    ///
    /// Callers guarantee that such a cell exists.
    fn select_cell(&mut self, board: &BoardView, claimed: &[CellCoord]) -> CellCoord {
        let size = board.size();
        loop {
            let row = self.rng.gen_range(0..size);
            let column = self.rng.gen_range(0..size);
            let cell = CellCoord::new(row, column);
            if board.is_empty(cell) && !claimed.contains(&cell) {
                return cell;
            }
        }
    }

    fn next_value(&mut self) -> u32 {
        if self.rng.gen_bool(self.two_probability) {
            SMALL_TILE
        } else {
            LARGE_TILE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_clamps_probability() {
        assert!((Config::new(1.5, 0).two_probability - 1.0).abs() < f64::EPSILON);
        assert!(Config::new(-0.5, 0).two_probability.abs() < f64::EPSILON);
        assert!(
            (Config::new(f64::NAN, 0).two_probability - DEFAULT_TWO_PROBABILITY).abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn full_board_emits_nothing() {
        let mut spawning = Spawning::new(Config::new(0.7, 1));
        let board = BoardView::new(2, vec![2, 4, 8, 16]);
        let mut commands = Vec::new();
        spawning.handle(&board, 1, &mut commands);
        assert!(commands.is_empty());
    }
}
