#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tilemerge engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative game session, and pure systems. Adapters submit [`Command`]
//! values describing desired mutations, the session executes those commands
//! via its `apply` entry point, and then broadcasts [`Event`] values that a
//! presentation layer renders however it likes. Systems query immutable
//! snapshots such as [`BoardView`] and respond exclusively with new commands.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

mod config;
mod error;

pub use config::{
    GameConfig, DEFAULT_GRID_SIZE, DEFAULT_INITIAL_TILES, DEFAULT_SCORE_MULTIPLIER,
    DEFAULT_SETTLE_WINDOW_MS, DEFAULT_TWO_PROBABILITY, MAX_GRID_SIZE,
};
pub use error::GameError;

/// Value stored by a cell that holds no tile.
pub const EMPTY_TILE: u32 = 0;

/// Commands that express all permissible session mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Slides every tile on the board toward the provided direction.
    Move {
        /// Direction the player requested.
        direction: Direction,
    },
    /// Advances the settle clock by the provided delta time.
    Advance {
        /// Duration of presentation time that elapsed since the previous advance.
        dt: Duration,
    },
    /// Signals that the presentation layer finished rendering the last move.
    Settle,
    /// Places a new tile into an empty cell.
    SpawnTile {
        /// Cell that receives the tile.
        cell: CellCoord,
        /// Value of the new tile, either 2 or 4.
        value: u32,
    },
}

/// Events broadcast by the session after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a new tile appeared on the board.
    TileSpawned {
        /// Identifier of the cell that now carries the tile.
        cell: CellId,
        /// Position of the new tile.
        at: CellCoord,
        /// Value assigned to the tile.
        value: u32,
    },
    /// Reports that a tile slid to a new position, possibly merging on arrival.
    TileMoved {
        /// Identifier of the cell that moved.
        cell: CellId,
        /// Position the tile occupied when the move started.
        from: CellCoord,
        /// Position the tile occupies after the move was committed.
        to: CellCoord,
        /// Whether the tile absorbed an equal neighbour during the move.
        merged: bool,
        /// Value of the tile after the move.
        value: u32,
    },
    /// Reports that a tile was consumed by a merge and left the board.
    TileAbsorbed {
        /// Identifier of the cell whose tile disappeared.
        cell: CellId,
        /// Position the tile occupied when the move started.
        from: CellCoord,
        /// Position of the surviving tile it merged into.
        into: CellCoord,
    },
    /// Announces that the score increased.
    ScoreChanged {
        /// Points awarded by the committed move.
        delta: u64,
        /// Score after applying the delta.
        total: u64,
    },
    /// Announces that the session entered a new state.
    StateChanged {
        /// State that became active.
        state: SessionState,
    },
    /// Reports that a move request left the board untouched.
    MoveIgnored {
        /// Direction that was requested.
        direction: Direction,
        /// Specific reason the move was ignored.
        reason: MoveRejection,
    },
    /// Announces that no further moves are possible.
    GameOver {
        /// Final score of the session.
        score: u64,
    },
}

/// Lifecycle of a game session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    /// Accepting input.
    Ready,
    /// A committed move is settling in the presentation layer.
    Resolving,
    /// Terminal state; no further moves are accepted.
    Over,
}

/// Reasons a move request may be ignored by the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveRejection {
    /// The previous move has not settled yet.
    Resolving,
    /// The game already ended.
    GameOver,
    /// No tile could slide or merge in the requested direction.
    NoChange,
}

/// The four canonical moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Tiles slide toward column 0.
    Left,
    /// Tiles slide toward the last column.
    Right,
    /// Tiles slide toward row 0.
    Up,
    /// Tiles slide toward the last row.
    Down,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Direction; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];

    /// Builds the direction that slides lines of `axis`, optionally reversed.
    #[must_use]
    pub const fn from_axis(axis: Axis, reverse: bool) -> Self {
        match (axis, reverse) {
            (Axis::Row, false) => Self::Left,
            (Axis::Row, true) => Self::Right,
            (Axis::Column, false) => Self::Up,
            (Axis::Column, true) => Self::Down,
        }
    }

    /// Axis whose lines are processed by this direction.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Row,
            Self::Up | Self::Down => Axis::Column,
        }
    }

    /// Whether tiles travel toward the highest index of each line.
    #[must_use]
    pub const fn is_reversed(self) -> bool {
        matches!(self, Self::Right | Self::Down)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::Up => "up",
            Self::Down => "down",
        };
        f.write_str(label)
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "left" | "l" | "west" => Ok(Self::Left),
            "right" | "r" | "east" => Ok(Self::Right),
            "up" | "u" | "north" => Ok(Self::Up),
            "down" | "d" | "south" => Ok(Self::Down),
            _ => Err(GameError::InvalidDirection {
                input: input.to_owned(),
            }),
        }
    }
}

/// Orientation of the lines a move processes.
///
/// [`Axis::Row`] processes every row independently (horizontal moves) and
/// [`Axis::Column`] processes every column (vertical moves).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Lines are rows; tiles travel along columns.
    Row,
    /// Lines are columns; tiles travel along rows.
    Column,
}

/// Stable identifier assigned to every cell of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellId(u32);

impl CellId {
    /// Creates a new cell identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a single grid cell expressed as row and column indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }
}

/// Reports whether `value` may be stored in a cell.
///
/// Zero marks an empty cell; every other value must be a power of two no
/// smaller than 2.
#[must_use]
pub const fn is_valid_tile_value(value: u32) -> bool {
    value == EMPTY_TILE || (value >= 2 && value.is_power_of_two())
}

/// Read-only snapshot of tile values in row-major order.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BoardView {
    size: u32,
    values: Vec<u32>,
}

impl BoardView {
    /// Captures a new board view from row-major values of a `size`×`size` grid.
    #[must_use]
    pub fn new(size: u32, values: Vec<u32>) -> Self {
        debug_assert_eq!(values.len(), (size as usize) * (size as usize));
        Self { size, values }
    }

    /// Number of rows (and columns) of the board.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// Returns the value stored at the provided cell, if it lies on the board.
    #[must_use]
    pub fn value(&self, cell: CellCoord) -> Option<u32> {
        self.index(cell)
            .and_then(|index| self.values.get(index).copied())
    }

    /// Reports whether the cell lies on the board and holds no tile.
    #[must_use]
    pub fn is_empty(&self, cell: CellCoord) -> bool {
        self.value(cell) == Some(EMPTY_TILE)
    }

    /// Enumerates every empty cell in row-major order.
    #[must_use]
    pub fn empty_cells(&self) -> Vec<CellCoord> {
        self.coords().filter(|cell| self.is_empty(*cell)).collect()
    }

    /// Number of cells holding a tile.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.values.iter().filter(|value| **value != EMPTY_TILE).count()
    }

    /// Row-major slice of every value.
    #[must_use]
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Copies the board into one vector per row.
    #[must_use]
    pub fn rows(&self) -> Vec<Vec<u32>> {
        self.values
            .chunks(self.size.max(1) as usize)
            .map(<[u32]>::to_vec)
            .collect()
    }

    fn coords(&self) -> impl Iterator<Item = CellCoord> + '_ {
        (0..self.size).flat_map(move |row| {
            (0..self.size).map(move |column| CellCoord::new(row, column))
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.row() < self.size && cell.column() < self.size {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.size).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
