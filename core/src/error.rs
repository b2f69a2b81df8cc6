//! Error type shared by every Tilemerge crate.

use thiserror::Error;

/// Failures reported by the engine.
///
/// None of these are expected during normal play. `InvalidDirection` stems
/// from adapter input and is recoverable; the rest indicate a caller or
/// engine bug.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    /// Move input that does not name one of the four canonical directions.
    #[error("unrecognised move direction `{input}`")]
    InvalidDirection {
        /// Raw input supplied by the adapter.
        input: String,
    },
    /// Attempt to store a value that is neither zero nor a power of two ≥ 2.
    #[error("{value} is not a valid tile value")]
    InvalidValue {
        /// Rejected value.
        value: u32,
    },
    /// A spawn was attempted while the board had no empty cell.
    #[error("cannot spawn a tile on a full board")]
    SpawnFailed,
    /// Grids must contain at least one cell and no more than `u32::MAX` cells.
    #[error("grid size must lie within 1..=65535, got {size}")]
    InvalidGridSize {
        /// Rejected size.
        size: u32,
    },
    /// Preset rows do not describe a square matrix.
    #[error("grid rows must form a square matrix")]
    MalformedGrid,
    /// Configuration values outside their permitted range.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the offending field.
        reason: String,
    },
}
