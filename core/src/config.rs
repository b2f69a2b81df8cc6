//! Session configuration recognised by the engine.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Board edge length used when none is configured.
pub const DEFAULT_GRID_SIZE: u32 = 4;
/// Probability that a spawned tile is a 2 rather than a 4.
pub const DEFAULT_TWO_PROBABILITY: f64 = 0.7;
/// Factor applied to the pre-merge tile value when awarding points.
pub const DEFAULT_SCORE_MULTIPLIER: u64 = 2;
/// Time the presentation layer is given to animate a move, in milliseconds.
pub const DEFAULT_SETTLE_WINDOW_MS: u64 = 150;
/// Tiles spawned when a session starts.
pub const DEFAULT_INITIAL_TILES: u32 = 2;
/// Largest board edge whose cell count still fits in a `u32`.
pub const MAX_GRID_SIZE: u32 = 65_535;

/// Tunables supplied when a session is constructed.
///
/// Every field falls back to its default when omitted from a serialized
/// configuration, so a TOML file only needs the keys it overrides.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Edge length of the square board.
    pub grid_size: u32,
    /// Probability that a spawned tile is a 2; otherwise a 4 appears.
    pub two_probability: f64,
    /// Multiplier applied to the pre-merge value of every merged tile.
    pub score_multiplier: u64,
    /// Settle window granted to the presentation layer after each move.
    pub settle_window_ms: u64,
    /// Number of tiles spawned before the first move.
    pub initial_tiles: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            two_probability: DEFAULT_TWO_PROBABILITY,
            score_multiplier: DEFAULT_SCORE_MULTIPLIER,
            settle_window_ms: DEFAULT_SETTLE_WINDOW_MS,
            initial_tiles: DEFAULT_INITIAL_TILES,
        }
    }
}

impl GameConfig {
    /// Settle window expressed as a [`Duration`].
    #[must_use]
    pub const fn settle_window(&self) -> Duration {
        Duration::from_millis(self.settle_window_ms)
    }

    /// Number of cells on a board of the configured size.
    #[must_use]
    pub const fn cell_count(&self) -> u64 {
        self.grid_size as u64 * self.grid_size as u64
    }

    /// Checks that every field lies within its permitted range.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.grid_size == 0 || self.grid_size > MAX_GRID_SIZE {
            return Err(GameError::InvalidGridSize {
                size: self.grid_size,
            });
        }

        if !(0.0..=1.0).contains(&self.two_probability) {
            return Err(GameError::InvalidConfig {
                reason: format!(
                    "two_probability must lie within 0.0..=1.0, got {}",
                    self.two_probability
                ),
            });
        }

        if self.score_multiplier == 0 {
            return Err(GameError::InvalidConfig {
                reason: "score_multiplier must be positive".to_owned(),
            });
        }

        if u64::from(self.initial_tiles) > self.cell_count() {
            return Err(GameError::InvalidConfig {
                reason: format!(
                    "initial_tiles ({}) exceeds the {} cells of the board",
                    self.initial_tiles,
                    self.cell_count()
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 4);
        assert!((config.two_probability - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.score_multiplier, 2);
        assert_eq!(config.settle_window(), Duration::from_millis(150));
        assert_eq!(config.initial_tiles, 2);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let config: GameConfig = toml::from_str("grid_size = 5\nsettle_window_ms = 0\n")
            .expect("config parses");
        assert_eq!(config.grid_size, 5);
        assert_eq!(config.settle_window_ms, 0);
        assert_eq!(config.score_multiplier, DEFAULT_SCORE_MULTIPLIER);
    }

    #[test]
    fn rejects_zero_grid_size() {
        let config = GameConfig {
            grid_size: 0,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(GameError::InvalidGridSize { size: 0 })
        );
    }

    #[test]
    fn rejects_grid_size_whose_cell_count_overflows() {
        let config = GameConfig {
            grid_size: 70_000,
            ..GameConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(GameError::InvalidGridSize { size: 70_000 })
        );

        let largest = GameConfig {
            grid_size: MAX_GRID_SIZE,
            ..GameConfig::default()
        };
        assert_eq!(largest.validate(), Ok(()));
    }

    #[test]
    fn rejects_probability_outside_unit_interval() {
        let config = GameConfig {
            two_probability: 1.5,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn rejects_more_initial_tiles_than_cells() {
        let config = GameConfig {
            grid_size: 1,
            initial_tiles: 2,
            ..GameConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(GameError::InvalidConfig { .. })
        ));
    }
}
