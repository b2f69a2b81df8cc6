//! Session configuration assembled from a TOML file and command-line flags.

use std::{
    fs,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use tilemerge_core::GameConfig;

/// Individual fields supplied on the command line.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Overrides {
    pub(crate) grid_size: Option<u32>,
    pub(crate) two_probability: Option<f64>,
    pub(crate) score_multiplier: Option<u64>,
}

/// Reads the optional configuration file and applies the overrides on top.
pub(crate) fn load(path: Option<&Path>, overrides: &Overrides) -> Result<GameConfig> {
    let base = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            parse(&contents).with_context(|| format!("invalid config {}", path.display()))?
        }
        None => GameConfig::default(),
    };

    let config = apply(base, overrides);
    config.validate().context("invalid session configuration")?;
    Ok(config)
}

fn parse(contents: &str) -> Result<GameConfig> {
    Ok(toml::from_str(contents)?)
}

fn apply(config: GameConfig, overrides: &Overrides) -> GameConfig {
    GameConfig {
        grid_size: overrides.grid_size.unwrap_or(config.grid_size),
        two_probability: overrides.two_probability.unwrap_or(config.two_probability),
        score_multiplier: overrides.score_multiplier.unwrap_or(config.score_multiplier),
        ..config
    }
}

/// Seed derived from the wall clock for unseeded games.
pub(crate) fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or_default()
}
