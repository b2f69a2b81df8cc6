#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative game state management for Tilemerge.

use std::time::Duration;

use log::{debug, info, trace};
use tilemerge_core::{
    CellCoord, Command, Direction, Event, GameConfig, GameError, MoveRejection, SessionState,
};
use tilemerge_system_spawning::{Config as SpawnConfig, Spawning};

mod cell;
mod engine;
mod grid;

pub use cell::Cell;
pub use engine::{Absorption, MoveEngine, MoveOutcome, Transition};
pub use grid::Grid;

/// Represents one game from the opening spawns until no move remains.
#[derive(Debug)]
pub struct GameSession {
    config: GameConfig,
    grid: Grid,
    engine: MoveEngine,
    spawning: Spawning,
    score: u64,
    state: SessionState,
    settle_elapsed: Duration,
}

impl GameSession {
    /// Starts a new session on an empty board and spawns the opening tiles.
    pub fn start(
        config: GameConfig,
        seed: u64,
        out_events: &mut Vec<Event>,
    ) -> Result<Self, GameError> {
        config.validate()?;
        let grid = Grid::empty_of_size(config.grid_size)?;
        let mut session = Self::assemble(config, grid, seed);
        session.spawn(config.initial_tiles, out_events)?;
        let _ = session.evaluate_terminal(out_events);
        Ok(session)
    }

    /// Resumes play on a prepared board without spawning opening tiles.
    ///
    /// The configured grid size is replaced by the size of `grid` and the
    /// opening tile count by zero.
    pub fn with_grid(
        config: GameConfig,
        grid: Grid,
        seed: u64,
        out_events: &mut Vec<Event>,
    ) -> Result<Self, GameError> {
        let config = GameConfig {
            grid_size: grid.size(),
            initial_tiles: 0,
            ..config
        };
        config.validate()?;
        let mut session = Self::assemble(config, grid, seed);
        let _ = session.evaluate_terminal(out_events);
        Ok(session)
    }

    fn assemble(config: GameConfig, grid: Grid, seed: u64) -> Self {
        Self {
            engine: MoveEngine::new(config.score_multiplier),
            spawning: Spawning::new(SpawnConfig::new(config.two_probability, seed)),
            config,
            grid,
            score: 0,
            state: SessionState::Ready,
            settle_elapsed: Duration::ZERO,
        }
    }

    /// Applies a player move.
    ///
    /// Moves are ignored unless the session is ready. A move that changes the
    /// board is committed, scored, followed by exactly one spawn, and leaves
    /// the session resolving until the presentation layer settles it.
    pub fn apply_move(
        &mut self,
        direction: Direction,
        out_events: &mut Vec<Event>,
    ) -> Result<(), GameError> {
        let rejection = match self.state {
            SessionState::Ready => None,
            SessionState::Resolving => Some(MoveRejection::Resolving),
            SessionState::Over => Some(MoveRejection::GameOver),
        };
        if let Some(reason) = rejection {
            out_events.push(Event::MoveIgnored { direction, reason });
            return Ok(());
        }

        let outcome = self.engine.apply(&mut self.grid, direction);
        let changed = self.grid.commit_dirty();
        debug_assert_eq!(changed, outcome.changed());
        if !changed {
            debug!("move {direction} left the board unchanged");
            out_events.push(Event::MoveIgnored {
                direction,
                reason: MoveRejection::NoChange,
            });
            return Ok(());
        }

        self.state = SessionState::Resolving;
        self.settle_elapsed = Duration::ZERO;
        out_events.push(Event::StateChanged {
            state: SessionState::Resolving,
        });

        debug!(
            "move {direction}: {} transitions, {} merges, +{} points",
            outcome.transitions.len(),
            outcome.absorptions.len(),
            outcome.score_delta
        );
        for transition in &outcome.transitions {
            out_events.push(Event::TileMoved {
                cell: transition.cell,
                from: transition.from,
                to: transition.to,
                merged: transition.merged,
                value: transition.value,
            });
        }
        for absorption in &outcome.absorptions {
            out_events.push(Event::TileAbsorbed {
                cell: absorption.cell,
                from: absorption.from,
                into: absorption.into,
            });
        }

        if outcome.score_delta > 0 {
            self.score = self.score.saturating_add(outcome.score_delta);
            out_events.push(Event::ScoreChanged {
                delta: outcome.score_delta,
                total: self.score,
            });
        }

        if self.grid.has_empty_cell() {
            self.spawn(1, out_events)?;
        }

        if self.evaluate_terminal(out_events) {
            return Ok(());
        }

        if self.config.settle_window().is_zero() {
            self.settle(out_events);
        }
        Ok(())
    }

    /// Marks the last move as rendered and re-enables input.
    pub fn settle(&mut self, out_events: &mut Vec<Event>) {
        if self.state != SessionState::Resolving {
            return;
        }
        self.state = SessionState::Ready;
        self.settle_elapsed = Duration::ZERO;
        out_events.push(Event::StateChanged {
            state: SessionState::Ready,
        });
    }

    /// Advances the settle clock, settling once the configured window elapsed.
    pub fn advance(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        if self.state != SessionState::Resolving {
            return;
        }
        self.settle_elapsed = self.settle_elapsed.saturating_add(dt);
        if self.settle_elapsed >= self.config.settle_window() {
            self.settle(out_events);
        }
    }

    /// Current score; never decreases.
    #[must_use]
    pub const fn score(&self) -> u64 {
        self.score
    }

    /// Reports whether the session reached its terminal state.
    #[must_use]
    pub fn is_game_over(&self) -> bool {
        self.state == SessionState::Over
    }

    /// Reports whether a move would currently be accepted.
    #[must_use]
    pub fn can_move(&self) -> bool {
        self.state == SessionState::Ready
    }

    /// Places a tile chosen by the caller instead of the spawn policy.
    pub fn spawn_tile(
        &mut self,
        cell: CellCoord,
        value: u32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), GameError> {
        self.place(cell, value, out_events)?;
        let _ = self.evaluate_terminal(out_events);
        Ok(())
    }

    fn spawn(&mut self, count: u32, out_events: &mut Vec<Event>) -> Result<(), GameError> {
        let mut commands = Vec::new();
        self.spawning.handle(&self.grid.view(), count, &mut commands);
        if commands.len() < count as usize {
            return Err(GameError::SpawnFailed);
        }

        for command in commands {
            if let Command::SpawnTile { cell, value } = command {
                self.place(cell, value, out_events)?;
            }
        }
        Ok(())
    }

    fn place(
        &mut self,
        cell: CellCoord,
        value: u32,
        out_events: &mut Vec<Event>,
    ) -> Result<(), GameError> {
        let id = self.grid.place(cell, value)?;
        trace!("spawned {value} at {cell:?}");
        out_events.push(Event::TileSpawned {
            cell: id,
            at: cell,
            value,
        });
        Ok(())
    }

    /// Enters the terminal state when the board is full and nothing can merge.
    fn evaluate_terminal(&mut self, out_events: &mut Vec<Event>) -> bool {
        if self.state == SessionState::Over {
            return true;
        }
        if self.grid.has_empty_cell() || self.grid.has_adjacent_match() {
            return false;
        }

        self.state = SessionState::Over;
        info!(
            "game over with score {} and highest tile {}",
            self.score,
            self.grid.highest_tile()
        );
        out_events.push(Event::StateChanged {
            state: SessionState::Over,
        });
        out_events.push(Event::GameOver { score: self.score });
        true
    }
}

/// Applies the provided command to the session, mutating state deterministically.
pub fn apply(
    session: &mut GameSession,
    command: Command,
    out_events: &mut Vec<Event>,
) -> Result<(), GameError> {
    match command {
        Command::Move { direction } => session.apply_move(direction, out_events),
        Command::Advance { dt } => {
            session.advance(dt, out_events);
            Ok(())
        }
        Command::Settle => {
            session.settle(out_events);
            Ok(())
        }
        Command::SpawnTile { cell, value } => session.spawn_tile(cell, value, out_events),
    }
}

/// Query functions that provide read-only access to the session state.
pub mod query {
    use tilemerge_core::{BoardView, GameConfig, SessionState};

    use super::{GameSession, Grid};

    /// Current score; never decreases.
    #[must_use]
    pub fn score(session: &GameSession) -> u64 {
        session.score()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(session: &GameSession) -> SessionState {
        session.state
    }

    /// Reports whether the session reached its terminal state.
    #[must_use]
    pub fn is_game_over(session: &GameSession) -> bool {
        session.is_game_over()
    }

    /// Reports whether a move would currently be accepted.
    #[must_use]
    pub fn can_move(session: &GameSession) -> bool {
        session.can_move()
    }

    /// Provides read-only access to the grid.
    #[must_use]
    pub fn grid(session: &GameSession) -> &Grid {
        &session.grid
    }

    /// Captures the tile values as an immutable snapshot.
    #[must_use]
    pub fn board_view(session: &GameSession) -> BoardView {
        session.grid.view()
    }

    /// Largest tile on the board.
    #[must_use]
    pub fn highest_tile(session: &GameSession) -> u32 {
        session.grid.highest_tile()
    }

    /// Configuration the session was built with.
    #[must_use]
    pub fn config(session: &GameSession) -> &GameConfig {
        &session.config
    }
}
