//! One player's running town: a grid, the engine that scores it and a save slot
//!
//! Every mutation is followed by a full scoring pass, so readers never see
//! stale scores.

use thiserror::Error;
use tracing::info;

use crate::{
    components::{TileCategory, TileId},
    engine::{Engine, PassSummary},
    presentation::{self, GridFrame},
    scenario::Scenario,
    snapshot::SaveState,
    world::{Grid, GridError},
};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("nothing has been saved yet")]
    NothingSaved,
    #[error("{0:#}")]
    Pass(#[from] anyhow::Error),
}

pub struct Session {
    grid: Grid,
    engine: Engine,
    saved: Option<SaveState>,
    last_summary: Option<PassSummary>,
}

impl Session {
    /// Wrap an existing grid and score it once.
    pub fn new(grid: Grid, engine: Engine) -> Result<Self, SessionError> {
        let mut session = Self {
            grid,
            engine,
            saved: None,
            last_summary: None,
        };
        session.rescore()?;
        Ok(session)
    }

    pub fn from_scenario(scenario: &Scenario) -> Result<Self, SessionError> {
        let grid = scenario.build_grid()?;
        Self::new(grid, Engine::standard(scenario.engine_settings()))
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn scenario_name(&self) -> &str {
        self.engine.scenario_name()
    }

    pub fn last_summary(&self) -> Option<&PassSummary> {
        self.last_summary.as_ref()
    }

    pub fn saved(&self) -> Option<&SaveState> {
        self.saved.as_ref()
    }

    pub fn rescore(&mut self) -> Result<&PassSummary, SessionError> {
        let summary = self.engine.run_pass(&mut self.grid)?;
        Ok(&*self.last_summary.insert(summary))
    }

    /// Step a tile to the next category in the cycle.
    pub fn advance_tile(&mut self, id: TileId) -> Result<TileCategory, SessionError> {
        let next = self.grid.category(id)?.advanced();
        self.set_category(id, next)?;
        Ok(next)
    }

    pub fn reset_tile(&mut self, id: TileId) -> Result<(), SessionError> {
        self.set_category(id, TileCategory::Nothing)
    }

    pub fn set_category(&mut self, id: TileId, category: TileCategory) -> Result<(), SessionError> {
        self.grid.set_category(id, category)?;
        self.rescore()?;
        Ok(())
    }

    /// Bump a tile's shown score by one, wrapping to zero past the cap.
    /// The next pass overwrites it.
    pub fn bump_score(&mut self, id: TileId) -> Result<u32, SessionError> {
        let cap = self.engine.scoring().score_cap;
        let tile = self.grid.tile_mut(id)?;
        tile.score = if tile.score >= cap { 0 } else { tile.score + 1 };
        Ok(tile.score)
    }

    pub fn save(&mut self) -> &SaveState {
        let state = SaveState::capture(self.engine.scenario_name(), &self.grid);
        info!(tiles = state.tiles.len(), "state saved");
        self.saved.insert(state)
    }

    /// Restore the save slot. A failed load leaves the grid untouched.
    pub fn load(&mut self) -> Result<(), SessionError> {
        let state = self.saved.clone().ok_or(SessionError::NothingSaved)?;
        self.load_state(&state)
    }

    pub fn load_state(&mut self, state: &SaveState) -> Result<(), SessionError> {
        state.apply(&mut self.grid)?;
        info!(tiles = state.tiles.len(), from = %state.scenario, "state loaded");
        self.rescore()?;
        Ok(())
    }

    pub fn frame(&self) -> GridFrame {
        presentation::frame(self.engine.scenario_name(), self.engine.passes(), &self.grid)
    }
}
