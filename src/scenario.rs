use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rand::seq::SliceRandom;
use serde::Deserialize;
use tracing::debug;

use crate::{
    components::TileCategory,
    config::{ConfigError, GridConfig, LoggingConfig, Placement, RandomFill, ScoringConfig},
    engine::EngineSettings,
    rng::RngManager,
    world::Grid,
};

fn default_seed() -> u64 {
    42
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_seed")]
    pub seed: u64,
    pub grid: GridConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub placements: Vec<Placement>,
    #[serde(default)]
    pub random_fill: Vec<RandomFill>,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario
            .validate()
            .with_context(|| format!("Invalid scenario {}", path.display()))?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.scoring.validate()?;
        let tile_count = self.grid.tile_count();
        if let Some(placement) = self.placements.iter().find(|p| p.index >= tile_count) {
            return Err(ConfigError::PlacementOutOfRange {
                index: placement.index,
                tile_count,
            });
        }
        if let Some(fill) = self.random_fill.iter().find(|f| f.percent > 100) {
            return Err(ConfigError::FillPercent(fill.percent));
        }
        Ok(())
    }

    /// Lay out the grid, then apply fixed placements followed by each random
    /// fill over whatever tiles are still empty.
    pub fn build_grid(&self) -> Result<Grid> {
        self.validate()?;
        let mut grid = Grid::generate(&self.grid, &self.scoring);
        for placement in &self.placements {
            grid.set_category(placement.index, placement.category)?;
        }

        let mut rng = RngManager::new(self.seed);
        for fill in &self.random_fill {
            let empty = grid.ids_of(TileCategory::Nothing);
            let amount = fill.amount(empty.len());
            let chosen: Vec<_> = empty
                .choose_multiple(rng.stream("placement"), amount)
                .copied()
                .collect();
            for id in chosen {
                grid.set_category(id, fill.category)?;
            }
            debug!(category = fill.category.label(), amount, "random fill placed");
        }
        Ok(grid)
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            scenario_name: self.name.clone(),
            scoring: self.scoring.clone(),
        }
    }
}
