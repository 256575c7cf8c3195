use anyhow::Result;
use tracing::warn;

use crate::{
    components::{TileCategory, TileId},
    engine::{PassContext, System},
    world::Grid,
};

/// Gives every house the best score among its adjacent roads and sums the
/// house scores into the grid's global score.
pub struct HousingSystem;

impl HousingSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HousingSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for HousingSystem {
    fn name(&self) -> &str {
        "housing"
    }

    fn run(&mut self, ctx: &PassContext, grid: &mut Grid) -> Result<()> {
        let mut house_scores: Vec<(TileId, u32)> = Vec::new();
        for house in grid.ids_of(TileCategory::House) {
            if let Err(err) = grid.position(house) {
                warn!(scenario = ctx.scenario_name, tile = house, %err, "house skipped");
                continue;
            }
            let best = grid
                .neighbors_of_category(house, TileCategory::Road)
                .map(|road| grid.tiles[road as usize].score)
                .max()
                .unwrap_or(0);
            house_scores.push((house, best));
        }

        let mut global_score = 0u64;
        let mut houses_scored = 0u32;
        for (house, score) in house_scores {
            grid.tiles[house as usize].score = score;
            global_score += u64::from(score);
            if score > 0 {
                houses_scored += 1;
            }
        }
        grid.totals.global_score = global_score;
        grid.totals.houses_scored = houses_scored;
        Ok(())
    }
}
