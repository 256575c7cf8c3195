use anyhow::Result;

use crate::{
    engine::{PassContext, System},
    world::{Grid, ScoreTotals},
};

/// Zeroes every score so the pass starts from a clean slate.
pub struct ResetSystem;

impl ResetSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResetSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ResetSystem {
    fn name(&self) -> &str {
        "reset"
    }

    fn run(&mut self, _ctx: &PassContext, grid: &mut Grid) -> Result<()> {
        for tile in grid.tiles.iter_mut() {
            tile.score = 0;
        }
        grid.totals = ScoreTotals::default();
        Ok(())
    }
}
