use anyhow::Result;
use tracing::{debug, warn};

use crate::{
    components::{Amenity, AmenityCredits, TileCategory, TileId},
    engine::{PassContext, System},
    world::Grid,
};

/// Spreads amenity influence along road chains.
///
/// Each amenity walks outwards ring by ring over Road tiles only, up to its
/// category's range. A road earns one point per amenity category no matter
/// how many amenities of that category reach it, or by how many paths.
pub struct InfluenceSystem;

impl InfluenceSystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InfluenceSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for InfluenceSystem {
    fn name(&self) -> &str {
        "influence"
    }

    fn run(&mut self, ctx: &PassContext, grid: &mut Grid) -> Result<()> {
        let amenities: Vec<(TileId, Amenity)> = grid
            .tiles()
            .iter()
            .filter_map(|tile| tile.category.amenity().map(|amenity| (tile.id, amenity)))
            .collect();

        let mut state = Propagation::new(grid.tile_count());
        for &(id, amenity) in &amenities {
            if let Err(err) = grid.position(id) {
                warn!(scenario = ctx.scenario_name, tile = id, %err, "amenity skipped");
                continue;
            }
            let range = ctx.scoring.range_for(amenity);
            let credited = expand(grid, &mut state, id, amenity, range);
            debug!(tile = id, ?amenity, range, credited, "amenity expanded");
        }

        grid.totals.amenities = amenities.len() as u32;
        grid.totals.roads_scored = grid
            .tiles()
            .iter()
            .filter(|tile| tile.is(TileCategory::Road) && tile.score > 0)
            .count() as u32;
        Ok(())
    }
}

/// Transient bookkeeping for one pass.
///
/// Credits live for the whole pass. Visits are stamped with the current
/// amenity's generation, so bumping the generation forgets them.
struct Propagation {
    credits: Vec<AmenityCredits>,
    stamps: Vec<u32>,
    generation: u32,
}

impl Propagation {
    fn new(tile_count: u32) -> Self {
        Self {
            credits: vec![AmenityCredits::empty(); tile_count as usize],
            stamps: vec![0; tile_count as usize],
            generation: 0,
        }
    }

    fn begin_amenity(&mut self) {
        self.generation += 1;
    }

    /// Returns true the first time `id` is reached by the current amenity.
    fn visit(&mut self, id: TileId) -> bool {
        let stamp = &mut self.stamps[id as usize];
        if *stamp == self.generation {
            false
        } else {
            *stamp = self.generation;
            true
        }
    }

    /// Returns true if `id` had not yet been credited for `amenity`.
    fn credit(&mut self, id: TileId, amenity: Amenity) -> bool {
        let credits = &mut self.credits[id as usize];
        if credits.contains(amenity.credit()) {
            false
        } else {
            credits.insert(amenity.credit());
            true
        }
    }
}

fn expand(
    grid: &mut Grid,
    state: &mut Propagation,
    source: TileId,
    amenity: Amenity,
    range: u32,
) -> u32 {
    state.begin_amenity();
    state.visit(source);

    let mut ring: Vec<TileId> = grid
        .neighbors_of_category(source, TileCategory::Road)
        .filter(|&road| state.visit(road))
        .collect();
    let mut credited = 0;

    for step in 0..range {
        if ring.is_empty() {
            break;
        }
        for &road in &ring {
            if state.credit(road, amenity) {
                grid.tiles[road as usize].score += 1;
                credited += 1;
            }
        }
        if step + 1 == range {
            break;
        }

        // Roads already credited still carry influence further out.
        let mut next = Vec::new();
        for &road in &ring {
            for neighbor in grid.neighbors_of_category(road, TileCategory::Road) {
                if state.visit(neighbor) {
                    next.push(neighbor);
                }
            }
        }
        ring = next;
    }
    credited
}
