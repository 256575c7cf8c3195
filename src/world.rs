use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::components::{Tile, TileCategory, TileId};
use crate::config::{GridConfig, NeighborStrategy, ScoringConfig};
use crate::spatial::{Adjacency, Cell, GridGeometry, Position};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("tile index {id} outside grid of {tile_count} tiles")]
    InvalidIndex { id: TileId, tile_count: u32 },
    #[error("tile {id} has no {component} component")]
    MissingComponent { id: TileId, component: &'static str },
    #[error("save holds {found} tiles but the grid has {expected}")]
    LoadSizeMismatch { expected: usize, found: usize },
}

/// Per-pass tallies written by the scoring systems.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreTotals {
    pub global_score: u64,
    pub roads_scored: u32,
    pub houses_scored: u32,
    pub amenities: u32,
}

/// The tile registry: every tile of one generated grid plus the
/// components the grid builder attached to them.
pub struct Grid {
    geometry: GridGeometry,
    pub(crate) tiles: Vec<Tile>,
    pub(crate) positions: HashMap<TileId, Position>,
    adjacency: Adjacency,
    pub(crate) totals: ScoreTotals,
}

impl Grid {
    /// Neighbour entries that fall outside the grid are dropped with a warning.
    pub fn new(
        geometry: GridGeometry,
        positions: HashMap<TileId, Position>,
        mut adjacency: Adjacency,
    ) -> Self {
        let dropped = adjacency.retain_within(geometry.tile_count());
        if dropped > 0 {
            warn!(dropped, tile_count = geometry.tile_count(), "out-of-range neighbours dropped");
        }
        let tiles = (0..geometry.tile_count()).map(Tile::new).collect();
        Self {
            geometry,
            tiles,
            positions,
            adjacency,
            totals: ScoreTotals::default(),
        }
    }

    /// Lay out a grid and connect it with the configured neighbour strategy.
    pub fn generate(grid: &GridConfig, scoring: &ScoringConfig) -> Self {
        let builder = grid.builder();
        let geometry = builder.geometry();
        let positions = builder.positions();
        let adjacency = match scoring.neighbor_strategy {
            NeighborStrategy::Geometric => {
                let radius = scoring
                    .neighbor_radius
                    .unwrap_or_else(|| builder.default_radius());
                Adjacency::geometric(geometry.tile_count(), &positions, radius)
            }
            NeighborStrategy::IndexDistance => Adjacency::index_distance(&geometry),
        };
        Self::new(geometry, positions, adjacency)
    }

    pub fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    pub fn tile_count(&self) -> u32 {
        self.geometry.tile_count()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn totals(&self) -> ScoreTotals {
        self.totals
    }

    pub fn global_score(&self) -> u64 {
        self.totals.global_score
    }

    pub fn tile(&self, id: TileId) -> Result<&Tile, GridError> {
        self.tiles.get(id as usize).ok_or(GridError::InvalidIndex {
            id,
            tile_count: self.tile_count(),
        })
    }

    pub(crate) fn tile_mut(&mut self, id: TileId) -> Result<&mut Tile, GridError> {
        let tile_count = self.tile_count();
        self.tiles
            .get_mut(id as usize)
            .ok_or(GridError::InvalidIndex { id, tile_count })
    }

    pub fn category(&self, id: TileId) -> Result<TileCategory, GridError> {
        self.tile(id).map(|tile| tile.category)
    }

    pub fn score(&self, id: TileId) -> Result<u32, GridError> {
        self.tile(id).map(|tile| tile.score)
    }

    /// Overwrite a tile's category. Scores are stale until the next pass.
    pub fn set_category(&mut self, id: TileId, category: TileCategory) -> Result<(), GridError> {
        self.tile_mut(id)?.category = category;
        Ok(())
    }

    pub fn set_cell(&mut self, cell: Cell, category: TileCategory) -> Result<(), GridError> {
        let id = self
            .geometry
            .cell_to_id(cell)
            .ok_or(GridError::InvalidIndex {
                id: cell.row.saturating_sub(1) * self.geometry.columns() + cell.col,
                tile_count: self.tile_count(),
            })?;
        self.set_category(id, category)
    }

    pub fn categories(&self) -> Vec<TileCategory> {
        self.tiles.iter().map(|tile| tile.category).collect()
    }

    pub fn ids_of(&self, category: TileCategory) -> Vec<TileId> {
        self.tiles
            .iter()
            .filter(|tile| tile.is(category))
            .map(|tile| tile.id)
            .collect()
    }

    pub fn position(&self, id: TileId) -> Result<Position, GridError> {
        self.positions
            .get(&id)
            .copied()
            .ok_or(GridError::MissingComponent {
                id,
                component: "position",
            })
    }

    /// Drop a tile's position, as a builder that failed to place it would.
    pub fn detach_position(&mut self, id: TileId) -> Option<Position> {
        self.positions.remove(&id)
    }

    pub fn neighbors(&self, id: TileId) -> &[TileId] {
        self.adjacency.neighbors(id)
    }

    /// One-step neighbours of `id` that currently hold `category`.
    pub fn neighbors_of_category(
        &self,
        id: TileId,
        category: TileCategory,
    ) -> impl Iterator<Item = TileId> + '_ {
        self.adjacency
            .neighbors(id)
            .iter()
            .copied()
            .filter(move |&n| {
                self.tiles
                    .get(n as usize)
                    .is_some_and(|tile| tile.is(category))
            })
    }

    /// Tiles of `category` reachable from `id` by the staggered-row index
    /// test at the given range, without walking through other tiles.
    pub fn tiles_in_index_range(
        &self,
        id: TileId,
        range: u32,
        category: TileCategory,
    ) -> Result<Vec<TileId>, GridError> {
        self.tile(id)?;
        Ok(self
            .tiles
            .iter()
            .filter(|tile| tile.id != id && tile.is(category))
            .filter(|tile| self.geometry.within_index_range(id, tile.id, range))
            .map(|tile| tile.id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{Engine, EngineSettings};
    use crate::spatial::Shape;

    fn square(rows: u32, columns: u32) -> Grid {
        Grid::generate(
            &GridConfig::new(Shape::Square, rows, columns),
            &ScoringConfig::default(),
        )
    }

    #[test]
    fn test_tiles_are_indexed_in_order() {
        let grid = square(3, 4);

        assert_eq!(grid.tile_count(), 12);
        for (index, tile) in grid.tiles().iter().enumerate() {
            assert_eq!(tile.id as usize, index);
            assert_eq!(tile.category, TileCategory::Nothing);
        }
    }

    #[test]
    fn test_invalid_index_leaves_grid_unchanged() {
        let mut grid = square(2, 2);

        let err = grid.set_category(4, TileCategory::Road).unwrap_err();
        assert_eq!(
            err,
            GridError::InvalidIndex {
                id: 4,
                tile_count: 4
            }
        );
        assert!(grid.ids_of(TileCategory::Road).is_empty());
        assert!(grid.set_cell(Cell { row: 3, col: 0 }, TileCategory::Road).is_err());
    }

    #[test]
    fn test_neighbors_of_category() {
        let mut grid = square(3, 3);
        grid.set_category(1, TileCategory::Road).unwrap();
        grid.set_category(3, TileCategory::Road).unwrap();
        grid.set_category(5, TileCategory::Park).unwrap();

        let roads: Vec<_> = grid.neighbors_of_category(4, TileCategory::Road).collect();
        assert_eq!(roads, vec![1, 3]);
    }

    #[test]
    fn test_tiles_in_index_range() {
        let mut grid = square(4, 4);
        for id in [2, 5, 8, 10, 15] {
            grid.set_category(id, TileCategory::Road).unwrap();
        }

        let near = grid.tiles_in_index_range(0, 2, TileCategory::Road).unwrap();
        assert_eq!(near, vec![2, 5, 8]);
        assert!(grid.tiles_in_index_range(16, 1, TileCategory::Road).is_err());
    }

    #[test]
    fn test_foreign_adjacency_is_trimmed() {
        let scoring = ScoringConfig::default();
        let large = GridConfig::new(Shape::Square, 3, 3).builder();
        let adjacency = Adjacency::geometric(9, &large.positions(), large.default_radius());
        let small = GridConfig::new(Shape::Square, 2, 2).builder();
        let mut grid = Grid::new(small.geometry(), small.positions(), adjacency);
        grid.set_category(0, TileCategory::Road).unwrap();
        grid.set_category(1, TileCategory::Park).unwrap();
        grid.set_category(3, TileCategory::Road).unwrap();

        assert!(grid.neighbors(1).iter().all(|&n| n < 4));
        let mut engine = Engine::standard(EngineSettings {
            scenario_name: "trimmed".into(),
            scoring,
        });
        engine.run_pass(&mut grid).unwrap();

        // Links to tiles 4 and up are gone; 1-0 and 0-3 remain.
        assert_eq!(grid.score(0).unwrap(), 1);
        assert_eq!(grid.score(3).unwrap(), 1);
    }

    #[test]
    fn test_missing_position_is_reported() {
        let mut grid = square(2, 2);
        grid.detach_position(2);

        assert_eq!(
            grid.position(2),
            Err(GridError::MissingComponent {
                id: 2,
                component: "position"
            })
        );
        assert!(grid.position(1).is_ok());
    }
}
