use std::collections::HashMap;

use tracing::warn;

use super::{GridGeometry, Position};
use crate::components::TileId;

/// Precomputed one-step neighbour lists, indexed by tile id.
///
/// Lists are sorted ascending so every traversal over them is deterministic.
#[derive(Debug, Clone, Default)]
pub struct Adjacency {
    lists: Vec<Vec<TileId>>,
}

impl Adjacency {
    /// Tiles whose centres lie within `radius` of each other are neighbours.
    /// Tiles without a position get no neighbours and are reported once.
    pub fn geometric(
        tile_count: u32,
        positions: &HashMap<TileId, Position>,
        radius: f32,
    ) -> Self {
        let mut lists = vec![Vec::new(); tile_count as usize];
        for source in 0..tile_count {
            let Some(origin) = positions.get(&source) else {
                warn!(tile = source, "tile has no position; excluded from neighbour search");
                continue;
            };
            lists[source as usize] = (0..tile_count)
                .filter(|&target| target != source)
                .filter(|target| {
                    positions
                        .get(target)
                        .is_some_and(|pos| origin.distance(pos) <= radius)
                })
                .collect();
        }
        Self { lists }
    }

    /// Neighbours by the staggered-row index test at unit range.
    pub fn index_distance(geometry: &GridGeometry) -> Self {
        let tile_count = geometry.tile_count();
        let lists = (0..tile_count)
            .map(|source| {
                (0..tile_count)
                    .filter(|&target| {
                        target != source && geometry.within_index_range(source, target, 1)
                    })
                    .collect()
            })
            .collect();
        Self { lists }
    }

    pub fn neighbors(&self, id: TileId) -> &[TileId] {
        self.lists
            .get(id as usize)
            .map(|list| list.as_slice())
            .unwrap_or(&[])
    }

    /// Cut the lists down to a grid of `tile_count` tiles, dropping entries
    /// that point outside it or back at their own tile. Returns how many
    /// entries of the kept lists were dropped.
    pub fn retain_within(&mut self, tile_count: u32) -> usize {
        self.lists.truncate(tile_count as usize);
        let mut dropped = 0;
        for (source, list) in self.lists.iter_mut().enumerate() {
            let before = list.len();
            list.retain(|&target| target < tile_count && target as usize != source);
            dropped += before - list.len();
        }
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{GridBuilder, Shape};

    fn geometric_for(builder: &GridBuilder) -> Adjacency {
        let geometry = builder.geometry();
        Adjacency::geometric(
            geometry.tile_count(),
            &builder.positions(),
            builder.default_radius(),
        )
    }

    #[test]
    fn interior_neighbour_counts_per_shape() {
        let square = GridBuilder::new(Shape::Square, 5, 5).with_gutter(0.1);
        assert_eq!(geometric_for(&square).neighbors(12).len(), 4);

        let triangle = GridBuilder::new(Shape::Triangle, 5, 5).with_gutter(0.1);
        assert_eq!(geometric_for(&triangle).neighbors(12).len(), 3);

        let hexagon = GridBuilder::new(Shape::Hexagon, 5, 5).with_gutter(0.1);
        assert_eq!(geometric_for(&hexagon).neighbors(12).len(), 6);
    }

    #[test]
    fn corner_of_square_grid_has_two_neighbours() {
        let square = GridBuilder::new(Shape::Square, 3, 4);
        assert_eq!(geometric_for(&square).neighbors(0), &[1, 4]);
    }

    #[test]
    fn hexagon_geometry_matches_index_distance() {
        for gutter in [0.0, 0.1] {
            let hexagon = GridBuilder::new(Shape::Hexagon, 6, 7).with_gutter(gutter);
            let geometric = geometric_for(&hexagon);
            let indexed = Adjacency::index_distance(&hexagon.geometry());
            for id in 0..hexagon.geometry().tile_count() {
                assert_eq!(geometric.neighbors(id), indexed.neighbors(id), "tile {id}");
            }
        }
    }

    #[test]
    fn missing_position_isolates_tile() {
        let square = GridBuilder::new(Shape::Square, 2, 2);
        let mut positions = square.positions();
        positions.remove(&3);
        let adjacency = Adjacency::geometric(4, &positions, square.default_radius());

        assert!(adjacency.neighbors(3).is_empty());
        assert_eq!(adjacency.neighbors(1), &[0]);
        assert!(adjacency.neighbors(99).is_empty());
    }

    #[test]
    fn retain_within_drops_foreign_entries() {
        let large = GridBuilder::new(Shape::Square, 3, 3);
        let mut adjacency = geometric_for(&large);

        // Tile 1 of a 3x3 grid sees 0, 2 and 4; tile 4 is gone after the cut.
        let dropped = adjacency.retain_within(4);
        assert_eq!(dropped, 4);
        assert_eq!(adjacency.neighbors(1), &[0, 2]);
        assert_eq!(adjacency.neighbors(3), &[0]);
        assert!(adjacency.neighbors(4).is_empty());
        for id in 0..4 {
            assert!(adjacency.neighbors(id).iter().all(|&n| n < 4));
        }
    }
}
