//! Spatial model - flat tile indices on a row-major grid

mod layout;
mod neighbors;

pub use layout::{GridBuilder, Position, Shape};
pub use neighbors::Adjacency;

use serde::{Deserialize, Serialize};

use crate::components::TileId;

/// Row/column address of a tile. Rows are 1-based, columns 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub row: u32,
    pub col: u32,
}

/// Index arithmetic for a grid with a fixed column count.
///
/// Rows are counted from 1 (`row_of(0) == 1`), and every parity test in this
/// module refers to that 1-based row number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    rows: u32,
    columns: u32,
}

impl GridGeometry {
    pub fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn tile_count(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    pub fn contains(&self, id: TileId) -> bool {
        id < self.tile_count()
    }

    pub fn row_of(&self, id: TileId) -> u32 {
        (id + self.columns) / self.columns
    }

    pub fn col_of(&self, id: TileId) -> u32 {
        id % self.columns
    }

    /// Convert a cell to its flat index
    pub fn cell_to_id(&self, cell: Cell) -> Option<TileId> {
        if cell.row >= 1 && cell.row <= self.rows && cell.col < self.columns {
            Some((cell.row - 1) * self.columns + cell.col)
        } else {
            None
        }
    }

    /// Convert a flat index to its cell
    pub fn id_to_cell(&self, id: TileId) -> Option<Cell> {
        if self.contains(id) {
            Some(Cell {
                row: self.row_of(id),
                col: self.col_of(id),
            })
        } else {
            None
        }
    }

    /// Half the row separation, rounded down. Staggered rows let a path
    /// gain one column of slack every two rows.
    pub fn extra_range(&self, a: TileId, b: TileId) -> u32 {
        self.row_of(a).abs_diff(self.row_of(b)) / 2
    }

    /// Index-distance reachability on a row-staggered lattice.
    ///
    /// An odd row separation gets one extra step of allowance towards the
    /// side the source row is offset to: leftwards from even rows,
    /// rightwards from odd rows.
    pub fn within_index_range(&self, source: TileId, target: TileId, range: u32) -> bool {
        let d_row = self.row_of(source).abs_diff(self.row_of(target));
        let d_col = self.col_of(source).abs_diff(self.col_of(target));
        if d_row > range || d_col > range {
            return false;
        }

        let steps = d_row + d_col;
        let limit = range + self.extra_range(source, target);
        if d_row % 2 == 0 {
            return steps <= limit;
        }

        let source_row_even = self.row_of(source) % 2 == 0;
        let source_right_of_target = self.col_of(source) > self.col_of(target);
        let bonus = match (source_row_even, source_right_of_target) {
            (true, true) => 1,
            (true, false) => 0,
            (false, true) => 0,
            (false, false) => 1,
        };
        steps <= limit + bonus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_are_one_based() {
        let geometry = GridGeometry::new(4, 5);

        assert_eq!(geometry.row_of(0), 1);
        assert_eq!(geometry.row_of(4), 1);
        assert_eq!(geometry.row_of(5), 2);
        assert_eq!(geometry.row_of(19), 4);
        assert_eq!(geometry.col_of(7), 2);
    }

    #[test]
    fn test_cell_id_conversion() {
        let geometry = GridGeometry::new(4, 5);

        let cell = Cell { row: 3, col: 2 };
        let id = geometry.cell_to_id(cell).unwrap();
        assert_eq!(id, 12); // (3 - 1) * 5 + 2

        assert_eq!(geometry.id_to_cell(id), Some(cell));
        assert_eq!(geometry.id_to_cell(20), None);
        assert_eq!(geometry.cell_to_id(Cell { row: 0, col: 0 }), None);
        assert_eq!(geometry.cell_to_id(Cell { row: 1, col: 5 }), None);
    }

    #[test]
    fn test_extra_range() {
        let geometry = GridGeometry::new(6, 4);

        assert_eq!(geometry.extra_range(0, 1), 0);
        assert_eq!(geometry.extra_range(0, 4), 0);
        assert_eq!(geometry.extra_range(0, 8), 1);
        assert_eq!(geometry.extra_range(20, 1), 2);
    }

    #[test]
    fn test_unit_range_gives_six_hex_neighbours() {
        let geometry = GridGeometry::new(5, 5);

        // Row 3 (odd) reaches right diagonals.
        let odd_centre = geometry.cell_to_id(Cell { row: 3, col: 2 }).unwrap();
        let reached: Vec<_> = (0..geometry.tile_count())
            .filter(|&t| t != odd_centre && geometry.within_index_range(odd_centre, t, 1))
            .map(|t| geometry.id_to_cell(t).unwrap())
            .collect();
        assert_eq!(reached.len(), 6);
        assert!(reached.contains(&Cell { row: 2, col: 3 }));
        assert!(reached.contains(&Cell { row: 4, col: 3 }));
        assert!(!reached.contains(&Cell { row: 2, col: 1 }));

        // Row 2 (even) reaches left diagonals.
        let even_centre = geometry.cell_to_id(Cell { row: 2, col: 2 }).unwrap();
        let reached: Vec<_> = (0..geometry.tile_count())
            .filter(|&t| t != even_centre && geometry.within_index_range(even_centre, t, 1))
            .map(|t| geometry.id_to_cell(t).unwrap())
            .collect();
        assert_eq!(reached.len(), 6);
        assert!(reached.contains(&Cell { row: 1, col: 1 }));
        assert!(reached.contains(&Cell { row: 3, col: 1 }));
        assert!(!reached.contains(&Cell { row: 1, col: 3 }));
    }

    #[test]
    fn test_range_rejects_far_rows_and_columns() {
        let geometry = GridGeometry::new(8, 8);

        assert!(!geometry.within_index_range(0, 24, 2)); // three rows apart
        assert!(!geometry.within_index_range(0, 3, 2)); // three columns apart
        assert!(geometry.within_index_range(0, 2, 2));
        assert!(geometry.within_index_range(0, 16, 2));
    }
}
