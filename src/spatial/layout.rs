use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::GridGeometry;
use crate::components::TileId;

const SQRT_3: f32 = 1.732_050_8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    #[default]
    Square,
    Triangle,
    Hexagon,
}

impl Shape {
    /// Radius, in multiples of `cell_size + gutter`, that reaches exactly
    /// the edge-sharing neighbours of a cell.
    pub fn neighbor_radius_factor(self) -> f32 {
        match self {
            Shape::Square => 1.1,
            Shape::Triangle => 0.75,
            Shape::Hexagon => 1.1,
        }
    }
}

/// World-space centre of a cell on the ground plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    pub fn distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

/// Lays cells out row by row and assigns each one a centre position.
#[derive(Debug, Clone)]
pub struct GridBuilder {
    shape: Shape,
    rows: u32,
    columns: u32,
    cell_size: f32,
    gutter: f32,
}

impl GridBuilder {
    pub fn new(shape: Shape, rows: u32, columns: u32) -> Self {
        Self {
            shape,
            rows,
            columns,
            cell_size: 1.0,
            gutter: 0.0,
        }
    }

    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_gutter(mut self, gutter: f32) -> Self {
        self.gutter = gutter;
        self
    }

    pub fn geometry(&self) -> GridGeometry {
        GridGeometry::new(self.rows, self.columns)
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn pitch(&self) -> f32 {
        self.cell_size + self.gutter
    }

    pub fn default_radius(&self) -> f32 {
        self.shape.neighbor_radius_factor() * self.pitch()
    }

    pub fn positions(&self) -> HashMap<TileId, Position> {
        let geometry = self.geometry();
        (0..geometry.tile_count())
            .map(|id| {
                let row = geometry.row_of(id);
                let col = geometry.col_of(id);
                (id, self.centre(row, col))
            })
            .collect()
    }

    fn centre(&self, row: u32, col: u32) -> Position {
        let size = self.cell_size;
        let gutter = self.gutter;
        let points_up = (row - 1 + col) % 2 == 1;
        let row0 = (row - 1) as f32;
        let col = col as f32;
        match self.shape {
            Shape::Square => {
                let pitch = size + gutter;
                Position::new(col * pitch + size * 0.5, row0 * pitch + size * 0.5)
            }
            Shape::Triangle => {
                let x_step = size * 0.5 + gutter;
                let z_step = size + gutter;
                let centroid = if points_up { size / 3.0 } else { size * 2.0 / 3.0 };
                Position::new(col * x_step + size * 0.5, row0 * z_step + centroid)
            }
            Shape::Hexagon => {
                let width = size * SQRT_3 * 0.5;
                let x_step = width + gutter;
                let z_step = size * 0.75 + gutter;
                let offset = if row % 2 == 1 { x_step * 0.5 } else { 0.0 };
                Position::new(col * x_step + offset + width * 0.5, row0 * z_step + size * 0.5)
            }
        }
    }
}
