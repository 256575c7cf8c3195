//! Grid, scoring and logging settings read from scenario files

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::{Amenity, TileCategory, TileId};
use crate::spatial::{GridBuilder, Shape};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub shape: Shape,
    pub rows: u32,
    pub columns: u32,
    #[serde(default = "default_cell_size")]
    pub cell_size: f32,
    #[serde(default)]
    pub gutter: f32,
}

fn default_cell_size() -> f32 {
    1.0
}

impl GridConfig {
    pub fn new(shape: Shape, rows: u32, columns: u32) -> Self {
        Self {
            shape,
            rows,
            columns,
            cell_size: default_cell_size(),
            gutter: 0.0,
        }
    }

    /// Saturates for sizes `validate` rejects.
    pub fn tile_count(&self) -> u32 {
        self.rows.saturating_mul(self.columns)
    }

    pub fn builder(&self) -> GridBuilder {
        GridBuilder::new(self.shape, self.rows, self.columns)
            .with_cell_size(self.cell_size)
            .with_gutter(self.gutter)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows == 0 || self.columns == 0 {
            return Err(ConfigError::EmptyGrid {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.rows.checked_mul(self.columns).is_none() {
            return Err(ConfigError::GridTooLarge {
                rows: self.rows,
                columns: self.columns,
            });
        }
        if !(self.cell_size > 0.0) {
            return Err(ConfigError::CellSize(self.cell_size));
        }
        if self.gutter < 0.0 {
            return Err(ConfigError::Gutter(self.gutter));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NeighborStrategy {
    /// Radius search around cell centres.
    #[default]
    Geometric,
    /// Row/column distance with the staggered-row correction.
    IndexDistance,
}

/// How many road steps each amenity category reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmenityRanges {
    #[serde(default = "default_range")]
    pub store: u32,
    #[serde(default = "default_range")]
    pub hospital: u32,
    #[serde(default = "default_range")]
    pub park: u32,
}

fn default_range() -> u32 {
    3
}

impl AmenityRanges {
    pub fn uniform(range: u32) -> Self {
        Self {
            store: range,
            hospital: range,
            park: range,
        }
    }
}

impl Default for AmenityRanges {
    fn default() -> Self {
        Self::uniform(default_range())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub neighbor_strategy: NeighborStrategy,
    /// Overrides the shape's default search radius.
    #[serde(default)]
    pub neighbor_radius: Option<f32>,
    #[serde(default)]
    pub ranges: AmenityRanges,
    #[serde(default = "default_score_cap")]
    pub score_cap: u32,
}

fn default_score_cap() -> u32 {
    10
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            neighbor_strategy: NeighborStrategy::default(),
            neighbor_radius: None,
            ranges: AmenityRanges::default(),
            score_cap: default_score_cap(),
        }
    }
}

impl ScoringConfig {
    pub fn with_range(mut self, range: u32) -> Self {
        self.ranges = AmenityRanges::uniform(range);
        self
    }

    pub fn with_strategy(mut self, strategy: NeighborStrategy) -> Self {
        self.neighbor_strategy = strategy;
        self
    }

    pub fn range_for(&self, amenity: Amenity) -> u32 {
        match amenity {
            Amenity::Store => self.ranges.store,
            Amenity::Hospital => self.ranges.hospital,
            Amenity::Park => self.ranges.park,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(radius) = self.neighbor_radius {
            if !(radius > 0.0) {
                return Err(ConfigError::Radius(radius));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// A tile whose category is fixed by the scenario.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Placement {
    pub index: TileId,
    pub category: TileCategory,
}

/// Share of the still-empty tiles that receive `category` at random.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RandomFill {
    pub category: TileCategory,
    pub percent: u32,
}

impl RandomFill {
    pub fn amount(&self, candidates: usize) -> usize {
        ((candidates as f64) * f64::from(self.percent) / 100.0).round() as usize
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grid needs at least one row and column, got {rows}x{columns}")]
    EmptyGrid { rows: u32, columns: u32 },
    #[error("grid of {rows}x{columns} tiles does not fit a tile index")]
    GridTooLarge { rows: u32, columns: u32 },
    #[error("cell size must be positive, got {0}")]
    CellSize(f32),
    #[error("gutter must not be negative, got {0}")]
    Gutter(f32),
    #[error("neighbour radius must be positive, got {0}")]
    Radius(f32),
    #[error("placement index {index} outside grid of {tile_count} tiles")]
    PlacementOutOfRange { index: TileId, tile_count: u32 },
    #[error("random fill percent must be at most 100, got {0}")]
    FillPercent(u32),
}
