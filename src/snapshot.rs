//! Save and load of tile categories
//!
//! A save is the ordered list of every tile's category. Scores are never
//! stored; they are recomputed by the next pass after loading.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::components::TileCategory;
use crate::world::{Grid, GridError};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("save file i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("save file is not valid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Grid(#[from] GridError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveState {
    pub scenario: String,
    pub saved_at: DateTime<Utc>,
    pub tiles: Vec<TileCategory>,
}

impl SaveState {
    pub fn capture(scenario: &str, grid: &Grid) -> Self {
        Self {
            scenario: scenario.to_string(),
            saved_at: Utc::now(),
            tiles: grid.categories(),
        }
    }

    /// Overwrite every tile's category in index order.
    ///
    /// A save of the wrong size is rejected before anything is touched.
    pub fn apply(&self, grid: &mut Grid) -> Result<(), GridError> {
        let expected = grid.tile_count() as usize;
        if self.tiles.len() != expected {
            return Err(GridError::LoadSizeMismatch {
                expected,
                found: self.tiles.len(),
            });
        }
        for (tile, &category) in grid.tiles.iter_mut().zip(&self.tiles) {
            tile.category = category;
        }
        Ok(())
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), SnapshotError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn read(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, ScoringConfig};
    use crate::spatial::Shape;

    fn grid(rows: u32, columns: u32) -> Grid {
        Grid::generate(
            &GridConfig::new(Shape::Square, rows, columns),
            &ScoringConfig::default(),
        )
    }

    #[test]
    fn test_capture_then_apply() {
        let mut source = grid(2, 2);
        source.set_category(1, TileCategory::Road).unwrap();
        source.set_category(3, TileCategory::Park).unwrap();
        let save = SaveState::capture("demo", &source);

        let mut target = grid(2, 2);
        save.apply(&mut target).unwrap();
        assert_eq!(target.categories(), source.categories());
    }

    #[test]
    fn test_size_mismatch_leaves_grid_alone() {
        let mut target = grid(2, 2);
        target.set_category(0, TileCategory::House).unwrap();
        let save = SaveState {
            scenario: "demo".into(),
            saved_at: Utc::now(),
            tiles: vec![TileCategory::Road; 9],
        };

        assert_eq!(
            save.apply(&mut target),
            Err(GridError::LoadSizeMismatch {
                expected: 4,
                found: 9
            })
        );
        assert_eq!(target.category(0).unwrap(), TileCategory::House);
        assert!(target.ids_of(TileCategory::Road).is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saves").join("town.json");
        let mut source = grid(1, 3);
        source.set_category(2, TileCategory::Store).unwrap();
        let save = SaveState::capture("demo", &source);

        save.write(&path).unwrap();
        let loaded = SaveState::read(&path).unwrap();
        assert_eq!(loaded, save);
    }

    #[test]
    fn test_garbage_file_is_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(SaveState::read(&path), Err(SnapshotError::Json(_))));
    }
}
