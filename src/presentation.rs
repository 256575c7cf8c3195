//! Read-only views of scored tiles for whatever draws them

use serde::{Deserialize, Serialize};

use crate::components::{TileCategory, TileId};
use crate::world::{Grid, ScoreTotals};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

pub fn color_for(category: TileCategory) -> Color {
    match category {
        TileCategory::Nothing => Color::rgb(128, 128, 128),
        TileCategory::House => Color::rgb(255, 0, 255),
        TileCategory::Road => Color::rgb(0, 0, 0),
        TileCategory::Store => Color::rgb(0, 255, 255),
        TileCategory::Hospital => Color::rgb(255, 0, 0),
        TileCategory::Park => Color::rgb(0, 255, 0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Icon {
    House,
    Road,
    Store,
    Hospital,
    Park,
}

pub fn icon_for(category: TileCategory) -> Option<Icon> {
    match category {
        TileCategory::Nothing => None,
        TileCategory::House => Some(Icon::House),
        TileCategory::Road => Some(Icon::Road),
        TileCategory::Store => Some(Icon::Store),
        TileCategory::Hospital => Some(Icon::Hospital),
        TileCategory::Park => Some(Icon::Park),
    }
}

/// Receives the refreshed state of every tile once a pass has finished.
pub trait TilePresenter {
    fn refresh_color(&mut self, id: TileId, color: Color);
    fn refresh_icon(&mut self, id: TileId, icon: Option<Icon>);
    fn refresh_score(&mut self, id: TileId, score: u32);
    fn refresh_total(&mut self, _totals: &ScoreTotals) {}
}

/// Replays the current grid state into a presenter.
pub fn present(grid: &Grid, presenter: &mut dyn TilePresenter) {
    for tile in grid.tiles() {
        presenter.refresh_color(tile.id, color_for(tile.category));
        presenter.refresh_icon(tile.id, icon_for(tile.category));
        presenter.refresh_score(tile.id, tile.score);
    }
    presenter.refresh_total(&grid.totals());
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    pub id: TileId,
    pub row: u32,
    pub col: u32,
    pub category: TileCategory,
    pub score: u32,
    pub color: String,
    pub icon: Option<Icon>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridFrame {
    pub scenario: String,
    pub pass: u64,
    pub rows: u32,
    pub columns: u32,
    pub totals: ScoreTotals,
    pub tiles: Vec<TileView>,
}

/// Presenter that gathers everything into a serializable frame.
pub struct FrameCollector {
    frame: GridFrame,
}

impl FrameCollector {
    pub fn new(scenario: &str, pass: u64, grid: &Grid) -> Self {
        let geometry = grid.geometry();
        let tiles = grid
            .tiles()
            .iter()
            .map(|tile| TileView {
                id: tile.id,
                row: geometry.row_of(tile.id),
                col: geometry.col_of(tile.id),
                category: tile.category,
                score: 0,
                color: String::new(),
                icon: None,
            })
            .collect();
        Self {
            frame: GridFrame {
                scenario: scenario.to_string(),
                pass,
                rows: geometry.rows(),
                columns: geometry.columns(),
                totals: ScoreTotals::default(),
                tiles,
            },
        }
    }

    pub fn into_frame(self) -> GridFrame {
        self.frame
    }

    fn view_mut(&mut self, id: TileId) -> Option<&mut TileView> {
        self.frame.tiles.get_mut(id as usize)
    }
}

impl TilePresenter for FrameCollector {
    fn refresh_color(&mut self, id: TileId, color: Color) {
        if let Some(view) = self.view_mut(id) {
            view.color = color.hex();
        }
    }

    fn refresh_icon(&mut self, id: TileId, icon: Option<Icon>) {
        if let Some(view) = self.view_mut(id) {
            view.icon = icon;
        }
    }

    fn refresh_score(&mut self, id: TileId, score: u32) {
        if let Some(view) = self.view_mut(id) {
            view.score = score;
        }
    }

    fn refresh_total(&mut self, totals: &ScoreTotals) {
        self.frame.totals = *totals;
    }
}

/// Capture a frame of the grid as it stands.
pub fn frame(scenario: &str, pass: u64, grid: &Grid) -> GridFrame {
    let mut collector = FrameCollector::new(scenario, pass, grid);
    present(grid, &mut collector);
    collector.into_frame()
}

/// Plain-text score map, one row per line, amenities shown by initial.
pub fn render_text(frame: &GridFrame) -> String {
    let mut out = String::new();
    for row in frame.tiles.chunks(frame.columns.max(1) as usize) {
        let cells: Vec<String> = row
            .iter()
            .map(|view| match view.category {
                TileCategory::Nothing => " .".to_string(),
                TileCategory::Store => " S".to_string(),
                TileCategory::Hospital => " H".to_string(),
                TileCategory::Park => " P".to_string(),
                TileCategory::Road => format!("{:>2}", view.score),
                TileCategory::House => format!("{:>2}", view.score),
            })
            .collect();
        out.push_str(&cells.join(" "));
        out.push('\n');
    }
    out.push_str(&format!("Score: {}\n", frame.totals.global_score));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GridConfig, ScoringConfig};
    use crate::spatial::Shape;

    #[test]
    fn colors_follow_category_table() {
        assert_eq!(color_for(TileCategory::House).hex(), "#ff00ff");
        assert_eq!(color_for(TileCategory::Road).hex(), "#000000");
        assert_eq!(color_for(TileCategory::Nothing).hex(), "#808080");
        assert_eq!(icon_for(TileCategory::Nothing), None);
        assert_eq!(icon_for(TileCategory::Park), Some(Icon::Park));
    }

    #[test]
    fn frame_carries_every_tile() {
        let mut grid = Grid::generate(
            &GridConfig::new(Shape::Square, 2, 3),
            &ScoringConfig::default(),
        );
        grid.set_category(4, TileCategory::Store).unwrap();

        let frame = frame("test", 0, &grid);
        assert_eq!(frame.tiles.len(), 6);
        assert_eq!(frame.tiles[4].row, 2);
        assert_eq!(frame.tiles[4].col, 1);
        assert_eq!(frame.tiles[4].color, "#00ffff");
        assert_eq!(frame.tiles[4].icon, Some(Icon::Store));

        let text = render_text(&frame);
        assert_eq!(text.lines().count(), 3);
        assert!(text.contains(" S"));
    }
}
