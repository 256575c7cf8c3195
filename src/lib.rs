pub mod components;
pub mod config;
pub mod engine;
pub mod presentation;
pub mod rng;
pub mod scenario;
pub mod session;
pub mod snapshot;
pub mod spatial;
pub mod systems;
pub mod web;
pub mod world;

pub use components::{Tile, TileCategory, TileId};
pub use engine::{Engine, EngineBuilder, EngineSettings, PassSummary};
pub use scenario::{Scenario, ScenarioLoader};
pub use session::{Session, SessionError};
pub use snapshot::{SaveState, SnapshotError};
pub use world::{Grid, GridError};
