//! Procedural dungeon generation split into coherent submodules.

pub mod graph;
pub mod hallway;
pub mod layout;
pub mod progression;

mod generator;
mod grid;

pub use generator::LevelGenerator;
pub use graph::{RoomGraph, RoomGraphNode};
pub use hallway::{Hallway, Orientation};
pub use layout::{GapAnchors, instantiate};
pub use progression::BranchPolicy;

use crate::catalog::TemplateCatalog;
use crate::config::LevelConfig;
use crate::error::GenerationError;
use crate::level::Level;

pub fn generate_level(
    seed: u64,
    config: &LevelConfig,
    catalog: &TemplateCatalog,
) -> Result<Level, GenerationError> {
    LevelGenerator::new(seed, config.clone(), catalog).generate()
}
