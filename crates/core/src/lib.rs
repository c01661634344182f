pub mod battle;
pub mod catalog;
pub mod config;
pub mod error;
pub mod level;
pub mod mapgen;
pub mod objects;
pub mod rng;
pub mod room;
pub mod roster;
pub mod template;
pub mod tiles;
pub mod types;

pub use battle::{Battle, BattleEvent, EnemyFactory, EnemyWave};
pub use catalog::TemplateCatalog;
pub use config::{LevelConfig, SheetConfig};
pub use error::{ConfigError, GenerationError, TemplateError};
pub use level::{DrawSink, Level, LevelEvent, TileRect};
pub use mapgen::{LevelGenerator, RoomGraph, generate_level};
pub use objects::{GameObject, ObjectKind};
pub use rng::DungeonRng;
pub use room::{Room, RoomBounds};
pub use roster::EnemyRoster;
pub use template::{BattleTemplate, RoomTemplate};
pub use tiles::{Tile, TileStore};
pub use types::*;
