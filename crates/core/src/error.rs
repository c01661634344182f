//! Error types for configuration, template loading, and level generation.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::types::GridPos;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("could not access template '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("template '{path}' is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Structural failures that abort level construction.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("room template '{0}' is not in the catalog")]
    UnknownTemplate(String),

    #[error("battle template '{0}' is not in the catalog")]
    UnknownBattle(String),

    #[error("no room templates are available for random placement")]
    EmptyRoomPool,

    #[error(
        "room template '{name}' is {rows}x{cols}, larger than the room separation {separation}"
    )]
    OversizedTemplate { name: String, rows: i32, cols: i32, separation: i32 },

    #[error("room template '{name}' is {rows}x{cols}, too small for a gap of width {gap_width}")]
    UndersizedTemplate { name: String, rows: i32, cols: i32, gap_width: i32 },

    #[error("room grid position {0:?} was claimed twice")]
    DuplicateRoom(GridPos),

    #[error("no room exists at grid position {0:?}")]
    MissingRoom(GridPos),

    #[error("rooms at {from:?} and {to:?} are not straight neighbours")]
    NotStraight { from: GridPos, to: GridPos },

    #[error("wall gaps of rooms at {from:?} and {to:?} do not line up")]
    MisalignedGap { from: GridPos, to: GridPos },
}
