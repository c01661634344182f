//! Level construction settings, loadable from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mapgen::BranchPolicy;

/// A sprite sheet and the number of interchangeable images on it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetConfig {
    pub name: String,
    pub variants: u32,
}

impl SheetConfig {
    pub fn new(name: &str, variants: u32) -> Self {
        Self { name: name.to_string(), variants }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Maximum branching depth of the room graph.
    pub depth: u32,
    /// Side length, in tiles, of the square cell every room is centred in.
    pub room_separation: i32,
    pub wall_gap_radius: i32,
    /// Pixels per tile.
    pub tile_size: f32,
    pub base_branch_chance: f64,
    /// `None` tapers the chance to `base - 0.5` at the maximum depth.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decay_per_depth: Option<f64>,
    pub start_room: String,
    /// Templates never picked at random (the start room is always reserved).
    pub reserved_rooms: Vec<String>,
    pub spawn_attempts: u32,
    pub floor_sheet: SheetConfig,
    pub wall_sheet: SheetConfig,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            room_separation: 21,
            wall_gap_radius: 1,
            tile_size: 100.0,
            base_branch_chance: 0.85,
            decay_per_depth: None,
            start_room: "start".to_string(),
            reserved_rooms: vec!["lobby".to_string()],
            spawn_attempts: 10,
            floor_sheet: SheetConfig::new("tiles", 8),
            wall_sheet: SheetConfig::new("walls", 4),
        }
    }
}

impl LevelConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(invalid("depth", "must be at least 1".to_string()));
        }
        if self.room_separation < 3 {
            return Err(invalid(
                "room_separation",
                format!("{} cannot fit a walled room", self.room_separation),
            ));
        }
        if self.wall_gap_radius < 0 {
            return Err(invalid("wall_gap_radius", "must not be negative".to_string()));
        }
        if self.gap_width() > self.room_separation - 2 {
            return Err(invalid(
                "wall_gap_radius",
                format!(
                    "gap of width {} leaves no corner walls in a cell of {}",
                    self.gap_width(),
                    self.room_separation
                ),
            ));
        }
        if !(self.tile_size.is_finite() && self.tile_size > 0.0) {
            return Err(invalid("tile_size", format!("{} is not a positive size", self.tile_size)));
        }
        if !(0.0..=1.0).contains(&self.base_branch_chance) {
            return Err(invalid(
                "base_branch_chance",
                format!("{} is not a probability", self.base_branch_chance),
            ));
        }
        if let Some(decay) = self.decay_per_depth
            && !(decay.is_finite() && decay >= 0.0)
        {
            return Err(invalid("decay_per_depth", format!("{decay} must be non-negative")));
        }
        if self.spawn_attempts == 0 {
            return Err(invalid("spawn_attempts", "must be at least 1".to_string()));
        }
        if self.start_room.is_empty() {
            return Err(invalid("start_room", "must name a room template".to_string()));
        }
        Ok(())
    }

    pub fn gap_width(&self) -> i32 {
        self.wall_gap_radius * 2 + 1
    }

    /// Side length of one room cell in pixels.
    pub fn room_span(&self) -> f32 {
        self.room_separation as f32 * self.tile_size
    }

    pub fn branch_policy(&self) -> BranchPolicy {
        match self.decay_per_depth {
            Some(decay_per_depth) => {
                BranchPolicy { base_chance: self.base_branch_chance, decay_per_depth }
            }
            None => BranchPolicy::tapered(self.base_branch_chance, self.depth),
        }
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        name == self.start_room || self.reserved_rooms.iter().any(|reserved| reserved == name)
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
