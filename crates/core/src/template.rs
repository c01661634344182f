//! Pre-authored room and battle layouts in their on-disk JSON form.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateTile {
    /// `[row, col]` inside the room.
    pub pos: [i32; 2],
    /// `[sheet, image index]`.
    pub image_info: (String, u32),
}

impl TemplateTile {
    pub fn row(&self) -> i32 {
        self.pos[0]
    }

    pub fn col(&self) -> i32 {
        self.pos[1]
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateObject {
    pub name: String,
    /// `[x, y]` tile position inside the room.
    pub pos: [i32; 2],
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomTemplate {
    pub rows: i32,
    pub cols: i32,
    /// One list per layer, ground first.
    #[serde(default)]
    pub tiles: Vec<Vec<TemplateTile>>,
    #[serde(default)]
    pub objects: Vec<TemplateObject>,
    #[serde(default = "default_random_floor")]
    pub random_floor: bool,
}

fn default_random_floor() -> bool {
    true
}

impl RoomTemplate {
    pub fn blank(rows: i32, cols: i32) -> Self {
        Self { rows, cols, tiles: Vec::new(), objects: Vec::new(), random_floor: true }
    }

    pub fn with_object(mut self, name: &str, x: i32, y: i32) -> Self {
        self.objects.push(TemplateObject { name: name.to_string(), pos: [x, y] });
        self
    }

    pub fn with_tile(mut self, layer: usize, row: i32, col: i32, sheet: &str, index: u32) -> Self {
        if self.tiles.len() <= layer {
            self.tiles.resize_with(layer + 1, Vec::new);
        }
        let image_info = (sheet.to_string(), index);
        self.tiles[layer].push(TemplateTile { pos: [row, col], image_info });
        self
    }

    pub fn fits(&self, room_separation: i32) -> bool {
        self.rows <= room_separation && self.cols <= room_separation
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        read_json(path)
    }

    /// Writes through a temporary file so a crash never leaves a half-written template.
    pub fn save(&self, path: &Path) -> Result<(), TemplateError> {
        let io_error = |source| TemplateError::Io { path: path.to_path_buf(), source };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let json = serde_json::to_string(self)
            .map_err(|source| TemplateError::Json { path: path.to_path_buf(), source })?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, json).map_err(io_error)?;
        fs::rename(&tmp_path, path).map_err(io_error)?;
        Ok(())
    }
}

/// Enemy waves, each mapping an enemy type name to a count.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleTemplate {
    pub waves: Vec<BTreeMap<String, u32>>,
}

impl BattleTemplate {
    pub fn from_waves(waves: &[&[(&str, u32)]]) -> Self {
        Self {
            waves: waves
                .iter()
                .map(|wave| wave.iter().map(|(kind, count)| (kind.to_string(), *count)).collect())
                .collect(),
        }
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        read_json(path)
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, TemplateError> {
    let content = fs::read_to_string(path)
        .map_err(|source| TemplateError::Io { path: path.to_path_buf(), source })?;
    serde_json::from_str(&content)
        .map_err(|source| TemplateError::Json { path: path.to_path_buf(), source })
}
