//! Named room and battle templates available to the generator.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::LevelConfig;
use crate::error::TemplateError;
use crate::template::{BattleTemplate, RoomTemplate};

pub mod keys {
    pub const ROOM_START: &str = "start";
    pub const ROOM_LOBBY: &str = "lobby";
    pub const ROOM_HALL: &str = "hall";
    pub const ROOM_CRYPT: &str = "crypt";
    pub const ROOM_VAULT: &str = "vault";
    pub const ROOM_GALLERY: &str = "gallery";

    pub const BATTLE_SKIRMISH: &str = "skirmish";
    pub const BATTLE_AMBUSH: &str = "ambush";
    pub const BATTLE_SIEGE: &str = "siege";

    pub const ENEMY_SLIME: &str = "slime";
    pub const ENEMY_ARCHER: &str = "archer";
    pub const ENEMY_KNIGHT: &str = "knight";

    pub const ENEMY_KINDS: [&str; 3] = [ENEMY_SLIME, ENEMY_ARCHER, ENEMY_KNIGHT];
}

#[derive(Clone, Debug, Default)]
pub struct TemplateCatalog {
    rooms: BTreeMap<String, RoomTemplate>,
    battles: BTreeMap<String, BattleTemplate>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads every `*.json` file in both directories, keyed by file stem.
    /// Rooms that do not fit inside one room cell are skipped.
    pub fn load_dirs(
        room_dir: &Path,
        battle_dir: &Path,
        room_separation: i32,
    ) -> Result<Self, TemplateError> {
        let mut catalog = Self::new();

        for (name, path) in json_files(room_dir)? {
            let template = RoomTemplate::load(&path)?;
            if !template.fits(room_separation) {
                log::warn!(
                    "skipping room template '{name}': {}x{} exceeds separation {room_separation}",
                    template.rows,
                    template.cols
                );
                continue;
            }
            catalog.rooms.insert(name, template);
        }

        for (name, path) in json_files(battle_dir)? {
            catalog.battles.insert(name, BattleTemplate::load(&path)?);
        }

        log::info!(
            "loaded {} room templates and {} battle templates",
            catalog.rooms.len(),
            catalog.battles.len()
        );
        Ok(catalog)
    }

    pub fn insert_room(&mut self, name: &str, template: RoomTemplate) {
        self.rooms.insert(name.to_string(), template);
    }

    pub fn insert_battle(&mut self, name: &str, template: BattleTemplate) {
        self.battles.insert(name.to_string(), template);
    }

    pub fn room(&self, name: &str) -> Option<&RoomTemplate> {
        self.rooms.get(name)
    }

    pub fn battle(&self, name: &str) -> Option<&BattleTemplate> {
        self.battles.get(name)
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn battle_count(&self) -> usize {
        self.battles.len()
    }

    /// Room names eligible for random placement, in name order.
    pub fn room_pool(&self, config: &LevelConfig) -> Vec<&str> {
        self.rooms.keys().map(String::as_str).filter(|name| !config.is_reserved(name)).collect()
    }

    pub fn battle_names(&self) -> Vec<&str> {
        self.battles.keys().map(String::as_str).collect()
    }

    pub fn build_default() -> Self {
        let mut catalog = Self::new();

        catalog.insert_room(
            keys::ROOM_START,
            RoomTemplate::blank(11, 11)
                .with_object("torch", 2, 2)
                .with_object("torch", 8, 2)
                .with_object("lever", 5, 8),
        );
        catalog
            .insert_room(keys::ROOM_LOBBY, RoomTemplate::blank(15, 15).with_object("altar", 7, 7));
        catalog
            .insert_room(keys::ROOM_HALL, RoomTemplate::blank(10, 10).with_object("torch", 1, 1));
        catalog.insert_room(
            keys::ROOM_CRYPT,
            RoomTemplate::blank(13, 9)
                .with_object("altar", 4, 6)
                .with_tile(1, 3, 2, "walls", 1)
                .with_tile(1, 3, 6, "walls", 1)
                .with_tile(2, 1, 4, "overhead", 0),
        );
        catalog.insert_room(
            keys::ROOM_VAULT,
            RoomTemplate::blank(17, 19)
                .with_object("chest", 9, 8)
                .with_object("small_cube", 3, 3)
                .with_object("large_red_cube", 15, 12),
        );
        catalog.insert_room(keys::ROOM_GALLERY, RoomTemplate::blank(21, 21));

        catalog.insert_battle(
            keys::BATTLE_SKIRMISH,
            BattleTemplate::from_waves(&[&[(keys::ENEMY_SLIME, 3)]]),
        );
        catalog.insert_battle(
            keys::BATTLE_AMBUSH,
            BattleTemplate::from_waves(&[
                &[(keys::ENEMY_SLIME, 2)],
                &[(keys::ENEMY_ARCHER, 2), (keys::ENEMY_SLIME, 1)],
            ]),
        );
        catalog.insert_battle(
            keys::BATTLE_SIEGE,
            BattleTemplate::from_waves(&[
                &[(keys::ENEMY_KNIGHT, 1), (keys::ENEMY_SLIME, 2)],
                &[(keys::ENEMY_ARCHER, 3)],
                &[(keys::ENEMY_KNIGHT, 2)],
            ]),
        );

        catalog
    }
}

fn json_files(dir: &Path) -> Result<Vec<(String, PathBuf)>, TemplateError> {
    let entries =
        fs::read_dir(dir).map_err(|source| TemplateError::Io { path: dir.to_path_buf(), source })?;

    let mut files = Vec::new();
    for entry in entries {
        let path =
            entry.map_err(|source| TemplateError::Io { path: dir.to_path_buf(), source })?.path();
        if !path.is_file() {
            continue;
        }
        if path.extension().and_then(|extension| extension.to_str()) != Some("json") {
            log::warn!("non-JSON file '{}' found in template directory", path.display());
            continue;
        }
        let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
            continue;
        };
        files.push((name.to_string(), path.clone()));
    }
    files.sort();
    Ok(files)
}
