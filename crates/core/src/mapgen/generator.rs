//! High-level level generation that composes the room graph, room layout, and hallways.

use crate::catalog::TemplateCatalog;
use crate::config::LevelConfig;
use crate::error::GenerationError;
use crate::level::Level;
use crate::rng::DungeonRng;
use crate::types::GridPos;

use super::graph::RoomGraph;

pub struct LevelGenerator<'a> {
    seed: u64,
    config: LevelConfig,
    catalog: &'a TemplateCatalog,
}

impl<'a> LevelGenerator<'a> {
    pub fn new(seed: u64, config: LevelConfig, catalog: &'a TemplateCatalog) -> Self {
        Self { seed, config, catalog }
    }

    /// Builds a complete level or fails without handing out a partial one.
    pub fn generate(&self) -> Result<Level, GenerationError> {
        self.config.validate()?;

        let mut rng = DungeonRng::seed_from_u64(self.seed);
        let graph = RoomGraph::generate(self.config.depth, self.config.branch_policy(), &mut rng);

        let start_name = self.config.start_room.as_str();
        let start_template = self
            .catalog
            .room(start_name)
            .ok_or_else(|| GenerationError::UnknownTemplate(start_name.to_string()))?;
        let pool = self.catalog.room_pool(&self.config);
        if pool.is_empty() {
            return Err(GenerationError::EmptyRoomPool);
        }
        let battle_names = self.catalog.battle_names();

        let mut level = Level::new(self.config.clone(), rng.fork());
        for node in graph.nodes() {
            if node.grid_pos == GridPos::ORIGIN {
                level.add_room(&node, start_name, start_template, None)?;
                continue;
            }

            let name = *rng.choose(&pool).ok_or(GenerationError::EmptyRoomPool)?;
            let template = self
                .catalog
                .room(name)
                .ok_or_else(|| GenerationError::UnknownTemplate(name.to_string()))?;
            let battle = match rng.choose(&battle_names) {
                Some(&battle_name) => Some(
                    self.catalog
                        .battle(battle_name)
                        .ok_or_else(|| GenerationError::UnknownBattle(battle_name.to_string()))?,
                ),
                None => None,
            };
            level.add_room(&node, name, template, battle)?;
        }

        for (from, to) in graph.hallway_edges() {
            level.add_hallway(from, to)?;
        }
        level.set_layout(graph.connections().clone(), graph.end_rooms().to_vec());

        log::info!(
            "generated level from seed {}: {} rooms, {} end rooms, {} tiles",
            self.seed,
            level.room_count(),
            level.end_rooms().len(),
            level.store().len()
        );
        Ok(level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::keys;
    use crate::template::RoomTemplate;

    #[test]
    fn start_room_sits_at_origin_without_battle() {
        let catalog = TemplateCatalog::build_default();
        let level = LevelGenerator::new(8, LevelConfig::default(), &catalog)
            .generate()
            .expect("default pack generates");

        let origin = level.get_room_at_grid(GridPos::ORIGIN).expect("origin room");
        assert_eq!(origin.name, keys::ROOM_START);
        assert!(origin.battle().is_none());
        for room in level.rooms().filter(|room| room.grid_pos != GridPos::ORIGIN) {
            assert_ne!(room.name, keys::ROOM_LOBBY, "reserved rooms are never picked");
            assert!(room.battle().is_some(), "{:?} should have a battle", room.grid_pos);
        }
    }

    #[test]
    fn missing_start_template_is_an_error() {
        let catalog = TemplateCatalog::build_default();
        let config = LevelConfig { start_room: "throne".to_string(), ..Default::default() };

        let err = LevelGenerator::new(1, config, &catalog).generate().expect_err("no throne");
        assert!(matches!(err, GenerationError::UnknownTemplate(name) if name == "throne"));
    }

    #[test]
    fn empty_pool_is_an_error() {
        let mut catalog = TemplateCatalog::new();
        catalog.insert_room(keys::ROOM_START, RoomTemplate::blank(11, 11));

        let err = LevelGenerator::new(1, LevelConfig::default(), &catalog)
            .generate()
            .expect_err("only the start room");
        assert!(matches!(err, GenerationError::EmptyRoomPool));
    }

    #[test]
    fn oversized_template_aborts_generation() {
        let mut catalog = TemplateCatalog::new();
        catalog.insert_room(keys::ROOM_START, RoomTemplate::blank(11, 11));
        catalog.insert_room("colossal", RoomTemplate::blank(30, 30));

        let err = LevelGenerator::new(1, LevelConfig::default(), &catalog)
            .generate()
            .expect_err("30x30 does not fit a 21 cell");
        assert!(matches!(err, GenerationError::OversizedTemplate { rows: 30, .. }));
    }

    #[test]
    fn invalid_config_is_reported_before_generation() {
        let catalog = TemplateCatalog::build_default();
        let config = LevelConfig { depth: 0, ..Default::default() };

        let err = LevelGenerator::new(1, config, &catalog).generate().expect_err("depth 0");
        assert!(matches!(err, GenerationError::Config(_)));
    }

    #[test]
    fn battles_are_optional() {
        let mut catalog = TemplateCatalog::new();
        catalog.insert_room(keys::ROOM_START, RoomTemplate::blank(11, 11));
        catalog.insert_room(keys::ROOM_HALL, RoomTemplate::blank(10, 10));

        let level = LevelGenerator::new(5, LevelConfig::default(), &catalog)
            .generate()
            .expect("battles are not required");
        assert!(level.rooms().all(|room| room.battle().is_none()));
    }
}
