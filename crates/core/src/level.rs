//! The generated dungeon: tile store, rooms, and per-frame room transitions.

mod draw;
mod hash;

pub use draw::{DrawSink, TileRect};

use std::collections::BTreeMap;
use std::mem;

use crate::battle::{BattleEvent, EnemyFactory};
use crate::config::LevelConfig;
use crate::error::GenerationError;
use crate::mapgen::hallway::{self, Hallway};
use crate::mapgen::{RoomGraphNode, instantiate};
use crate::objects::GameObject;
use crate::rng::DungeonRng;
use crate::room::{Room, RoomContext};
use crate::template::{BattleTemplate, RoomTemplate};
use crate::tiles::{Tile, TileStore};
use crate::types::{GridPos, Layer, TilePos, WorldPos};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LevelEvent {
    RoomEntered { room: GridPos, sealed: bool },
    RoomExited { room: GridPos },
    WaveSpawned { room: GridPos, wave: usize, requested: u32, spawned: usize },
    WaveCleared { room: GridPos, wave: usize },
    BattleCompleted { room: GridPos },
}

impl LevelEvent {
    fn from_battle(room: GridPos, event: BattleEvent) -> Self {
        match event {
            BattleEvent::WaveSpawned { wave, requested, spawned } => {
                Self::WaveSpawned { room, wave, requested, spawned }
            }
            BattleEvent::WaveCleared { wave } => Self::WaveCleared { room, wave },
            BattleEvent::Completed => Self::BattleCompleted { room },
        }
    }
}

#[derive(Clone, Debug)]
pub struct Level {
    config: LevelConfig,
    store: TileStore,
    rooms: BTreeMap<GridPos, Room>,
    connections: BTreeMap<GridPos, Vec<GridPos>>,
    end_rooms: Vec<GridPos>,
    prev_player_room: Option<GridPos>,
    rng: DungeonRng,
    events: Vec<LevelEvent>,
}

impl Level {
    pub fn new(config: LevelConfig, rng: DungeonRng) -> Self {
        Self {
            config,
            store: TileStore::new(),
            rooms: BTreeMap::new(),
            connections: BTreeMap::new(),
            end_rooms: Vec::new(),
            prev_player_room: None,
            rng,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &LevelConfig {
        &self.config
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Room> + '_ {
        self.rooms.values()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn connections(&self) -> &BTreeMap<GridPos, Vec<GridPos>> {
        &self.connections
    }

    pub fn end_rooms(&self) -> &[GridPos] {
        &self.end_rooms
    }

    /// Grid cell of the room the player last fully entered.
    pub fn player_room(&self) -> Option<GridPos> {
        self.prev_player_room
    }

    pub(crate) fn set_layout(
        &mut self,
        connections: BTreeMap<GridPos, Vec<GridPos>>,
        end_rooms: Vec<GridPos>,
    ) {
        self.connections = connections;
        self.end_rooms = end_rooms;
    }

    /// Validates `template` against the cell and writes it into the level.
    pub fn add_room(
        &mut self,
        node: &RoomGraphNode,
        name: &str,
        template: &RoomTemplate,
        battle: Option<&BattleTemplate>,
    ) -> Result<&Room, GenerationError> {
        let (rows, cols) = (template.rows, template.cols);
        if !template.fits(self.config.room_separation) {
            return Err(GenerationError::OversizedTemplate {
                name: name.to_string(),
                rows,
                cols,
                separation: self.config.room_separation,
            });
        }
        let gap_width = self.config.gap_width();
        if rows < gap_width + 2 || cols < gap_width + 2 {
            return Err(GenerationError::UndersizedTemplate {
                name: name.to_string(),
                rows,
                cols,
                gap_width,
            });
        }
        if self.rooms.contains_key(&node.grid_pos) {
            return Err(GenerationError::DuplicateRoom(node.grid_pos));
        }

        let mut context =
            RoomContext { config: &self.config, store: &mut self.store, rng: &mut self.rng };
        let room = instantiate(node, name, template, battle, &mut context);
        Ok(self.rooms.entry(node.grid_pos).or_insert(room))
    }

    /// Writes the corridor between two already-added neighbouring rooms.
    pub fn add_hallway(&mut self, from: GridPos, to: GridPos) -> Result<Hallway, GenerationError> {
        let from_room = self.rooms.get(&from).ok_or(GenerationError::MissingRoom(from))?;
        let to_room = self.rooms.get(&to).ok_or(GenerationError::MissingRoom(to))?;
        hallway::connect(&mut self.store, from_room, to_room, &self.config, &mut self.rng)
    }

    pub fn get_tile(&self, world: WorldPos, layer: Layer) -> Option<&Tile> {
        self.store.get(layer, TilePos::from_world(world, self.config.tile_size))
    }

    pub fn get_tile_at(&self, pos: TilePos, layer: Layer) -> Option<&Tile> {
        self.store.get(layer, pos)
    }

    pub fn is_tile(&self, layer: Layer, pos: TilePos) -> bool {
        self.store.is_tile(layer, pos)
    }

    pub fn add_tile(&mut self, layer: Layer, pos: TilePos, tile: Tile) -> Option<Tile> {
        self.store.insert(layer, pos, tile)
    }

    pub fn remove_tile(&mut self, layer: Layer, pos: TilePos) -> Option<Tile> {
        self.store.remove(layer, pos)
    }

    pub fn get_room(&self, world: WorldPos) -> Option<&Room> {
        self.rooms.get(&GridPos::from_world(world, self.config.room_span()))
    }

    pub fn get_room_at_grid(&self, grid_pos: GridPos) -> Option<&Room> {
        self.rooms.get(&grid_pos)
    }

    pub fn get_room_mut(&mut self, grid_pos: GridPos) -> Option<&mut Room> {
        self.rooms.get_mut(&grid_pos)
    }

    /// Whether `world` lies on the footprint of the room owning its cell.
    /// Hallway tiles between rooms are outside every room.
    pub fn check_bounds(&self, world: WorldPos) -> bool {
        let pos = TilePos::from_world(world, self.config.tile_size);
        self.get_room(world).is_some_and(|room| room.contains_tile(pos))
    }

    /// Walls and blocking objects stop movement; everything else is open.
    pub fn is_blocked(&self, world: WorldPos) -> bool {
        let pos = TilePos::from_world(world, self.config.tile_size);
        if self.store.is_tile(Layer::Collision, pos) {
            return true;
        }
        self.get_room(world)
            .and_then(|room| room.get_object(pos))
            .is_some_and(GameObject::blocks)
    }

    pub fn generate_spawn_pos(&mut self, grid_pos: GridPos) -> Option<WorldPos> {
        let room = self.rooms.get(&grid_pos)?;
        room.generate_spawn_pos(&self.store, &mut self.rng, &self.config)
    }

    /// Per-frame tick.
    ///
    /// Rooms are entered only once the player is at least one tile inside
    /// their walls, so standing in a gap never seals or reopens anything.
    /// The new room is entered before the previous one is exited. The room
    /// under the player is then updated.
    pub fn update(&mut self, delta: f32, player_pos: WorldPos, enemies: &mut dyn EnemyFactory) {
        let grid_pos = GridPos::from_world(player_pos, self.config.room_span());
        let Some(room) = self.rooms.get(&grid_pos) else {
            return;
        };
        let tile = TilePos::from_world(player_pos, self.config.tile_size);
        let inside = room.is_strictly_inside(tile - room.tile_offset);

        let Self { config, store, rooms, prev_player_room, rng, events, .. } = self;
        let mut context = RoomContext { config, store, rng };

        let previous = *prev_player_room;
        if inside && previous != Some(grid_pos) {
            if let Some(room) = rooms.get_mut(&grid_pos) {
                let sealed = room.entered(&mut context);
                events.push(LevelEvent::RoomEntered { room: grid_pos, sealed });
            }
            if let Some(previous) = previous
                && let Some(room) = rooms.get_mut(&previous)
            {
                room.exited();
                events.push(LevelEvent::RoomExited { room: previous });
            }
            *prev_player_room = Some(grid_pos);
        }

        if let Some(room) = rooms.get_mut(&grid_pos) {
            for event in room.update(delta, &mut context, enemies) {
                events.push(LevelEvent::from_battle(grid_pos, event));
            }
        }
    }

    pub fn events(&self) -> &[LevelEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<LevelEvent> {
        mem::take(&mut self.events)
    }

    /// Detaches every room's objects and forgets enemy handles.
    ///
    /// Safe mid-battle: gap walls stay where they are and no wave winds down.
    pub fn cleanup(&mut self) -> Vec<GameObject> {
        let mut detached = Vec::new();
        for room in self.rooms.values_mut() {
            detached.extend(room.cleanup());
        }
        self.prev_player_room = None;
        self.events.clear();
        log::debug!("level cleaned up, {} objects detached", detached.len());
        detached
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::EnemyRoster;
    use crate::types::{Connections, Direction};

    fn arena_level(battle: Option<&BattleTemplate>) -> Level {
        let mut level = Level::new(LevelConfig::default(), DungeonRng::seed_from_u64(12));
        let node = RoomGraphNode {
            grid_pos: GridPos::ORIGIN,
            depth: 0,
            connections: Connections::NONE.with(Direction::East),
        };
        let template = RoomTemplate::blank(11, 11).with_object("chest", 5, 5);
        level.add_room(&node, "arena", &template, battle).expect("room fits");
        level
    }

    fn tile_centre(pos: TilePos) -> WorldPos {
        WorldPos::new((pos.x as f32 + 0.5) * 100.0, (pos.y as f32 + 0.5) * 100.0)
    }

    #[test]
    fn world_queries_use_floor_division() {
        let level = arena_level(None);
        let room = level.get_room_at_grid(GridPos::ORIGIN).expect("origin");
        let corner = room.tile_offset;

        assert!(level.get_tile(tile_centre(corner), Layer::Collision).is_some());
        assert!(level.get_tile(tile_centre(corner.offset(1, 1)), Layer::Collision).is_none());
        assert!(level.get_room(WorldPos::new(-1.0, 50.0)).is_none());
        assert!(level.get_room(WorldPos::new(2_099.0, 2_099.0)).is_some());
    }

    #[test]
    fn check_bounds_and_blocking() {
        let level = arena_level(None);
        let room = level.get_room_at_grid(GridPos::ORIGIN).expect("origin");

        assert!(level.check_bounds(tile_centre(room.tile_offset.offset(3, 3))));
        assert!(!level.check_bounds(tile_centre(room.tile_offset.offset(-1, 3))));
        assert!(level.is_blocked(tile_centre(room.tile_offset)));
        assert!(level.is_blocked(tile_centre(room.tile_offset.offset(5, 5))), "chest blocks");
        assert!(!level.is_blocked(tile_centre(room.tile_offset.offset(3, 3))));
    }

    #[test]
    fn standing_on_the_wall_line_does_not_enter() {
        let battle = BattleTemplate::from_waves(&[&[("slime", 1)]]);
        let mut level = arena_level(Some(&battle));
        let mut roster = EnemyRoster::new();
        let gap = level.get_room_at_grid(GridPos::ORIGIN).expect("origin").anchors.east;

        level.update(0.016, tile_centre(gap), &mut roster);
        assert_eq!(level.player_room(), None);
        assert!(level.events().is_empty());
        assert!(!level.is_tile(Layer::Collision, gap));

        level.update(0.016, tile_centre(gap.offset(-1, 0)), &mut roster);
        assert_eq!(level.player_room(), Some(GridPos::ORIGIN));
        assert!(level.is_tile(Layer::Collision, gap));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn removing_tiles_round_trips_through_the_store() {
        let mut level = arena_level(None);
        let pos = TilePos::new(-40, -40);
        assert!(level.add_tile(Layer::Overhead, pos, Tile::at("deco", 1, pos, 100.0)).is_none());
        assert!(level.is_tile(Layer::Overhead, pos));
        assert!(level.remove_tile(Layer::Overhead, pos).is_some());
        assert!(!level.store().has_layer(Layer::Overhead));
    }

    #[test]
    fn duplicate_and_undersized_rooms_are_rejected() {
        let mut level = arena_level(None);
        let node = RoomGraphNode {
            grid_pos: GridPos::ORIGIN,
            depth: 0,
            connections: Connections::NONE,
        };
        let err = level
            .add_room(&node, "again", &RoomTemplate::blank(10, 10), None)
            .expect_err("origin is taken");
        assert!(matches!(err, GenerationError::DuplicateRoom(GridPos::ORIGIN)));

        let node = RoomGraphNode { grid_pos: GridPos::new(1, 0), ..node };
        let err = level
            .add_room(&node, "closet", &RoomTemplate::blank(4, 10), None)
            .expect_err("a 3-wide gap needs 5 tiles");
        assert!(matches!(err, GenerationError::UndersizedTemplate { rows: 4, .. }));
    }

    #[test]
    fn hallway_needs_both_rooms() {
        let mut level = arena_level(None);
        let err = level.add_hallway(GridPos::ORIGIN, GridPos::new(1, 0)).expect_err("no east room");
        assert!(matches!(err, GenerationError::MissingRoom(pos) if pos == GridPos::new(1, 0)));
    }

    #[test]
    fn cleanup_mid_battle_detaches_everything() {
        let battle = BattleTemplate::from_waves(&[&[("slime", 2)], &[("knight", 1)]]);
        let mut level = arena_level(Some(&battle));
        let mut roster = EnemyRoster::new();
        let room = level.get_room_at_grid(GridPos::ORIGIN).expect("origin");
        let centre = room.tile_offset.offset(3, 3);

        level.update(0.016, tile_centre(centre), &mut roster);
        level.update(0.016, tile_centre(centre), &mut roster);

        let detached = level.cleanup();
        assert_eq!(detached.len(), 1);
        assert_eq!(level.player_room(), None);
        assert!(level.events().is_empty());
        let room = level.get_room_at_grid(GridPos::ORIGIN).expect("origin");
        assert!(room.objects().is_empty());
        assert!(room.battle().is_some_and(|battle| battle.waves()[0].spawned().is_empty()));
    }
}
