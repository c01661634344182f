//! Instantiated rooms and the wall sealing driven by their battles.

use std::mem;

use crate::battle::{Battle, BattleEvent, EnemyFactory};
use crate::config::LevelConfig;
use crate::mapgen::{GapAnchors, RoomGraphNode};
use crate::objects::GameObject;
use crate::rng::DungeonRng;
use crate::tiles::{Tile, TileStore};
use crate::types::{Connections, GridPos, Layer, TilePos, WorldPos};

/// Shared level state a room reads and writes while it is built or updated.
pub struct RoomContext<'a> {
    pub config: &'a LevelConfig,
    pub store: &'a mut TileStore,
    pub rng: &'a mut DungeonRng,
}

/// Footprint of a room in world tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoomBounds {
    pub tile_offset: TilePos,
    pub rows: i32,
    pub cols: i32,
}

impl RoomBounds {
    pub fn check_bounds(&self, local: TilePos) -> bool {
        (0..self.cols).contains(&local.x) && (0..self.rows).contains(&local.y)
    }

    /// At least one tile away from every wall.
    pub fn is_strictly_inside(&self, local: TilePos) -> bool {
        (1..self.cols - 1).contains(&local.x) && (1..self.rows - 1).contains(&local.y)
    }

    pub fn to_local(&self, world: TilePos) -> TilePos {
        world - self.tile_offset
    }

    /// Samples interior tiles until one is free of walls.
    ///
    /// Returns a point near the bottom-middle of the chosen tile, or `None`
    /// once `config.spawn_attempts` samples have all hit walls.
    pub fn generate_spawn_pos(
        &self,
        store: &TileStore,
        rng: &mut DungeonRng,
        config: &LevelConfig,
    ) -> Option<WorldPos> {
        if self.rows < 3 || self.cols < 3 {
            return None;
        }
        for _ in 0..config.spawn_attempts {
            let row = rng.range_i32(1, self.rows - 1);
            let col = rng.range_i32(1, self.cols - 1);
            let pos = self.tile_offset.offset(col, row);
            if store.is_tile(Layer::Collision, pos) {
                continue;
            }
            let size = config.tile_size;
            return Some(WorldPos {
                x: (col as f32 + 0.5) * size + self.tile_offset.x as f32 * size,
                y: (row as f32 + 0.8) * size + self.tile_offset.y as f32 * size,
            });
        }
        None
    }
}

#[derive(Clone, Debug)]
pub struct Room {
    pub name: String,
    pub grid_pos: GridPos,
    pub depth: u32,
    /// World tile of the room's local `(0, 0)`.
    pub tile_offset: TilePos,
    pub rows: i32,
    pub cols: i32,
    pub connections: Connections,
    pub anchors: GapAnchors,
    /// Room-local wall cells left open for hallways.
    pub hallway_gap_tiles: Vec<TilePos>,
    objects: Vec<GameObject>,
    battle: Option<Battle>,
    battle_in_progress: bool,
}

impl Room {
    pub fn new(
        name: &str,
        node: &RoomGraphNode,
        tile_offset: TilePos,
        rows: i32,
        cols: i32,
    ) -> Self {
        Self {
            name: name.to_string(),
            grid_pos: node.grid_pos,
            depth: node.depth,
            tile_offset,
            rows,
            cols,
            connections: node.connections,
            anchors: GapAnchors::default(),
            hallway_gap_tiles: Vec::new(),
            objects: Vec::new(),
            battle: None,
            battle_in_progress: false,
        }
    }

    pub fn bounds(&self) -> RoomBounds {
        RoomBounds { tile_offset: self.tile_offset, rows: self.rows, cols: self.cols }
    }

    pub fn check_bounds(&self, local: TilePos) -> bool {
        self.bounds().check_bounds(local)
    }

    pub fn is_strictly_inside(&self, local: TilePos) -> bool {
        self.bounds().is_strictly_inside(local)
    }

    pub fn contains_tile(&self, world: TilePos) -> bool {
        self.check_bounds(world - self.tile_offset)
    }

    pub fn generate_spawn_pos(
        &self,
        store: &TileStore,
        rng: &mut DungeonRng,
        config: &LevelConfig,
    ) -> Option<WorldPos> {
        self.bounds().generate_spawn_pos(store, rng, config)
    }

    pub fn battle(&self) -> Option<&Battle> {
        self.battle.as_ref()
    }

    pub(crate) fn set_battle(&mut self, battle: Battle) {
        self.battle = Some(battle);
    }

    pub fn battle_in_progress(&self) -> bool {
        self.battle_in_progress
    }

    pub fn has_pending_battle(&self) -> bool {
        self.battle.as_ref().is_some_and(|battle| !battle.is_completed())
    }

    /// Player stepped fully inside. Seals the gaps when a battle is still pending.
    ///
    /// Returns `true` only on the call that starts the battle.
    pub fn entered(&mut self, context: &mut RoomContext<'_>) -> bool {
        if !self.has_pending_battle() {
            return false;
        }
        let started = !self.battle_in_progress;
        self.battle_in_progress = true;
        self.activate_walls(context);
        if started {
            log::debug!("room {:?} sealed for battle", self.grid_pos);
        }
        started
    }

    pub fn exited(&mut self) {
        log::debug!("left room {:?}", self.grid_pos);
    }

    /// Per-frame tick for the room the player occupies.
    pub fn update(
        &mut self,
        delta: f32,
        context: &mut RoomContext<'_>,
        enemies: &mut dyn EnemyFactory,
    ) -> Vec<BattleEvent> {
        for object in &mut self.objects {
            object.update(delta);
        }

        if !self.battle_in_progress {
            return Vec::new();
        }
        let bounds = self.bounds();
        let Some(battle) = self.battle.as_mut() else {
            return Vec::new();
        };

        let events = {
            let (store, rng, config) = (&*context.store, &mut *context.rng, context.config);
            battle.update(enemies, &mut || bounds.generate_spawn_pos(store, rng, config))
        };

        if battle.is_completed() {
            self.battle_in_progress = false;
            self.deactivate_walls(context);
            log::debug!("room {:?} cleared", self.grid_pos);
        }
        events
    }

    /// Closes every hallway gap with a wall. Cells already walled are left alone.
    pub fn activate_walls(&self, context: &mut RoomContext<'_>) {
        let sheet = &context.config.wall_sheet;
        for &local in &self.hallway_gap_tiles {
            let pos = self.tile_offset + local;
            if context.store.is_tile(Layer::Collision, pos) {
                continue;
            }
            let variant = context.rng.variant(sheet.variants);
            let tile = Tile::at(&sheet.name, variant, pos, context.config.tile_size);
            context.store.insert(Layer::Collision, pos, tile);
        }
    }

    pub fn deactivate_walls(&self, context: &mut RoomContext<'_>) {
        for &local in &self.hallway_gap_tiles {
            context.store.remove(Layer::Collision, self.tile_offset + local);
        }
    }

    pub fn objects(&self) -> &[GameObject] {
        &self.objects
    }

    pub fn add_object(&mut self, object: GameObject) {
        self.objects.push(object);
    }

    pub fn get_object(&self, world: TilePos) -> Option<&GameObject> {
        self.objects.iter().find(|object| object.tile_pos == world)
    }

    pub fn remove_object(&mut self, world: TilePos) -> Option<GameObject> {
        let index = self.objects.iter().position(|object| object.tile_pos == world)?;
        Some(self.objects.remove(index))
    }

    /// Detaches every object and drops battle enemy handles.
    pub fn cleanup(&mut self) -> Vec<GameObject> {
        if let Some(battle) = self.battle.as_mut() {
            battle.abandon();
        }
        self.battle_in_progress = false;
        mem::take(&mut self.objects)
    }
}
