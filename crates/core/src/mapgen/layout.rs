//! Turns one graph node plus a room template into tiles, walls, and a [`Room`].

use crate::battle::Battle;
use crate::objects::GameObject;
use crate::room::{Room, RoomContext};
use crate::template::{BattleTemplate, RoomTemplate};
use crate::tiles::Tile;
use crate::types::{Direction, Layer, TilePos};

use super::graph::RoomGraphNode;
use super::grid::{gap_span, room_tile_offset};

/// World tile of the lowest-index gap cell on each wall of a room.
///
/// Computed for every side whether or not it is connected, so a hallway can
/// be checked against both rooms it joins.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GapAnchors {
    pub north: TilePos,
    pub south: TilePos,
    pub west: TilePos,
    pub east: TilePos,
}

impl GapAnchors {
    pub fn compute(tile_offset: TilePos, rows: i32, cols: i32, wall_gap_radius: i32) -> Self {
        let first_col = *gap_span(cols, wall_gap_radius).start();
        let first_row = *gap_span(rows, wall_gap_radius).start();
        Self {
            north: tile_offset.offset(first_col, 0),
            south: tile_offset.offset(first_col, rows - 1),
            west: tile_offset.offset(0, first_row),
            east: tile_offset.offset(cols - 1, first_row),
        }
    }

    pub fn side(&self, direction: Direction) -> TilePos {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::West => self.west,
            Direction::East => self.east,
        }
    }
}

/// Writes `template` into the cell of `node` and returns the built room.
///
/// The template must already fit the configured room separation; callers
/// validate that before getting here.
pub fn instantiate(
    node: &RoomGraphNode,
    name: &str,
    template: &RoomTemplate,
    battle: Option<&BattleTemplate>,
    context: &mut RoomContext<'_>,
) -> Room {
    let config = context.config;
    debug_assert!(template.fits(config.room_separation), "{name} does not fit its cell");

    let (rows, cols) = (template.rows, template.cols);
    let tile_offset = room_tile_offset(node.grid_pos, rows, cols, config.room_separation);
    let mut room = Room::new(name, node, tile_offset, rows, cols);
    room.anchors = GapAnchors::compute(tile_offset, rows, cols, config.wall_gap_radius);

    write_template_tiles(template, &room, context);
    if template.random_floor {
        fill_floor(&room, context);
    }
    room.hallway_gap_tiles = write_walls(&room, context);

    for object in &template.objects {
        let [x, y] = object.pos;
        match GameObject::from_name(&object.name, tile_offset.offset(x, y), config.tile_size) {
            Some(game_object) => room.add_object(game_object),
            None => log::warn!("room '{name}': unknown object '{}' skipped", object.name),
        }
    }

    if let Some(battle) = battle {
        room.set_battle(Battle::from_template(battle));
    }
    room
}

fn write_template_tiles(template: &RoomTemplate, room: &Room, context: &mut RoomContext<'_>) {
    for (index, tiles) in template.tiles.iter().enumerate() {
        let Some(layer) = Layer::from_index(index) else {
            log::warn!("room '{}': tiles on unknown layer {index} ignored", room.name);
            continue;
        };
        for tile in tiles {
            let local = TilePos::new(tile.col(), tile.row());
            if !room.check_bounds(local) {
                continue;
            }
            let pos = room.tile_offset + local;
            let (sheet, image_index) = &tile.image_info;
            let tile = Tile::at(sheet, *image_index, pos, context.config.tile_size);
            context.store.insert(layer, pos, tile);
        }
    }
}

fn fill_floor(room: &Room, context: &mut RoomContext<'_>) {
    let config = context.config;
    let sheet = &config.floor_sheet;
    for row in 0..room.rows {
        for col in 0..room.cols {
            let pos = room.tile_offset.offset(col, row);
            if context.store.is_tile(Layer::Ground, pos) {
                continue;
            }
            let variant = context.rng.variant(sheet.variants);
            let tile = Tile::at(&sheet.name, variant, pos, config.tile_size);
            context.store.insert(Layer::Ground, pos, tile);
        }
    }
}

/// Walls the perimeter and returns the room-local cells left open for hallways.
fn write_walls(room: &Room, context: &mut RoomContext<'_>) -> Vec<TilePos> {
    let config = context.config;
    let radius = config.wall_gap_radius;
    let (rows, cols) = (room.rows, room.cols);

    let mut gaps = Vec::new();
    for direction in [Direction::North, Direction::South, Direction::West, Direction::East] {
        if !room.connections.has(direction) {
            continue;
        }
        match direction {
            Direction::North => gaps.extend(gap_span(cols, radius).map(|x| TilePos::new(x, 0))),
            Direction::South => {
                gaps.extend(gap_span(cols, radius).map(|x| TilePos::new(x, rows - 1)))
            }
            Direction::West => gaps.extend(gap_span(rows, radius).map(|y| TilePos::new(0, y))),
            Direction::East => {
                gaps.extend(gap_span(rows, radius).map(|y| TilePos::new(cols - 1, y)))
            }
        }
    }

    let sheet = &config.wall_sheet;
    for row in 0..rows {
        for col in 0..cols {
            let on_perimeter = row == 0 || col == 0 || row == rows - 1 || col == cols - 1;
            if !on_perimeter {
                continue;
            }
            let local = TilePos::new(col, row);
            let pos = room.tile_offset + local;
            if gaps.contains(&local) {
                context.store.remove(Layer::Collision, pos);
            } else {
                let variant = context.rng.variant(sheet.variants);
                let tile = Tile::at(&sheet.name, variant, pos, config.tile_size);
                context.store.insert(Layer::Collision, pos, tile);
            }
        }
    }
    gaps
}
