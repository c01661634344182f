//! Straight corridors between the facing wall gaps of two neighbouring rooms.

use crate::config::LevelConfig;
use crate::error::GenerationError;
use crate::rng::DungeonRng;
use crate::room::Room;
use crate::tiles::{Tile, TileStore};
use crate::types::{Direction, Layer, TilePos};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Corridor footprint. Only lives long enough to write its tiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hallway {
    /// First floor tile next to the upper/left room's gap.
    pub origin: TilePos,
    /// Tiles between the two rooms along the corridor axis.
    pub length: i32,
    /// Tiles across the corridor; equals the wall gap width.
    pub width: i32,
    pub orientation: Orientation,
}

impl Hallway {
    /// Spans the gap between `from` and `to`, which must be cardinal grid neighbours.
    pub fn between(from: &Room, to: &Room, width: i32) -> Result<Self, GenerationError> {
        let Some(direction) = from.grid_pos.direction_to(to.grid_pos) else {
            return Err(GenerationError::NotStraight { from: from.grid_pos, to: to.grid_pos });
        };
        let (first, second) = match direction {
            Direction::East | Direction::South => (from, to),
            Direction::West | Direction::North => (to, from),
        };
        let misaligned = GenerationError::MisalignedGap { from: from.grid_pos, to: to.grid_pos };

        let hallway = match direction {
            Direction::East | Direction::West => {
                let exit = first.anchors.east;
                let entry = second.anchors.west;
                if exit.y != entry.y {
                    return Err(misaligned);
                }
                Self {
                    origin: exit.offset(1, 0),
                    length: entry.x - exit.x - 1,
                    width,
                    orientation: Orientation::Horizontal,
                }
            }
            Direction::South | Direction::North => {
                let exit = first.anchors.south;
                let entry = second.anchors.north;
                if exit.x != entry.x {
                    return Err(misaligned);
                }
                Self {
                    origin: exit.offset(0, 1),
                    length: entry.y - exit.y - 1,
                    width,
                    orientation: Orientation::Vertical,
                }
            }
        };

        if hallway.length < 0 {
            return Err(misaligned);
        }
        Ok(hallway)
    }

    fn at(&self, along: i32, across: i32) -> TilePos {
        match self.orientation {
            Orientation::Horizontal => self.origin.offset(along, across),
            Orientation::Vertical => self.origin.offset(across, along),
        }
    }

    pub fn floor_tiles(&self) -> Vec<TilePos> {
        (0..self.length)
            .flat_map(|along| (0..self.width).map(move |across| self.at(along, across)))
            .collect()
    }

    /// The two long edges. The rooms' own walls close the ends.
    pub fn wall_tiles(&self) -> Vec<TilePos> {
        (0..self.length)
            .flat_map(|along| [self.at(along, -1), self.at(along, self.width)])
            .collect()
    }

    pub fn populate(&self, store: &mut TileStore, config: &LevelConfig, rng: &mut DungeonRng) {
        let floor = &config.floor_sheet;
        for pos in self.floor_tiles() {
            let tile = Tile::at(&floor.name, rng.variant(floor.variants), pos, config.tile_size);
            store.insert(Layer::Ground, pos, tile);
        }

        let wall = &config.wall_sheet;
        for pos in self.wall_tiles() {
            let tile = Tile::at(&wall.name, rng.variant(wall.variants), pos, config.tile_size);
            store.insert(Layer::Collision, pos, tile);
        }
    }
}

/// Builds and writes the corridor joining two adjacent rooms.
pub fn connect(
    store: &mut TileStore,
    from: &Room,
    to: &Room,
    config: &LevelConfig,
    rng: &mut DungeonRng,
) -> Result<Hallway, GenerationError> {
    let hallway = Hallway::between(from, to, config.gap_width())?;
    hallway.populate(store, config, rng);
    Ok(hallway)
}
