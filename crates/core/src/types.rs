use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct EnemyId;
}

/// Coarse cell of the dungeon layout; one room per cell.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const ORIGIN: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self { x: self.x + dx, y: self.y + dy }
    }

    /// Direction of `other` when it is one of the four cardinal neighbours.
    pub fn direction_to(self, other: Self) -> Option<Direction> {
        Direction::ALL.into_iter().find(|&direction| self.step(direction) == other)
    }

    pub fn from_world(pos: WorldPos, room_span: f32) -> Self {
        Self { x: floor_div(pos.x, room_span), y: floor_div(pos.y, room_span) }
    }
}

/// Tile coordinate in world tile units (`x` is the column, `y` the row).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TilePos {
    pub x: i32,
    pub y: i32,
}

impl TilePos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }

    pub fn from_world(pos: WorldPos, tile_size: f32) -> Self {
        Self { x: floor_div(pos.x, tile_size), y: floor_div(pos.y, tile_size) }
    }

    /// Top-left corner of this tile in pixels.
    pub fn to_world(self, tile_size: f32) -> WorldPos {
        WorldPos { x: self.x as f32 * tile_size, y: self.y as f32 * tile_size }
    }
}

impl Add for TilePos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for TilePos {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

/// Pixel-space position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

fn floor_div(value: f32, size: f32) -> i32 {
    (value / size).floor() as i32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    East,
    West,
    South,
    North,
}

impl Direction {
    /// Expansion order used by the room graph; changing it changes every seed's layout.
    pub const ALL: [Self; 4] = [Self::East, Self::West, Self::South, Self::North];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::East => (1, 0),
            Self::West => (-1, 0),
            Self::South => (0, 1),
            Self::North => (0, -1),
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::East => Self::West,
            Self::West => Self::East,
            Self::South => Self::North,
            Self::North => Self::South,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Layer {
    Ground,
    Collision,
    Overhead,
}

impl Layer {
    pub const ALL: [Self; 3] = [Self::Ground, Self::Collision, Self::Overhead];

    pub const fn index(self) -> usize {
        match self {
            Self::Ground => 0,
            Self::Collision => 1,
            Self::Overhead => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }
}

/// Which sides of a room open onto a hallway.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Connections {
    pub north: bool,
    pub south: bool,
    pub west: bool,
    pub east: bool,
}

impl Connections {
    pub const NONE: Self = Self { north: false, south: false, west: false, east: false };

    pub fn has(self, direction: Direction) -> bool {
        match direction {
            Direction::North => self.north,
            Direction::South => self.south,
            Direction::West => self.west,
            Direction::East => self.east,
        }
    }

    pub fn set(&mut self, direction: Direction) {
        match direction {
            Direction::North => self.north = true,
            Direction::South => self.south = true,
            Direction::West => self.west = true,
            Direction::East => self.east = true,
        }
    }

    pub fn with(mut self, direction: Direction) -> Self {
        self.set(direction);
        self
    }

    pub fn count(self) -> usize {
        Direction::ALL.into_iter().filter(|&direction| self.has(direction)).count()
    }

    pub(crate) fn bits(self) -> u8 {
        u8::from(self.north)
            | (u8::from(self.south) << 1)
            | (u8::from(self.west) << 2)
            | (u8::from(self.east) << 3)
    }
}
