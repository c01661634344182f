//! Static room objects placed by templates.
//!
//! Every placeable object is a variant of [`ObjectKind`]; its sprite and
//! animation data live in one static table keyed by the template name.

use crate::types::{TilePos, WorldPos};

const FRAME_SECONDS: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKind {
    Torch,
    Chest,
    Lever,
    Altar,
    SmallCube,
    SmallGreenCube,
    SmallRedCube,
    LargeCube,
    LargeGreenCube,
    LargeRedCube,
}

pub struct ObjectSpec {
    pub kind: ObjectKind,
    pub name: &'static str,
    pub sheet: &'static str,
    pub first_image: u32,
    pub frames: u32,
    pub looping: bool,
    pub blocking: bool,
}

const OBJECT_TABLE: [ObjectSpec; 10] = [
    spec(ObjectKind::Torch, "torch", "objects", 1, 1, false, false),
    spec(ObjectKind::Chest, "chest", "small_animatable", 63, 6, false, true),
    spec(ObjectKind::Lever, "lever", "small_animatable", 56, 7, false, false),
    spec(ObjectKind::Altar, "altar", "objects", 4, 1, false, true),
    spec(ObjectKind::SmallCube, "small_cube", "cubes", 0, 4, true, true),
    spec(ObjectKind::SmallGreenCube, "small_green_cube", "cubes", 4, 4, true, true),
    spec(ObjectKind::SmallRedCube, "small_red_cube", "cubes", 8, 4, true, true),
    spec(ObjectKind::LargeCube, "large_cube", "large_cubes", 0, 4, true, true),
    spec(ObjectKind::LargeGreenCube, "large_green_cube", "large_cubes", 4, 4, true, true),
    spec(ObjectKind::LargeRedCube, "large_red_cube", "large_cubes", 8, 4, true, true),
];

const fn spec(
    kind: ObjectKind,
    name: &'static str,
    sheet: &'static str,
    first_image: u32,
    frames: u32,
    looping: bool,
    blocking: bool,
) -> ObjectSpec {
    ObjectSpec { kind, name, sheet, first_image, frames, looping, blocking }
}

impl ObjectKind {
    pub fn from_name(name: &str) -> Option<Self> {
        OBJECT_TABLE.iter().find(|spec| spec.name == name).map(|spec| spec.kind)
    }

    pub fn spec(self) -> &'static ObjectSpec {
        let Some(spec) = OBJECT_TABLE.iter().find(|spec| spec.kind == self) else {
            unreachable!("every object kind has a table entry");
        };
        spec
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameObject {
    pub kind: ObjectKind,
    pub tile_pos: TilePos,
    /// Mid-bottom anchor in pixels.
    pub world_pos: WorldPos,
    frame: u32,
    frame_time: f32,
}

impl GameObject {
    pub fn new(kind: ObjectKind, tile_pos: TilePos, tile_size: f32) -> Self {
        let world_pos = WorldPos {
            x: (tile_pos.x as f32 + 0.5) * tile_size,
            y: (tile_pos.y + 1) as f32 * tile_size,
        };
        Self { kind, tile_pos, world_pos, frame: 0, frame_time: 0.0 }
    }

    pub fn from_name(name: &str, tile_pos: TilePos, tile_size: f32) -> Option<Self> {
        ObjectKind::from_name(name).map(|kind| Self::new(kind, tile_pos, tile_size))
    }

    pub fn image_index(&self) -> u32 {
        self.kind.spec().first_image + self.frame
    }

    pub fn blocks(&self) -> bool {
        self.kind.spec().blocking
    }

    pub fn update(&mut self, delta: f32) {
        let spec = self.kind.spec();
        if spec.frames <= 1 {
            return;
        }
        self.frame_time += delta;
        while self.frame_time >= FRAME_SECONDS {
            self.frame_time -= FRAME_SECONDS;
            if self.frame + 1 < spec.frames {
                self.frame += 1;
            } else if spec.looping {
                self.frame = 0;
            }
        }
    }
}
