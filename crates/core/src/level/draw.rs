//! Draw-order dispatch over the tile store.
//!
//! No graphics here: a [`DrawSink`] receives tiles layer by layer, row by
//! row, with a hook after each collision-layer row so y-sorted entities can
//! be interleaved with walls.

use super::Level;
use crate::tiles::Tile;
use crate::types::{Layer, TilePos, WorldPos};

const VIEW_MARGIN: i32 = 2;

pub trait DrawSink {
    fn draw_tile(&mut self, layer: Layer, pos: TilePos, tile: &Tile);

    /// Called after each collision-layer row with that row's index.
    fn draw_entities(&mut self, _row: i32) {}
}

/// Half-open tile rectangle: `min` inclusive, `max` exclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRect {
    pub min: TilePos,
    pub max: TilePos,
}

impl TileRect {
    pub fn new(min: TilePos, max: TilePos) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        (self.min.x..self.max.x).contains(&pos.x) && (self.min.y..self.max.y).contains(&pos.y)
    }
}

impl Level {
    /// Tiles visible from a camera whose top-left corner is `camera`,
    /// padded so sprites taller than one tile are not clipped.
    pub fn view_for_camera(&self, camera: WorldPos, width: f32, height: f32) -> TileRect {
        let tile_size = self.config.tile_size;
        let bottom_right = WorldPos::new(camera.x + width, camera.y + height);
        TileRect {
            min: TilePos::from_world(camera, tile_size),
            max: TilePos::from_world(bottom_right, tile_size).offset(VIEW_MARGIN, VIEW_MARGIN),
        }
    }

    pub fn draw(&self, view: TileRect, sink: &mut dyn DrawSink) {
        for layer in Layer::ALL {
            for row in view.min.y..view.max.y {
                for col in view.min.x..view.max.x {
                    let pos = TilePos::new(col, row);
                    if let Some(tile) = self.store.get(layer, pos) {
                        sink.draw_tile(layer, pos, tile);
                    }
                }
                if layer == Layer::Collision {
                    sink.draw_entities(row);
                }
            }
        }
    }
}
