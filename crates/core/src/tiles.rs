//! Sparse layered tile map shared by collision checks and draw dispatch.
//!
//! Layer 0 is ground, layer 1 holds walls and is the only colliding layer,
//! layer 2 is drawn above entities. A coordinate holds at most one tile per
//! layer; an empty collision cell is walkable.

use std::collections::BTreeMap;

use crate::types::{Layer, TilePos, WorldPos};

#[derive(Clone, Debug, PartialEq)]
pub struct Tile {
    pub sheet: String,
    pub image_index: u32,
    /// Bottom-left sprite anchor in pixels.
    pub world_pos: WorldPos,
}

impl Tile {
    pub fn new(sheet: &str, image_index: u32, world_pos: WorldPos) -> Self {
        Self { sheet: sheet.to_string(), image_index, world_pos }
    }

    /// Tile anchored to the bottom-left corner of `pos`.
    pub fn at(sheet: &str, image_index: u32, pos: TilePos, tile_size: f32) -> Self {
        Self::new(
            sheet,
            image_index,
            WorldPos { x: pos.x as f32 * tile_size, y: (pos.y + 1) as f32 * tile_size },
        )
    }
}

#[derive(Clone, Debug, Default)]
pub struct TileStore {
    layers: BTreeMap<Layer, BTreeMap<TilePos, Tile>>,
}

impl TileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_tile(&self, layer: Layer, pos: TilePos) -> bool {
        self.layers.get(&layer).is_some_and(|tiles| tiles.contains_key(&pos))
    }

    pub fn get(&self, layer: Layer, pos: TilePos) -> Option<&Tile> {
        self.layers.get(&layer)?.get(&pos)
    }

    /// Places `tile`, returning whatever occupied the cell before.
    pub fn insert(&mut self, layer: Layer, pos: TilePos, tile: Tile) -> Option<Tile> {
        self.layers.entry(layer).or_default().insert(pos, tile)
    }

    pub fn remove(&mut self, layer: Layer, pos: TilePos) -> Option<Tile> {
        let tiles = self.layers.get_mut(&layer)?;
        let removed = tiles.remove(&pos);
        if tiles.is_empty() {
            self.layers.remove(&layer);
        }
        removed
    }

    pub fn has_layer(&self, layer: Layer) -> bool {
        self.layers.contains_key(&layer)
    }

    pub fn layer(&self, layer: Layer) -> impl Iterator<Item = (TilePos, &Tile)> + '_ {
        self.layers.get(&layer).into_iter().flat_map(|tiles| tiles.iter().map(|(p, t)| (*p, t)))
    }

    pub fn len(&self) -> usize {
        self.layers.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Inclusive corners of the rectangle covering every stored tile.
    pub fn bounds(&self) -> Option<(TilePos, TilePos)> {
        let mut positions = self.layers.values().flat_map(BTreeMap::keys);
        let first = *positions.next()?;
        Some(positions.fold((first, first), |(min, max), pos| {
            (
                TilePos { x: min.x.min(pos.x), y: min.y.min(pos.y) },
                TilePos { x: max.x.max(pos.x), y: max.y.max(pos.y) },
            )
        }))
    }

    pub(crate) fn write_canonical_bytes(&self, bytes: &mut Vec<u8>) {
        for (layer, tiles) in &self.layers {
            bytes.push(layer.index() as u8);
            bytes.extend((tiles.len() as u32).to_le_bytes());
            for (pos, tile) in tiles {
                bytes.extend(pos.x.to_le_bytes());
                bytes.extend(pos.y.to_le_bytes());
                bytes.extend((tile.sheet.len() as u32).to_le_bytes());
                bytes.extend(tile.sheet.as_bytes());
                bytes.extend(tile.image_index.to_le_bytes());
            }
        }
    }
}
