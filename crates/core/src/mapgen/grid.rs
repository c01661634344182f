//! Cell-centring and wall-gap arithmetic shared by rooms and hallways.

use std::ops::RangeInclusive;

use crate::types::{GridPos, TilePos};

/// Offset that centres `dim` tiles inside a cell of `room_separation` tiles.
///
/// Odd cells shift even rooms by one so every room's midline lands on the
/// same cell column; that keeps facing gaps level with each other.
pub(super) fn centered_offset(room_separation: i32, dim: i32) -> i32 {
    let offset = (room_separation - dim).div_euclid(2);
    if room_separation % 2 != 0 && dim % 2 == 0 { offset + 1 } else { offset }
}

pub(super) fn midpoint(length: i32) -> i32 {
    if length % 2 == 0 { length / 2 - 1 } else { length / 2 }
}

/// Wall indices left open for a hallway of radius `radius` on a wall of `length` tiles.
pub(super) fn gap_span(length: i32, radius: i32) -> RangeInclusive<i32> {
    let mid = midpoint(length);
    (mid - radius)..=(mid + radius)
}

pub(super) fn room_tile_offset(
    grid_pos: GridPos,
    rows: i32,
    cols: i32,
    room_separation: i32,
) -> TilePos {
    TilePos {
        x: grid_pos.x * room_separation + centered_offset(room_separation, cols),
        y: grid_pos.y * room_separation + centered_offset(room_separation, rows),
    }
}
