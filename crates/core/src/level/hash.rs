//! Stable layout hashing for deterministic verification.

use xxhash_rust::xxh3::xxh3_64;

use super::Level;

impl Level {
    /// Byte encoding of the generated layout: rooms, end rooms, and every tile.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.config.room_separation.to_le_bytes());
        bytes.extend(self.config.wall_gap_radius.to_le_bytes());

        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for (grid_pos, room) in &self.rooms {
            bytes.extend(grid_pos.x.to_le_bytes());
            bytes.extend(grid_pos.y.to_le_bytes());
            bytes.extend((room.name.len() as u32).to_le_bytes());
            bytes.extend(room.name.as_bytes());
            bytes.extend(room.tile_offset.x.to_le_bytes());
            bytes.extend(room.tile_offset.y.to_le_bytes());
            bytes.extend(room.rows.to_le_bytes());
            bytes.extend(room.cols.to_le_bytes());
            bytes.push(room.connections.bits());

            bytes.extend((room.objects().len() as u32).to_le_bytes());
            for object in room.objects() {
                bytes.push(object.kind as u8);
                bytes.extend(object.tile_pos.x.to_le_bytes());
                bytes.extend(object.tile_pos.y.to_le_bytes());
            }

            match room.battle() {
                Some(battle) => {
                    bytes.push(1);
                    bytes.extend((battle.waves().len() as u32).to_le_bytes());
                    for wave in battle.waves() {
                        bytes.extend(wave.requested().to_le_bytes());
                    }
                }
                None => bytes.push(0),
            }
        }

        bytes.extend((self.end_rooms.len() as u32).to_le_bytes());
        for end_room in &self.end_rooms {
            bytes.extend(end_room.x.to_le_bytes());
            bytes.extend(end_room.y.to_le_bytes());
        }

        self.store.write_canonical_bytes(&mut bytes);
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }
}
