use std::collections::{BTreeSet, VecDeque};

use delve_core::{
    Direction, GridPos, Layer, Level, LevelConfig, LevelGenerator, Room, TemplateCatalog, TilePos,
};
use proptest::prelude::*;

fn generate(seed: u64, config: LevelConfig) -> Level {
    let catalog = TemplateCatalog::build_default();
    LevelGenerator::new(seed, config, &catalog).generate().expect("default pack always generates")
}

fn room_at(level: &Level, pos: GridPos) -> &Room {
    level.get_room_at_grid(pos).unwrap_or_else(|| panic!("no room at {pos:?}"))
}

fn reachable_from_origin(level: &Level) -> BTreeSet<GridPos> {
    let mut seen = BTreeSet::from([GridPos::ORIGIN]);
    let mut queue = VecDeque::from([GridPos::ORIGIN]);
    while let Some(pos) = queue.pop_front() {
        for &next in level.connections().get(&pos).map(Vec::as_slice).unwrap_or_default() {
            if seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn rectangles_overlap(a: &Room, b: &Room) -> bool {
    let (a0, b0) = (a.tile_offset, b.tile_offset);
    a0.x < b0.x + b.cols && b0.x < a0.x + a.cols && a0.y < b0.y + b.rows && b0.y < a0.y + a.rows
}

/// Walks from one room's gap to the facing gap across the hallway and
/// reports the first tile that breaks the corridor.
fn corridor_seam(level: &Level, from: &Room, to: &Room) -> Option<String> {
    let width = level.config().gap_width();
    let direction = from.grid_pos.direction_to(to.grid_pos)?;
    let (near, far, horizontal) = match direction {
        Direction::East => (from.anchors.east, to.anchors.west, true),
        Direction::West => (to.anchors.east, from.anchors.west, true),
        Direction::South => (from.anchors.south, to.anchors.north, false),
        Direction::North => (to.anchors.south, from.anchors.north, false),
    };
    let (start, end) = if horizontal { (near.x, far.x) } else { (near.y, far.y) };
    if (horizontal && near.y != far.y) || (!horizontal && near.x != far.x) {
        return Some(format!("anchors {near:?} and {far:?} are not level"));
    }

    let at = |along: i32, across: i32| {
        if horizontal {
            TilePos::new(along, near.y + across)
        } else {
            TilePos::new(near.x + across, along)
        }
    };
    for along in start..=end {
        for across in 0..width {
            let pos = at(along, across);
            if level.is_tile(Layer::Collision, pos) {
                return Some(format!("wall inside corridor at {pos:?}"));
            }
            if !level.is_tile(Layer::Ground, pos) {
                return Some(format!("missing floor at {pos:?}"));
            }
        }
        for edge in [at(along, -1), at(along, width)] {
            if !level.is_tile(Layer::Collision, edge) {
                return Some(format!("corridor edge open at {edge:?}"));
            }
        }
    }
    None
}

fn check_layout(level: &Level) -> Result<(), String> {
    let reachable = reachable_from_origin(level);
    for room in level.rooms() {
        if !reachable.contains(&room.grid_pos) {
            return Err(format!("room {:?} is not reachable from the origin", room.grid_pos));
        }
    }

    let separation = level.config().room_separation;
    let rooms: Vec<&Room> = level.rooms().collect();
    for (index, room) in rooms.iter().enumerate() {
        let cell = TilePos::new(room.grid_pos.x * separation, room.grid_pos.y * separation);
        let local = room.tile_offset - cell;
        let inside_cell = local.x >= 0
            && local.y >= 0
            && local.x + room.cols <= separation
            && local.y + room.rows <= separation;
        if !inside_cell {
            return Err(format!("room {:?} leaves its cell", room.grid_pos));
        }
        for other in &rooms[index + 1..] {
            if rectangles_overlap(room, other) {
                return Err(format!("rooms {:?} and {:?} overlap", room.grid_pos, other.grid_pos));
            }
        }
    }

    for (&pos, neighbours) in level.connections() {
        for &neighbour in neighbours {
            let seam = corridor_seam(level, room_at(level, pos), room_at(level, neighbour));
            if let Some(seam) = seam {
                return Err(format!("{pos:?} -> {neighbour:?}: {seam}"));
            }
        }
    }
    Ok(())
}

#[test]
fn default_level_is_connected_and_seamless() {
    let level = generate(42, LevelConfig::default());
    assert!(level.room_count() >= 5);
    check_layout(&level).expect("layout invariants");
}

#[test]
fn identical_seeds_produce_identical_layouts() {
    let first = generate(9_001, LevelConfig::default());
    let second = generate(9_001, LevelConfig::default());
    assert_eq!(first.canonical_bytes(), second.canonical_bytes());
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn different_seeds_produce_different_layouts() {
    let first = generate(1, LevelConfig::default());
    let second = generate(2, LevelConfig::default());
    assert_ne!(first.fingerprint(), second.fingerprint());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]
    #[test]
    fn generated_levels_keep_layout_invariants(
        seed in any::<u64>(),
        depth in 1_u32..=4,
        wall_gap_radius in 0_i32..=2,
        odd_cells in any::<bool>()
    ) {
        let config = LevelConfig {
            depth,
            wall_gap_radius,
            room_separation: if odd_cells { 21 } else { 22 },
            ..Default::default()
        };
        let level = generate(seed, config);
        let outcome = check_layout(&level);
        prop_assert!(outcome.is_ok(), "seed={seed} depth={depth} r={wall_gap_radius}: {outcome:?}");
    }

    #[test]
    fn generation_is_deterministic(seed in any::<u64>()) {
        let config = LevelConfig { depth: 2, ..Default::default() };
        let first = generate(seed, config.clone());
        let second = generate(seed, config);
        prop_assert_eq!(first.fingerprint(), second.fingerprint());
    }
}
