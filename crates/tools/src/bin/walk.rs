use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use delve_core::{
    EnemyRoster, GridPos, Level, LevelConfig, LevelEvent, LevelGenerator, TemplateCatalog,
    TilePos, WorldPos,
};

/// Walk a scripted player through every room and fight each battle to the end
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of consecutive seeds to walk, starting at --seed
    #[arg(short, long, default_value_t = 1)]
    levels: u64,
    /// TOML file overriding the default level config
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Frames to spend in a sealed room before giving up on its battle
    #[arg(long, default_value_t = 600)]
    max_frames: u32,
}

const FRAME: f32 = 1.0 / 60.0;

#[derive(Default)]
struct WalkStats {
    room_entries: usize,
    battles_won: usize,
    waves_cleared: usize,
    enemies_killed: usize,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = match &args.config {
        Some(path) => LevelConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => LevelConfig::default(),
    };
    let catalog = TemplateCatalog::build_default();

    for seed in args.seed..args.seed.saturating_add(args.levels) {
        let mut level = LevelGenerator::new(seed, config.clone(), &catalog)
            .generate()
            .with_context(|| format!("Generation failed for seed {seed}"))?;
        let stats = walk(&mut level, args.max_frames)
            .with_context(|| format!("Walk failed for seed {seed}"))?;
        println!(
            "seed {seed}: {} rooms, {} entries, {} battles won, {} waves cleared, {} kills",
            level.room_count(),
            stats.room_entries,
            stats.battles_won,
            stats.waves_cleared,
            stats.enemies_killed
        );
    }
    Ok(())
}

/// Depth-first walk over the hallway tree, backtracking through each hallway.
fn walk(level: &mut Level, max_frames: u32) -> Result<WalkStats> {
    let mut roster = EnemyRoster::new();
    let mut stats = WalkStats::default();
    let mut visited = vec![GridPos::ORIGIN];
    let mut path = vec![GridPos::ORIGIN];

    enter(level, &mut roster, &mut stats, GridPos::ORIGIN, max_frames)?;
    while let Some(&current) = path.last() {
        let next = level
            .connections()
            .get(&current)
            .and_then(|neighbours| neighbours.iter().find(|&&pos| !visited.contains(&pos)))
            .copied();

        match next {
            Some(next) => {
                cross(level, &mut roster, current, next)?;
                enter(level, &mut roster, &mut stats, next, max_frames)?;
                visited.push(next);
                path.push(next);
            }
            None => {
                path.pop();
                if let Some(&back) = path.last() {
                    cross(level, &mut roster, current, back)?;
                    enter(level, &mut roster, &mut stats, back, max_frames)?;
                }
            }
        }
    }

    if visited.len() != level.room_count() {
        bail!("walk reached {} of {} rooms", visited.len(), level.room_count());
    }
    Ok(stats)
}

/// Steps into the hallway between `from` and `to`.
fn cross(level: &mut Level, roster: &mut EnemyRoster, from: GridPos, to: GridPos) -> Result<()> {
    let room = level.get_room_at_grid(from).context("walk left a missing room")?;
    let direction = from.direction_to(to).context("hallway joins non-adjacent rooms")?;
    let (dx, dy) = direction.delta();
    let tile = room.anchors.side(direction).offset(dx, dy);
    let pos = tile_centre(tile, level.config().tile_size);

    level.update(FRAME, pos, roster);
    if level.player_room().is_some_and(|current| current != from) {
        bail!("hallway tile {tile:?} counted as part of room {:?}", level.player_room());
    }
    Ok(())
}

/// Stands in the middle of `grid_pos` until its battle, if any, is won.
fn enter(
    level: &mut Level,
    roster: &mut EnemyRoster,
    stats: &mut WalkStats,
    grid_pos: GridPos,
    max_frames: u32,
) -> Result<()> {
    let room = level.get_room_at_grid(grid_pos).context("walk entered a missing room")?;
    let pos = tile_centre(
        room.tile_offset.offset(room.cols / 2, room.rows / 2),
        level.config().tile_size,
    );

    let mut sealed = false;
    for _ in 0..max_frames {
        level.update(FRAME, pos, roster);
        stats.enemies_killed += roster.kill_all();

        for event in level.drain_events() {
            match event {
                LevelEvent::RoomEntered { sealed: now_sealed, .. } => {
                    stats.room_entries += 1;
                    sealed |= now_sealed;
                }
                LevelEvent::WaveCleared { .. } => stats.waves_cleared += 1,
                LevelEvent::BattleCompleted { .. } => {
                    stats.battles_won += 1;
                    sealed = false;
                }
                LevelEvent::RoomExited { .. } | LevelEvent::WaveSpawned { .. } => {}
            }
        }

        let room = level.get_room_at_grid(grid_pos).context("room vanished mid-walk")?;
        if !sealed && !room.battle_in_progress() {
            return Ok(());
        }
    }
    bail!("battle in room {grid_pos:?} did not finish within {max_frames} frames")
}

fn tile_centre(pos: TilePos, tile_size: f32) -> WorldPos {
    WorldPos::new((pos.x as f32 + 0.5) * tile_size, (pos.y as f32 + 0.5) * tile_size)
}
