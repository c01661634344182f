use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use delve_core::{Layer, Level, LevelConfig, LevelGenerator, TemplateCatalog, TilePos};

/// Generate a dungeon level and print its layout
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// TOML file overriding the default level config
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Directory of room template JSON files (requires --battles)
    #[arg(long, requires = "battles")]
    rooms: Option<PathBuf>,
    /// Directory of battle template JSON files (requires --rooms)
    #[arg(long, requires = "rooms")]
    battles: Option<PathBuf>,
    /// Print the tile map after the summary
    #[arg(long)]
    ascii: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => LevelConfig::load(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => LevelConfig::default(),
    };
    let catalog = match (&args.rooms, &args.battles) {
        (Some(rooms), Some(battles)) => {
            TemplateCatalog::load_dirs(rooms, battles, config.room_separation)
                .context("Failed to load template directories")?
        }
        _ => TemplateCatalog::build_default(),
    };

    let level = LevelGenerator::new(args.seed, config, &catalog)
        .generate()
        .with_context(|| format!("Generation failed for seed {}", args.seed))?;

    let hallways = level.connections().values().map(Vec::len).sum::<usize>() / 2;
    println!("Seed: {}", args.seed);
    println!("Rooms: {}", level.room_count());
    println!("Hallways: {hallways}");
    println!("End rooms: {:?}", level.end_rooms());
    println!("Fingerprint: {:016x}", level.fingerprint());

    if args.ascii {
        println!();
        print!("{}", ascii_map(&level));
    }
    Ok(())
}

/// `#` collision, `^` overhead, `o` object, `.` floor.
fn ascii_map(level: &Level) -> String {
    let store = level.store();
    let Some((min, max)) = store.bounds() else {
        return String::new();
    };
    let objects: BTreeSet<TilePos> = level
        .rooms()
        .flat_map(|room| room.objects().iter().map(|object| object.tile_pos))
        .collect();

    let mut out = String::new();
    for y in min.y..=max.y {
        let mut line = String::new();
        for x in min.x..=max.x {
            let pos = TilePos::new(x, y);
            let glyph = if store.is_tile(Layer::Collision, pos) {
                '#'
            } else if objects.contains(&pos) {
                'o'
            } else if store.is_tile(Layer::Overhead, pos) {
                '^'
            } else if store.is_tile(Layer::Ground, pos) {
                '.'
            } else {
                ' '
            };
            line.push(glyph);
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}
