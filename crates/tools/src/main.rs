use anyhow::{Context, Result};
use clap::Parser;
use glam::{Mat4, Vec3};
use serde::Deserialize;
use std::fs;
use themer_core::{
    CellId, CellType, ConstraintPolicy, DOOR_SOCKET, DungeonConfig, DungeonModel, GROUND_SOCKET,
    GridPos, MarkerList, RecordingEmitter, RuleRegistry, Theme, ThemeOverrideVolume,
    ThemeResolver, emission_fingerprint,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the theme set JSON file
    #[arg(short, long)]
    themes: String,
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Demo layout width in grid cells
    #[arg(long, default_value_t = 8)]
    width: i32,
    /// Demo layout depth in grid cells
    #[arg(long, default_value_t = 6)]
    depth: i32,
    #[arg(long, default_value_t = true)]
    doors_occupy_space: bool,
    #[arg(long, default_value_t = false)]
    merge_room_corridor: bool,
}

#[derive(Deserialize)]
struct ThemeFile {
    themes: Vec<Theme>,
    #[serde(default)]
    override_volumes: Vec<ThemeOverrideVolume>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let theme_data = fs::read_to_string(&args.themes)
        .with_context(|| format!("Failed to read theme file: {}", args.themes))?;
    let theme_file: ThemeFile =
        serde_json::from_str(&theme_data).context("Failed to deserialize theme JSON")?;

    let (model, mut markers) = demo_layout(args.seed, args.width, args.depth);
    let socket_count = markers.len();

    let registry = RuleRegistry::new();
    let policy = ConstraintPolicy {
        doors_occupy_space: args.doors_occupy_space,
        merge_room_corridor: args.merge_room_corridor,
    };
    let resolver = ThemeResolver::new(&model, &registry, policy);
    let mut emitter = RecordingEmitter::new();
    resolver
        .run(&mut markers, &theme_file.themes, &theme_file.override_volumes, &mut emitter)
        .map_err(|e| anyhow::anyhow!("Theming pass aborted: {e}"))?;

    println!("Theming pass complete.");
    println!("Sockets: {} emitted, {} after children", socket_count, markers.len());
    for placed in &emitter.placements {
        let position = placed.transform.w_axis.truncate();
        println!(
            "  {} at ({:.1}, {:.1}, {:.1})",
            placed.asset, position.x, position.y, position.z
        );
    }
    println!("Placements: {}", emitter.placements.len());
    println!("Fingerprint: {:016x}", emission_fingerprint(&emitter.placements));

    Ok(())
}

/// A small test layout: a room grid split by one corridor column, with a
/// door where the corridor meets the first room row.
fn demo_layout(seed: u64, width: i32, depth: i32) -> (DungeonModel, MarkerList) {
    let config = DungeonConfig { seed, ..Default::default() };
    let cell_size = config.grid_cell_size;
    let mut model = DungeonModel::new(config);
    model.register_cell(CellId(1), CellType::Room);
    model.register_cell(CellId(2), CellType::Corridor);

    let corridor_column = width / 2;
    let mut markers = MarkerList::new();
    for x in 0..width {
        for z in 0..depth {
            let grid = GridPos::new(x, 0, z);
            let cell = if x == corridor_column { CellId(2) } else { CellId(1) };
            markers.emit(GROUND_SOCKET, grid_transform(grid, cell_size), grid, cell);
        }
    }
    let door = GridPos::new(corridor_column, 0, 0);
    markers.emit(DOOR_SOCKET, grid_transform(door, cell_size), door, CellId(2));

    (model, markers)
}

fn grid_transform(grid: GridPos, cell_size: Vec3) -> Mat4 {
    Mat4::from_translation(Vec3::new(
        grid.x as f32 * cell_size.x,
        grid.y as f32 * cell_size.y,
        grid.z as f32 * cell_size.z,
    ))
}
