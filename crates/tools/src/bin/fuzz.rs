use anyhow::Result;
use clap::Parser;
use glam::{Mat4, Vec3};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use themer_core::constraint::rotate_quarter;
use themer_core::{
    CellConstraint, CellId, CellType, ConstraintPolicy, DungeonConfig, DungeonModel, GROUND_SOCKET,
    GridKernel, GridPos, KernelSize, MarkerList, OccupancyIndex, PropAsset, PropTypeData,
    RecordingEmitter, RuleRegistry, SpatialConstraint, Theme, ThemeResolver,
    emission_fingerprint, solve_constraint,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    iterations: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Fuzzing constraint solver on seed {} for {} iterations...", args.seed, args.iterations);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let model = fuzz_model();

    for _ in 0..args.iterations {
        let size = choose(
            &mut rng,
            &[KernelSize::Square2, KernelSize::Square3, KernelSize::Square5, KernelSize::Square7],
        );
        let cells: Vec<CellConstraint> = (0..size.cell_count())
            .map(|_| {
                choose(
                    &mut rng,
                    &[CellConstraint::DontCare, CellConstraint::Occupied, CellConstraint::Empty],
                )
            })
            .collect();

        // Four quarter turns must restore the authored kernel exactly.
        let mut rotated = cells.clone();
        for _ in 0..4 {
            rotated = rotate_quarter(size, &rotated);
        }
        assert_eq!(rotated, cells, "Invariant failed: 4 rotations are not the identity");

        let (occupancy, socket) = random_neighborhood(&mut rng);
        let policy = ConstraintPolicy {
            doors_occupy_space: rng.next_u32() % 2 == 0,
            merge_room_corridor: rng.next_u32() % 2 == 0,
        };

        let mut kernel = GridKernel::new(size, cells)?;
        kernel.rotate_to_fit = rng.next_u32() % 2 == 0;
        let constraint = SpatialConstraint::Grid(kernel);
        if let Some(offset) = solve_constraint(&constraint, &socket, &model, &occupancy, policy) {
            let (scale, _, translation) = offset.to_scale_rotation_translation();
            assert!(
                translation.length() < 1e-4,
                "Invariant failed: solver offset carries a translation"
            );
            assert!(
                (scale - Vec3::ONE).length() < 1e-4,
                "Invariant failed: solver offset carries a scale"
            );
        }

        // A kernel of nothing but DontCare can never be rejected.
        let neutral = GridKernel::new(size, vec![CellConstraint::DontCare; size.cell_count()])?;
        let neutral = SpatialConstraint::Grid(neutral);
        assert!(
            solve_constraint(&neutral, &socket, &model, &occupancy, policy).is_some(),
            "Invariant failed: all-DontCare kernel rejected"
        );
    }

    println!("Fuzzing theming pass determinism...");
    for _ in 0..16 {
        let seed = rng.next_u64();
        let first = run_fuzz_pass(seed)?;
        let second = run_fuzz_pass(seed)?;
        assert_eq!(first, second, "Invariant failed: same seed, different emissions");
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}

fn fuzz_model() -> DungeonModel {
    let mut model = DungeonModel::new(DungeonConfig::default());
    model.register_cell(CellId(1), CellType::Room);
    model.register_cell(CellId(2), CellType::Corridor);
    model
}

/// Ground markers for a random subset of the 7x7 block around the origin,
/// origin always included, split between a room and a corridor cell.
fn random_neighborhood(rng: &mut ChaCha8Rng) -> (OccupancyIndex, themer_core::PropSocket) {
    let cell_size = DungeonConfig::default().grid_cell_size;
    let mut markers = MarkerList::new();
    for dx in -3..=3 {
        for dz in -3..=3 {
            if (dx, dz) != (0, 0) && rng.next_u32() % 2 == 0 {
                continue;
            }
            let grid = GridPos::new(dx, 0, dz);
            let cell = if dx < 0 { CellId(2) } else { CellId(1) };
            let world = Vec3::new(dx as f32 * cell_size.x, 0.0, dz as f32 * cell_size.z);
            markers.emit(GROUND_SOCKET, Mat4::from_translation(world), grid, cell);
        }
    }

    let socket = markers
        .as_slice()
        .iter()
        .find(|socket| socket.grid_position == GridPos::ZERO)
        .cloned()
        .unwrap();
    (OccupancyIndex::build(markers.as_slice()), socket)
}

fn run_fuzz_pass(seed: u64) -> Result<u64> {
    let config = DungeonConfig { seed, ..Default::default() };
    let cell_size = config.grid_cell_size;
    let mut model = DungeonModel::new(config);
    model.register_cell(CellId(1), CellType::Room);

    let mut markers = MarkerList::new();
    for x in 0..6 {
        for z in 0..6 {
            let grid = GridPos::new(x, 0, z);
            let world = Vec3::new(x as f32 * cell_size.x, 0.0, z as f32 * cell_size.z);
            markers.emit(GROUND_SOCKET, Mat4::from_translation(world), grid, CellId(1));
        }
    }

    let themes = vec![
        fuzz_theme("stone", 0.75),
        fuzz_theme("moss", 0.4),
    ];
    let registry = RuleRegistry::new();
    let resolver = ThemeResolver::new(&model, &registry, ConstraintPolicy::default());
    let mut emitter = RecordingEmitter::new();
    resolver
        .run(&mut markers, &themes, &[], &mut emitter)
        .map_err(|e| anyhow::anyhow!("Theming pass aborted: {e}"))?;
    Ok(emission_fingerprint(&emitter.placements))
}

fn fuzz_theme(name: &str, affinity: f32) -> Theme {
    Theme {
        name: name.to_string(),
        props: vec![PropTypeData {
            asset: PropAsset::MeshPool(vec![
                format!("{name}_a"),
                format!("{name}_b"),
                format!("{name}_c"),
            ]),
            attach_to_socket: GROUND_SOCKET.to_string(),
            affinity,
            offset: Mat4::IDENTITY,
            selection_rule: None,
            transform_rule: None,
            spatial_constraint: None,
            use_spatial_constraint: false,
            consume_on_attach: false,
            child_sockets: Vec::new(),
        }],
    }
}
