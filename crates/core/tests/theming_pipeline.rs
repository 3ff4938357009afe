//! End-to-end pipeline: marker emission, replacement volumes, and a full
//! theming pass over the public API.

use core::{
    Bounds, CellId, CellType, ConstraintPolicy, DungeonConfig, DungeonModel, GROUND_SOCKET,
    GridPos, MarkerList, MarkerReplaceVolume, MarkerReplacement, PropAsset, PropTypeData,
    RecordingEmitter, RuleRegistry, Theme, ThemeLogEvent, ThemeResolver,
    apply_marker_replacements,
};
use glam::{Mat4, Vec3};

fn simple_prop(asset: &str, socket: &str) -> PropTypeData {
    PropTypeData {
        asset: PropAsset::Mesh(asset.to_string()),
        attach_to_socket: socket.to_string(),
        affinity: 1.0,
        offset: Mat4::IDENTITY,
        selection_rule: None,
        transform_rule: None,
        spatial_constraint: None,
        use_spatial_constraint: false,
        consume_on_attach: false,
        child_sockets: Vec::new(),
    }
}

#[test]
fn replaced_markers_are_themed_under_their_new_type() {
    let config = DungeonConfig { seed: 9, ..Default::default() };
    let cell_size = config.grid_cell_size;
    let mut model = DungeonModel::new(config);
    model.register_cell(CellId(1), CellType::Room);

    // Torch markers along a row; the replacement volume only covers the
    // first two columns.
    let mut markers = MarkerList::new();
    for x in 0..4 {
        let grid = GridPos::new(x, 0, 0);
        let world = Vec3::new(x as f32 * cell_size.x, 0.0, 0.0);
        markers.emit("Torch", Mat4::from_translation(world), grid, CellId(1));
    }
    let volume = MarkerReplaceVolume {
        bounds: Bounds::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(cell_size.x + 1.0, 1.0, 1.0)),
        replacements: vec![MarkerReplacement {
            from: "Torch".to_string(),
            to: "Banner".to_string(),
        }],
    };
    apply_marker_replacements(&mut markers, &[volume]);

    let themes = vec![Theme {
        name: "hall".to_string(),
        props: vec![simple_prop("wall_torch", "Torch"), simple_prop("war_banner", "Banner")],
    }];
    let registry = RuleRegistry::new();
    let resolver = ThemeResolver::new(&model, &registry, ConstraintPolicy::default());
    let mut emitter = RecordingEmitter::new();
    resolver.run(&mut markers, &themes, &[], &mut emitter).expect("pass must not abort");

    let assets: Vec<&str> = emitter.placements.iter().map(|placed| placed.asset.as_str()).collect();
    assert_eq!(assets, ["war_banner", "war_banner", "wall_torch", "wall_torch"]);
}

#[test]
fn placements_inherit_marker_positions() {
    let config = DungeonConfig { seed: 11, ..Default::default() };
    let cell_size = config.grid_cell_size;
    let mut model = DungeonModel::new(config);
    model.register_cell(CellId(1), CellType::Room);

    let mut markers = MarkerList::new();
    for x in 0..3 {
        let grid = GridPos::new(x, 0, 2);
        let world = Vec3::new(x as f32 * cell_size.x, 0.0, 2.0 * cell_size.z);
        markers.emit(GROUND_SOCKET, Mat4::from_translation(world), grid, CellId(1));
    }

    let themes = vec![Theme {
        name: "plain".to_string(),
        props: vec![simple_prop("tile", GROUND_SOCKET)],
    }];
    let registry = RuleRegistry::new();
    let resolver = ThemeResolver::new(&model, &registry, ConstraintPolicy::default());
    let mut emitter = RecordingEmitter::new();
    resolver.run(&mut markers, &themes, &[], &mut emitter).expect("pass must not abort");

    assert_eq!(emitter.placements.len(), 3);
    for (index, placed) in emitter.placements.iter().enumerate() {
        let position = placed.transform.w_axis.truncate();
        assert_eq!(position, Vec3::new(index as f32 * cell_size.x, 0.0, 2.0 * cell_size.z));
    }
    // Every placement is also visible in the event log.
    let placed_events = emitter
        .events
        .iter()
        .filter(|event| matches!(event, ThemeLogEvent::PropPlaced { .. }))
        .count();
    assert_eq!(placed_events, 3);
}
