//! Shared fixtures for the core test suites.
//! This module exists to avoid repeating model, socket, and occupancy setup
//! across many tests. It does not own production theming logic.

use glam::{Mat4, Vec3};

use crate::constraint::{
    CellConstraint, EdgeConstraint, GridKernel, KernelSize, OccupancyIndex, SpatialConstraint,
};
use crate::markers::{MarkerList, PropSocket};
use crate::model::{DungeonConfig, DungeonModel};
use crate::types::{CellId, CellType, GROUND_SOCKET, GridPos};

/// Model with one room cell (id 1), one corridor cell (id 2), and one
/// corridor-padding cell (id 3).
pub(crate) fn room_model() -> DungeonModel {
    let mut model = DungeonModel::new(DungeonConfig::default());
    model.register_cell(CellId(1), CellType::Room);
    model.register_cell(CellId(2), CellType::Corridor);
    model.register_cell(CellId(3), CellType::CorridorPadding);
    model
}

/// A socket positioned at `grid`, with the matching world transform.
pub(crate) fn socket_at(socket_type: &str, grid: GridPos, cell: CellId) -> PropSocket {
    let cell_size = DungeonConfig::default().grid_cell_size;
    let world = Vec3::new(
        grid.x as f32 * cell_size.x,
        grid.y as f32 * cell_size.y,
        grid.z as f32 * cell_size.z,
    );
    PropSocket {
        id: 0,
        socket_type: socket_type.to_string(),
        transform: Mat4::from_translation(world),
        grid_position: grid,
        cell_id: cell,
        consumed: false,
    }
}

/// Ground occupancy around an origin socket in room cell 1: the origin cell
/// itself plus ground markers at each (dx, dz) offset.
pub(crate) fn ground_neighborhood(offsets: &[(i32, i32)]) -> (OccupancyIndex, PropSocket) {
    let entries: Vec<((i32, i32), CellId)> =
        offsets.iter().map(|&offset| (offset, CellId(1))).collect();
    neighborhood_with_cells(&entries)
}

/// Like `ground_neighborhood`, but each neighbor carries its own cell id so
/// tests can mix room and corridor ownership.
pub(crate) fn neighborhood_with_cells(
    entries: &[((i32, i32), CellId)],
) -> (OccupancyIndex, PropSocket) {
    let origin = GridPos::ZERO;
    let mut markers = MarkerList::new();

    let origin_socket = socket_at(GROUND_SOCKET, origin, CellId(1));
    markers.emit(GROUND_SOCKET, origin_socket.transform, origin, CellId(1));
    for &((dx, dz), cell) in entries {
        let grid = origin + GridPos::new(dx, 0, dz);
        let socket = socket_at(GROUND_SOCKET, grid, cell);
        markers.emit(GROUND_SOCKET, socket.transform, grid, cell);
    }

    (OccupancyIndex::build(markers.as_slice()), origin_socket)
}

/// The 8 ring offsets around a cell.
pub(crate) fn all_neighbor_offsets() -> Vec<(i32, i32)> {
    let mut offsets = Vec::new();
    for dx in -1..=1 {
        for dz in -1..=1 {
            if (dx, dz) != (0, 0) {
                offsets.push((dx, dz));
            }
        }
    }
    offsets
}

pub(crate) fn grid_constraint(
    size: KernelSize,
    cells: Vec<CellConstraint>,
    rotate_to_fit: bool,
) -> SpatialConstraint {
    SpatialConstraint::Grid(GridKernel {
        size,
        cells,
        rotate_to_fit,
        apply_marker_rotation: true,
    })
}

pub(crate) fn edge_constraint(left: CellConstraint, right: CellConstraint) -> SpatialConstraint {
    SpatialConstraint::Edge(EdgeConstraint { left, right, apply_marker_rotation: true })
}
