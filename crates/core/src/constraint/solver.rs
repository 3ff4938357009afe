//! The constraint solver: rotation search for square kernels, the two-way
//! assignment test for edge pairs.
//!
//! Solving never fails exceptionally. A socket whose neighborhood does not
//! satisfy the kernel is a normal outcome reported as `None`, and the caller
//! simply skips the prop candidate.

use glam::{Mat4, Quat, Vec3};

use super::kernel::{CellConstraint, EdgeConstraint, GridKernel, KernelSize, SpatialConstraint};
use super::occupancy::{ConstraintPolicy, OccupancyIndex};
use super::rotation::rotate_quarter;
use crate::markers::PropSocket;
use crate::model::DungeonModel;
use crate::types::{CellId, CellType, GridPos};

/// Answers whether `constraint` is satisfied at `socket`, and with which
/// pure-rotation transform offset. `None` means the constraint cannot be
/// satisfied in any attempted orientation.
pub fn solve_constraint(
    constraint: &SpatialConstraint,
    socket: &PropSocket,
    model: &DungeonModel,
    occupancy: &OccupancyIndex,
    policy: ConstraintPolicy,
) -> Option<Mat4> {
    match constraint {
        SpatialConstraint::Edge(edge) => solve_edge(edge, socket, model, occupancy, policy),
        SpatialConstraint::Grid(kernel) => solve_grid(kernel, socket, model, occupancy, policy),
    }
}

fn solve_grid(
    kernel: &GridKernel,
    socket: &PropSocket,
    model: &DungeonModel,
    occupancy: &OccupancyIndex,
    policy: ConstraintPolicy,
) -> Option<Mat4> {
    let attempts = if kernel.rotate_to_fit { 4 } else { 1 };
    let base_type = classify(model, occupancy.ground_cell(socket.grid_position));

    // Rotation always works on a rebuilt array; the authored kernel is
    // shared between sockets and must stay in its pre-rotation state.
    let mut cells = kernel.cells.clone();
    for attempt in 0..attempts {
        let fits = match kernel.size {
            KernelSize::Square2 => {
                quad_fits(&cells, socket.grid_position, base_type, model, occupancy, policy)
            }
            size => {
                square_fits(size, &cells, socket.grid_position, base_type, model, occupancy, policy)
            }
        };

        if fits {
            let angle = kernel.size.rotation_step_degrees() * attempt as f32;
            return Some(Mat4::from_quat(Quat::from_rotation_y(angle.to_radians())));
        }
        cells = rotate_quarter(kernel.size, &cells);
    }

    None
}

/// Square kernels of width 3, 5, and 7: offsets run -half..=half on both
/// axes, with the kernel row axis inverted against +dz.
fn square_fits(
    size: KernelSize,
    cells: &[CellConstraint],
    origin: GridPos,
    base_type: CellType,
    model: &DungeonModel,
    occupancy: &OccupancyIndex,
    policy: ConstraintPolicy,
) -> bool {
    let width = size.width() as i32;
    let half = size.half_extent();

    for dx in -half..=half {
        for dz in -half..=half {
            let column = dx + half;
            let row = (width - 1) - (dz + half);
            let cell = cells[(row * width + column) as usize];
            let adjacent = origin + GridPos::new(dx, 0, dz);
            if !cell_passes(cell, adjacent_occupied(adjacent, base_type, model, occupancy, policy))
            {
                return false;
            }
        }
    }
    true
}

/// The 2x2 kernel covers the asymmetric -1..=0 offset range and is indexed
/// per cell rather than per offset.
fn quad_fits(
    cells: &[CellConstraint],
    origin: GridPos,
    base_type: CellType,
    model: &DungeonModel,
    occupancy: &OccupancyIndex,
    policy: ConstraintPolicy,
) -> bool {
    for (index, &cell) in cells.iter().enumerate() {
        if cell == CellConstraint::DontCare {
            continue;
        }
        let dx = (index % 2) as i32 - 1;
        let dz = (index / 2) as i32 - 1;
        let adjacent = origin + GridPos::new(dx, 0, dz);
        if !cell_passes(cell, adjacent_occupied(adjacent, base_type, model, occupancy, policy)) {
            return false;
        }
    }
    true
}

/// The edge pair probes the world-space cell to the marker's rotated left
/// and the marker's own cell, then accepts either cell-to-position
/// assignment. Success never contributes a rotation offset.
fn solve_edge(
    edge: &EdgeConstraint,
    socket: &PropSocket,
    model: &DungeonModel,
    occupancy: &OccupancyIndex,
    policy: ConstraintPolicy,
) -> Option<Mat4> {
    let cell_size = model.config().grid_cell_size;
    let (_, rotation, translation) = socket.transform.to_scale_rotation_translation();

    let left_world = translation + rotation * Vec3::new(-cell_size.x, 0.0, 0.0);
    let left = round_to_grid(left_world, cell_size);
    let right = round_to_grid(translation, cell_size);

    let occupied =
        [occupancy.occupancy_at(left, policy).0, occupancy.occupancy_at(right, policy).0];

    let fits = edge_passes([edge.left, edge.right], occupied)
        || edge_passes([edge.right, edge.left], occupied);
    fits.then_some(Mat4::IDENTITY)
}

fn edge_passes(cells: [CellConstraint; 2], occupied: [bool; 2]) -> bool {
    cells.iter().zip(occupied).all(|(&cell, occupied)| cell_passes(cell, occupied))
}

fn cell_passes(cell: CellConstraint, occupied: bool) -> bool {
    match cell {
        CellConstraint::DontCare => true,
        CellConstraint::Occupied => occupied,
        CellConstraint::Empty => !occupied,
    }
}

/// Raw occupancy demoted by classification: a neighbor whose cell cannot be
/// classified counts as unoccupied, and without merging the same goes for a
/// neighbor owned by a differently-classified cell.
fn adjacent_occupied(
    pos: GridPos,
    base_type: CellType,
    model: &DungeonModel,
    occupancy: &OccupancyIndex,
    policy: ConstraintPolicy,
) -> bool {
    let (mut occupied, cell_id) = occupancy.occupancy_at(pos, policy);
    let adjacent_type = classify(model, cell_id);
    if occupied && adjacent_type == CellType::Unknown {
        occupied = false;
    }
    if occupied && adjacent_type != base_type && !policy.merge_room_corridor {
        occupied = false;
    }
    occupied
}

fn classify(model: &DungeonModel, cell_id: Option<CellId>) -> CellType {
    cell_id.map_or(CellType::Unknown, |id| model.cell_type_of(id))
}

fn round_to_grid(world: Vec3, cell_size: Vec3) -> GridPos {
    GridPos::new(
        (world.x / cell_size.x).round() as i32,
        (world.y / cell_size.y).round() as i32,
        (world.z / cell_size.z).round() as i32,
    )
}
