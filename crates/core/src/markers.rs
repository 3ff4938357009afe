//! Prop sockets emitted by layout builders and the append-only list that
//! owns them for the duration of one build pass.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

use crate::types::{CellId, GridPos};

/// One placement point emitted during layout generation.
#[derive(Clone, Debug, PartialEq)]
pub struct PropSocket {
    pub id: u32,
    pub socket_type: String,
    pub transform: Mat4,
    pub grid_position: GridPos,
    pub cell_id: CellId,
    pub consumed: bool,
}

impl PropSocket {
    pub fn world_position(&self) -> Vec3 {
        self.transform.w_axis.truncate()
    }
}

/// Append-only socket list with monotonically assigned ids. Cleared and
/// rebuilt wholesale on every dungeon rebuild; never shared across passes.
#[derive(Clone, Debug, Default)]
pub struct MarkerList {
    sockets: Vec<PropSocket>,
    next_id: u32,
}

impl MarkerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(
        &mut self,
        socket_type: &str,
        transform: Mat4,
        grid_position: GridPos,
        cell_id: CellId,
    ) -> u32 {
        self.next_id += 1;
        self.sockets.push(PropSocket {
            id: self.next_id,
            socket_type: socket_type.to_string(),
            transform,
            grid_position,
            cell_id,
            consumed: false,
        });
        self.next_id
    }

    /// Emits `count` markers along a world-space run, stepping the logical
    /// grid position by `inter_offset` divided by the logical-to-world scale.
    pub fn emit_run(
        &mut self,
        socket_type: &str,
        transform: Mat4,
        count: usize,
        inter_offset: Vec3,
        grid_position: GridPos,
        cell_id: CellId,
        logical_to_world: Vec3,
    ) {
        let step = GridPos::new(
            (inter_offset.x / logical_to_world.x).round() as i32,
            (inter_offset.y / logical_to_world.y).round() as i32,
            (inter_offset.z / logical_to_world.z).round() as i32,
        );

        let mut transform = transform;
        let mut position = transform.w_axis.truncate();
        let mut grid_position = grid_position;
        for _ in 0..count {
            self.emit(socket_type, transform, grid_position, cell_id);
            position += inter_offset;
            grid_position = grid_position + step;
            transform.w_axis = position.extend(1.0);
        }
    }

    pub fn len(&self) -> usize {
        self.sockets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sockets.is_empty()
    }

    pub fn get(&self, index: usize) -> &PropSocket {
        &self.sockets[index]
    }

    pub fn as_slice(&self) -> &[PropSocket] {
        &self.sockets
    }

    pub fn mark_consumed(&mut self, index: usize) {
        self.sockets[index].consumed = true;
    }

    pub fn clear(&mut self) {
        self.next_id = 0;
        self.sockets.clear();
    }

    fn rename(&mut self, index: usize, socket_type: &str) {
        self.sockets[index].socket_type = socket_type.to_string();
    }
}

/// World-space axis-aligned bounding box, bounds-inclusive like the volumes
/// designers place around dungeon regions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }
}

/// Renames socket types within a bounded region before theming starts, so a
/// volume can swap e.g. torch markers for banner markers locally.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarkerReplaceVolume {
    pub bounds: Bounds,
    pub replacements: Vec<MarkerReplacement>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MarkerReplacement {
    pub from: String,
    pub to: String,
}

pub fn apply_marker_replacements(markers: &mut MarkerList, volumes: &[MarkerReplaceVolume]) {
    for volume in volumes {
        for index in 0..markers.len() {
            let socket = markers.get(index);
            if !volume.bounds.contains(socket.world_position()) {
                continue;
            }
            for replacement in &volume.replacements {
                if markers.get(index).socket_type == replacement.from {
                    markers.rename(index, &replacement.to);
                }
            }
        }
    }
}
