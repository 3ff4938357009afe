use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

/// Socket type emitted by layout builders for every walkable ground cell.
pub const GROUND_SOCKET: &str = "Ground";
/// Socket type emitted at door openings between adjacent cells.
pub const DOOR_SOCKET: &str = "Door";

/// Integer grid coordinate. The vertical component is `y`; constraint
/// kernels probe the horizontal `x`/`z` plane.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl GridPos {
    pub const ZERO: GridPos = GridPos { x: 0, y: 0, z: 0 };

    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }
}

impl Add for GridPos {
    type Output = GridPos;

    fn add(self, other: GridPos) -> GridPos {
        GridPos { x: self.x + other.x, y: self.y + other.y, z: self.z + other.z }
    }
}

impl Sub for GridPos {
    type Output = GridPos;

    fn sub(self, other: GridPos) -> GridPos {
        GridPos { x: self.x - other.x, y: self.y - other.y, z: self.z - other.z }
    }
}

/// Identity of the room or corridor cell that owns a grid position.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct CellId(pub i32);

/// Layout classification of a cell. `CorridorPadding` always compares as
/// `Corridor` for constraint purposes; `Unknown` covers ids the model has
/// never seen.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CellType {
    Room,
    Corridor,
    CorridorPadding,
    Unknown,
}
