//! Grid occupancy lookup built once per theming pass from the emitted
//! marker list, then treated as read-only until the pass ends.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::markers::PropSocket;
use crate::types::{CellId, DOOR_SOCKET, GROUND_SOCKET, GridPos};

/// Recognized policy flags for occupancy classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintPolicy {
    /// Whether a door marker counts as occupying its grid cell.
    pub doors_occupy_space: bool,
    /// Whether cells of a different room/corridor classification than the
    /// socket's own cell still count as occupied neighbors.
    pub merge_room_corridor: bool,
}

impl Default for ConstraintPolicy {
    fn default() -> Self {
        Self { doors_occupy_space: true, merge_room_corridor: false }
    }
}

#[derive(Clone, Debug, Default)]
pub struct OccupancyIndex {
    ground: HashMap<GridPos, CellId>,
    doors: HashSet<GridPos>,
}

impl OccupancyIndex {
    /// Ground sockets populate the position-to-cell map; door sockets
    /// populate the door set. Duplicate ground positions are not rejected:
    /// the last emitted marker wins.
    pub fn build(sockets: &[PropSocket]) -> Self {
        let mut index = Self::default();
        for socket in sockets {
            if socket.socket_type == GROUND_SOCKET {
                index.ground.insert(socket.grid_position, socket.cell_id);
            }
            if socket.socket_type == DOOR_SOCKET {
                index.doors.insert(socket.grid_position);
            }
        }
        index
    }

    /// Occupancy of one grid position under the given policy. The cell id is
    /// reported only for positions that classify as occupied.
    pub fn occupancy_at(&self, pos: GridPos, policy: ConstraintPolicy) -> (bool, Option<CellId>) {
        let mut occupied = self.ground.contains_key(&pos);
        if !policy.doors_occupy_space && self.doors.contains(&pos) {
            occupied = false;
        }
        let cell_id = if occupied { self.ground.get(&pos).copied() } else { None };
        (occupied, cell_id)
    }

    /// Raw ground entry at a position, policy-independent. Used for the
    /// socket's own base cell classification.
    pub fn ground_cell(&self, pos: GridPos) -> Option<CellId> {
        self.ground.get(&pos).copied()
    }
}
