//! Read-only dungeon layout data consumed by the theming pass.

use std::collections::HashMap;

use glam::Vec3;

use crate::types::{CellId, CellType};

#[derive(Clone, Copy, Debug)]
pub struct DungeonConfig {
    /// Per-build seed driving every random stream of the theming pass.
    pub seed: u64,
    /// World-space size of one logical grid cell.
    pub grid_cell_size: Vec3,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self { seed: 0, grid_cell_size: Vec3::new(4.0, 2.0, 4.0) }
    }
}

/// Cell-id lookup built by the layout builder before theming starts.
/// Treated as read-only for the remainder of the pass.
#[derive(Clone, Debug, Default)]
pub struct DungeonModel {
    config: DungeonConfig,
    cells: HashMap<CellId, CellType>,
}

impl DungeonModel {
    pub fn new(config: DungeonConfig) -> Self {
        Self { config, cells: HashMap::new() }
    }

    pub fn config(&self) -> DungeonConfig {
        self.config
    }

    pub fn register_cell(&mut self, id: CellId, cell_type: CellType) {
        self.cells.insert(id, cell_type);
    }

    /// Classification of a cell id for constraint comparison. Unregistered
    /// ids classify as `Unknown`; corridor padding classifies as `Corridor`.
    pub fn cell_type_of(&self, id: CellId) -> CellType {
        match self.cells.get(&id) {
            None => CellType::Unknown,
            Some(CellType::CorridorPadding) => CellType::Corridor,
            Some(cell_type) => *cell_type,
        }
    }
}
