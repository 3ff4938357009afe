//! Constraint kernel authoring data. One parameterized kernel type covers
//! the 2x2 through 7x7 square sizes; the 1x2 edge pair is its own shape
//! because it never rotates a full quarter turn.

use serde::{Deserialize, Serialize};

use crate::theme::ThemeError;

/// Occupancy expectation for one kernel cell. Compared, never mutated,
/// during solving.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CellConstraint {
    #[default]
    DontCare,
    Occupied,
    Empty,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelSize {
    Square2,
    Square3,
    Square5,
    Square7,
}

impl KernelSize {
    pub fn width(self) -> usize {
        match self {
            KernelSize::Square2 => 2,
            KernelSize::Square3 => 3,
            KernelSize::Square5 => 5,
            KernelSize::Square7 => 7,
        }
    }

    pub fn cell_count(self) -> usize {
        self.width() * self.width()
    }

    /// Horizontal reach of the kernel around the socket cell. The 2x2 kernel
    /// covers the asymmetric -1..=0 range instead and is indexed by cell.
    pub fn half_extent(self) -> i32 {
        (self.width() as i32) / 2
    }

    /// Per-attempt rotation offset angle. The 2x2 kernel rotates +90 per
    /// attempt where every larger kernel rotates -90; the asymmetry is a
    /// compatibility quirk and both signs are load-bearing.
    pub fn rotation_step_degrees(self) -> f32 {
        match self {
            KernelSize::Square2 => 90.0,
            _ => -90.0,
        }
    }
}

/// Square N x N kernel, row-major, center-relative: column = dx + half,
/// row = half - dz. The row axis is inverted with respect to the +dz grid
/// axis; authoring tools and the solver both rely on that inversion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridKernel {
    pub size: KernelSize,
    pub cells: Vec<CellConstraint>,
    #[serde(default = "default_true")]
    pub rotate_to_fit: bool,
    #[serde(default = "default_true")]
    pub apply_marker_rotation: bool,
}

impl GridKernel {
    pub fn new(size: KernelSize, cells: Vec<CellConstraint>) -> Result<Self, ThemeError> {
        let kernel =
            Self { size, cells, rotate_to_fit: true, apply_marker_rotation: true };
        kernel.validate()?;
        Ok(kernel)
    }

    /// Wrong cell counts are authoring-data corruption and abort the pass
    /// before any placement happens.
    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.cells.len() != self.size.cell_count() {
            return Err(ThemeError::KernelCellCount {
                expected: self.size.cell_count(),
                actual: self.cells.len(),
            });
        }
        Ok(())
    }
}

/// Two-cell edge constraint. Instead of quarter-turn rotation it tests both
/// (left, right) and (right, left) cell-to-position assignments and always
/// reports an identity offset.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EdgeConstraint {
    pub left: CellConstraint,
    pub right: CellConstraint,
    #[serde(default = "default_true")]
    pub apply_marker_rotation: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum SpatialConstraint {
    Edge(EdgeConstraint),
    Grid(GridKernel),
}

impl SpatialConstraint {
    pub fn apply_marker_rotation(&self) -> bool {
        match self {
            SpatialConstraint::Edge(edge) => edge.apply_marker_rotation,
            SpatialConstraint::Grid(kernel) => kernel.apply_marker_rotation,
        }
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        match self {
            SpatialConstraint::Edge(_) => Ok(()),
            SpatialConstraint::Grid(kernel) => kernel.validate(),
        }
    }
}

fn default_true() -> bool {
    true
}
