//! Spatial constraint kernels and the rotation-search solver that decides
//! whether a prop fits the occupancy of its grid neighborhood.

pub mod kernel;
pub mod occupancy;
pub mod solver;

mod rotation;

pub use kernel::{CellConstraint, EdgeConstraint, GridKernel, KernelSize, SpatialConstraint};
pub use occupancy::{ConstraintPolicy, OccupancyIndex};
pub use rotation::rotate_quarter;
pub use solver::solve_constraint;
