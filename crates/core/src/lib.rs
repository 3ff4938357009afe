pub mod constraint;
pub mod markers;
pub mod model;
pub mod resolver;
pub mod rng;
pub mod rules;
pub mod theme;
pub mod types;

#[cfg(test)]
mod test_support;

pub use constraint::{
    CellConstraint, ConstraintPolicy, EdgeConstraint, GridKernel, KernelSize, OccupancyIndex,
    SpatialConstraint, solve_constraint,
};
pub use markers::{Bounds, MarkerList, MarkerReplaceVolume, MarkerReplacement, PropSocket, apply_marker_replacements};
pub use model::{DungeonConfig, DungeonModel};
pub use resolver::{
    PlacedProp, RecordingEmitter, SceneEmitter, ThemeLogEvent, ThemeResolver, emission_fingerprint,
};
pub use rng::UniformStream;
pub use rules::{RuleRegistry, SelectionRule, TransformRule};
pub use theme::{
    ChildSocketData, PropAsset, PropLookup, PropTypeData, ResolvedProp, Theme, ThemeError,
    ThemeOverrideVolume,
};
pub use types::*;
