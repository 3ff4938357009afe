//! Pluggable per-prop callbacks and the registry that resolves them.
//!
//! Themes reference rules by a stable string key. The registry turns those
//! keys into trait objects once, when a theme lookup is built; an unknown
//! key is an authoring error and aborts the pass before any prop is placed.

use std::collections::HashMap;

use glam::{Mat4, Quat, Vec3};

use crate::markers::PropSocket;
use crate::model::DungeonModel;
use crate::rng::UniformStream;

/// Decides whether a prop candidate is placed at a socket, replacing the
/// default affinity draw. Implementations that draw from `rng` become part
/// of the deterministic draw sequence.
pub trait SelectionRule {
    fn can_select(
        &self,
        socket: &PropSocket,
        prop_transform: Mat4,
        model: &DungeonModel,
        rng: &mut UniformStream,
    ) -> bool;
}

/// Post-processes the placed prop's transform with an extra
/// translation/rotation/scale, composed after the solver and static offsets.
pub trait TransformRule {
    fn get_transform(
        &self,
        socket: &PropSocket,
        prop_transform: Mat4,
        model: &DungeonModel,
        rng: &mut UniformStream,
    ) -> (Vec3, Quat, Vec3);
}

/// Maps rule keys to constructed rule objects. Callers register rules before
/// the pass; lookup happens once per theme while building the prop lookup.
#[derive(Default)]
pub struct RuleRegistry {
    selection: HashMap<String, Box<dyn SelectionRule>>,
    transform: HashMap<String, Box<dyn TransformRule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_selection(&mut self, key: impl Into<String>, rule: Box<dyn SelectionRule>) {
        self.selection.insert(key.into(), rule);
    }

    pub fn register_transform(&mut self, key: impl Into<String>, rule: Box<dyn TransformRule>) {
        self.transform.insert(key.into(), rule);
    }

    pub fn selection_rule(&self, key: &str) -> Option<&dyn SelectionRule> {
        self.selection.get(key).map(Box::as_ref)
    }

    pub fn transform_rule(&self, key: &str) -> Option<&dyn TransformRule> {
        self.transform.get(key).map(Box::as_ref)
    }
}
