//! Theme authoring data and the validated per-theme prop lookup.
//!
//! A theme is an ordered list of prop definitions. Before a pass places
//! anything, each theme is compiled into a [`PropLookup`] keyed by socket
//! type, with rule keys resolved against the registry. Compilation is where
//! authoring errors surface; everything past it can only skip, not fail.

use std::collections::HashMap;
use std::fmt;

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::constraint::SpatialConstraint;
use crate::markers::Bounds;
use crate::rules::{RuleRegistry, SelectionRule, TransformRule};

/// The visual payload a prop resolves to. The core never interprets asset
/// names; it hands them to the scene emitter verbatim. A pool defers the
/// choice of name to a seeded draw at placement time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropAsset {
    Mesh(String),
    MeshPool(Vec<String>),
    Sprite(String),
}

/// A socket a prop emits after it is successfully attached, processed in a
/// later pass of the same run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChildSocketData {
    pub socket_type: String,
    #[serde(default = "identity")]
    pub offset: Mat4,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PropTypeData {
    pub asset: PropAsset,
    /// Socket-type tag this prop attaches to.
    pub attach_to_socket: String,
    /// Placement probability in [0, 1], consulted when no selection rule is
    /// set.
    #[serde(default = "one")]
    pub affinity: f32,
    /// Static local offset composed after the solver offset.
    #[serde(default = "identity")]
    pub offset: Mat4,
    #[serde(default)]
    pub selection_rule: Option<String>,
    #[serde(default)]
    pub transform_rule: Option<String>,
    #[serde(default)]
    pub spatial_constraint: Option<SpatialConstraint>,
    #[serde(default)]
    pub use_spatial_constraint: bool,
    #[serde(default)]
    pub consume_on_attach: bool,
    #[serde(default)]
    pub child_sockets: Vec<ChildSocketData>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub props: Vec<PropTypeData>,
}

/// Scopes `theme` to sockets whose world position lies inside `bounds`,
/// taking precedence over the globally picked theme.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThemeOverrideVolume {
    pub bounds: Bounds,
    pub theme: Theme,
}

fn identity() -> Mat4 {
    Mat4::IDENTITY
}

fn one() -> f32 {
    1.0
}

/// Authoring-data corruption found while compiling themes. Any of these
/// aborts the pass before placement starts; runtime mismatches (constraint
/// failures, missing themes) are skips, never errors.
#[derive(Debug, PartialEq)]
pub enum ThemeError {
    KernelCellCount { expected: usize, actual: usize },
    AffinityOutOfRange { theme: String, affinity: f32 },
    UnknownRule { theme: String, rule: String },
    EmptyAssetPool { theme: String },
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KernelCellCount { expected, actual } => {
                write!(f, "kernel cell array has {actual} cells, expected {expected}")
            }
            Self::AffinityOutOfRange { theme, affinity } => {
                write!(f, "theme {theme:?} declares affinity {affinity} outside [0, 1]")
            }
            Self::UnknownRule { theme, rule } => {
                write!(f, "theme {theme:?} references unregistered rule {rule:?}")
            }
            Self::EmptyAssetPool { theme } => {
                write!(f, "theme {theme:?} declares an empty mesh pool")
            }
        }
    }
}

impl std::error::Error for ThemeError {}

/// A prop definition with its rule references resolved to trait objects.
pub struct ResolvedProp<'a> {
    pub prop: &'a PropTypeData,
    pub selection: Option<&'a dyn SelectionRule>,
    pub transform: Option<&'a dyn TransformRule>,
}

/// A compiled theme: props grouped by socket type, in declaration order,
/// with all authoring invariants checked up front.
pub struct PropLookup<'a> {
    by_socket: HashMap<&'a str, Vec<ResolvedProp<'a>>>,
}

impl fmt::Debug for PropLookup<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropLookup")
            .field("sockets", &self.by_socket.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

impl<'a> PropLookup<'a> {
    pub fn build(theme: &'a Theme, registry: &'a RuleRegistry) -> Result<Self, ThemeError> {
        let mut by_socket: HashMap<&str, Vec<ResolvedProp<'_>>> = HashMap::new();

        for prop in &theme.props {
            if !(0.0..=1.0).contains(&prop.affinity) {
                return Err(ThemeError::AffinityOutOfRange {
                    theme: theme.name.clone(),
                    affinity: prop.affinity,
                });
            }
            if let PropAsset::MeshPool(pool) = &prop.asset
                && pool.is_empty()
            {
                return Err(ThemeError::EmptyAssetPool { theme: theme.name.clone() });
            }
            if let Some(constraint) = &prop.spatial_constraint {
                constraint.validate()?;
            }

            let selection = resolve(&prop.selection_rule, theme, |key| {
                registry.selection_rule(key)
            })?;
            let transform = resolve(&prop.transform_rule, theme, |key| {
                registry.transform_rule(key)
            })?;

            by_socket
                .entry(prop.attach_to_socket.as_str())
                .or_default()
                .push(ResolvedProp { prop, selection, transform });
        }

        Ok(Self { by_socket })
    }

    /// Candidate props for `socket_type`, in theme declaration order. Empty
    /// when the theme never mentions the type.
    pub fn props_for(&self, socket_type: &str) -> &[ResolvedProp<'a>] {
        self.by_socket.get(socket_type).map_or(&[], Vec::as_slice)
    }
}

fn resolve<'a, R: ?Sized>(
    key: &Option<String>,
    theme: &Theme,
    lookup: impl FnOnce(&str) -> Option<&'a R>,
) -> Result<Option<&'a R>, ThemeError> {
    match key {
        None => Ok(None),
        Some(key) => lookup(key).map(Some).ok_or_else(|| ThemeError::UnknownRule {
            theme: theme.name.clone(),
            rule: key.clone(),
        }),
    }
}
