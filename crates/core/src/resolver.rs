//! The theming pass: walks the socket list in emission order, picks a theme
//! per socket, and attaches props through selection, constraint solving, and
//! transform composition.
//!
//! The pass is strictly sequential. Child sockets appended mid-pass are
//! visited by the same loop in a later iteration, and every random decision
//! draws from one of two seeded streams in a fixed order, so a fixed seed
//! reproduces the emission sequence exactly.

use glam::{Mat4, Quat};
use xxhash_rust::xxh3::Xxh3;

use crate::constraint::{ConstraintPolicy, OccupancyIndex, solve_constraint};
use crate::markers::{MarkerList, PropSocket};
use crate::model::DungeonModel;
use crate::rng::UniformStream;
use crate::rules::RuleRegistry;
use crate::theme::{
    PropAsset, PropLookup, ResolvedProp, Theme, ThemeError, ThemeOverrideVolume,
};

/// One successfully resolved prop, handed to the scene emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedProp {
    pub asset: String,
    pub transform: Mat4,
}

/// Diagnostic events surfaced alongside placements. Skips are normal
/// outcomes; these exist so callers can see why a socket stayed empty.
#[derive(Clone, Debug, PartialEq)]
pub enum ThemeLogEvent {
    ThemeMissing { socket_id: u32 },
    ConstraintRejected { socket_id: u32 },
    PropPlaced { socket_id: u32, asset: String },
}

/// Sink for resolved props. The core does not know or care what the sink
/// does with a placement.
pub trait SceneEmitter {
    fn place(&mut self, prop: PlacedProp);
    fn log(&mut self, _event: ThemeLogEvent) {}
}

/// Emitter that records everything, used by tests and the inspection tools.
#[derive(Default)]
pub struct RecordingEmitter {
    pub placements: Vec<PlacedProp>,
    pub events: Vec<ThemeLogEvent>,
}

impl RecordingEmitter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SceneEmitter for RecordingEmitter {
    fn place(&mut self, prop: PlacedProp) {
        self.placements.push(prop);
    }

    fn log(&mut self, event: ThemeLogEvent) {
        self.events.push(event);
    }
}

/// Order-sensitive hash of an emission sequence, for comparing two runs
/// without storing full placement lists.
pub fn emission_fingerprint(placements: &[PlacedProp]) -> u64 {
    let mut hasher = Xxh3::new();
    for placement in placements {
        hasher.update(&(placement.asset.len() as u64).to_le_bytes());
        hasher.update(placement.asset.as_bytes());
        for value in placement.transform.to_cols_array() {
            hasher.update(&value.to_bits().to_le_bytes());
        }
    }
    hasher.digest()
}

pub struct ThemeResolver<'a> {
    model: &'a DungeonModel,
    registry: &'a RuleRegistry,
    policy: ConstraintPolicy,
}

impl<'a> ThemeResolver<'a> {
    pub fn new(model: &'a DungeonModel, registry: &'a RuleRegistry, policy: ConstraintPolicy) -> Self {
        Self { model, registry, policy }
    }

    /// Runs one theming pass over `markers`. Child sockets are appended to
    /// `markers` as props attach and are resolved before the pass returns.
    ///
    /// Errors only surface from theme compilation, before any placement;
    /// past that point every failure is a per-socket skip.
    pub fn run(
        &self,
        markers: &mut MarkerList,
        themes: &'a [Theme],
        volumes: &'a [ThemeOverrideVolume],
        emitter: &mut dyn SceneEmitter,
    ) -> Result<(), ThemeError> {
        let global_lookups = themes
            .iter()
            .map(|theme| PropLookup::build(theme, self.registry))
            .collect::<Result<Vec<_>, _>>()?;
        let volume_lookups = volumes
            .iter()
            .map(|volume| PropLookup::build(&volume.theme, self.registry))
            .collect::<Result<Vec<_>, _>>()?;

        // Built once from the pre-pass socket list and read-only from here;
        // child sockets never contribute occupancy.
        let occupancy = OccupancyIndex::build(markers.as_slice());

        let seed = self.model.config().seed;
        let mut random = UniformStream::new(seed);
        let mut affinity_random = UniformStream::new(seed);

        // Index loop instead of an iterator: attaching a prop may push child
        // sockets onto the list we are walking.
        let mut index = 0;
        while index < markers.len() {
            let socket = markers.get(index).clone();
            index += 1;
            if socket.consumed {
                continue;
            }

            // Only themes that define props for this socket type are pick
            // candidates, and the pick draw is consumed whenever candidates
            // exist, even if an override volume ends up supplying the theme.
            // Skipping the draw would shift every later decision.
            let candidates: Vec<&PropLookup<'_>> = global_lookups
                .iter()
                .filter(|lookup| !lookup.props_for(&socket.socket_type).is_empty())
                .collect();
            let global = (!candidates.is_empty())
                .then(|| candidates[random.pick_index(candidates.len())]);
            let lookup = volumes
                .iter()
                .position(|volume| volume.bounds.contains(socket.world_position()))
                .map(|position| &volume_lookups[position])
                .or(global);

            let Some(lookup) = lookup else {
                emitter.log(ThemeLogEvent::ThemeMissing { socket_id: socket.id });
                continue;
            };

            for resolved in lookup.props_for(&socket.socket_type) {
                let attached = self.try_attach(
                    resolved,
                    &socket,
                    &occupancy,
                    markers,
                    emitter,
                    &mut random,
                    &mut affinity_random,
                );
                if attached && resolved.prop.consume_on_attach {
                    markers.mark_consumed(index - 1);
                    break;
                }
            }
        }

        Ok(())
    }

    /// One prop candidate against one socket. Returns whether the prop was
    /// placed; a `false` is always a skip, never an error.
    #[allow(clippy::too_many_arguments)]
    fn try_attach(
        &self,
        resolved: &ResolvedProp<'_>,
        socket: &PropSocket,
        occupancy: &OccupancyIndex,
        markers: &mut MarkerList,
        emitter: &mut dyn SceneEmitter,
        random: &mut UniformStream,
        affinity_random: &mut UniformStream,
    ) -> bool {
        let prop = resolved.prop;

        // A selection rule replaces the affinity draw entirely; exactly one
        // of the two consumes randomness for this candidate. The rule sees
        // the pre-constraint placement transform.
        let selected = match resolved.selection {
            Some(rule) => {
                rule.can_select(socket, socket.transform * prop.offset, self.model, random)
            }
            None => affinity_random.next_uniform() < prop.affinity,
        };
        if !selected {
            return false;
        }

        let constraint = prop
            .use_spatial_constraint
            .then_some(prop.spatial_constraint.as_ref())
            .flatten();

        let solver_offset = match constraint {
            None => Mat4::IDENTITY,
            Some(constraint) => {
                match solve_constraint(constraint, socket, self.model, occupancy, self.policy) {
                    Some(offset) => offset,
                    None => {
                        emitter.log(ThemeLogEvent::ConstraintRejected { socket_id: socket.id });
                        return false;
                    }
                }
            }
        };

        let marker_base = match constraint {
            Some(constraint) if !constraint.apply_marker_rotation() => {
                let (scale, _, translation) = socket.transform.to_scale_rotation_translation();
                Mat4::from_scale_rotation_translation(scale, Quat::IDENTITY, translation)
            }
            _ => socket.transform,
        };

        let mut transform = marker_base * solver_offset * prop.offset;
        if let Some(rule) = resolved.transform {
            let (translation, rotation, scale) =
                rule.get_transform(socket, transform, self.model, random);
            transform *= Mat4::from_scale_rotation_translation(scale, rotation, translation);
        }

        let asset = match &prop.asset {
            PropAsset::Mesh(name) | PropAsset::Sprite(name) => name.clone(),
            PropAsset::MeshPool(pool) => pool[random.pick_index(pool.len())].clone(),
        };

        emitter.log(ThemeLogEvent::PropPlaced { socket_id: socket.id, asset: asset.clone() });
        emitter.place(PlacedProp { asset, transform });

        for child in &prop.child_sockets {
            markers.emit(
                &child.socket_type,
                transform * child.offset,
                socket.grid_position,
                socket.cell_id,
            );
        }

        true
    }
}
