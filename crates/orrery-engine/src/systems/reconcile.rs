//! Incremental body reconciliation.
//!
//! Keeps the live body map in bijection with the latest record list. Only
//! ids that appeared or disappeared cost any work; bodies present in both
//! lists keep their state, nodes and resources untouched.

use std::collections::{HashMap, HashSet};

use crate::api::config::EngineConfig;
use crate::api::record::CelestialBodyRecord;
use crate::api::types::BodyId;
use crate::assets::resources::{GpuResources, ResourceKind};
use crate::assets::textures::TextureCache;
use crate::components::body::{BodyState, OrbitParams};
use crate::components::mesh::{MeshComponent, OrbitPath};
use crate::components::node::{Node, NodeKind};
use crate::core::scene::SceneGraph;
use crate::systems::pulse::PulseState;

/// Everything reconciliation mutates besides the body map.
pub struct ReconcileContext<'a> {
    pub scene: &'a mut SceneGraph,
    pub resources: &'a mut GpuResources,
    pub textures: &'a mut TextureCache,
    pub pulses: &'a mut PulseState,
    pub config: &'a EngineConfig,
}

/// Outcome of one pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileReport {
    pub added: Vec<BodyId>,
    pub removed: Vec<BodyId>,
    /// Bodies carried over unchanged.
    pub kept: usize,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Resolve the id of every record, in list order.
///
/// A repeated id keeps its first occurrence; later ones become `id#2`,
/// `id#3`, ... so each record maps to exactly one body. A suffix never
/// collides with an id that any record in the list asks for by itself.
pub fn resolve_ids(records: &[CelestialBodyRecord]) -> Vec<BodyId> {
    let bases: Vec<BodyId> = records.iter().map(|r| r.resolve_id().into_id()).collect();
    let reserved: HashSet<&BodyId> = bases.iter().collect();
    let mut seen: HashMap<&BodyId, u32> = HashMap::with_capacity(records.len());
    let mut taken: HashSet<BodyId> = HashSet::with_capacity(records.len());
    let mut ids = Vec::with_capacity(records.len());
    for base in &bases {
        let count = seen.entry(base).or_insert(0);
        *count += 1;
        let id = if *count == 1 {
            base.clone()
        } else {
            log::warn!("duplicate body id {base}, disambiguating");
            loop {
                let candidate = BodyId(format!("{base}#{count}"));
                if !taken.contains(&candidate) && !reserved.contains(&candidate) {
                    break candidate;
                }
                *count += 1;
            }
        };
        taken.insert(id.clone());
        ids.push(id);
    }
    ids
}

/// Bring `live` in line with `records`.
pub fn reconcile(
    records: &[CelestialBodyRecord],
    live: &mut HashMap<BodyId, BodyState>,
    ctx: &mut ReconcileContext<'_>,
) -> ReconcileReport {
    let ids = resolve_ids(records);
    let wanted: HashSet<&BodyId> = ids.iter().collect();
    let mut report = ReconcileReport::default();

    let stale: Vec<BodyId> = live.keys().filter(|id| !wanted.contains(id)).cloned().collect();
    for id in stale {
        if let Some(state) = live.remove(&id) {
            destroy_body(&state, ctx);
            log::debug!("body removed: {id}");
            report.removed.push(id);
        }
    }

    for (index, (id, record)) in ids.into_iter().zip(records).enumerate() {
        if let Some(state) = live.get_mut(&id) {
            // Geometry stays; selection hands back the record from this list.
            if state.record != *record {
                state.record = record.clone();
            }
            report.kept += 1;
            continue;
        }
        let state = create_body(id.clone(), record, index, ctx);
        log::debug!(
            "body added: {id} (a={:.2}, e={:.2}, r={:.2})",
            state.params.semi_major_axis,
            state.params.eccentricity,
            state.params.radius
        );
        live.insert(id.clone(), state);
        report.added.push(id);
    }

    if !report.is_noop() {
        log::info!(
            "reconciled bodies: +{} -{} ={} (live {})",
            report.added.len(),
            report.removed.len(),
            report.kept,
            live.len()
        );
    }
    report
}

/// Build the sphere and orbit outline of a new body.
fn create_body(id: BodyId, record: &CelestialBodyRecord, index: usize, ctx: &mut ReconcileContext<'_>) -> BodyState {
    let config = ctx.config;
    let params = OrbitParams::derive(record, index, config);

    let sphere = ctx.scene.next_id();
    let orbit_line = ctx.scene.next_id();
    let state = BodyState::new(id.clone(), record.clone(), params, sphere, orbit_line, config);

    let url = record.texture().unwrap_or(&config.textures.body);
    let texture = ctx.textures.acquire(url);
    let mesh = MeshComponent::sphere(
        params.radius as f32,
        ctx.resources.allocate(ResourceKind::Geometry),
        ctx.resources.allocate(ResourceKind::Material),
    )
    .with_color(record.color().unwrap_or([1.0, 1.0, 1.0]))
    .with_texture(texture);
    ctx.scene.spawn(
        Node::new(sphere, NodeKind::Body)
            .with_tag(id.as_str())
            .with_pos(state.position)
            .with_mesh(mesh),
    );

    let path = OrbitPath::new(
        params.outline(config.orbit_segments),
        ctx.resources.allocate(ResourceKind::Geometry),
        ctx.resources.allocate(ResourceKind::Material),
    );
    ctx.scene.spawn(Node::new(orbit_line, NodeKind::OrbitPath).with_tag(id.as_str()).with_path(path));

    state
}

/// Despawn a body's nodes and release everything they own.
fn destroy_body(state: &BodyState, ctx: &mut ReconcileContext<'_>) {
    ctx.pulses.remove_entity(state.sphere);
    for node_id in [state.sphere, state.orbit_line] {
        match ctx.scene.despawn(node_id) {
            Some(node) => release_node(&node, ctx.resources, ctx.textures),
            None => log::warn!("body {} lost node {:?}", state.id, node_id),
        }
    }
}

/// Release the renderer resources and texture reference held by a despawned node.
pub(crate) fn release_node(node: &Node, resources: &mut GpuResources, textures: &mut TextureCache) {
    for handle in node.owned_resources() {
        resources.dispose(handle);
    }
    if let Some(texture) = node.texture() {
        textures.release(texture);
    }
}
