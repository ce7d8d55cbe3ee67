use std::collections::HashMap;

use crate::api::config::EngineConfig;
use crate::api::types::{BodyId, EntityId};
use crate::components::body::BodyState;
use crate::core::scene::SceneGraph;
use crate::core::time::Playback;

/// Advance every live body by one tick and mirror the result onto its sphere node.
///
/// While paused nothing moves: no anomaly advance, no position update, no
/// spin. Each body advances independently, so a degenerate body cannot
/// disturb the others.
pub fn integrate(
    bodies: &mut HashMap<BodyId, BodyState>,
    sun: Option<EntityId>,
    scene: &mut SceneGraph,
    playback: &Playback,
    config: &EngineConfig,
) {
    if playback.paused() {
        return;
    }
    let speed = playback.speed();

    if let Some(node) = sun.and_then(|id| scene.get_mut(id)) {
        node.rotation = (node.rotation + config.sun_spin_rate * speed as f32).rem_euclid(std::f32::consts::TAU);
    }

    for body in bodies.values_mut() {
        body.advance(speed, config);
        if let Some(node) = scene.get_mut(body.sphere) {
            node.pos = body.position;
            node.rotation = body.spin;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::record::CelestialBodyRecord;
    use crate::components::body::OrbitParams;
    use crate::components::node::{Node, NodeKind};
    use serde_json::json;

    fn world(period: f64) -> (HashMap<BodyId, BodyState>, SceneGraph, EngineConfig) {
        let cfg = EngineConfig::default();
        let mut scene = SceneGraph::new();
        let (sphere, line) = (scene.next_id(), scene.next_id());
        scene.spawn(Node::new(sphere, NodeKind::Body));
        scene.spawn(Node::new(line, NodeKind::OrbitPath));
        let rec = CelestialBodyRecord::from_value(json!({ "id": "A", "orbitalPeriodDays": period, "eccentricity": 0.3 }))
            .unwrap();
        let params = OrbitParams::derive(&rec, 0, &cfg);
        let mut bodies = HashMap::new();
        bodies.insert(BodyId::from("A"), BodyState::new(BodyId::from("A"), rec, params, sphere, line, &cfg));
        (bodies, scene, cfg)
    }

    fn body(bodies: &HashMap<BodyId, BodyState>) -> &BodyState {
        &bodies[&BodyId::from("A")]
    }

    #[test]
    fn paused_frames_change_nothing() {
        let (mut bodies, mut scene, cfg) = world(10.0);
        let mut pb = Playback::default();
        pb.set_paused(true);
        let (anomaly, pos, spin) = (body(&bodies).anomaly, body(&bodies).position, body(&bodies).spin);
        for _ in 0..100 {
            integrate(&mut bodies, None, &mut scene, &pb, &cfg);
        }
        assert_eq!(body(&bodies).anomaly, anomaly);
        assert_eq!(body(&bodies).position, pos);
        assert_eq!(body(&bodies).spin, spin);
    }

    #[test]
    fn running_frame_advances_by_orbit_speed() {
        let (mut bodies, mut scene, cfg) = world(10.0);
        let pb = Playback::default();
        integrate(&mut bodies, None, &mut scene, &pb, &cfg);
        let expected = 0.1 * cfg.orbit_rate;
        assert!((body(&bodies).anomaly - expected).abs() < 1e-12);
        let sphere = scene.get(body(&bodies).sphere).unwrap();
        assert_eq!(sphere.pos, body(&bodies).position);
        assert_eq!(sphere.rotation, body(&bodies).spin);
    }

    #[test]
    fn double_speed_doubles_the_step() {
        let (mut slow, mut scene_a, cfg) = world(10.0);
        let (mut fast, mut scene_b, _) = world(10.0);
        let mut pb = Playback::default();
        integrate(&mut slow, None, &mut scene_a, &pb, &cfg);
        pb.set_speed(2.0);
        integrate(&mut fast, None, &mut scene_b, &pb, &cfg);
        assert!((body(&fast).anomaly - 2.0 * body(&slow).anomaly).abs() < 1e-12);
    }

    #[test]
    fn sun_spins_only_while_running() {
        let (mut bodies, mut scene, cfg) = world(10.0);
        let sun = scene.next_id();
        scene.spawn(Node::new(sun, NodeKind::Sun));
        let mut pb = Playback::default();
        integrate(&mut bodies, Some(sun), &mut scene, &pb, &cfg);
        let spun = scene.get(sun).unwrap().rotation;
        assert!((spun - cfg.sun_spin_rate).abs() < 1e-7);
        pb.set_paused(true);
        integrate(&mut bodies, Some(sun), &mut scene, &pb, &cfg);
        assert_eq!(scene.get(sun).unwrap().rotation, spun);
    }
}
