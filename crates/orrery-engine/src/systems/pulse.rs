// systems/pulse.rs
//
// Selection pulse: a deferred scale bump keyed by EntityId.
//
// Usage:
//   pulses.trigger(node_id, &mut scene, 1.18, 0.3);
//   pulses.tick(dt, &mut scene);   // restores the base scale once expired

use std::collections::HashMap;
use crate::api::types::EntityId;
use crate::core::scene::SceneGraph;

/// One running pulse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pulse {
    /// Scale the node had before the first trigger.
    pub base_scale: f32,
    /// Seconds left before reverting.
    pub remaining: f32,
}

/// Running pulses. Time-based, never blocks the frame.
#[derive(Debug, Default)]
pub struct PulseState {
    pulses: HashMap<EntityId, Pulse>,
}

impl PulseState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grow `node` by `factor` for `duration` seconds.
    ///
    /// Re-triggering a node that is already pulsing only re-arms the timer;
    /// the scale never compounds.
    pub fn trigger(&mut self, node: EntityId, scene: &mut SceneGraph, factor: f32, duration: f32) {
        let Some(target) = scene.get_mut(node) else {
            return;
        };
        let pulse = self.pulses.entry(node).or_insert(Pulse {
            base_scale: target.scale,
            remaining: 0.0,
        });
        pulse.remaining = duration.max(0.0);
        target.scale = pulse.base_scale * factor;
    }

    /// Advance all pulses and restore the scale of expired ones.
    /// Returns the number that expired this tick.
    pub fn tick(&mut self, dt: f32, scene: &mut SceneGraph) -> usize {
        let mut expired = Vec::new();
        for (&node, pulse) in self.pulses.iter_mut() {
            pulse.remaining -= dt;
            if pulse.remaining <= 0.0 {
                if let Some(target) = scene.get_mut(node) {
                    target.scale = pulse.base_scale;
                }
                expired.push(node);
            }
        }
        let count = expired.len();
        for node in expired {
            self.pulses.remove(&node);
        }
        count
    }

    /// Drop the pulse of a node that is being despawned.
    pub fn remove_entity(&mut self, node: EntityId) {
        self.pulses.remove(&node);
    }

    pub fn get(&self, node: EntityId) -> Option<&Pulse> {
        self.pulses.get(&node)
    }

    pub fn len(&self) -> usize {
        self.pulses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pulses.is_empty()
    }

    pub fn clear(&mut self) {
        self.pulses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::node::{Node, NodeKind};

    fn scene_with_body() -> (SceneGraph, EntityId) {
        let mut scene = SceneGraph::new();
        let id = scene.next_id();
        scene.spawn(Node::new(id, NodeKind::Body));
        (scene, id)
    }

    #[test]
    fn pulse_grows_then_reverts() {
        let (mut scene, id) = scene_with_body();
        let mut pulses = PulseState::new();
        pulses.trigger(id, &mut scene, 1.18, 0.3);
        assert!((scene.get(id).unwrap().scale - 1.18).abs() < 1e-6);

        assert_eq!(pulses.tick(0.2, &mut scene), 0);
        assert!((scene.get(id).unwrap().scale - 1.18).abs() < 1e-6);

        assert_eq!(pulses.tick(0.2, &mut scene), 1);
        assert_eq!(scene.get(id).unwrap().scale, 1.0);
        assert!(pulses.is_empty());
    }

    #[test]
    fn retrigger_does_not_compound() {
        let (mut scene, id) = scene_with_body();
        let mut pulses = PulseState::new();
        pulses.trigger(id, &mut scene, 1.18, 0.3);
        pulses.tick(0.2, &mut scene);
        pulses.trigger(id, &mut scene, 1.18, 0.3);
        assert!((scene.get(id).unwrap().scale - 1.18).abs() < 1e-6);

        // Timer was re-armed: 0.2s after the second click it is still pulsing.
        pulses.tick(0.2, &mut scene);
        assert_eq!(pulses.len(), 1);
        pulses.tick(0.2, &mut scene);
        assert_eq!(scene.get(id).unwrap().scale, 1.0);
    }

    #[test]
    fn unknown_node_is_ignored() {
        let mut scene = SceneGraph::new();
        let mut pulses = PulseState::new();
        pulses.trigger(EntityId(42), &mut scene, 1.18, 0.3);
        assert!(pulses.is_empty());
    }

    #[test]
    fn removed_entity_drops_pulse() {
        let (mut scene, id) = scene_with_body();
        let mut pulses = PulseState::new();
        pulses.trigger(id, &mut scene, 1.18, 0.3);
        scene.despawn(id);
        pulses.remove_entity(id);
        assert!(pulses.is_empty());
        assert_eq!(pulses.tick(1.0, &mut scene), 0);
    }
}
