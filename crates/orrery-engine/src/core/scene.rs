use crate::api::types::EntityId;
use crate::components::node::{Node, NodeKind};

/// Retained scene graph: flat node storage mutated in place across frames.
/// Designed for hundreds of nodes, not millions.
pub struct SceneGraph {
    nodes: Vec<Node>,
    next_id: u32,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a scene with a specific node capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            next_id: 1,
        }
    }

    /// Generate the next unique node id.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Add a node to the scene.
    pub fn spawn(&mut self, node: Node) -> EntityId {
        let id = node.id;
        self.nodes.push(node);
        id
    }

    /// Remove a node by id. Returns the removed node so its owner can
    /// release the resources it held.
    pub fn despawn(&mut self, id: EntityId) -> Option<Node> {
        let idx = self.nodes.iter().position(|n| n.id == id)?;
        Some(self.nodes.swap_remove(idx))
    }

    pub fn get(&self, id: EntityId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }

    /// First node of the given kind.
    pub fn find_kind(&self, kind: NodeKind) -> Option<&Node> {
        self.nodes.iter().find(|n| n.kind == kind)
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Remove every node, handing them back for resource release.
    pub fn drain(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.nodes)
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn spawn_and_get() {
        let mut scene = SceneGraph::new();
        let id = scene.next_id();
        scene.spawn(Node::new(id, NodeKind::Body).with_pos(Vec3::new(1.0, 0.0, 2.0)));
        assert_eq!(scene.get(id).unwrap().pos, Vec3::new(1.0, 0.0, 2.0));
    }

    #[test]
    fn ids_are_unique() {
        let mut scene = SceneGraph::new();
        let a = scene.next_id();
        let b = scene.next_id();
        assert_ne!(a, b);
    }

    #[test]
    fn despawn_returns_node() {
        let mut scene = SceneGraph::new();
        let id = scene.next_id();
        scene.spawn(Node::new(id, NodeKind::OrbitPath).with_tag("K1"));
        let removed = scene.despawn(id).unwrap();
        assert_eq!(removed.tag, "K1");
        assert!(scene.is_empty());
        assert!(scene.despawn(id).is_none());
    }

    #[test]
    fn drain_empties_scene() {
        let mut scene = SceneGraph::new();
        for _ in 0..3 {
            let id = scene.next_id();
            scene.spawn(Node::new(id, NodeKind::Body));
        }
        assert_eq!(scene.count_kind(NodeKind::Body), 3);
        assert_eq!(scene.drain().len(), 3);
        assert_eq!(scene.len(), 0);
    }
}
