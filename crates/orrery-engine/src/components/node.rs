use glam::Vec3;
use crate::api::types::EntityId;
use crate::assets::resources::ResourceHandle;
use crate::assets::textures::TextureHandle;
use crate::components::mesh::{MeshComponent, OrbitPath};

/// Role of a node in the scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// A body's sphere. The only pickable kind.
    Body,
    /// A body's orbit outline.
    OrbitPath,
    Sun,
    SunGlow,
    Starfield,
}

/// Fat scene node: a single struct with optional components.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: EntityId,
    /// Free-form label (body id for bodies).
    pub tag: String,
    pub kind: NodeKind,
    /// Inactive nodes are skipped by rendering and picking.
    pub active: bool,
    /// Position in world space.
    pub pos: Vec3,
    /// Spin about the Y axis, radians.
    pub rotation: f32,
    /// Uniform scale applied on top of the mesh radius.
    pub scale: f32,
    pub mesh: Option<MeshComponent>,
    pub path: Option<OrbitPath>,
}

impl Node {
    pub fn new(id: EntityId, kind: NodeKind) -> Self {
        Self {
            id,
            tag: String::new(),
            kind,
            active: true,
            pos: Vec3::ZERO,
            rotation: 0.0,
            scale: 1.0,
            mesh: None,
            path: None,
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_pos(mut self, pos: Vec3) -> Self {
        self.pos = pos;
        self
    }

    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_mesh(mut self, mesh: MeshComponent) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_path(mut self, path: OrbitPath) -> Self {
        self.path = Some(path);
        self
    }

    pub fn is_pickable(&self) -> bool {
        self.active && self.kind == NodeKind::Body && self.mesh.is_some()
    }

    /// Rendered sphere radius including scale, if this node has a mesh.
    pub fn world_radius(&self) -> Option<f32> {
        self.mesh.map(|m| m.radius * self.scale)
    }

    /// Renderer resources this node owns exclusively.
    pub fn owned_resources(&self) -> Vec<ResourceHandle> {
        let mut out = Vec::with_capacity(4);
        if let Some(mesh) = &self.mesh {
            out.push(mesh.geometry);
            out.push(mesh.material);
        }
        if let Some(path) = &self.path {
            out.push(path.geometry);
            out.push(path.material);
        }
        out
    }

    /// Texture reference held by this node, to release into the shared cache.
    pub fn texture(&self) -> Option<TextureHandle> {
        self.mesh.and_then(|m| m.texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::resources::{GpuResources, ResourceKind};

    #[test]
    fn only_active_body_meshes_are_pickable() {
        let mut res = GpuResources::new();
        let mesh = MeshComponent::sphere(
            2.0,
            res.allocate(ResourceKind::Geometry),
            res.allocate(ResourceKind::Material),
        );
        let mut body = Node::new(EntityId(1), NodeKind::Body).with_mesh(mesh);
        let sun = Node::new(EntityId(2), NodeKind::Sun).with_mesh(mesh);
        assert!(body.is_pickable());
        assert!(!sun.is_pickable());
        body.active = false;
        assert!(!body.is_pickable());
    }

    #[test]
    fn world_radius_includes_scale() {
        let mut res = GpuResources::new();
        let mesh = MeshComponent::sphere(
            2.0,
            res.allocate(ResourceKind::Geometry),
            res.allocate(ResourceKind::Material),
        );
        let node = Node::new(EntityId(1), NodeKind::Body).with_mesh(mesh).with_scale(1.5);
        assert_eq!(node.world_radius(), Some(3.0));
        assert_eq!(node.owned_resources().len(), 2);
    }
}
