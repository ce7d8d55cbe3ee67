use glam::Vec3;
use crate::assets::resources::ResourceHandle;
use crate::assets::textures::TextureHandle;

/// Material flags for sphere meshes (bitmask, written to the wire as f32).
pub mod mesh_flags {
    /// Ignore scene lighting (sun, starfield).
    pub const UNLIT: u32 = 1;
    /// Render the inside of the sphere (starfield).
    pub const BACK_SIDE: u32 = 2;
    /// Additive blend, depth writes off (sun glow billboard).
    pub const ADDITIVE: u32 = 4;
    /// Camera-facing billboard instead of a sphere.
    pub const BILLBOARD: u32 = 8;
}

/// Sphere mesh attached to a scene node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshComponent {
    pub radius: f32,
    pub color: [f32; 3],
    pub emissive: f32,
    pub texture: Option<TextureHandle>,
    pub flags: u32,
    pub geometry: ResourceHandle,
    pub material: ResourceHandle,
}

impl MeshComponent {
    pub fn sphere(radius: f32, geometry: ResourceHandle, material: ResourceHandle) -> Self {
        Self {
            radius,
            color: [1.0, 1.0, 1.0],
            emissive: 0.0,
            texture: None,
            flags: 0,
            geometry,
            material,
        }
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn with_texture(mut self, texture: TextureHandle) -> Self {
        self.texture = Some(texture);
        self
    }

    pub fn with_emissive(mut self, emissive: f32) -> Self {
        self.emissive = emissive;
        self
    }

    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags |= flags;
        self
    }
}

/// Static orbit outline: a closed polyline in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPath {
    /// Loop vertices; the closing segment back to `points[0]` is implicit.
    pub points: Vec<Vec3>,
    pub color: [f32; 3],
    pub opacity: f32,
    pub geometry: ResourceHandle,
    pub material: ResourceHandle,
}

impl OrbitPath {
    /// Muted outline color.
    pub const DEFAULT_COLOR: [f32; 3] = [0.2, 0.2, 0.267];
    pub const DEFAULT_OPACITY: f32 = 0.6;

    pub fn new(points: Vec<Vec3>, geometry: ResourceHandle, material: ResourceHandle) -> Self {
        Self {
            points,
            color: Self::DEFAULT_COLOR,
            opacity: Self::DEFAULT_OPACITY,
            geometry,
            material,
        }
    }
}
