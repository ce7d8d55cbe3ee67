use bytemuck::{Pod, Zeroable};
use crate::renderer::camera::CameraUniform;

/// Per-sphere render data read by the host renderer.
/// 12 floats = 48 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SphereInstance {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// World-space radius, scale already applied.
    pub radius: f32,
    /// Spin about Y in radians.
    pub rotation: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    /// Texture handle, or -1 for untextured.
    pub texture: f32,
    pub emissive: f32,
    /// `mesh_flags` bitmask.
    pub flags: f32,
    /// Scene node id, for host-side correlation.
    pub node: f32,
}

impl SphereInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;
}

/// One orbit-outline vertex: x, y, z.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl LineVertex {
    pub const FLOATS: usize = 3;
}

/// One closed line loop inside the vertex buffer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct LineRange {
    /// First vertex index.
    pub start: f32,
    pub count: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub opacity: f32,
}

impl LineRange {
    pub const FLOATS: usize = 6;
}

/// Everything the host needs to draw one frame.
pub struct RenderBuffer {
    /// Lit/opaque spheres first, then additive ones from `additive_split`.
    pub spheres: Vec<SphereInstance>,
    pub additive_split: u32,
    pub line_vertices: Vec<LineVertex>,
    pub line_ranges: Vec<LineRange>,
    pub camera: CameraUniform,
}

impl RenderBuffer {
    pub fn new() -> Self {
        Self::with_capacity(256, 256 * 128)
    }

    pub fn with_capacity(max_spheres: usize, max_line_vertices: usize) -> Self {
        Self {
            spheres: Vec::with_capacity(max_spheres),
            additive_split: 0,
            line_vertices: Vec::with_capacity(max_line_vertices),
            line_ranges: Vec::with_capacity(max_spheres),
            camera: CameraUniform::zeroed(),
        }
    }

    pub fn clear(&mut self) {
        self.spheres.clear();
        self.additive_split = 0;
        self.line_vertices.clear();
        self.line_ranges.clear();
    }

    pub fn sphere_count(&self) -> u32 {
        self.spheres.len() as u32
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.line_vertices.len() as u32
    }

    pub fn line_range_count(&self) -> u32 {
        self.line_ranges.len() as u32
    }

    /// Raw pointers for zero-copy host reads.
    pub fn spheres_ptr(&self) -> *const f32 {
        self.spheres.as_ptr() as *const f32
    }

    pub fn line_vertices_ptr(&self) -> *const f32 {
        self.line_vertices.as_ptr() as *const f32
    }

    pub fn line_ranges_ptr(&self) -> *const f32 {
        self.line_ranges.as_ptr() as *const f32
    }

    pub fn camera_ptr(&self) -> *const f32 {
        &self.camera as *const CameraUniform as *const f32
    }
}

impl Default for RenderBuffer {
    fn default() -> Self {
        Self::new()
    }
}
