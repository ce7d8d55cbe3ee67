use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec2, Vec3};

/// Perspective camera looking at a target point.
/// Right-handed, Y-up, depth in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Width / height. Only changed by a non-degenerate resize.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
}

/// GPU-side uniform data for the camera.
///
/// Wire format (28 floats): view-projection (column-major), then
/// `[eye.x, eye.y, eye.z, pad]`, `[ambient r, g, b, light count]`,
/// `[viewport w, h, pad, pad]`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub ambient: [f32; 4],
    pub viewport: [f32; 4],
}

impl CameraUniform {
    pub const FLOATS: usize = 28;
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_degrees,
            aspect: if aspect.is_finite() && aspect > 0.0 { aspect } else { 1.0 },
            near,
            far,
            position: Vec3::new(0.0, 0.0, 10.0),
            target: Vec3::ZERO,
        }
    }

    /// Update the aspect ratio from surface dimensions.
    /// Zero or non-finite dimensions keep the previous aspect.
    pub fn set_viewport(&mut self, width: f32, height: f32) -> bool {
        let aspect = width / height;
        if width > 0.0 && height > 0.0 && aspect.is_finite() {
            self.aspect = aspect;
            true
        } else {
            false
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn uniform(&self, ambient: [f32; 3], light_count: usize, viewport: Vec2) -> CameraUniform {
        CameraUniform {
            view_proj: self.view_projection().to_cols_array_2d(),
            eye: [self.position.x, self.position.y, self.position.z, 0.0],
            ambient: [ambient[0], ambient[1], ambient[2], light_count as f32],
            viewport: [viewport.x, viewport.y, 0.0, 0.0],
        }
    }

    /// World-space ray through a point in normalized device coordinates.
    /// Returns `(origin, unit direction)`.
    pub fn ray_from_ndc(&self, ndc: Vec2) -> (Vec3, Vec3) {
        let inv = self.view_projection().inverse();
        let far_point = inv.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        let dir = (far_point - self.position).normalize_or_zero();
        (self.position, dir)
    }

    /// Project a world point to NDC. `None` if it is behind the camera.
    pub fn world_to_ndc(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_projection() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        Some(clip.truncate() / clip.w)
    }

    /// Distance from the camera to its target.
    pub fn distance(&self) -> f32 {
        self.position.distance(self.target)
    }
}
