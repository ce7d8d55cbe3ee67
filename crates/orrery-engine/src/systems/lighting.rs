/// Scene lighting: one ambient term plus point lights.
///
/// Lights are persistent and stay until explicitly removed.
/// Each frame the engine exposes the active lights as a flat buffer
/// for the host renderer's lighting pass.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// A 3D point light.
///
/// Wire format (8 floats / 32 bytes):
/// `[x, y, z, r, g, b, intensity, distance]`
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct PointLight {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub intensity: f32,
    /// Cutoff distance in world units (0 = infinite).
    pub distance: f32,
}

impl PointLight {
    pub const FLOATS: usize = 8;

    /// Create a new point light at the given position.
    ///
    /// - `color`: RGB color in [0..1]
    /// - `intensity`: strength multiplier
    /// - `distance`: falloff cutoff in world units
    pub fn new(pos: Vec3, color: [f32; 3], intensity: f32, distance: f32) -> Self {
        Self {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            r: color[0],
            g: color[1],
            b: color[2],
            intensity,
            distance,
        }
    }

    pub fn pos(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// Manages active lights and the ambient term.
///
/// Ambient defaults to white (unlit output when no lights are present).
pub struct LightState {
    lights: Vec<PointLight>,
    ambient: [f32; 3],
}

impl LightState {
    pub fn new() -> Self {
        Self::with_capacity(4)
    }

    /// Create a LightState with a specific light capacity.
    pub fn with_capacity(max_lights: usize) -> Self {
        Self {
            lights: Vec::with_capacity(max_lights),
            ambient: [1.0, 1.0, 1.0],
        }
    }

    pub fn add(&mut self, light: PointLight) {
        self.lights.push(light);
    }

    pub fn clear(&mut self) {
        self.lights.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &PointLight> {
        self.lights.iter()
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }

    /// Set the ambient color, already multiplied by its intensity.
    pub fn set_ambient(&mut self, color: [f32; 3], intensity: f32) {
        self.ambient = color.map(|c| c * intensity);
    }

    pub fn ambient(&self) -> [f32; 3] {
        self.ambient
    }

    /// Lights as a flat slice for the host buffer.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.lights)
    }
}

impl Default for LightState {
    fn default() -> Self {
        Self::new()
    }
}

/// `0xrrggbb` to RGB in [0, 1].
pub fn rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_light_new() {
        let light = PointLight::new(Vec3::new(1.0, 2.0, 3.0), [1.0, 0.5, 0.0], 2.2, 1000.0);
        assert_eq!(light.pos(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(light.g, 0.5);
        assert_eq!(light.intensity, 2.2);
        assert_eq!(light.distance, 1000.0);
    }

    #[test]
    fn ambient_is_premultiplied() {
        let mut state = LightState::new();
        assert_eq!(state.ambient(), [1.0, 1.0, 1.0]);
        state.set_ambient([1.0, 1.0, 1.0], 0.25);
        assert_eq!(state.ambient(), [0.25, 0.25, 0.25]);
    }

    #[test]
    fn flat_buffer_matches_light_count() {
        let mut state = LightState::new();
        state.add(PointLight::new(Vec3::ZERO, rgb(0xfff0c0), 2.2, 1000.0));
        state.add(PointLight::new(Vec3::ONE, [1.0; 3], 1.0, 0.0));
        let floats = state.as_floats();
        assert_eq!(floats.len(), 2 * PointLight::FLOATS);
        assert_eq!(floats[PointLight::FLOATS], 1.0);
        state.clear();
        assert_eq!(state.count(), 0);
    }

    #[test]
    fn hex_rgb() {
        assert_eq!(rgb(0xff0000), [1.0, 0.0, 0.0]);
        let warm = rgb(0xfff0c0);
        assert!((warm[1] - 240.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn point_light_is_8_floats() {
        assert_eq!(std::mem::size_of::<PointLight>(), PointLight::FLOATS * 4);
    }
}
