use serde::{Deserialize, Serialize};
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::controls::{OrbitControls, MIN_DAMPING};

/// Live-adjustable camera and interaction parameters.
///
/// Applying settings never moves the camera or rebuilds geometry; it only
/// changes how the next frames respond to input and project the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlSettings {
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Vertical field of view, degrees.
    pub fov: f32,
    /// Far clipping depth.
    pub far: f32,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            enable_damping: true,
            damping_factor: 0.08,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            fov: 60.0,
            far: 5000.0,
        }
    }
}

fn clamp_or(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        fallback
    }
}

impl ControlSettings {
    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Clamp every numeric field into a usable range. Non-finite values
    /// fall back to the default.
    pub fn sanitized(&self, near: f32) -> Self {
        let d = Self::default();
        Self {
            damping_factor: clamp_or(self.damping_factor, MIN_DAMPING, 1.0, d.damping_factor),
            rotate_speed: clamp_or(self.rotate_speed, 0.0, 10.0, d.rotate_speed),
            zoom_speed: clamp_or(self.zoom_speed, 0.0, 10.0, d.zoom_speed),
            pan_speed: clamp_or(self.pan_speed, 0.0, 10.0, d.pan_speed),
            fov: clamp_or(self.fov, 10.0, 120.0, d.fov),
            far: clamp_or(self.far, near * 2.0, 1.0e6, d.far),
            ..self.clone()
        }
    }

    /// Push onto the live camera and controls. Camera position and target
    /// are left as they are.
    pub fn apply(&self, camera: &mut PerspectiveCamera, controls: &mut OrbitControls) {
        let s = self.sanitized(camera.near);
        controls.enable_rotate = s.enable_rotate;
        controls.enable_zoom = s.enable_zoom;
        controls.enable_pan = s.enable_pan;
        controls.enable_damping = s.enable_damping;
        controls.damping_factor = s.damping_factor;
        controls.rotate_speed = s.rotate_speed;
        controls.zoom_speed = s.zoom_speed;
        controls.pan_speed = s.pan_speed;
        camera.fov_degrees = s.fov;
        camera.far = s.far;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn partial_json_keeps_defaults() {
        let s = ControlSettings::from_json(r#"{ "enable_pan": false, "fov": 45 }"#).unwrap();
        assert!(!s.enable_pan);
        assert_eq!(s.fov, 45.0);
        assert_eq!(s.damping_factor, 0.08);
    }

    #[test]
    fn sanitize_clamps_and_replaces_non_finite() {
        let s = ControlSettings {
            damping_factor: 3.0,
            fov: f32::NAN,
            far: 0.0,
            zoom_speed: -1.0,
            ..Default::default()
        }
        .sanitized(0.1);
        assert_eq!(s.damping_factor, 1.0);
        assert_eq!(s.fov, 60.0);
        assert!((s.far - 0.2).abs() < 1e-6);
        assert_eq!(s.zoom_speed, 0.0);
    }

    #[test]
    fn zero_damping_is_raised_to_the_floor() {
        let s = ControlSettings { damping_factor: 0.0, ..Default::default() }.sanitized(0.1);
        assert_eq!(s.damping_factor, MIN_DAMPING);
    }

    #[test]
    fn apply_does_not_move_camera() {
        let mut cam = PerspectiveCamera::new(60.0, 1.0, 0.1, 5000.0);
        cam.position = Vec3::new(3.0, 40.0, 90.0);
        cam.target = Vec3::new(1.0, 0.0, 0.0);
        let mut controls = OrbitControls::new(1.0, 4000.0);
        let settings = ControlSettings {
            enable_rotate: false,
            rotate_speed: 2.5,
            fov: 75.0,
            far: 8000.0,
            ..Default::default()
        };
        settings.apply(&mut cam, &mut controls);
        assert_eq!(cam.position, Vec3::new(3.0, 40.0, 90.0));
        assert_eq!(cam.target, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(cam.fov_degrees, 75.0);
        assert_eq!(cam.far, 8000.0);
        assert!(!controls.enable_rotate);
        assert_eq!(controls.rotate_speed, 2.5);
    }
}
