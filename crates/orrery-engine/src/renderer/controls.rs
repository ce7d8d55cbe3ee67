use std::f32::consts::{PI, TAU};

use glam::Vec3;
use crate::renderer::camera::PerspectiveCamera;

/// Keeps the polar angle off the poles so the view basis stays defined.
const POLE_EPSILON: f32 = 1e-4;
/// Wheel zoom step at `zoom_speed = 1`.
const ZOOM_BASE: f32 = 0.95;
/// Smallest damping fraction; below this pending motion would never apply.
pub const MIN_DAMPING: f32 = 0.01;

/// Orbit-style camera controls: rotate around a target, dolly, pan.
///
/// Input calls accumulate deltas; `update` applies them to the camera once
/// per frame. With damping enabled a fraction of the remaining delta is
/// applied each frame, so motion eases out after the pointer stops.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub enable_damping: bool,
    /// Fraction of the pending delta applied per frame when damping.
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Focal point the camera orbits.
    pub target: Vec3,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitControls {
    pub fn new(min_distance: f32, max_distance: f32) -> Self {
        Self {
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            enable_damping: true,
            damping_factor: 0.08,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance,
            max_distance: max_distance.max(min_distance),
            target: Vec3::ZERO,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Rotate by a pointer drag of `(dx, dy)` pixels on a surface `height` pixels tall.
    /// A drag across the full height turns one full revolution.
    pub fn rotate(&mut self, dx: f32, dy: f32, height: f32) {
        if !self.enable_rotate || height <= 0.0 {
            return;
        }
        self.delta_theta -= TAU * dx / height * self.rotate_speed;
        self.delta_phi -= TAU * dy / height * self.rotate_speed;
    }

    /// Dolly by a wheel delta. Positive moves away from the target.
    pub fn zoom(&mut self, wheel_delta: f32) {
        if !self.enable_zoom || wheel_delta == 0.0 || !wheel_delta.is_finite() {
            return;
        }
        let step = ZOOM_BASE.powf(self.zoom_speed);
        if wheel_delta < 0.0 {
            self.scale *= step;
        } else {
            self.scale /= step;
        }
    }

    /// Pan by a pointer drag so the scene under the pointer follows it.
    pub fn pan(&mut self, dx: f32, dy: f32, height: f32, camera: &PerspectiveCamera) {
        if !self.enable_pan || height <= 0.0 {
            return;
        }
        let forward = (self.target - camera.position).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        // Half the visible height at the target's depth.
        let target_distance = camera.position.distance(self.target) * (camera.fov_degrees.to_radians() / 2.0).tan();
        let left = 2.0 * dx * self.pan_speed * target_distance / height;
        let upward = 2.0 * dy * self.pan_speed * target_distance / height;
        self.pan_offset += right * -left + up * upward;
    }

    /// Apply pending motion to the camera. Returns true if the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        camera.target = self.target;
        if self.is_settled() {
            return false;
        }
        let before = camera.position;
        let offset = camera.position - self.target;
        let (radius, mut theta, mut phi) = to_spherical(offset);

        let f = if self.enable_damping { self.damping_factor.clamp(MIN_DAMPING, 1.0) } else { 1.0 };
        theta += self.delta_theta * f;
        phi = (phi + self.delta_phi * f).clamp(POLE_EPSILON, PI - POLE_EPSILON);
        let radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * f;

        camera.target = self.target;
        camera.position = self.target + from_spherical(radius, theta, phi);

        let keep = 1.0 - f;
        self.delta_theta *= keep;
        self.delta_phi *= keep;
        self.pan_offset *= keep;
        self.scale = 1.0;

        camera.position.distance_squared(before) > 1e-6
    }

    /// Recenter on the origin and move the camera to `position`, dropping any
    /// motion still pending.
    pub fn reset_target(&mut self, camera: &mut PerspectiveCamera, position: Vec3) {
        self.target = Vec3::ZERO;
        self.stop();
        camera.target = self.target;
        camera.position = position;
    }

    /// Drop pending motion.
    pub fn stop(&mut self) {
        self.delta_theta = 0.0;
        self.delta_phi = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;
    }

    /// True when no motion is pending.
    pub fn is_settled(&self) -> bool {
        self.delta_theta.abs() < 1e-6
            && self.delta_phi.abs() < 1e-6
            && self.pan_offset.length_squared() < 1e-12
            && self.scale == 1.0
    }
}

/// `(radius, theta, phi)` with Y up: theta around Y from +Z, phi down from +Y.
fn to_spherical(offset: Vec3) -> (f32, f32, f32) {
    let radius = offset.length();
    if radius <= f32::EPSILON {
        return (0.0, 0.0, PI / 2.0);
    }
    let theta = offset.x.atan2(offset.z);
    let phi = (offset.y / radius).clamp(-1.0, 1.0).acos();
    (radius, theta, phi)
}

fn from_spherical(radius: f32, theta: f32, phi: f32) -> Vec3 {
    let sin_phi_r = phi.sin() * radius;
    Vec3::new(sin_phi_r * theta.sin(), phi.cos() * radius, sin_phi_r * theta.cos())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (OrbitControls, PerspectiveCamera) {
        let mut cam = PerspectiveCamera::new(60.0, 1.5, 0.1, 5000.0);
        cam.position = Vec3::new(0.0, 60.0, 140.0);
        let mut controls = OrbitControls::new(1.0, 4000.0);
        controls.enable_damping = false;
        (controls, cam)
    }

    #[test]
    fn idle_update_does_not_move_camera() {
        let (mut controls, mut cam) = setup();
        assert!(!controls.update(&mut cam));
        assert_eq!(cam.position, Vec3::new(0.0, 60.0, 140.0));
    }

    #[test]
    fn rotate_keeps_distance() {
        let (mut controls, mut cam) = setup();
        let before = cam.distance();
        controls.rotate(120.0, 30.0, 600.0);
        assert!(controls.update(&mut cam));
        assert!((cam.distance() - before).abs() < 1e-2);
        assert!(controls.is_settled());
    }

    #[test]
    fn zoom_is_clamped() {
        let (mut controls, mut cam) = setup();
        controls.max_distance = 200.0;
        for _ in 0..100 {
            controls.zoom(1.0);
            controls.update(&mut cam);
        }
        assert!((cam.distance() - 200.0).abs() < 1e-2);
        controls.zoom(-1.0);
        controls.update(&mut cam);
        assert!(cam.distance() < 200.0);
    }

    #[test]
    fn disabled_inputs_are_ignored() {
        let (mut controls, mut cam) = setup();
        controls.enable_rotate = false;
        controls.enable_zoom = false;
        controls.enable_pan = false;
        controls.rotate(100.0, 100.0, 600.0);
        controls.zoom(5.0);
        let snapshot = cam.clone();
        controls.pan(50.0, 50.0, 600.0, &snapshot);
        assert!(controls.is_settled());
        assert!(!controls.update(&mut cam));
    }

    #[test]
    fn pan_moves_target() {
        let (mut controls, mut cam) = setup();
        let snapshot = cam.clone();
        controls.pan(100.0, 0.0, 600.0, &snapshot);
        controls.update(&mut cam);
        assert!(controls.target.x < 0.0, "dragging right moves the focus left");
        assert_eq!(cam.target, controls.target);
    }

    #[test]
    fn damping_eases_out() {
        let (mut controls, mut cam) = setup();
        controls.enable_damping = true;
        controls.damping_factor = 0.08;
        controls.rotate(300.0, 0.0, 600.0);
        controls.update(&mut cam);
        assert!(!controls.is_settled());
        for _ in 0..400 {
            controls.update(&mut cam);
        }
        assert!(controls.is_settled());
    }

    #[test]
    fn zero_damping_factor_still_settles() {
        let (mut controls, mut cam) = setup();
        controls.enable_damping = true;
        controls.damping_factor = 0.0;
        let start = cam.position;
        controls.rotate(300.0, 0.0, 600.0);
        assert!(controls.update(&mut cam));
        assert_ne!(cam.position, start);
        for _ in 0..3000 {
            controls.update(&mut cam);
        }
        assert!(controls.is_settled());
    }

    #[test]
    fn reset_target_recenters() {
        let (mut controls, mut cam) = setup();
        let snapshot = cam.clone();
        controls.pan(200.0, 80.0, 600.0, &snapshot);
        controls.update(&mut cam);
        controls.rotate(10.0, 0.0, 600.0);
        controls.reset_target(&mut cam, Vec3::new(0.0, 60.0, 140.0));
        assert_eq!(controls.target, Vec3::ZERO);
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.position, Vec3::new(0.0, 60.0, 140.0));
        assert!(controls.is_settled());
    }
}
