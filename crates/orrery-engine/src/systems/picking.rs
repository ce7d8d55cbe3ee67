//! Ray picking against body spheres.

use glam::{Vec2, Vec3};
use crate::api::types::EntityId;
use crate::core::scene::SceneGraph;
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::surface::SurfaceRect;

/// A world-space ray with a unit direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir: dir.normalize_or_zero() }
    }

    /// Ray from the camera through a client-space point on the surface.
    /// `None` when the surface has no area.
    pub fn from_screen(camera: &PerspectiveCamera, rect: &SurfaceRect, client: Vec2) -> Option<Self> {
        let ndc = rect.to_ndc(client)?;
        let (origin, dir) = camera.ray_from_ndc(ndc);
        if dir == Vec3::ZERO || !dir.is_finite() {
            return None;
        }
        Some(Self { origin, dir })
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }

    /// Distance along the ray to the first intersection with a sphere.
    /// A ray starting inside the sphere reports the exit point.
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.dir);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let near = -b - sqrt_d;
        if near >= 0.0 {
            return Some(near);
        }
        let far = -b + sqrt_d;
        (far >= 0.0).then_some(far)
    }
}

/// Nearest pickable node hit by the ray. Only body spheres are pickable:
/// orbit lines, the sun and the backdrop are ignored.
pub fn pick_nearest(scene: &SceneGraph, ray: &Ray) -> Option<(EntityId, f32)> {
    scene
        .iter()
        .filter(|node| node.is_pickable())
        .filter_map(|node| {
            let radius = node.world_radius()?;
            ray.intersect_sphere(node.pos, radius).map(|t| (node.id, t))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::resources::{GpuResources, ResourceKind};
    use crate::components::mesh::MeshComponent;
    use crate::components::node::{Node, NodeKind};

    fn sphere_node(scene: &mut SceneGraph, res: &mut GpuResources, kind: NodeKind, pos: Vec3, radius: f32) -> EntityId {
        let id = scene.next_id();
        let mesh = MeshComponent::sphere(radius, res.allocate(ResourceKind::Geometry), res.allocate(ResourceKind::Material));
        scene.spawn(Node::new(id, kind).with_pos(pos).with_mesh(mesh))
    }

    #[test]
    fn ray_sphere_hit_and_miss() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), -Vec3::Z);
        assert!((ray.intersect_sphere(Vec3::ZERO, 2.0).unwrap() - 8.0).abs() < 1e-5);
        assert!(ray.intersect_sphere(Vec3::new(5.0, 0.0, 0.0), 2.0).is_none());
        assert!(ray.intersect_sphere(Vec3::new(0.0, 0.0, 20.0), 2.0).is_none(), "behind the origin");
    }

    #[test]
    fn nearest_body_wins() {
        let mut scene = SceneGraph::new();
        let mut res = GpuResources::new();
        let far = sphere_node(&mut scene, &mut res, NodeKind::Body, Vec3::new(0.0, 0.0, -20.0), 2.0);
        let near = sphere_node(&mut scene, &mut res, NodeKind::Body, Vec3::new(0.0, 0.0, 0.0), 2.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 50.0), -Vec3::Z);
        let (hit, _) = pick_nearest(&scene, &ray).unwrap();
        assert_eq!(hit, near);
        assert_ne!(hit, far);
    }

    #[test]
    fn sun_and_backdrop_are_not_pickable() {
        let mut scene = SceneGraph::new();
        let mut res = GpuResources::new();
        sphere_node(&mut scene, &mut res, NodeKind::Sun, Vec3::ZERO, 10.0);
        sphere_node(&mut scene, &mut res, NodeKind::Starfield, Vec3::ZERO, 2000.0);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 50.0), -Vec3::Z);
        assert!(pick_nearest(&scene, &ray).is_none());

        let body = sphere_node(&mut scene, &mut res, NodeKind::Body, Vec3::ZERO, 1.0);
        assert_eq!(pick_nearest(&scene, &ray).map(|h| h.0), Some(body));
    }

    #[test]
    fn screen_ray_through_projected_center_hits() {
        let mut scene = SceneGraph::new();
        let mut res = GpuResources::new();
        let mut cam = PerspectiveCamera::new(60.0, 800.0 / 600.0, 0.1, 5000.0);
        cam.position = Vec3::new(0.0, 60.0, 140.0);
        let rect = SurfaceRect::new(0.0, 0.0, 800.0, 600.0);

        let center = Vec3::new(30.0, 0.0, 10.0);
        let body = sphere_node(&mut scene, &mut res, NodeKind::Body, center, 1.0);

        let ndc = cam.world_to_ndc(center).unwrap();
        let client = Vec2::new((ndc.x + 1.0) / 2.0 * 800.0, (1.0 - ndc.y) / 2.0 * 600.0);
        let ray = Ray::from_screen(&cam, &rect, client).unwrap();
        assert_eq!(pick_nearest(&scene, &ray).map(|h| h.0), Some(body));

        let empty = Ray::from_screen(&cam, &rect, Vec2::new(5.0, 5.0)).unwrap();
        assert!(pick_nearest(&scene, &empty).is_none());
    }
}
