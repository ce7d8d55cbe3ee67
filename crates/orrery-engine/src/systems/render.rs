use crate::components::mesh::mesh_flags;
use crate::components::node::Node;
use crate::renderer::instance::{LineRange, LineVertex, RenderBuffer, SphereInstance};

/// Build the sphere and line sections of the render buffer from scene nodes.
/// Spheres are grouped by blend: lit/opaque first, then additive, with
/// `additive_split` at the boundary. Excess spheres past `max_spheres` are dropped.
pub fn build_render_buffer<'a>(nodes: impl Iterator<Item = &'a Node>, buffer: &mut RenderBuffer, max_spheres: usize) {
    buffer.clear();

    let mut additive: Vec<SphereInstance> = Vec::new();

    for node in nodes {
        if !node.active {
            continue;
        }

        if let Some(mesh) = &node.mesh {
            let instance = SphereInstance {
                x: node.pos.x,
                y: node.pos.y,
                z: node.pos.z,
                radius: mesh.radius * node.scale,
                rotation: node.rotation,
                r: mesh.color[0],
                g: mesh.color[1],
                b: mesh.color[2],
                texture: mesh.texture.map_or(-1.0, |t| t.0 as f32),
                emissive: mesh.emissive,
                flags: mesh.flags as f32,
                node: node.id.0 as f32,
            };
            if mesh.flags & mesh_flags::ADDITIVE != 0 {
                additive.push(instance);
            } else {
                buffer.spheres.push(instance);
            }
        }

        if let Some(path) = &node.path {
            buffer.line_ranges.push(LineRange {
                start: buffer.line_vertices.len() as f32,
                count: path.points.len() as f32,
                r: path.color[0],
                g: path.color[1],
                b: path.color[2],
                opacity: path.opacity,
            });
            buffer.line_vertices.extend(path.points.iter().map(|p| LineVertex {
                x: p.x + node.pos.x,
                y: p.y + node.pos.y,
                z: p.z + node.pos.z,
            }));
        }
    }

    buffer.spheres.truncate(max_spheres);
    buffer.additive_split = buffer.spheres.len() as u32;
    let room = max_spheres.saturating_sub(buffer.spheres.len());
    buffer.spheres.extend(additive.into_iter().take(room));
}
