/// Flat frame buffer layout read by the host renderer.
/// Must stay in sync with the TypeScript reader.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Camera: 28 floats]
/// [Spheres: max_spheres × 12 floats]
/// [Line ranges: max_line_ranges × 6 floats]
/// [Line vertices: max_line_vertices × 3 floats]
/// [Lights: max_lights × 8 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header on every pack.
/// The host reads them from the header to compute offsets dynamically.

use crate::api::config::EngineConfig;
use crate::api::types::SceneEvent;
use crate::renderer::camera::CameraUniform;
use crate::renderer::instance::{LineRange, LineVertex, RenderBuffer, SphereInstance};
use crate::systems::lighting::{LightState, PointLight};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_LOCK: usize = 0;
pub const HEADER_FRAME_COUNTER: usize = 1;
pub const HEADER_PROTOCOL_VERSION: usize = 2;
pub const HEADER_MAX_SPHERES: usize = 3;
pub const HEADER_SPHERE_COUNT: usize = 4;
pub const HEADER_ADDITIVE_SPLIT: usize = 5;
pub const HEADER_MAX_LINE_RANGES: usize = 6;
pub const HEADER_LINE_RANGE_COUNT: usize = 7;
pub const HEADER_MAX_LINE_VERTICES: usize = 8;
pub const HEADER_LINE_VERTEX_COUNT: usize = 9;
pub const HEADER_MAX_LIGHTS: usize = 10;
pub const HEADER_LIGHT_COUNT: usize = 11;
pub const HEADER_MAX_EVENTS: usize = 12;
pub const HEADER_EVENT_COUNT: usize = 13;
pub const HEADER_VIEWPORT_WIDTH: usize = 14;
pub const HEADER_VIEWPORT_HEIGHT: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_spheres: usize,
    /// One range per body orbit outline.
    pub max_line_ranges: usize,
    pub max_line_vertices: usize,
    pub max_lights: usize,
    pub max_events: usize,

    /// Offset (in floats) where the camera uniform begins.
    pub camera_offset: usize,
    pub sphere_data_offset: usize,
    pub line_range_offset: usize,
    pub line_vertex_offset: usize,
    pub light_data_offset: usize,
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(
        max_spheres: usize,
        max_line_ranges: usize,
        max_line_vertices: usize,
        max_lights: usize,
        max_events: usize,
    ) -> Self {
        let camera_offset = HEADER_FLOATS;
        let sphere_data_offset = camera_offset + CameraUniform::FLOATS;
        let line_range_offset = sphere_data_offset + max_spheres * SphereInstance::FLOATS;
        let line_vertex_offset = line_range_offset + max_line_ranges * LineRange::FLOATS;
        let light_data_offset = line_vertex_offset + max_line_vertices * LineVertex::FLOATS;
        let event_data_offset = light_data_offset + max_lights * PointLight::FLOATS;
        let buffer_total_floats = event_data_offset + max_events * SceneEvent::FLOATS;

        Self {
            max_spheres,
            max_line_ranges,
            max_line_vertices,
            max_lights,
            max_events,
            camera_offset,
            sphere_data_offset,
            line_range_offset,
            line_vertex_offset,
            light_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from an EngineConfig.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            config.max_spheres(),
            config.max_bodies,
            config.max_line_vertices(),
            config.max_lights,
            config.max_events,
        )
    }

    /// A zeroed buffer of the full layout size.
    pub fn alloc(&self) -> Vec<f32> {
        vec![0.0; self.buffer_total_floats]
    }

    /// Copy one frame into `out`, truncating each section to its capacity.
    /// Returns false if `out` is smaller than the layout.
    pub fn pack(
        &self,
        out: &mut [f32],
        frame: u32,
        render: &RenderBuffer,
        lights: &LightState,
        events: &[SceneEvent],
    ) -> bool {
        if out.len() < self.buffer_total_floats {
            log::warn!("frame buffer too small: {} < {}", out.len(), self.buffer_total_floats);
            return false;
        }

        out[self.camera_offset..self.sphere_data_offset].copy_from_slice(bytemuck::cast_slice(&[render.camera]));
        let spheres = write_section(out, self.sphere_data_offset, self.max_spheres, &render.spheres);
        let ranges = write_section(out, self.line_range_offset, self.max_line_ranges, &render.line_ranges);
        let vertices = write_section(out, self.line_vertex_offset, self.max_line_vertices, &render.line_vertices);
        let light_list: Vec<PointLight> = lights.iter().copied().collect();
        let light_count = write_section(out, self.light_data_offset, self.max_lights, &light_list);
        let event_count = write_section(out, self.event_data_offset, self.max_events, events);

        let header = &mut out[..HEADER_FLOATS];
        header[HEADER_LOCK] = 0.0;
        header[HEADER_FRAME_COUNTER] = frame as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_MAX_SPHERES] = self.max_spheres as f32;
        header[HEADER_SPHERE_COUNT] = spheres as f32;
        header[HEADER_ADDITIVE_SPLIT] = (render.additive_split as usize).min(spheres) as f32;
        header[HEADER_MAX_LINE_RANGES] = self.max_line_ranges as f32;
        header[HEADER_LINE_RANGE_COUNT] = ranges as f32;
        header[HEADER_MAX_LINE_VERTICES] = self.max_line_vertices as f32;
        header[HEADER_LINE_VERTEX_COUNT] = vertices as f32;
        header[HEADER_MAX_LIGHTS] = self.max_lights as f32;
        header[HEADER_LIGHT_COUNT] = light_count as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_EVENT_COUNT] = event_count as f32;
        header[HEADER_VIEWPORT_WIDTH] = render.camera.viewport[0];
        header[HEADER_VIEWPORT_HEIGHT] = render.camera.viewport[1];
        true
    }
}

fn write_section<T: bytemuck::Pod>(out: &mut [f32], offset: usize, capacity: usize, items: &[T]) -> usize {
    let n = items.len().min(capacity);
    let floats: &[f32] = bytemuck::cast_slice(&items[..n]);
    out[offset..offset + floats.len()].copy_from_slice(floats);
    n
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::event_kind;

    #[test]
    fn from_default_config_matches_expected_sizes() {
        let cfg = EngineConfig::default();
        let layout = ProtocolLayout::from_config(&cfg);

        assert_eq!(layout.max_spheres, 259);
        assert_eq!(layout.max_line_ranges, 256);
        assert_eq!(layout.max_line_vertices, 256 * 128);
        assert_eq!(layout.max_lights, 4);
        assert_eq!(layout.max_events, 32);

        let expected = HEADER_FLOATS + 28 + 259 * 12 + 256 * 6 + 256 * 128 * 3 + 4 * 8 + 32 * 4;
        assert_eq!(layout.buffer_total_floats, expected);
        assert_eq!(layout.buffer_total_bytes, expected * 4);
    }

    #[test]
    fn offsets_are_contiguous() {
        let layout = ProtocolLayout::new(10, 4, 100, 2, 8);

        assert_eq!(layout.camera_offset, HEADER_FLOATS);
        assert_eq!(layout.sphere_data_offset, HEADER_FLOATS + CameraUniform::FLOATS);
        assert_eq!(layout.line_range_offset, layout.sphere_data_offset + 10 * 12);
        assert_eq!(layout.line_vertex_offset, layout.line_range_offset + 4 * 6);
        assert_eq!(layout.light_data_offset, layout.line_vertex_offset + 100 * 3);
        assert_eq!(layout.event_data_offset, layout.light_data_offset + 2 * 8);
        assert_eq!(layout.buffer_total_floats, layout.event_data_offset + 8 * 4);
    }

    #[test]
    fn pack_writes_header_and_sections() {
        let layout = ProtocolLayout::new(2, 1, 4, 1, 2);
        let mut out = layout.alloc();
        let mut render = RenderBuffer::new();
        for i in 0..3 {
            render.spheres.push(SphereInstance { x: i as f32, radius: 1.0, ..Default::default() });
        }
        render.additive_split = 3;
        render.line_vertices.push(LineVertex { x: 1.0, y: 2.0, z: 3.0 });
        render.camera.viewport = [640.0, 480.0, 0.0, 0.0];
        let mut lights = LightState::new();
        lights.add(PointLight::new(glam::Vec3::ZERO, [1.0, 0.5, 0.25], 2.0, 100.0));
        let events = [SceneEvent { kind: event_kind::BODY_SELECTED, a: 7.0, b: 0.0, c: 0.0 }];

        assert!(layout.pack(&mut out, 9, &render, &lights, &events));

        assert_eq!(out[HEADER_FRAME_COUNTER], 9.0);
        assert_eq!(out[HEADER_PROTOCOL_VERSION], PROTOCOL_VERSION);
        assert_eq!(out[HEADER_SPHERE_COUNT], 2.0, "truncated to capacity");
        assert_eq!(out[HEADER_ADDITIVE_SPLIT], 2.0);
        assert_eq!(out[HEADER_LINE_VERTEX_COUNT], 1.0);
        assert_eq!(out[HEADER_LIGHT_COUNT], 1.0);
        assert_eq!(out[HEADER_EVENT_COUNT], 1.0);
        assert_eq!(out[HEADER_VIEWPORT_WIDTH], 640.0);

        assert_eq!(out[layout.sphere_data_offset + SphereInstance::FLOATS], 1.0, "second sphere x");
        assert_eq!(&out[layout.line_vertex_offset..layout.line_vertex_offset + 3], &[1.0, 2.0, 3.0]);
        assert_eq!(out[layout.light_data_offset + 6], 2.0, "light intensity");
        assert_eq!(out[layout.event_data_offset + 1], 7.0);
    }

    #[test]
    fn pack_rejects_short_buffer() {
        let layout = ProtocolLayout::new(2, 1, 4, 1, 2);
        let mut out = vec![0.0; layout.buffer_total_floats - 1];
        assert!(!layout.pack(&mut out, 0, &RenderBuffer::new(), &LightState::new(), &[]));
    }
}
