use std::cell::RefCell;
use std::rc::Rc;

use orrery_engine::{
    CelestialBodyRecord, ControlSettings, EngineConfig, InputEvent, ProtocolLayout, SceneEngine,
    SceneEvent, SharedTextureCache, SurfaceRect,
};

/// One mounted scene plus the flat buffer the host reads after each tick.
///
/// The bridge keeps these in a handle-keyed `thread_local!` map, because
/// wasm-bindgen cannot hand engine structs to JavaScript directly.
pub struct SceneRunner {
    engine: SceneEngine,
    layout: ProtocolLayout,
    frame: Vec<f32>,
    frame_counter: u32,
    /// Events of the last tick, kept so the host can read them by pointer.
    events: Vec<SceneEvent>,
    /// JSON of the most recent selection, taken once by the host.
    selection: Rc<RefCell<Option<String>>>,
}

impl SceneRunner {
    pub fn mount(rect: SurfaceRect, pixel_ratio: f32, config: EngineConfig, textures: SharedTextureCache) -> Self {
        let layout = ProtocolLayout::from_config(&config);
        let frame = layout.alloc();
        let mut engine = SceneEngine::mount(rect, pixel_ratio, config, textures);

        let selection: Rc<RefCell<Option<String>>> = Rc::default();
        let sink = selection.clone();
        engine.set_on_body_selected(move |record: &CelestialBodyRecord| {
            *sink.borrow_mut() = Some(record.to_json());
        });

        Self {
            engine,
            layout,
            frame,
            frame_counter: 0,
            events: Vec::new(),
            selection,
        }
    }

    pub fn engine(&self) -> &SceneEngine {
        &self.engine
    }

    pub fn unmount(&mut self) -> bool {
        self.frame.fill(0.0);
        self.events.clear();
        self.selection.borrow_mut().take();
        self.engine.teardown()
    }

    /// Replace the body list from a JSON array. Parse errors leave the scene untouched.
    pub fn set_bodies(&mut self, json: &str) -> bool {
        match self.engine.reconcile_json(json) {
            Ok(_) => {
                self.fit_layout();
                true
            }
            Err(e) => {
                log::warn!("bodies not applied: {e}");
                false
            }
        }
    }

    /// Reallocate the frame buffer if the engine grew its capacities.
    fn fit_layout(&mut self) {
        let layout = ProtocolLayout::from_config(self.engine.config());
        if layout != self.layout {
            log::info!("frame buffer resized: {} -> {} floats", self.layout.buffer_total_floats, layout.buffer_total_floats);
            self.frame = layout.alloc();
            self.layout = layout;
        }
    }

    pub fn set_playback(&mut self, speed: f64, paused: bool) {
        self.engine.set_playback(speed, paused);
    }

    pub fn resize(&mut self, rect: SurfaceRect) {
        self.engine.push_input(InputEvent::Resize {
            left: rect.left,
            top: rect.top,
            width: rect.width,
            height: rect.height,
        });
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.engine.push_input(event);
    }

    pub fn apply_settings(&mut self, json: &str) -> bool {
        match ControlSettings::from_json(json) {
            Ok(settings) => {
                self.engine.apply_settings(&settings);
                true
            }
            Err(e) => {
                log::warn!("settings not applied: {e}");
                false
            }
        }
    }

    pub fn reset_settings(&mut self) {
        self.engine.reset_to_defaults();
    }

    pub fn reset_camera(&mut self) {
        self.engine.reset_camera_target();
    }

    /// Run one frame and pack it into the host buffer. Returns false when no
    /// frame was pending (torn down).
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.engine.frame(dt) {
            return false;
        }
        self.frame_counter = self.frame_counter.wrapping_add(1);
        self.events = self.engine.drain_events();
        self.layout.pack(
            &mut self.frame,
            self.frame_counter,
            self.engine.render_buffer(),
            self.engine.lights(),
            &self.events,
        )
    }

    pub fn take_selection(&mut self) -> Option<String> {
        self.selection.borrow_mut().take()
    }

    // ---- Pointer accessors for host buffer reads ----

    pub fn frame(&self) -> &[f32] {
        &self.frame
    }

    pub fn frame_ptr(&self) -> *const f32 {
        self.frame.as_ptr()
    }

    pub fn spheres_ptr(&self) -> *const f32 {
        self.engine.render_buffer().spheres_ptr()
    }

    pub fn sphere_count(&self) -> u32 {
        self.engine.render_buffer().sphere_count()
    }

    pub fn additive_split(&self) -> u32 {
        self.engine.render_buffer().additive_split
    }

    pub fn line_vertices_ptr(&self) -> *const f32 {
        self.engine.render_buffer().line_vertices_ptr()
    }

    pub fn line_vertex_count(&self) -> u32 {
        self.engine.render_buffer().line_vertex_count()
    }

    pub fn line_ranges_ptr(&self) -> *const f32 {
        self.engine.render_buffer().line_ranges_ptr()
    }

    pub fn line_range_count(&self) -> u32 {
        self.engine.render_buffer().line_range_count()
    }

    pub fn camera_ptr(&self) -> *const f32 {
        self.engine.render_buffer().camera_ptr()
    }

    pub fn lights_ptr(&self) -> *const f32 {
        self.engine.lights().as_floats().as_ptr()
    }

    pub fn light_count(&self) -> u32 {
        self.engine.lights().count() as u32
    }

    pub fn events_ptr(&self) -> *const f32 {
        self.events.as_ptr() as *const f32
    }

    pub fn events_len(&self) -> u32 {
        self.events.len() as u32
    }

    // ---- Capacity accessors ----

    pub fn max_spheres(&self) -> u32 {
        self.layout.max_spheres as u32
    }

    pub fn max_line_vertices(&self) -> u32 {
        self.layout.max_line_vertices as u32
    }

    pub fn max_line_ranges(&self) -> u32 {
        self.layout.max_line_ranges as u32
    }

    pub fn max_lights(&self) -> u32 {
        self.layout.max_lights as u32
    }

    pub fn max_events(&self) -> u32 {
        self.layout.max_events as u32
    }

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }
}
