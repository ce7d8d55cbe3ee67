//! The scene engine: one mounted orbital scene instance.
//!
//! Owns the scene graph, the live body map, camera and controls, lights,
//! the render surface and every renderer resource, and drives them from a
//! single self-rescheduling frame callback. All state is single-threaded;
//! host callbacks (input, reconcile, settings) mutate it between frames.

use std::collections::HashMap;

use glam::Vec2;
use crate::api::config::EngineConfig;
use crate::api::record::CelestialBodyRecord;
use crate::api::settings::ControlSettings;
use crate::api::types::{event_kind, BodyId, EntityId, SceneEvent};
use crate::assets::resources::{GpuResources, ResourceKind};
use crate::assets::textures::SharedTextureCache;
use crate::components::body::BodyState;
use crate::components::mesh::{mesh_flags, MeshComponent};
use crate::components::node::{Node, NodeKind};
use crate::core::scene::SceneGraph;
use crate::core::scheduler::{FrameHandle, FrameScheduler};
use crate::core::time::{FixedTimestep, Playback};
use crate::input::gesture::{DragTracker, Gesture};
use crate::input::listeners::{ListenerKind, ListenerSet};
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::PerspectiveCamera;
use crate::renderer::controls::OrbitControls;
use crate::renderer::instance::RenderBuffer;
use crate::renderer::surface::{RenderSurface, SurfaceRect};
use crate::systems::integrate::integrate;
use crate::systems::lighting::{rgb, LightState, PointLight};
use crate::systems::picking::{pick_nearest, Ray};
use crate::systems::pulse::PulseState;
use crate::systems::reconcile::{reconcile, release_node, ReconcileContext, ReconcileReport};
use crate::systems::render::build_render_buffer;

/// Called with the full record of a picked body.
pub type SelectionCallback = Box<dyn FnMut(&CelestialBodyRecord)>;

/// Static backdrop nodes, built once at mount.
#[derive(Debug, Clone, Copy)]
struct Backdrop {
    sun: EntityId,
    glow: EntityId,
    starfield: EntityId,
}

pub struct SceneEngine {
    config: EngineConfig,
    live: bool,
    scene: SceneGraph,
    bodies: HashMap<BodyId, BodyState>,
    resources: GpuResources,
    textures: SharedTextureCache,
    pulses: PulseState,
    lights: LightState,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    settings: ControlSettings,
    surface: RenderSurface,
    listeners: ListenerSet,
    scheduler: FrameScheduler,
    timestep: FixedTimestep,
    playback: Playback,
    input: InputQueue,
    drag: DragTracker,
    backdrop: Backdrop,
    buffer: RenderBuffer,
    events: Vec<SceneEvent>,
    selected: Option<BodyId>,
    on_body_selected: Option<SelectionCallback>,
}

impl SceneEngine {
    /// Build the scene on a host container of the given rectangle.
    ///
    /// A zero-sized container is accepted: the camera keeps a unit aspect and
    /// the framebuffer is deferred until the first non-degenerate resize.
    pub fn mount(rect: SurfaceRect, pixel_ratio: f32, config: EngineConfig, textures: SharedTextureCache) -> Self {
        let settings = ControlSettings::default();
        let mut camera = PerspectiveCamera::new(settings.fov, rect.width / rect.height, config.near, settings.far);
        camera.position = config.camera_position;
        let mut controls = OrbitControls::new(config.min_distance, config.max_distance);
        settings.apply(&mut camera, &mut controls);

        let mut resources = GpuResources::new();
        let mut surface = RenderSurface::new(rect, pixel_ratio);
        surface.attach(&mut resources);

        let mut lights = LightState::with_capacity(config.max_lights);
        lights.set_ambient([1.0, 1.0, 1.0], config.ambient_intensity);
        lights.add(PointLight::new(
            glam::Vec3::ZERO,
            rgb(config.sun_light_color),
            config.sun_light_intensity,
            config.sun_light_distance,
        ));

        let mut scene = SceneGraph::with_capacity(config.max_spheres() + config.max_bodies);
        let backdrop = build_backdrop(&mut scene, &mut resources, &textures, &config);

        let mut listeners = ListenerSet::new();
        listeners.bind_all();
        let mut scheduler = FrameScheduler::new();
        scheduler.request();

        log::info!(
            "scene mounted: {}x{} @{}x, {} listeners",
            rect.width,
            rect.height,
            surface.pixel_ratio(),
            listeners.count()
        );

        Self {
            live: true,
            scene,
            bodies: HashMap::new(),
            resources,
            textures,
            pulses: PulseState::new(),
            lights,
            camera,
            controls,
            settings,
            surface,
            listeners,
            scheduler,
            timestep: FixedTimestep::new(config.fixed_dt),
            playback: Playback::new(config.min_speed, config.max_speed),
            input: InputQueue::new(),
            drag: DragTracker::new(config.drag_threshold),
            backdrop,
            buffer: RenderBuffer::with_capacity(config.max_spheres(), config.max_line_vertices()),
            events: Vec::with_capacity(config.max_events),
            selected: None,
            on_body_selected: None,
            config,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────────

    /// Follow a container resize. A no-op after teardown.
    pub fn resize(&mut self, rect: SurfaceRect) -> bool {
        if !self.live {
            log::warn!("resize after teardown ignored");
            return false;
        }
        self.camera.set_viewport(rect.width, rect.height);
        let resized = self.surface.resize(rect, &mut self.resources);
        if resized {
            self.emit(SceneEvent {
                kind: event_kind::SURFACE_RESIZED,
                a: rect.width,
                b: rect.height,
                c: 0.0,
            });
        }
        resized
    }

    /// Tear the scene down in one pass: frame cancelled first, then
    /// listeners, bodies, backdrop, and finally the surface.
    /// Returns false (and does nothing) if already torn down.
    pub fn teardown(&mut self) -> bool {
        if !self.live {
            log::warn!("teardown called twice");
            return false;
        }
        self.live = false;
        self.scheduler.cancel();
        self.listeners.unbind_all();
        self.input.clear();
        self.on_body_selected = None;
        self.pulses.clear();

        let bodies = self.bodies.len();
        self.bodies.clear();
        {
            let mut textures = self.textures.borrow_mut();
            for node in self.scene.drain() {
                release_node(&node, &mut self.resources, &mut textures);
            }
        }
        self.lights.clear();
        self.surface.detach(&mut self.resources);
        self.buffer.clear();
        self.events.clear();
        self.selected = None;

        let leaked = self.resources.live_count();
        if leaked > 0 {
            log::warn!("{leaked} resources still live at teardown, releasing");
            self.resources.dispose_all();
        }
        log::info!("scene torn down: {bodies} bodies released");
        true
    }

    pub fn is_live(&self) -> bool {
        self.live
    }

    // ── Bodies and playback ──────────────────────────────────────────

    /// Bring the live bodies in line with `records`.
    pub fn reconcile(&mut self, records: &[CelestialBodyRecord]) -> ReconcileReport {
        if !self.live {
            log::warn!("reconcile after teardown ignored");
            return ReconcileReport::default();
        }
        let report = {
            let mut textures = self.textures.borrow_mut();
            let mut ctx = ReconcileContext {
                scene: &mut self.scene,
                resources: &mut self.resources,
                textures: &mut textures,
                pulses: &mut self.pulses,
                config: &self.config,
            };
            reconcile(records, &mut self.bodies, &mut ctx)
        };
        if self.bodies.len() > self.config.max_bodies {
            log::warn!(
                "{} bodies exceed max_bodies {}, growing render capacity",
                self.bodies.len(),
                self.config.max_bodies
            );
            self.config.max_bodies = self.bodies.len();
        }
        if let Some(selected) = &self.selected {
            if !self.bodies.contains_key(selected) {
                self.selected = None;
            }
        }
        if !report.is_noop() {
            self.emit(SceneEvent {
                kind: event_kind::BODIES_RECONCILED,
                a: report.added.len() as f32,
                b: report.removed.len() as f32,
                c: self.bodies.len() as f32,
            });
        }
        report
    }

    /// Parse a JSON array of records and reconcile against it.
    pub fn reconcile_json(&mut self, json: &str) -> Result<ReconcileReport, serde_json::Error> {
        let records = CelestialBodyRecord::list_from_json(json)?;
        Ok(self.reconcile(&records))
    }

    pub fn set_playback(&mut self, speed: f64, paused: bool) {
        self.playback.set_speed(speed);
        self.playback.set_paused(paused);
    }

    pub fn set_speed(&mut self, speed: f64) {
        self.playback.set_speed(speed);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.playback.set_paused(paused);
    }

    pub fn playback(&self) -> &Playback {
        &self.playback
    }

    // ── Frame loop ───────────────────────────────────────────────────

    /// Run one frame of `dt` seconds of wall time.
    ///
    /// Only runs if the engine is live and a frame is pending; the frame then
    /// schedules its successor. Returns true if the frame ran.
    pub fn frame(&mut self, dt: f32) -> bool {
        if !self.live || self.scheduler.take().is_none() {
            return false;
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };

        for event in self.input.drain() {
            self.dispatch(event);
        }

        self.pulses.tick(dt, &mut self.scene);

        let steps = self.timestep.accumulate(dt);
        for _ in 0..steps {
            self.tick();
        }

        self.controls.update(&mut self.camera);
        self.rebuild_buffer();
        self.scheduler.request();
        true
    }

    /// One fixed animation tick: bodies and sun advance unless paused.
    pub fn tick(&mut self) {
        if !self.live {
            return;
        }
        integrate(
            &mut self.bodies,
            Some(self.backdrop.sun),
            &mut self.scene,
            &self.playback,
            &self.config,
        );
    }

    fn rebuild_buffer(&mut self) {
        build_render_buffer(self.scene.iter(), &mut self.buffer, self.config.max_spheres());
        self.buffer.camera = self.camera.uniform(self.lights.ambient(), self.lights.count(), self.surface.rect().size());
    }

    /// The pending frame, if any.
    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.scheduler.pending()
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Queue a host event for the next frame. Dropped if its listener is
    /// not bound (always the case after teardown).
    pub fn push_input(&mut self, event: InputEvent) -> bool {
        if !self.listeners.is_bound(event.listener()) {
            log::debug!("dropping {:?}: no {:?} listener", event, event.listener());
            return false;
        }
        self.input.push(event);
        true
    }

    fn dispatch(&mut self, event: InputEvent) {
        let height = self.surface.rect().height;
        match event {
            InputEvent::PointerDown { x, y, button } => self.drag.pointer_down(Vec2::new(x, y), button),
            InputEvent::PointerMove { x, y } => match self.drag.pointer_move(Vec2::new(x, y)) {
                Gesture::Rotate(d) => self.controls.rotate(d.x, d.y, height),
                Gesture::Pan(d) => self.controls.pan(d.x, d.y, height, &self.camera),
                Gesture::None => {}
            },
            InputEvent::PointerUp { .. } => self.drag.pointer_up(),
            InputEvent::Click { x, y } => {
                if self.drag.accept_click() {
                    self.handle_click(Vec2::new(x, y));
                }
            }
            InputEvent::Wheel { delta } => self.controls.zoom(delta),
            InputEvent::Resize { left, top, width, height } => {
                self.resize(SurfaceRect::new(left, top, width, height));
            }
        }
    }

    /// Pick the body under a client-space point.
    ///
    /// On a hit the body pulses, the selection callback receives its full
    /// record, and its id is returned. A miss changes nothing.
    pub fn handle_click(&mut self, client: Vec2) -> Option<BodyId> {
        if !self.live {
            return None;
        }
        let ray = Ray::from_screen(&self.camera, &self.surface.rect(), client)?;
        let (node, _) = pick_nearest(&self.scene, &ray)?;
        let body = self.bodies.values().find(|b| b.sphere == node)?;

        self.pulses.trigger(node, &mut self.scene, self.config.pulse_factor, self.config.pulse_duration);
        log::debug!("picked {}", body.id);
        if let Some(callback) = self.on_body_selected.as_mut() {
            callback(&body.record);
        }
        let id = body.id.clone();
        self.selected = Some(id.clone());
        self.emit(SceneEvent {
            kind: event_kind::BODY_SELECTED,
            a: node.0 as f32,
            b: 0.0,
            c: 0.0,
        });
        Some(id)
    }

    pub fn set_on_body_selected(&mut self, callback: impl FnMut(&CelestialBodyRecord) + 'static) {
        self.on_body_selected = Some(Box::new(callback));
    }

    /// Most recently picked body still live.
    pub fn selected(&self) -> Option<&BodyState> {
        self.selected.as_ref().and_then(|id| self.bodies.get(id))
    }

    // ── Control panel ────────────────────────────────────────────────

    /// Push new camera/control parameters, effective next frame. The camera
    /// stays where it is and no geometry is rebuilt.
    pub fn apply_settings(&mut self, settings: &ControlSettings) {
        if !self.live {
            return;
        }
        self.settings = settings.sanitized(self.camera.near);
        self.settings.apply(&mut self.camera, &mut self.controls);
    }

    pub fn reset_to_defaults(&mut self) {
        self.apply_settings(&ControlSettings::default());
    }

    /// Recenter the controls on the origin and return the camera to its
    /// default position. Other settings are untouched.
    pub fn reset_camera_target(&mut self) {
        if !self.live {
            return;
        }
        self.controls.reset_target(&mut self.camera, self.config.camera_position);
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }

    // ── Events ───────────────────────────────────────────────────────

    fn emit(&mut self, event: SceneEvent) {
        if self.events.len() < self.config.max_events {
            self.events.push(event);
        }
    }

    /// Take the events raised since the last drain.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Introspection ────────────────────────────────────────────────

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn body(&self, id: &BodyId) -> Option<&BodyState> {
        self.bodies.get(id)
    }

    pub fn bodies(&self) -> impl Iterator<Item = &BodyState> {
        self.bodies.values()
    }

    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn scene(&self) -> &SceneGraph {
        &self.scene
    }

    pub fn resources(&self) -> &GpuResources {
        &self.resources
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn surface(&self) -> &RenderSurface {
        &self.surface
    }

    pub fn lights(&self) -> &LightState {
        &self.lights
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.count()
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.is_bound(kind)
    }

    pub fn render_buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    pub fn textures(&self) -> &SharedTextureCache {
        &self.textures
    }

    /// Starfield, sun and glow node ids.
    pub fn backdrop_nodes(&self) -> [EntityId; 3] {
        [self.backdrop.starfield, self.backdrop.sun, self.backdrop.glow]
    }
}

impl Drop for SceneEngine {
    fn drop(&mut self) {
        // Shared textures must be released even if the host never unmounted.
        if self.live {
            self.teardown();
        }
    }
}

/// Starfield, sun and sun glow. None of them is pickable.
fn build_backdrop(
    scene: &mut SceneGraph,
    resources: &mut GpuResources,
    textures: &SharedTextureCache,
    config: &EngineConfig,
) -> Backdrop {
    let mut textures = textures.borrow_mut();
    let mut sphere = |radius: f32| {
        MeshComponent::sphere(
            radius,
            resources.allocate(ResourceKind::Geometry),
            resources.allocate(ResourceKind::Material),
        )
    };

    let starfield = scene.next_id();
    let mesh = sphere(config.starfield_radius)
        .with_texture(textures.acquire(&config.textures.starfield))
        .with_flags(mesh_flags::UNLIT | mesh_flags::BACK_SIDE);
    scene.spawn(Node::new(starfield, NodeKind::Starfield).with_tag("starfield").with_mesh(mesh));

    let sun = scene.next_id();
    let mesh = sphere(config.sun_radius)
        .with_texture(textures.acquire(&config.textures.sun))
        .with_emissive(1.0)
        .with_flags(mesh_flags::UNLIT);
    scene.spawn(Node::new(sun, NodeKind::Sun).with_tag("sun").with_mesh(mesh));

    let glow = scene.next_id();
    let mesh = sphere(config.glow_scale / 2.0)
        .with_color(rgb(config.sun_light_color))
        .with_emissive(1.0)
        .with_flags(mesh_flags::UNLIT | mesh_flags::ADDITIVE | mesh_flags::BILLBOARD);
    scene.spawn(Node::new(glow, NodeKind::SunGlow).with_tag("sun-glow").with_mesh(mesh));

    Backdrop { sun, glow, starfield }
}
