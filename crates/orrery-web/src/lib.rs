//! wasm-bindgen exports for mounting orbital scenes in a host page.
//!
//! Every mounted scene is addressed by the `u32` handle returned from
//! [`scene_mount`]. Any number of scenes can be live at once; they share one
//! texture cache, so a texture used by two scenes is loaded once and released
//! when the last of them unmounts.

pub mod runner;

pub use runner::SceneRunner;

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use orrery_engine::{button, EngineConfig, InputEvent, SharedTextureCache, SurfaceRect, TextureCache};
use wasm_bindgen::prelude::*;

thread_local! {
    static RUNNERS: RefCell<HashMap<u32, SceneRunner>> = RefCell::new(HashMap::new());
    static TEXTURES: SharedTextureCache = TextureCache::shared();
    static NEXT_HANDLE: Cell<u32> = const { Cell::new(1) };
}

fn with_runner<R>(handle: u32, fallback: R, f: impl FnOnce(&mut SceneRunner) -> R) -> R {
    RUNNERS.with(|cell| match cell.borrow_mut().get_mut(&handle) {
        Some(runner) => f(runner),
        None => {
            log::warn!("no scene mounted with handle {handle}");
            fallback
        }
    })
}

#[cfg(target_arch = "wasm32")]
fn init_logging() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
}

// The console logger only works inside a browser.
#[cfg(not(target_arch = "wasm32"))]
fn init_logging() {}

// ---- Lifecycle ----

/// Mount a scene on a container rectangle. `config_json` may be empty for
/// the default configuration. Returns the scene handle, or 0 if the config
/// did not parse.
#[wasm_bindgen]
pub fn scene_mount(left: f32, top: f32, width: f32, height: f32, pixel_ratio: f32, config_json: &str) -> u32 {
    init_logging();
    let config = match EngineConfig::from_json(config_json) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("scene config rejected: {e}");
            return 0;
        }
    };
    let textures = TEXTURES.with(|t| t.clone());
    let runner = SceneRunner::mount(SurfaceRect::new(left, top, width, height), pixel_ratio, config, textures);

    let handle = NEXT_HANDLE.with(|next| {
        let handle = next.get();
        next.set(handle.wrapping_add(1).max(1));
        handle
    });
    RUNNERS.with(|cell| cell.borrow_mut().insert(handle, runner));
    log::info!("scene {handle}: mounted");
    handle
}

/// Tear a scene down and forget its handle.
#[wasm_bindgen]
pub fn scene_unmount(handle: u32) -> bool {
    let runner = RUNNERS.with(|cell| cell.borrow_mut().remove(&handle));
    match runner {
        Some(mut runner) => runner.unmount(),
        None => {
            log::warn!("unmount of unknown scene {handle}");
            false
        }
    }
}

#[wasm_bindgen]
pub fn scene_resize(handle: u32, left: f32, top: f32, width: f32, height: f32) {
    with_runner(handle, (), |r| r.resize(SurfaceRect::new(left, top, width, height)));
}

// ---- Data and playback ----

/// Replace the body list with a JSON array of records.
#[wasm_bindgen]
pub fn scene_set_bodies(handle: u32, json: &str) -> bool {
    with_runner(handle, false, |r| r.set_bodies(json))
}

#[wasm_bindgen]
pub fn scene_set_playback(handle: u32, speed: f64, paused: bool) {
    with_runner(handle, (), |r| r.set_playback(speed, paused));
}

/// Run one frame of `dt` seconds. Returns false if nothing ran.
#[wasm_bindgen]
pub fn scene_tick(handle: u32, dt: f32) -> bool {
    with_runner(handle, false, |r| r.tick(dt))
}

// ---- Input ----

#[wasm_bindgen]
pub fn scene_pointer_down(handle: u32, x: f32, y: f32, button_id: u32) {
    let button = if button_id > button::SECONDARY { button::PRIMARY } else { button_id };
    with_runner(handle, (), |r| r.push_input(InputEvent::PointerDown { x, y, button }));
}

#[wasm_bindgen]
pub fn scene_pointer_move(handle: u32, x: f32, y: f32) {
    with_runner(handle, (), |r| r.push_input(InputEvent::PointerMove { x, y }));
}

#[wasm_bindgen]
pub fn scene_pointer_up(handle: u32, x: f32, y: f32) {
    with_runner(handle, (), |r| r.push_input(InputEvent::PointerUp { x, y }));
}

#[wasm_bindgen]
pub fn scene_click(handle: u32, x: f32, y: f32) {
    with_runner(handle, (), |r| r.push_input(InputEvent::Click { x, y }));
}

#[wasm_bindgen]
pub fn scene_wheel(handle: u32, delta: f32) {
    with_runner(handle, (), |r| r.push_input(InputEvent::Wheel { delta }));
}

// ---- Control panel ----

#[wasm_bindgen]
pub fn scene_apply_settings(handle: u32, json: &str) -> bool {
    with_runner(handle, false, |r| r.apply_settings(json))
}

#[wasm_bindgen]
pub fn scene_reset_settings(handle: u32) {
    with_runner(handle, (), |r| r.reset_settings());
}

#[wasm_bindgen]
pub fn scene_reset_camera(handle: u32) {
    with_runner(handle, (), |r| r.reset_camera());
}

/// The full record of the most recently picked body, as JSON. Each
/// selection is returned once.
#[wasm_bindgen]
pub fn scene_take_selection(handle: u32) -> Option<String> {
    with_runner(handle, None, |r| r.take_selection())
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn get_frame_ptr(handle: u32) -> *const f32 {
    with_runner(handle, std::ptr::null(), |r| r.frame_ptr())
}

#[wasm_bindgen]
pub fn get_spheres_ptr(handle: u32) -> *const f32 {
    with_runner(handle, std::ptr::null(), |r| r.spheres_ptr())
}

#[wasm_bindgen]
pub fn get_sphere_count(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.sphere_count())
}

#[wasm_bindgen]
pub fn get_additive_split(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.additive_split())
}

#[wasm_bindgen]
pub fn get_line_vertices_ptr(handle: u32) -> *const f32 {
    with_runner(handle, std::ptr::null(), |r| r.line_vertices_ptr())
}

#[wasm_bindgen]
pub fn get_line_vertex_count(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.line_vertex_count())
}

#[wasm_bindgen]
pub fn get_line_ranges_ptr(handle: u32) -> *const f32 {
    with_runner(handle, std::ptr::null(), |r| r.line_ranges_ptr())
}

#[wasm_bindgen]
pub fn get_line_range_count(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.line_range_count())
}

#[wasm_bindgen]
pub fn get_camera_ptr(handle: u32) -> *const f32 {
    with_runner(handle, std::ptr::null(), |r| r.camera_ptr())
}

#[wasm_bindgen]
pub fn get_lights_ptr(handle: u32) -> *const f32 {
    with_runner(handle, std::ptr::null(), |r| r.lights_ptr())
}

#[wasm_bindgen]
pub fn get_light_count(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.light_count())
}

#[wasm_bindgen]
pub fn get_events_ptr(handle: u32) -> *const f32 {
    with_runner(handle, std::ptr::null(), |r| r.events_ptr())
}

#[wasm_bindgen]
pub fn get_events_len(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.events_len())
}

// ---- Capacity accessors ----

#[wasm_bindgen]
pub fn get_max_spheres(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.max_spheres())
}

#[wasm_bindgen]
pub fn get_max_line_vertices(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.max_line_vertices())
}

#[wasm_bindgen]
pub fn get_max_line_ranges(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.max_line_ranges())
}

#[wasm_bindgen]
pub fn get_max_lights(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.max_lights())
}

#[wasm_bindgen]
pub fn get_max_events(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.max_events())
}

#[wasm_bindgen]
pub fn get_buffer_total_floats(handle: u32) -> u32 {
    with_runner(handle, 0, |r| r.buffer_total_floats())
}

/// Textures currently referenced by any mounted scene.
#[wasm_bindgen]
pub fn texture_live_count() -> u32 {
    TEXTURES.with(|t| t.borrow().live_count() as u32)
}
