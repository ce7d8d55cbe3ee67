use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Texture URLs for the built-in appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureSet {
    pub sun: String,
    pub starfield: String,
    /// Uniform fallback texture for bodies without a `texture` hint.
    pub body: String,
}

impl Default for TextureSet {
    fn default() -> Self {
        Self {
            sun: "assets/Sun.jpg".into(),
            starfield: "assets/Space.png".into(),
            body: "assets/ganymede.jpg".into(),
        }
    }
}

/// Configuration for a scene instance, supplied at mount.
///
/// Every tunable constant of the engine lives here. Partial JSON is accepted;
/// missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Fixed frame tick in seconds (default: 1/60).
    pub fixed_dt: f32,

    // ── Body derivation ──────────────────────────────────────────────
    /// Scene units per AU of semi-major axis.
    pub orbit_scale: f64,
    /// Smallest drawn semi-major axis, in scene units.
    pub min_orbit_radius: f64,
    /// Scene units per Earth radius.
    pub size_scale: f64,
    /// Smallest drawn sphere radius, in scene units.
    pub min_body_radius: f64,
    /// Radius used when a record has none.
    pub default_radius_earth: f64,
    /// Axis proxy step when a record has neither axis nor period: `(index + 1) × step` AU.
    pub index_axis_step_au: f64,
    /// Floor for the orbital period before inversion.
    pub min_period_days: f64,
    /// Eccentricity for records that do not supply one.
    pub default_eccentricity: f64,
    /// Upper clamp for eccentricity (must stay below 1).
    pub max_eccentricity: f64,
    /// Fixed Newton–Raphson iteration count for Kepler's equation.
    pub kepler_iterations: u32,
    /// Polyline resolution of each orbit outline.
    pub orbit_segments: usize,

    // ── Motion ───────────────────────────────────────────────────────
    /// Mean anomaly advance per tick = orbit_speed × orbit_rate × speed.
    pub orbit_rate: f64,
    /// Body self-rotation per tick at speed 1 (radians).
    pub spin_rate: f32,
    /// Sun self-rotation per tick at speed 1 (radians).
    pub sun_spin_rate: f32,
    pub min_speed: f64,
    pub max_speed: f64,

    // ── Selection feedback ───────────────────────────────────────────
    pub pulse_factor: f32,
    /// Seconds before a pulsed body reverts to its base scale.
    pub pulse_duration: f32,
    /// Pointer travel (pixels) after which a press becomes a drag.
    pub drag_threshold: f32,

    // ── Camera ───────────────────────────────────────────────────────
    pub camera_position: Vec3,
    pub near: f32,
    pub min_distance: f32,
    pub max_distance: f32,

    // ── Backdrop ─────────────────────────────────────────────────────
    pub sun_radius: f32,
    pub glow_scale: f32,
    pub starfield_radius: f32,
    pub textures: TextureSet,
    /// White ambient term.
    pub ambient_intensity: f32,
    /// Point light at the sun, `0xrrggbb`.
    pub sun_light_color: u32,
    pub sun_light_intensity: f32,
    pub sun_light_distance: f32,

    // ── Buffer capacities ────────────────────────────────────────────
    pub max_bodies: usize,
    pub max_events: usize,
    pub max_lights: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            orbit_scale: 12.0,
            min_orbit_radius: 6.0,
            size_scale: 6.0,
            min_body_radius: 0.3,
            default_radius_earth: 1.0,
            index_axis_step_au: 0.6,
            min_period_days: 0.01,
            default_eccentricity: 0.0,
            max_eccentricity: 0.95,
            kepler_iterations: 8,
            orbit_segments: 128,
            orbit_rate: 0.048,
            spin_rate: 0.012,
            sun_spin_rate: 0.002,
            min_speed: 0.1,
            max_speed: 4.0,
            pulse_factor: 1.18,
            pulse_duration: 0.3,
            drag_threshold: 5.0,
            camera_position: Vec3::new(0.0, 60.0, 140.0),
            near: 0.1,
            min_distance: 1.0,
            max_distance: 4000.0,
            sun_radius: 10.0,
            glow_scale: 80.0,
            starfield_radius: 2000.0,
            textures: TextureSet::default(),
            ambient_intensity: 0.25,
            sun_light_color: 0xfff0c0,
            sun_light_intensity: 2.2,
            sun_light_distance: 1000.0,
            max_bodies: 256,
            max_events: 32,
            max_lights: 4,
        }
    }
}

impl EngineConfig {
    /// Parse a config from JSON. An empty or blank string yields the defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(json)
    }

    /// Sphere slots: every body plus sun, glow and starfield.
    pub fn max_spheres(&self) -> usize {
        self.max_bodies + 3
    }

    /// Line vertices needed for `max_bodies` orbit outlines.
    pub fn max_line_vertices(&self) -> usize {
        self.max_bodies * self.orbit_segments
    }
}
