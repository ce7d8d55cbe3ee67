use std::f64::consts::TAU;

use glam::Vec3;
use crate::api::config::EngineConfig;
use crate::api::record::CelestialBodyRecord;
use crate::api::types::{BodyId, EntityId};
use crate::core::orbit;

/// Orbital and size parameters derived once from a record.
///
/// Every field is finite. `semi_major_axis`, `radius`, `period_days` and
/// `orbit_speed` are strictly positive. `eccentricity` is in `[0, max_eccentricity]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitParams {
    /// Semi-major axis in AU, before scene scaling.
    pub axis_au: f64,
    pub period_days: f64,
    /// Scene units.
    pub semi_major_axis: f64,
    /// Scene units, `a·sqrt(1 - e²)`.
    pub semi_minor_axis: f64,
    pub eccentricity: f64,
    /// `1 / max(min_period, period)`.
    pub orbit_speed: f64,
    /// Rendered sphere radius, scene units.
    pub radius: f64,
}

/// Positive, finite, or nothing.
fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

impl OrbitParams {
    /// Derive parameters from a record at `index` in the input list.
    ///
    /// Never fails: missing or malformed fields fall back to defaults.
    /// The axis comes from the record, else from the period by Kepler's third
    /// law, else from the list index. The period likewise falls back to the axis.
    pub fn derive(record: &CelestialBodyRecord, index: usize, config: &EngineConfig) -> Self {
        let raw_period = record.orbital_period_days();
        let raw_axis = record.semi_major_axis_au();
        let raw_radius = record.radius_earth_units();
        let period = positive(raw_period);
        let axis = positive(raw_axis);
        if raw_period.is_some() && period.is_none() {
            log::warn!("{}: unusable orbital period {:?}, deriving", record.display_name(), raw_period);
        }
        if raw_radius.is_some() && positive(raw_radius).is_none() {
            log::warn!("{}: unusable radius {:?}, using default", record.display_name(), raw_radius);
        }

        let axis_au = axis
            .or_else(|| period.map(orbit::axis_from_period_days))
            .and_then(|a| positive(Some(a)))
            .unwrap_or((index as f64 + 1.0) * config.index_axis_step_au);
        let period_days = period
            .or_else(|| positive(Some(orbit::period_days_from_axis(axis_au))))
            .unwrap_or(config.min_period_days);

        let semi_major_axis = positive(Some(axis_au * config.orbit_scale))
            .unwrap_or(config.min_orbit_radius)
            .max(config.min_orbit_radius);

        let radius_earth = positive(raw_radius).unwrap_or(config.default_radius_earth);
        let radius = positive(Some(radius_earth * config.size_scale))
            .unwrap_or(config.min_body_radius)
            .max(config.min_body_radius);

        let eccentricity = record
            .eccentricity()
            .filter(|e| e.is_finite())
            .unwrap_or(config.default_eccentricity)
            .clamp(0.0, config.max_eccentricity);

        Self {
            axis_au,
            period_days,
            semi_major_axis,
            semi_minor_axis: orbit::semi_minor_axis(semi_major_axis, eccentricity),
            eccentricity,
            orbit_speed: 1.0 / period_days.max(config.min_period_days),
            radius,
        }
    }

    /// Closest and farthest distance from the focus.
    pub fn radial_bounds(&self) -> (f64, f64) {
        (
            self.semi_major_axis * (1.0 - self.eccentricity),
            self.semi_major_axis * (1.0 + self.eccentricity),
        )
    }

    /// Scene position for a mean anomaly.
    pub fn position(&self, mean_anomaly: f64, iterations: u32) -> Vec3 {
        let (x, z) = orbit::position_at(mean_anomaly, self.semi_major_axis, self.eccentricity, iterations);
        Vec3::new(x as f32, 0.0, z as f32)
    }

    /// Orbit outline vertices in scene space.
    pub fn outline(&self, segments: usize) -> Vec<Vec3> {
        orbit::sample_ellipse(self.semi_major_axis, self.eccentricity, segments)
            .into_iter()
            .map(|(x, z)| Vec3::new(x as f32, 0.0, z as f32))
            .collect()
    }
}

/// Engine-owned state of one live body.
#[derive(Debug)]
pub struct BodyState {
    pub id: BodyId,
    /// The latest full record supplied for this id, returned on selection.
    pub record: CelestialBodyRecord,
    pub params: OrbitParams,
    /// Mean anomaly, radians, kept in `[0, 2π)`.
    pub anomaly: f64,
    pub position: Vec3,
    /// Self-rotation about Y, radians.
    pub spin: f32,
    /// Sphere node.
    pub sphere: EntityId,
    /// Orbit outline node.
    pub orbit_line: EntityId,
}

impl BodyState {
    pub fn new(
        id: BodyId,
        record: CelestialBodyRecord,
        params: OrbitParams,
        sphere: EntityId,
        orbit_line: EntityId,
        config: &EngineConfig,
    ) -> Self {
        Self {
            id,
            record,
            params,
            anomaly: 0.0,
            position: params.position(0.0, config.kepler_iterations),
            spin: 0.0,
            sphere,
            orbit_line,
        }
    }

    /// Mean anomaly change for one tick at `speed`.
    pub fn anomaly_step(&self, speed: f64, config: &EngineConfig) -> f64 {
        self.params.orbit_speed * config.orbit_rate * speed
    }

    /// Advance one tick: anomaly, position, spin.
    ///
    /// A non-finite result resets this body to periapsis; other bodies are
    /// unaffected.
    pub fn advance(&mut self, speed: f64, config: &EngineConfig) {
        self.anomaly = (self.anomaly + self.anomaly_step(speed, config)).rem_euclid(TAU);
        self.spin = (self.spin + config.spin_rate * speed as f32).rem_euclid(std::f32::consts::TAU);
        let position = self.params.position(self.anomaly, config.kepler_iterations);
        if position.is_finite() && self.anomaly.is_finite() {
            self.position = position;
        } else {
            log::warn!("body {} produced a non-finite position, resetting", self.id);
            self.anomaly = 0.0;
            self.position = self.params.position(0.0, config.kepler_iterations);
        }
    }
}
