/// Keplerian orbital mechanics. Pure math, no scene dependencies.
///
/// f64 throughout; callers convert to f32 when writing scene nodes.
/// Orbits are flat: the orbital plane is the scene's XZ plane with the
/// focus (the star) at the origin and periapsis on +X.

use std::f64::consts::TAU;

/// Days in a Julian year, used by the third-law proxies.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Solve Kepler's equation `M = E - e·sin(E)` for the eccentric anomaly.
///
/// Fixed-iteration Newton–Raphson: eccentricity is clamped well below 1, so
/// a handful of steps converges without a residual check. The initial guess
/// switches to π for very eccentric orbits, where starting at `M` can
/// overshoot.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64, iterations: u32) -> f64 {
    let mut ea = if eccentricity > 0.8 { std::f64::consts::PI } else { mean_anomaly };
    for _ in 0..iterations {
        let f = ea - eccentricity * ea.sin() - mean_anomaly;
        let derivative = 1.0 - eccentricity * ea.cos();
        ea -= f / derivative;
    }
    ea
}

/// True anomaly ν from eccentric anomaly.
pub fn true_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    let half = eccentric_anomaly / 2.0;
    2.0 * ((1.0 + eccentricity).sqrt() * half.sin()).atan2((1.0 - eccentricity).sqrt() * half.cos())
}

/// Distance from the focus, `r = a(1 - e·cos E)`.
pub fn orbital_radius(semi_major_axis: f64, eccentricity: f64, eccentric_anomaly: f64) -> f64 {
    semi_major_axis * (1.0 - eccentricity * eccentric_anomaly.cos())
}

/// `b = a·sqrt(1 - e²)`.
pub fn semi_minor_axis(semi_major_axis: f64, eccentricity: f64) -> f64 {
    semi_major_axis * (1.0 - eccentricity * eccentricity).sqrt()
}

/// Position in the orbital plane for a given mean anomaly.
/// Returns `(x, z)`; y is always zero.
pub fn position_at(mean_anomaly: f64, semi_major_axis: f64, eccentricity: f64, iterations: u32) -> (f64, f64) {
    let ea = solve_kepler(mean_anomaly, eccentricity, iterations);
    let nu = true_anomaly(ea, eccentricity);
    let r = orbital_radius(semi_major_axis, eccentricity, ea);
    (r * nu.cos(), r * nu.sin())
}

/// Sample the orbit ellipse as a closed polyline of `segments` points,
/// focus at the origin. The loop is implicit: the last point is not repeated.
pub fn sample_ellipse(semi_major_axis: f64, eccentricity: f64, segments: usize) -> Vec<(f64, f64)> {
    let b = semi_minor_axis(semi_major_axis, eccentricity);
    let mut points = Vec::with_capacity(segments);
    for i in 0..segments {
        let ea = (i as f64 / segments as f64) * TAU;
        points.push((semi_major_axis * (ea.cos() - eccentricity), b * ea.sin()));
    }
    points
}

/// Kepler's third law for a solar-mass host: `a = P^(2/3)` with P in years, a in AU.
pub fn axis_from_period_days(period_days: f64) -> f64 {
    (period_days / DAYS_PER_YEAR).powf(2.0 / 3.0)
}

/// Inverse of [`axis_from_period_days`].
pub fn period_days_from_axis(axis_au: f64) -> f64 {
    axis_au.powf(1.5) * DAYS_PER_YEAR
}
