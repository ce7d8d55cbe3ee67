/// Fixed timestep accumulator.
/// Converts wall-clock frame time into whole animation ticks, so orbital
/// motion advances at the same rate on a 60 Hz and a 144 Hz display.
pub struct FixedTimestep {
    /// The fixed delta time per tick.
    dt: f32,
    /// Accumulated time from variable frame deltas.
    accumulator: f32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        // Cap to prevent spiral of death (max 10 steps per frame)
        self.accumulator = self.accumulator.min(self.dt * 10.0);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Interpolation alpha for rendering between ticks (0.0 to 1.0).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    /// The fixed delta time.
    pub fn dt(&self) -> f32 {
        self.dt
    }
}

/// Caller-controlled playback state, read by every frame tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    speed: f64,
    paused: bool,
    min_speed: f64,
    max_speed: f64,
}

impl Playback {
    pub fn new(min_speed: f64, max_speed: f64) -> Self {
        Self {
            speed: 1.0,
            paused: false,
            min_speed,
            max_speed: max_speed.max(min_speed),
        }
    }

    /// Set the speed multiplier, clamped to the configured range.
    /// Non-finite input falls back to 1.0 (then clamped).
    pub fn set_speed(&mut self, speed: f64) {
        let speed = if speed.is_finite() {
            speed
        } else {
            log::warn!("non-finite playback speed {speed}, using 1.0");
            1.0
        };
        self.speed = speed.clamp(self.min_speed, self.max_speed);
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    pub fn paused(&self) -> bool {
        self.paused
    }
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(0.1, 4.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_exact() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0 / 60.0);
        assert_eq!(steps, 1);
    }

    #[test]
    fn accumulates_partial() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(0.008); // half a frame
        assert_eq!(steps, 0);
        let steps = ts.accumulate(0.010); // over one frame total
        assert_eq!(steps, 1);
    }

    #[test]
    fn caps_at_ten_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        let steps = ts.accumulate(1.0); // 60 frames worth, but capped at 10
        assert_eq!(steps, 10);
    }

    #[test]
    fn alpha_is_between_zero_and_one() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        ts.accumulate(0.008);
        let a = ts.alpha();
        assert!(a >= 0.0 && a <= 1.0, "alpha was {}", a);
    }

    #[test]
    fn playback_speed_is_clamped() {
        let mut pb = Playback::default();
        assert_eq!(pb.speed(), 1.0);
        pb.set_speed(10.0);
        assert_eq!(pb.speed(), 4.0);
        pb.set_speed(0.0);
        assert_eq!(pb.speed(), 0.1);
        pb.set_speed(-3.0);
        assert_eq!(pb.speed(), 0.1);
    }

    #[test]
    fn playback_rejects_non_finite_speed() {
        let mut pb = Playback::default();
        pb.set_speed(2.0);
        pb.set_speed(f64::NAN);
        assert_eq!(pb.speed(), 1.0);
        pb.set_speed(f64::INFINITY);
        assert_eq!(pb.speed(), 1.0);
    }

    #[test]
    fn playback_pause_flag() {
        let mut pb = Playback::default();
        assert!(!pb.paused());
        pb.set_paused(true);
        assert!(pb.paused());
    }
}
