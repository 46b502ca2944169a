/// Fixed timestep accumulator that also owns the simulated clock.
///
/// Physics advances in whole `dt` steps; phase timing reads `now_ms()` instead
/// of the wall clock, so a run is reproducible from its frame deltas alone.
pub struct FixedTimestep {
    /// The fixed delta time per step, in seconds.
    dt: f32,
    /// Frame time not yet consumed by a step.
    accumulator: f32,
    /// Steps taken since construction.
    steps: u64,
}

impl FixedTimestep {
    /// Most steps a single frame may run before the backlog is dropped.
    pub const MAX_STEPS_PER_FRAME: u32 = 10;

    pub fn new(dt: f32) -> Self {
        Self {
            dt,
            accumulator: 0.0,
            steps: 0,
        }
    }

    /// Add frame time to the accumulator. Returns the number of fixed steps to run.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if frame_dt.is_finite() && frame_dt > 0.0 {
            self.accumulator += frame_dt;
        }
        // A stalled tab must not replay seconds of physics in one frame
        let cap = self.dt * Self::MAX_STEPS_PER_FRAME as f32;
        self.accumulator = self.accumulator.min(cap);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Consume one step and return the clock after it, in milliseconds.
    pub fn advance(&mut self) -> f64 {
        self.steps += 1;
        self.now_ms()
    }

    /// Simulated time in milliseconds. Derived from the step count so it never drifts.
    pub fn now_ms(&self) -> f64 {
        self.steps as f64 * self.dt as f64 * 1000.0
    }

    /// Simulated time in seconds, for oscillators and flow fields. Stays f64 so
    /// consecutive steps remain distinct on long runs.
    pub fn seconds(&self) -> f64 {
        self.now_ms() * 0.001
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_step_per_display_frame() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
        assert_eq!(ts.accumulate(1.0 / 60.0), 1);
    }

    #[test]
    fn partial_frames_carry_over() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(0.008), 0);
        assert_eq!(ts.accumulate(0.010), 1);
        assert_eq!(ts.accumulate(0.010), 0);
    }

    #[test]
    fn backlog_is_capped() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(5.0), FixedTimestep::MAX_STEPS_PER_FRAME);
        assert_eq!(ts.accumulate(0.0), 0, "capped backlog must not leak into the next frame");
    }

    #[test]
    fn garbage_frame_time_is_ignored() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        assert_eq!(ts.accumulate(f32::NAN), 0);
        assert_eq!(ts.accumulate(-1.0), 0);
    }

    #[test]
    fn clock_tracks_steps() {
        let mut ts = FixedTimestep::new(1.0 / 60.0);
        for _ in 0..210 {
            ts.advance();
        }
        assert_eq!(ts.steps(), 210);
        assert!(ts.now_ms() >= 3500.0, "210 steps at 60 Hz reach 3.5 s, got {}", ts.now_ms());
        assert!((ts.seconds() - 3.5).abs() < 1e-3);
    }

    #[test]
    fn clock_keeps_step_resolution_after_a_day() {
        let dt = 1.0f32 / 60.0;
        let mut ts = FixedTimestep::new(dt);
        for _ in 0..60 * 86_400 {
            ts.advance();
        }
        let before = ts.seconds();
        ts.advance();
        let delta = ts.seconds() - before;
        assert!(before >= 86_400.0);
        assert!((delta - dt as f64).abs() < 1e-9, "step delta was {delta}");
    }
}
