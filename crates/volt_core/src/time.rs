use std::time::{Duration, Instant};

const FIXED_STEP: Duration = Duration::from_nanos(16_666_667);
const MAX_FRAME: Duration = Duration::from_millis(250);

/// Fixed-timestep clock. Wall-clock frame deltas feed an accumulator that is
/// drained in `FIXED_STEP` slices; the simulation only ever sees the
/// deterministic `sim_elapsed()`.
#[derive(Debug)]
pub struct TimeState {
    pub fixed_dt: Duration,
    pub max_frame: Duration,
    accumulator: Duration,
    sim_elapsed: Duration,
    pub fixed_step_count: u64,
    pub frame_count: u64,
    pub steps_this_frame: u32,
    last_instant: Instant,
}

impl TimeState {
    pub fn new() -> Self {
        Self {
            fixed_dt: FIXED_STEP,
            max_frame: MAX_FRAME,
            accumulator: Duration::ZERO,
            sim_elapsed: Duration::ZERO,
            fixed_step_count: 0,
            frame_count: 0,
            steps_this_frame: 0,
            last_instant: Instant::now(),
        }
    }

    pub fn begin_frame(&mut self) {
        let now = Instant::now();
        let real_dt = now.duration_since(self.last_instant);
        self.last_instant = now;
        self.advance(real_dt);
    }

    /// Feed `real_dt` of wall time into the accumulator.
    pub fn advance(&mut self, real_dt: Duration) {
        // Spiral-of-death cap
        let real_dt = if real_dt > self.max_frame {
            log::warn!(
                "Frame took {:.1}ms, capping to {}ms",
                real_dt.as_secs_f64() * 1000.0,
                self.max_frame.as_millis()
            );
            self.max_frame
        } else {
            real_dt
        };

        self.accumulator += real_dt;
        self.steps_this_frame = 0;
        self.frame_count += 1;
    }

    pub fn should_step(&mut self) -> bool {
        if self.accumulator >= self.fixed_dt {
            self.accumulator -= self.fixed_dt;
            self.sim_elapsed += self.fixed_dt;
            self.fixed_step_count += 1;
            self.steps_this_frame += 1;
            true
        } else {
            false
        }
    }

    /// Simulation time since start; advances exactly one `fixed_dt` per step.
    pub fn sim_elapsed(&self) -> Duration {
        self.sim_elapsed
    }
}

impl Default for TimeState {
    fn default() -> Self {
        Self::new()
    }
}
