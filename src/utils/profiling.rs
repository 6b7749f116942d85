use std::time::{Duration, Instant};

use log::{debug, log_enabled, Level};

/// Per-tick counters and phase timings collected by the world.
#[derive(Debug, Default, Clone, Copy)]
pub struct TickProfile {
    pub tree_build_time: Duration,
    pub resolve_time: Duration,
    pub total_tick_time: Duration,

    pub object_count: usize,
    pub mover_count: usize,
    pub candidate_count: usize,
    pub collision_count: usize,
    pub rolling_count: usize,
    pub back_out_failures: usize,
}

impl TickProfile {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn report(&self, tick: u64) {
        if !log_enabled!(Level::Debug) {
            return;
        }

        debug!(
            "tick {}: objects {}, movers {}, candidates {}, collisions {}, rolling {}, back-out failures {}",
            tick,
            self.object_count,
            self.mover_count,
            self.candidate_count,
            self.collision_count,
            self.rolling_count,
            self.back_out_failures
        );

        let total_us = self.total_tick_time.as_micros() as f32;
        if total_us < 1.0 {
            return;
        }
        debug!(
            "tick {}: total {:.3} ms (tree {:.1}%, resolve {:.1}%)",
            tick,
            self.total_tick_time.as_secs_f32() * 1000.0,
            (self.tree_build_time.as_micros() as f32 / total_us) * 100.0,
            (self.resolve_time.as_micros() as f32 / total_us) * 100.0
        );
    }
}

/// Adds the lifetime of the guard to a duration slot.
pub struct PhaseTimer<'a> {
    start: Instant,
    output: &'a mut Duration,
}

impl<'a> PhaseTimer<'a> {
    pub fn new(output: &'a mut Duration) -> Self {
        Self {
            start: Instant::now(),
            output,
        }
    }
}

impl<'a> Drop for PhaseTimer<'a> {
    fn drop(&mut self) {
        *self.output += self.start.elapsed();
    }
}
