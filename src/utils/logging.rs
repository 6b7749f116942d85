use log::{Level, log_enabled, warn};
use std::time::{Duration, Instant};

/// Simple scoped timer tracing the duration of a tick phase.
pub struct ScopedTimer<'a> {
    label: &'a str,
    start: Instant,
}

impl<'a> ScopedTimer<'a> {
    pub fn new(label: &'a str) -> Self {
        if log_enabled!(Level::Trace) {
            log::trace!("start {label}");
        }
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl<'a> Drop for ScopedTimer<'a> {
    fn drop(&mut self) {
        if log_enabled!(Level::Trace) {
            let elapsed = self.start.elapsed();
            log::trace!("end {} ({} µs)", self.label, elapsed.as_micros());
        }
    }
}

/// Registers a warning when a tick takes longer than its wall-clock budget.
pub fn warn_if_tick_budget_exceeded(tick: u64, duration: Duration, budget_ms: f32) {
    if duration.as_secs_f32() * 1000.0 > budget_ms {
        warn!(
            "Tick {} exceeded budget: {:.2} ms > {:.2} ms",
            tick,
            duration.as_secs_f32() * 1000.0,
            budget_ms
        );
    }
}
