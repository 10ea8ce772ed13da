//! The per-question stopwatch.

use std::time::{Duration, Instant};

/// Tracks wall-clock time for the current question.
///
/// Callers reset the clock before presenting a question and read
/// [`elapsed_secs`](Self::elapsed_secs) when the answer comes in; the
/// reading feeds [`score_points`](crate::score_points). The clock can be
/// stopped (the reading freezes) and restarted without losing accumulated
/// time.
///
/// Built on `Instant`, so it is monotonic and immune to system clock
/// adjustments.
#[derive(Debug, Default)]
pub struct Clock {
    started_at: Option<Instant>,
    accumulated: Duration,
}

impl Clock {
    /// Creates a stopped clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts (or resumes) the clock. Starting a running clock is a no-op.
    pub fn start(&mut self) {
        if self.started_at.is_none() {
            self.started_at = Some(Instant::now());
        }
    }

    /// Stops the clock, freezing the elapsed reading. Idempotent.
    pub fn stop(&mut self) {
        if let Some(started) = self.started_at.take() {
            self.accumulated += started.elapsed();
        }
    }

    /// Resets the clock to zero and stops it.
    pub fn reset(&mut self) {
        self.started_at = None;
        self.accumulated = Duration::ZERO;
    }

    /// Whether the clock is currently running.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Total elapsed seconds, including the running stretch if any.
    pub fn elapsed_secs(&self) -> f32 {
        let running = self
            .started_at
            .map(|s| s.elapsed())
            .unwrap_or(Duration::ZERO);
        (self.accumulated + running).as_secs_f32()
    }
}
