//! Pacing for the "stat-number" counters that count up when scrolled into view.

use std::time::Duration;

/// Delay between two displayed values.
pub const COUNTER_TICK: Duration = Duration::from_millis(20);

const STEPS: f64 = 100.0;

/// Yields the successive values shown by an animated counter.
///
/// Each step adds `target / 100` and shows the ceiling, never overshooting;
/// the final value is always exactly `target`.
#[derive(Debug, Clone)]
pub struct CounterAnimation {
    target: u64,
    increment: f64,
    current: f64,
    finished: bool,
}

impl CounterAnimation {
    #[must_use]
    pub fn new(target: u64) -> Self {
        #[allow(clippy::cast_precision_loss)]
        let increment = target as f64 / STEPS;
        Self {
            target,
            increment,
            current: 0.0,
            finished: false,
        }
    }

    #[must_use]
    pub fn target(&self) -> u64 {
        self.target
    }
}

impl Iterator for CounterAnimation {
    type Item = u64;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    fn next(&mut self) -> Option<u64> {
        if self.finished {
            return None;
        }
        if self.current < self.target as f64 {
            self.current += self.increment;
            let shown = (self.current.ceil() as u64).min(self.target);
            if shown < self.target {
                return Some(shown);
            }
        }
        self.finished = true;
        Some(self.target)
    }
}
