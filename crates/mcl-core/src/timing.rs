//! Wall-clock timing for run profiling.
//!
//! Elapsed time is reported next to simulation results but is never fed back
//! into simulation state.

use std::time::{Duration, Instant};

/// A stopwatch started at construction.
#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    label: &'static str,
    start: Instant,
}

impl Stopwatch {
    /// Create and start a new stopwatch with the given label.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
        }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Time elapsed since [`Stopwatch::start`].
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Stop the stopwatch and return elapsed time.
    pub fn stop(self) -> Duration {
        self.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stopwatch_is_monotonic() {
        let sw = Stopwatch::start("test");
        let a = sw.elapsed();
        let b = sw.elapsed();
        assert!(b >= a);
        assert_eq!(sw.label(), "test");
        assert!(sw.stop() >= b);
    }
}
