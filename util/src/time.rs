//! General time utility functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use std::time::Instant;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A stopwatch used to time command execution.
///
/// The watch is created stopped with zero elapsed time. `restart` zeroes the
/// elapsed time and sets the watch running, `stop` freezes the elapsed time
/// at its current value.
#[derive(Default)]
pub struct Stopwatch {
    /// Instant of the last restart, or `None` if never started
    start: Option<Instant>,

    /// Elapsed time frozen by a `stop`
    frozen_s: Option<f64>,

    /// Offset applied on top of the wall clock elapsed time
    offset_s: f64
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Stopwatch {
    /// Create a new stopped watch with zero elapsed time.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the elapsed time and set the watch running.
    pub fn restart(&mut self) {
        self.start = Some(Instant::now());
        self.frozen_s = None;
        self.offset_s = 0.0;
    }

    /// Freeze the elapsed time at its current value.
    pub fn stop(&mut self) {
        self.frozen_s = Some(self.elapsed_s());
    }

    /// Get the elapsed time in seconds.
    ///
    /// Zero if the watch has never been started, frozen at the stop time if
    /// the watch has been stopped.
    pub fn elapsed_s(&self) -> f64 {
        if let Some(s) = self.frozen_s {
            return s;
        }

        match self.start {
            Some(t) => t.elapsed().as_secs_f64() + self.offset_s,
            None => 0.0
        }
    }

    /// Advance the elapsed time by the given number of seconds.
    ///
    /// This allows time-dependent behaviour to be exercised without waiting
    /// on the wall clock.
    pub fn advance(&mut self, seconds: f64) {
        self.offset_s += seconds;
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_stopwatch() {
        let mut sw = Stopwatch::new();

        // Never started - no elapsed time
        assert_eq!(sw.elapsed_s(), 0.0);

        // Advancing a running watch shifts the elapsed time
        sw.restart();
        sw.advance(2.0);
        assert!(sw.elapsed_s() >= 2.0);

        // Stop freezes the elapsed time
        sw.stop();
        let frozen = sw.elapsed_s();
        sw.advance(10.0);
        assert_eq!(sw.elapsed_s(), frozen);

        // Restart clears both the freeze and the offset
        sw.restart();
        assert!(sw.elapsed_s() < 1.0);
    }
}
