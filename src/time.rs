//! Frame timing.
//!
//! [`Clock`] is the widget's single monotonic time source. Each tick it
//! produces a per-frame delta clamped to `[0, 1]` seconds and accumulates the
//! total elapsed time. The clamp shields animation state from clock
//! anomalies: a tab that was suspended for a minute advances the animation by
//! at most one second instead of fast-forwarding through it.

use std::time::Instant;

/// Maximum per-frame delta in seconds. Raw deltas above this are clamped.
const MAX_DELTA: f32 = 1.0;

/// Monotonic frame clock with a clamped per-frame delta.
pub struct Clock {
    last_tick: Instant,
    delta: f32,
    elapsed: f32,
    frame_count: u64,
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock {
    /// Creates a new clock starting from now.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            delta: 0.0,
            elapsed: 0.0,
            frame_count: 0,
        }
    }

    /// Samples the wall clock and advances by the measured raw delta.
    ///
    /// Returns the clamped delta for this tick.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw = now.duration_since(self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.advance(raw)
    }

    /// Advances the clock by an externally supplied raw delta.
    ///
    /// The raw value is clamped to `[0, MAX_DELTA]` before being accumulated,
    /// so negative or runaway deltas cannot rewind or fast-forward the
    /// elapsed time. Exposed so tests and alternate frame drivers can inject
    /// deltas directly.
    pub fn advance(&mut self, raw_delta: f32) -> f32 {
        self.delta = raw_delta.clamp(0.0, MAX_DELTA);
        self.elapsed += self.delta;
        self.frame_count += 1;
        self.delta
    }

    /// The clamped delta of the most recent tick, in seconds.
    #[inline]
    #[must_use]
    pub fn delta(&self) -> f32 {
        self.delta
    }

    /// Total elapsed time in seconds. Monotonic, never reset.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Total number of ticks since creation.
    #[inline]
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delta_is_clamped_to_unit_interval() {
        let mut clock = Clock::new();
        assert_eq!(clock.advance(0.016), 0.016);
        assert_eq!(clock.advance(25.0), 1.0);
        assert_eq!(clock.advance(-3.0), 0.0);
    }

    #[test]
    fn elapsed_accumulates_monotonically() {
        let mut clock = Clock::new();
        clock.advance(0.5);
        clock.advance(-1.0); // anomaly: must not rewind
        clock.advance(2.0); // anomaly: clamps to 1.0
        assert!((clock.elapsed() - 1.5).abs() < 1e-6);
        assert_eq!(clock.frame_count(), 3);
    }
}
