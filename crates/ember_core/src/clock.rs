//! Time sources for spark flicker.
//!
//! The engine reads the clock once per tick. Hosts pass [`SystemClock`];
//! tests pass a [`ManualClock`] and step it by hand.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use web_time::{SystemTime, UNIX_EPOCH};

/// Millisecond time source.
pub trait Clock {
    /// Current time in milliseconds. Only differences and phase matter.
    fn now_millis(&self) -> f64;
}

/// Wall clock: milliseconds since the Unix epoch.
///
/// Backed by `web-time`, so the same code reads `Date.now()` on wasm32.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> f64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0.0, |elapsed| elapsed.as_secs_f64() * 1000.0)
    }
}

/// Hand-driven clock. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    bits: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at `millis`.
    #[must_use]
    pub fn new(millis: f64) -> Self {
        Self {
            bits: Arc::new(AtomicU64::new(millis.to_bits())),
        }
    }

    /// Jumps to `millis`.
    pub fn set(&self, millis: f64) {
        self.bits.store(millis.to_bits(), Ordering::Relaxed);
    }

    /// Moves forward by `millis`.
    pub fn advance(&self, millis: f64) {
        self.set(self.now_millis() + millis);
    }
}

impl Clock for ManualClock {
    fn now_millis(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_shared_between_clones() {
        let clock = ManualClock::new(100.0);
        let view = clock.clone();
        clock.advance(16.5);
        assert!((view.now_millis() - 116.5).abs() < f64::EPSILON);
        view.set(0.0);
        assert!(clock.now_millis().abs() < f64::EPSILON);
    }

    #[test]
    fn test_system_clock_moves_forward() {
        let clock = SystemClock;
        let first = clock.now_millis();
        let second = clock.now_millis();
        assert!(first > 0.0);
        assert!(second >= first);
    }
}
