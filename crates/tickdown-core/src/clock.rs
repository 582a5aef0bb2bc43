//! Time sources for the countdown engine.
//!
//! The engine never reads the time itself. It asks a [`Clock`] for epoch
//! milliseconds, which keeps it deterministic under test.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::error::ClockError;

/// Supplies the current time in milliseconds.
pub trait Clock {
    fn now_ms(&self) -> Result<u64, ClockError>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Result<u64, ClockError> {
        (**self).now_ms()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now_ms(&self) -> Result<u64, ClockError> {
        (**self).now_ms()
    }
}

/// Wall clock. Follows system time, including jumps across suspend.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> Result<u64, ClockError> {
        let ms = Utc::now().timestamp_millis();
        u64::try_from(ms).map_err(|_| ClockError::BeforeEpoch(ms))
    }
}

/// Monotonic clock on top of `tokio::time::Instant`.
///
/// Honors tokio's paused test time, so the poll driver can be exercised
/// without sleeping.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: tokio::time::Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: tokio::time::Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ms(&self) -> Result<u64, ClockError> {
        Ok(self.origin.elapsed().as_millis() as u64)
    }
}

/// Hand-driven clock for tests and simulations.
///
/// Clones share the same time, so a test can keep one handle while the
/// engine owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
    failing: Arc<AtomicBool>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
            failing: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn advance_ms(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, secs: u64) {
        self.advance_ms(secs.saturating_mul(1000));
    }

    pub fn set_ms(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    /// Make every read fail until [`ManualClock::recover`] is called.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn recover(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> Result<u64, ClockError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(ClockError::BeforeEpoch(-1));
        }
        Ok(self.now.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new(1_000);
        let handle = clock.clone();
        handle.advance_secs(3);
        assert_eq!(clock.now_ms(), Ok(4_000));
        clock.set_ms(10);
        assert_eq!(handle.now_ms(), Ok(10));
    }

    #[test]
    fn manual_clock_can_fail_and_recover() {
        let clock = ManualClock::new(0);
        clock.fail();
        assert!(clock.now_ms().is_err());
        clock.recover();
        assert_eq!(clock.now_ms(), Ok(0));
    }

    #[test]
    fn system_clock_is_after_epoch() {
        assert!(SystemClock.now_ms().unwrap() > 0);
    }
}
