/*!
 * Timing Utilities
 * Millisecond clock and slice sleeping used by the dispatcher
 */

use super::types::Millis;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Source of time for the scheduler
///
/// The dispatcher only ever reads the current time and sleeps for one
/// quantum, so both go through this trait.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds
    fn now_ms(&self) -> Millis;

    /// Block the caller for `duration`
    fn sleep(&self, duration: Duration);
}

/// Monotonic wall clock, milliseconds since the clock was created
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now_ms(&self) -> Millis {
        duration_to_millis(self.origin.elapsed())
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Manually driven clock
///
/// Time only moves when `sleep` or `advance` is called, which makes every
/// accounting delta exact. Clones share the same time source.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without a sleeper
    pub fn advance(&self, duration: Duration) {
        self.now
            .fetch_add(duration_to_millis(duration), Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_ms(&self) -> Millis {
        self.now.load(Ordering::SeqCst)
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

/// Whole milliseconds in a duration, saturating at `u64::MAX`
#[inline]
pub fn duration_to_millis(duration: Duration) -> Millis {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
