//! Timed wake-lock
//!
//! Blocks system suspend for a fixed hold time after each interrupt so the
//! user-space service can react before the system sleeps again. The lock
//! expires on its own; acquiring it while held pushes the deadline out.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use fpsense_hal::{Monotonic, WakeSource};

/// Timed wake-lock over a platform wake source
pub struct WakeLock<W, T> {
    source: W,
    timer: T,
    hold_ms: u32,
    /// Deadline in timer milliseconds, if ever acquired
    expires_at: Mutex<CriticalSectionRawMutex, Cell<Option<u64>>>,
}

impl<W: WakeSource, T: Monotonic> WakeLock<W, T> {
    /// Create a wake-lock holding for `hold_ms` per acquisition
    pub fn new(source: W, timer: T, hold_ms: u32) -> Self {
        Self {
            source,
            timer,
            hold_ms,
            expires_at: Mutex::new(Cell::new(None)),
        }
    }

    /// Acquire or refresh the lock
    ///
    /// Safe to call from interrupt context.
    pub fn acquire(&self) {
        let deadline = self.timer.now_ms() + u64::from(self.hold_ms);
        self.expires_at.lock(|cell| cell.set(Some(deadline)));
        self.source.stay_awake(self.hold_ms);
    }

    /// Check if the lock is currently held
    pub fn is_held(&self) -> bool {
        self.remaining_ms() > 0
    }

    /// Milliseconds until the lock expires (0 when released)
    pub fn remaining_ms(&self) -> u64 {
        let now = self.timer.now_ms();
        self.expires_at
            .lock(|cell| cell.get())
            .map_or(0, |deadline| deadline.saturating_sub(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{HwTrace, MockTimer, MockWake, Op};

    fn lock(trace: &HwTrace) -> WakeLock<MockWake, MockTimer> {
        WakeLock::new(MockWake::new(trace), MockTimer::new(trace), 2000)
    }

    #[test]
    fn test_not_held_before_first_acquire() {
        let trace = HwTrace::new();
        let wake = lock(&trace);
        assert!(!wake.is_held());
        assert_eq!(wake.remaining_ms(), 0);
    }

    #[test]
    fn test_expires_after_hold_time() {
        let trace = HwTrace::new();
        let wake = lock(&trace);

        wake.acquire();
        assert!(wake.is_held());

        trace.advance_ms(1999);
        assert!(wake.is_held());

        trace.advance_ms(1);
        assert!(!wake.is_held());
    }

    #[test]
    fn test_reacquire_refreshes_deadline() {
        let trace = HwTrace::new();
        let wake = lock(&trace);

        wake.acquire();
        trace.advance_ms(1500);
        wake.acquire();
        trace.advance_ms(1500);

        assert!(wake.is_held());
        assert_eq!(wake.remaining_ms(), 500);
        assert_eq!(trace.count(|op| *op == Op::StayAwake(2000)), 2);
    }
}
