//! Power management and time abstractions

/// System suspend blocker
///
/// Implementations keep the system awake for at least `hold_ms` after the
/// call. Calling again before expiry extends the deadline; there is no
/// explicit release. Must be callable from interrupt context.
pub trait WakeSource {
    /// Block suspend for `hold_ms` milliseconds from now
    fn stay_awake(&self, hold_ms: u32);
}

/// Monotonic millisecond clock
pub trait Monotonic {
    /// Milliseconds since an arbitrary fixed origin
    fn now_ms(&self) -> u64;
}
