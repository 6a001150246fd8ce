//! Diagnostic counters
//!
//! Lock-free counters bumped from every execution context, including the
//! interrupt path.

use portable_atomic::{AtomicU32, Ordering};

/// Point-in-time copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DiagnosticsSnapshot {
    /// Serviced hardware interrupts
    pub interrupts: u32,
    /// Finger-down keys synthesized after a blank
    pub synthetic_keys: u32,
    /// IRQ enable/disable requests that matched the current state
    pub redundant_irq_toggles: u32,
    /// Display notifications dropped while unpowered
    pub dropped_display_events: u32,
    /// Teardown steps that failed on last close
    pub teardown_failures: u32,
    /// Correctly tagged commands with no handler
    pub unsupported_commands: u32,
}

#[derive(Default)]
pub struct Diagnostics {
    interrupts: AtomicU32,
    synthetic_keys: AtomicU32,
    redundant_irq_toggles: AtomicU32,
    dropped_display_events: AtomicU32,
    teardown_failures: AtomicU32,
    unsupported_commands: AtomicU32,
}

macro_rules! counter {
    ($($name:ident),* $(,)?) => {
        $(
            pub(crate) fn $name(&self) {
                self.$name.fetch_add(1, Ordering::Relaxed);
            }
        )*
    };
}

impl Diagnostics {
    pub const fn new() -> Self {
        Self {
            interrupts: AtomicU32::new(0),
            synthetic_keys: AtomicU32::new(0),
            redundant_irq_toggles: AtomicU32::new(0),
            dropped_display_events: AtomicU32::new(0),
            teardown_failures: AtomicU32::new(0),
            unsupported_commands: AtomicU32::new(0),
        }
    }

    counter!(
        interrupts,
        synthetic_keys,
        redundant_irq_toggles,
        dropped_display_events,
        teardown_failures,
        unsupported_commands,
    );

    /// Read every counter
    pub fn snapshot(&self) -> DiagnosticsSnapshot {
        DiagnosticsSnapshot {
            interrupts: self.interrupts.load(Ordering::Relaxed),
            synthetic_keys: self.synthetic_keys.load(Ordering::Relaxed),
            redundant_irq_toggles: self.redundant_irq_toggles.load(Ordering::Relaxed),
            dropped_display_events: self.dropped_display_events.load(Ordering::Relaxed),
            teardown_failures: self.teardown_failures.load(Ordering::Relaxed),
            unsupported_commands: self.unsupported_commands.load(Ordering::Relaxed),
        }
    }
}
