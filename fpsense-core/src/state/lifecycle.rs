//! Opener state machine
//!
//! Hardware resources exist only while at least one session holds the
//! device open. The machine reports the edge each transition crosses so the
//! caller knows when to acquire or release them.

use core::num::NonZeroU32;

/// Opener states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// No session holds the device; no hardware acquired
    #[default]
    Closed,
    /// At least one session holds the device
    Open(NonZeroU32),
}

/// Resource edge crossed by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    /// 0 → 1 openers: acquire hardware
    Acquire,
    /// 1 → 0 openers: release hardware
    Release,
    /// Opener count changed without crossing zero
    Unchanged,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Lifecycle {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "Lifecycle({=u32})", self.openers())
    }
}

impl Lifecycle {
    /// Current number of sessions
    pub fn openers(&self) -> u32 {
        match self {
            Lifecycle::Closed => 0,
            Lifecycle::Open(n) => n.get(),
        }
    }

    /// Check if hardware resources should be held
    pub fn is_open(&self) -> bool {
        matches!(self, Lifecycle::Open(_))
    }

    /// State after one more session opens
    ///
    /// The caller commits the returned state only once any acquisition the
    /// edge demands has succeeded.
    pub fn on_open(self) -> (Self, Edge) {
        match self {
            Lifecycle::Closed => (Lifecycle::Open(NonZeroU32::MIN), Edge::Acquire),
            Lifecycle::Open(n) => (
                Lifecycle::Open(n.saturating_add(1)),
                Edge::Unchanged,
            ),
        }
    }

    /// State after one session closes
    ///
    /// Closing an already closed device is a no-op.
    pub fn on_close(self) -> (Self, Edge) {
        match self {
            Lifecycle::Closed => (Lifecycle::Closed, Edge::Unchanged),
            Lifecycle::Open(n) => match NonZeroU32::new(n.get() - 1) {
                Some(rest) => (Lifecycle::Open(rest), Edge::Unchanged),
                None => (Lifecycle::Closed, Edge::Release),
            },
        }
    }
}
