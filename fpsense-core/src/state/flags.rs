//! Device flag word
//!
//! Every flag lives in one `Copy` word behind a critical-section mutex, so
//! a read-modify-write is atomic with respect to the interrupt handler, the
//! display callback and command execution. The lock is never held across a
//! sleep.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

/// Mutable device flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceFlags {
    /// Sensor rail asserted
    pub powered: bool,
    /// Interrupt line unmasked
    pub irq_enabled: bool,
    /// Bus clocks running
    pub clock_enabled: bool,
    /// Host display is off
    pub screen_blanked: bool,
    /// Next interrupt after a blank should wake the host
    pub expect_finger: bool,
    /// Proximity sensor suppresses the interrupt
    pub proximity_blocked: bool,
}

impl DeviceFlags {
    /// All flags cleared
    pub const CLEAR: Self = Self {
        powered: false,
        irq_enabled: false,
        clock_enabled: false,
        screen_blanked: false,
        expect_finger: false,
        proximity_blocked: false,
    };
}

/// Flag word shared between execution contexts
pub struct SharedFlags {
    inner: Mutex<CriticalSectionRawMutex, Cell<DeviceFlags>>,
}

impl Default for SharedFlags {
    fn default() -> Self {
        Self::new()
    }
}

impl SharedFlags {
    /// Create a flag word with everything cleared
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(DeviceFlags::CLEAR)),
        }
    }

    /// Copy of the current flags
    pub fn snapshot(&self) -> DeviceFlags {
        self.inner.lock(|cell| cell.get())
    }

    /// Atomically read-modify-write the flags
    ///
    /// The closure runs inside a critical section and must not block.
    pub fn update<R>(&self, f: impl FnOnce(&mut DeviceFlags) -> R) -> R {
        self.inner.lock(|cell| {
            let mut flags = cell.get();
            let result = f(&mut flags);
            cell.set(flags);
            result
        })
    }

    /// Shorthand for `snapshot().powered`
    pub fn powered(&self) -> bool {
        self.snapshot().powered
    }
}
