//! Device registry
//!
//! Hands out minor numbers to attached sensors. The registry is an
//! explicit object owned by whoever attaches sensors, so independent
//! instances never share state.

use crate::error::Error;

/// Number of minor numbers available
pub const MAX_DEVICES: u8 = 32;

/// Allocated minor number
///
/// Not `Copy`: a minor is handed back exactly once through
/// [`DeviceRegistry::release`].
#[derive(Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Minor(u8);

impl Minor {
    /// Raw minor number
    pub fn get(&self) -> u8 {
        self.0
    }
}

/// Minor number allocator
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    used: u32,
}

impl DeviceRegistry {
    /// Create an empty registry
    pub const fn new() -> Self {
        Self { used: 0 }
    }

    /// Allocate the lowest free minor number
    pub fn allocate(&mut self) -> Result<Minor, Error> {
        let free = (!self.used).trailing_zeros();
        if free >= u32::from(MAX_DEVICES) {
            error!("no minor number available");
            return Err(Error::NoMinorAvailable);
        }

        self.used |= 1 << free;
        Ok(Minor(free as u8))
    }

    /// Return a minor number to the pool
    pub fn release(&mut self, minor: Minor) {
        self.used &= !(1 << minor.0);
    }

    /// Check if a minor number is allocated
    pub fn is_allocated(&self, minor: u8) -> bool {
        minor < MAX_DEVICES && self.used & (1 << minor) != 0
    }

    /// Number of attached devices
    pub fn len(&self) -> usize {
        self.used.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }
}
