//! Sensor configuration
//!
//! Board-level tunables. Defaults match the reference hardware.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use fpsense_protocol::NETLINK_ROUTE;

/// Driver version reported at attach
pub const VERSION: (u8, u8, u8) = (1, 2, 1);

/// Wake-lock hold time after each interrupt (ms)
pub const WAKELOCK_HOLD_MS: u32 = 2000;

/// Minimum time the reset line is held low (ms)
pub const RESET_LOW_MS: u32 = 3;

/// Maximum concurrent async subscribers
pub const MAX_SUBSCRIBERS: usize = 8;

/// Sensor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SensorConfig {
    /// Wake-lock hold time after each interrupt (ms)
    pub wake_hold_ms: u32,
    /// Settle time after releasing reset (ms)
    pub reset_settle_ms: u32,
    /// Power rail settle time after switching (ms)
    pub power_settle_ms: u32,
    /// Power is switched by the power rail; when false the sensor counts
    /// as powered as soon as it is opened
    pub power_control: bool,
    /// Target bus clock rate (Hz)
    pub spi_clock_target_hz: u64,
    /// Route id returned to user space by the init command
    pub netlink_route: u8,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            wake_hold_ms: WAKELOCK_HOLD_MS,
            reset_settle_ms: RESET_LOW_MS,
            power_settle_ms: 10,
            power_control: false,
            spi_clock_target_hz: 1_000_000,
            netlink_route: NETLINK_ROUTE,
        }
    }
}

impl SensorConfig {
    /// Default configuration with power rail control enabled
    pub fn with_power_control() -> Self {
        Self {
            power_control: true,
            ..Self::default()
        }
    }
}
