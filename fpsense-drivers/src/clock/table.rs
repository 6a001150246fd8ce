//! Table-driven clock provider
//!
//! For clock trees that can only produce a fixed list of rates, such as a
//! divider chain off a single PLL.

use fpsense_hal::{ClockError, ClockSource};

/// Clock with a fixed, ascending rate table
pub struct TableClock {
    /// Supported rates in Hz, ascending
    rates: &'static [u64],
    rate: u64,
    enabled: bool,
}

impl TableClock {
    /// Create a clock running at the lowest table rate
    ///
    /// `rates` must be sorted ascending.
    pub fn new(rates: &'static [u64]) -> Self {
        Self {
            rates,
            rate: rates.first().copied().unwrap_or(0),
            enabled: false,
        }
    }

    /// Currently programmed rate in Hz
    pub fn rate(&self) -> u64 {
        self.rate
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl ClockSource for TableClock {
    fn enable(&mut self) -> Result<(), ClockError> {
        if self.rates.is_empty() {
            return Err(ClockError::EnableFailed);
        }
        self.enabled = true;
        Ok(())
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    /// Smallest table rate at or above `hz`, or the highest rate
    fn round_rate(&self, hz: u64) -> u64 {
        // Find the first entry at or above the request
        match self.rates.iter().position(|&r| r >= hz) {
            Some(i) => self.rates[i],
            None => self.rates.last().copied().unwrap_or(0),
        }
    }

    fn set_rate(&mut self, hz: u64) -> Result<(), ClockError> {
        if !self.rates.contains(&hz) {
            return Err(ClockError::RateRejected);
        }
        self.rate = hz;
        Ok(())
    }
}
