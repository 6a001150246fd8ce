//! GPIO output line
//!
//! Drives the sensor reset or power-enable line from an embedded-hal
//! output pin, optionally through an inverting stage.

use embedded_hal::digital::OutputPin;
use fpsense_hal::{GpioLine, LineError};

/// Output-only line over an embedded-hal pin
///
/// The line must be requested before its level can change. Levels are
/// logical: with `inverted` set, logical high drives the pin low.
pub struct OutputLine<P> {
    pin: P,
    /// If true, logical high = pin LOW
    inverted: bool,
    /// Consumer label while requested
    owner: Option<&'static str>,
    /// Last logical level driven
    high: bool,
}

impl<P: OutputPin> OutputLine<P> {
    /// Create a new output line
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to drive
    /// - `inverted`: If true, the line is active-low
    pub fn new(pin: P, inverted: bool) -> Self {
        Self {
            pin,
            inverted,
            owner: None,
            high: false,
        }
    }

    /// Create an active-high line
    pub fn new_active_high(pin: P) -> Self {
        Self::new(pin, false)
    }

    /// Create an active-low line
    pub fn new_active_low(pin: P) -> Self {
        Self::new(pin, true)
    }

    /// Consumer holding the line, if requested
    pub fn owner(&self) -> Option<&'static str> {
        self.owner
    }

    fn drive(&mut self, high: bool) -> Result<(), LineError> {
        if self.owner.is_none() {
            return Err(LineError::NotRequested);
        }

        let result = if high != self.inverted {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| LineError::Io)?;

        self.high = high;
        Ok(())
    }
}

impl<P: OutputPin> GpioLine for OutputLine<P> {
    fn request(&mut self, label: &'static str) -> Result<(), LineError> {
        if self.owner.is_some() {
            return Err(LineError::Busy);
        }
        self.owner = Some(label);
        Ok(())
    }

    fn release(&mut self) -> Result<(), LineError> {
        self.owner.take().map(|_| ()).ok_or(LineError::NotRequested)
    }

    fn configure_output(&mut self, high: bool) -> Result<(), LineError> {
        self.drive(high)
    }

    fn configure_input(&mut self) -> Result<(), LineError> {
        Err(LineError::InvalidLine)
    }

    fn set_level(&mut self, high: bool) -> Result<(), LineError> {
        self.drive(high)
    }

    fn read_level(&self) -> Result<bool, LineError> {
        Ok(self.high)
    }
}
