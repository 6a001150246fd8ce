//! GPIO line abstractions
//!
//! Provides the trait for digital lines that must be claimed before use,
//! such as the sensor reset and power-enable lines.

use crate::error::LineError;

/// Requestable digital line
///
/// A line is claimed with [`request`](GpioLine::request) and handed back
/// with [`release`](GpioLine::release). Level operations on an unclaimed
/// line may fail with [`LineError::NotRequested`].
pub trait GpioLine {
    /// Claim the line for exclusive use
    ///
    /// # Arguments
    /// * `label` - Consumer name recorded by the platform
    fn request(&mut self, label: &'static str) -> Result<(), LineError>;

    /// Release a previously claimed line
    fn release(&mut self) -> Result<(), LineError>;

    /// Configure the line as an output driven to `high`
    fn configure_output(&mut self, high: bool) -> Result<(), LineError>;

    /// Configure the line as an input
    fn configure_input(&mut self) -> Result<(), LineError>;

    /// Drive the line level
    fn set_level(&mut self, high: bool) -> Result<(), LineError>;

    /// Read the current line level
    fn read_level(&self) -> Result<bool, LineError>;

    /// Drive the line high (logic 1)
    fn set_high(&mut self) -> Result<(), LineError> {
        self.set_level(true)
    }

    /// Drive the line low (logic 0)
    fn set_low(&mut self) -> Result<(), LineError> {
        self.set_level(false)
    }
}
