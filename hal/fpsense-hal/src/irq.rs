//! Interrupt line abstractions

use crate::error::LineError;
use crate::gpio::GpioLine;

/// Interrupt trigger condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Trigger {
    /// Low-to-high transition
    RisingEdge,
    /// High-to-low transition
    FallingEdge,
    /// Level high
    High,
    /// Level low
    Low,
}

/// GPIO line that raises interrupts
///
/// The platform routes the interrupt to the handler registered with
/// [`register`](IrqLine::register). Registration leaves the interrupt
/// unmasked; callers that want it masked must call
/// [`disable`](IrqLine::disable) right after.
///
/// `enable`/`disable` nest on most interrupt controllers, so callers are
/// expected to keep them balanced.
pub trait IrqLine: GpioLine {
    /// Register the interrupt handler
    ///
    /// # Arguments
    /// * `trigger` - Condition that raises the interrupt
    /// * `oneshot` - Keep the line masked until the handler completes
    fn register(&mut self, trigger: Trigger, oneshot: bool) -> Result<(), LineError>;

    /// Unregister the interrupt handler
    fn unregister(&mut self) -> Result<(), LineError>;

    /// Unmask the interrupt
    fn enable(&mut self);

    /// Mask the interrupt
    fn disable(&mut self);

    /// Allow this interrupt to wake the system from suspend
    fn arm_wake(&mut self) -> Result<(), LineError>;

    /// Stop this interrupt from waking the system
    fn disarm_wake(&mut self) -> Result<(), LineError>;
}
