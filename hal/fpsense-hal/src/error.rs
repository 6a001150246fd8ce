//! Errors reported by hardware collaborators

/// Errors from GPIO and interrupt line operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line is already claimed by another consumer
    Busy,
    /// Line number is not valid on this platform
    InvalidLine,
    /// Operation requires the line to be requested first
    NotRequested,
    /// Interrupt controller refused the operation
    IrqUnavailable,
    /// Generic I/O failure
    Io,
}

/// Errors from clock provider operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockError {
    /// Clock could not be prepared or enabled
    EnableFailed,
    /// Requested rate is not supported by the provider
    RateRejected,
}
