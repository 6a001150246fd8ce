//! Core error types

use core::fmt;

/// Hardware resource that failed to be acquired
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Resource {
    ResetLine,
    IrqLine,
    IrqHandler,
    WakeInterrupt,
    CoreClock,
    IfaceClock,
}

/// Errors surfaced by the sensor core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Command word does not carry the sensor magic number
    InvalidCommand,
    /// User buffer not accessible for the declared direction and size
    BufferFault,
    /// Command needs a powered sensor
    NotReady,
    /// Hardware resource request failed; nothing is left acquired
    ResourceAcquisitionFailed(Resource),
    /// No clock rate at or below the target is available
    ClockNoViableRate,
    /// Async subscriber table is full
    SubscriberTableFull,
    /// Device registry has no free minor number
    NoMinorAvailable,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidCommand => f.write_str("invalid command"),
            Error::BufferFault => f.write_str("bad user buffer"),
            Error::NotReady => f.write_str("sensor is powered off"),
            Error::ResourceAcquisitionFailed(resource) => {
                write!(f, "failed to acquire {:?}", resource)
            }
            Error::ClockNoViableRate => f.write_str("no clock rate at or below target"),
            Error::SubscriberTableFull => f.write_str("subscriber table full"),
            Error::NoMinorAvailable => f.write_str("no minor number available"),
        }
    }
}
