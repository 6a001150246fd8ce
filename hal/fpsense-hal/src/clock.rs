//! Clock provider abstractions
//!
//! The sensor bus needs a core clock and an interface clock. Providers only
//! support a discrete set of rates, which is why rate selection goes
//! through [`ClockSource::round_rate`].

use crate::error::ClockError;

/// Gateable clock with discrete rates
pub trait ClockSource {
    /// Prepare and enable the clock
    fn enable(&mut self) -> Result<(), ClockError>;

    /// Disable and unprepare the clock
    fn disable(&mut self);

    /// Rate in Hz the provider would actually produce for `hz`
    fn round_rate(&self, hz: u64) -> u64;

    /// Program the clock rate in Hz
    fn set_rate(&mut self, hz: u64) -> Result<(), ClockError>;
}
