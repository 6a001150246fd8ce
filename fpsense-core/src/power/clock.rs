//! Bus clock control
//!
//! The sensor bus is fed by a core clock and an interface clock that are
//! always switched together.

use fpsense_hal::ClockSource;

use crate::error::{Error, Resource};
use crate::state::SharedFlags;

/// Refinement steps allowed in [`max_rate_at_most`]
pub const MAX_RATE_STEPS: u32 = 10;

/// Find the highest rate at or below `target_hz` the clock can produce
///
/// Bisects over the provider's rounding function, starting from the
/// target and halving the step each time the search overshoots, for at
/// most [`MAX_RATE_STEPS`] steps. Fails with [`Error::ClockNoViableRate`]
/// when even the lowest rate exceeds the target.
pub fn max_rate_at_most<C: ClockSource + ?Sized>(clock: &C, target_hz: u64) -> Result<u64, Error> {
    let rounded = clock.round_rate(target_hz);
    if rounded == target_hz {
        return Ok(target_hz);
    }

    let lowest = clock.round_rate(0);
    if lowest > target_hz {
        return Err(Error::ClockNoViableRate);
    }

    let target = target_hz as i64;
    let mut step = (target - lowest as i64) >> 1;
    let mut direction: i64 = -1;
    let mut guess = target;
    let mut nearest_low = lowest;
    let mut steps = MAX_RATE_STEPS;

    while steps > 0 && step != 0 {
        steps -= 1;
        guess += step * direction;
        let current = clock.round_rate(guess.max(0) as u64);

        if current < target_hz && current > nearest_low {
            nearest_low = current;
        }

        // Overshot: reverse and halve
        if (current > target_hz && direction > 0) || (current < target_hz && direction < 0) {
            direction = -direction;
            step >>= 1;
        }
    }

    Ok(nearest_low)
}

/// Core and interface bus clocks
///
/// Both handles are optional; without them clock control is a no-op that
/// always succeeds.
pub struct SpiClocks<C> {
    core: Option<C>,
    iface: Option<C>,
}

impl<C: ClockSource> SpiClocks<C> {
    /// Create the clock pair
    pub fn new(core: Option<C>, iface: Option<C>) -> Self {
        Self { core, iface }
    }

    /// Check if both clocks are present
    pub fn is_controlled(&self) -> bool {
        self.core.is_some() && self.iface.is_some()
    }

    /// Enable both clocks
    ///
    /// Idempotent. If the interface clock fails the core clock is disabled
    /// again and `clock_enabled` stays false.
    pub fn enable(&mut self, flags: &SharedFlags) -> Result<(), Error> {
        if flags.snapshot().clock_enabled {
            return Ok(());
        }

        let (Some(core), Some(iface)) = (self.core.as_mut(), self.iface.as_mut()) else {
            return Ok(());
        };

        if core.enable().is_err() {
            error!("failed to enable core_clk");
            return Err(Error::ResourceAcquisitionFailed(Resource::CoreClock));
        }

        if iface.enable().is_err() {
            error!("failed to enable iface_clk");
            core.disable();
            return Err(Error::ResourceAcquisitionFailed(Resource::IfaceClock));
        }

        flags.update(|f| f.clock_enabled = true);
        Ok(())
    }

    /// Disable both clocks
    ///
    /// Idempotent.
    pub fn disable(&mut self, flags: &SharedFlags) {
        if !flags.snapshot().clock_enabled {
            return;
        }

        if let Some(core) = self.core.as_mut() {
            core.disable();
        }
        if let Some(iface) = self.iface.as_mut() {
            iface.disable();
        }
        flags.update(|f| f.clock_enabled = false);
    }

    /// Program the core clock to the best rate at or below `target_hz`
    ///
    /// Enables the clocks for the duration of the search and leaves them
    /// disabled afterwards. Returns the applied rate, or `None` when clock
    /// control is not configured.
    pub fn configure(&mut self, flags: &SharedFlags, target_hz: u64) -> Result<Option<u64>, Error> {
        if !self.is_controlled() {
            return Ok(None);
        }

        self.enable(flags)?;
        let result = self.apply_rate(target_hz);
        self.disable(flags);

        result.map(Some)
    }

    fn apply_rate(&mut self, target_hz: u64) -> Result<u64, Error> {
        let Some(core) = self.core.as_mut() else {
            return Err(Error::ResourceAcquisitionFailed(Resource::CoreClock));
        };

        let rate = max_rate_at_most(&*core, target_hz).map_err(|e| {
            error!("no match found for requested clock frequency");
            e
        })?;

        core.set_rate(rate).map_err(|_| {
            error!("failed to set clock rate");
            Error::ResourceAcquisitionFailed(Resource::CoreClock)
        })?;

        debug!("bus clock set to {} Hz", rate);
        Ok(rate)
    }

    /// Disable and drop both clock handles
    pub fn release(&mut self, flags: &SharedFlags) {
        self.disable(flags);
        self.core = None;
        self.iface = None;
    }
}
