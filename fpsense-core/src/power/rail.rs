//! Sensor power rail

use embedded_hal_async::delay::DelayNs;
use fpsense_hal::{GpioLine, LineError};

use crate::state::SharedFlags;

fn on_off(enable: bool) -> &'static str {
    if enable {
        "on"
    } else {
        "off"
    }
}

/// Power rail controller
///
/// With power control enabled the rail follows the `powered` flag through
/// an optional enable line; without it, switching only updates the flag.
pub struct PowerRail<P> {
    line: Option<P>,
    control: bool,
    settle_ms: u32,
}

impl<P: GpioLine> PowerRail<P> {
    /// Create a power rail controller
    ///
    /// # Arguments
    /// - `line`: Enable line, already requested by the board, if any
    /// - `control`: Whether power is switched at all
    /// - `settle_ms`: Delay after each switch when `control` is set
    pub fn new(line: Option<P>, control: bool, settle_ms: u32) -> Self {
        Self {
            line,
            control,
            settle_ms,
        }
    }

    /// Switch sensor power
    ///
    /// A request matching the current state returns `Ok` without touching
    /// the line. Otherwise the line is driven, the settle delay elapses and
    /// only then is `powered` updated. The flag follows the request even if
    /// driving the line failed; the line error is still returned.
    pub async fn set_power<D: DelayNs>(
        &mut self,
        flags: &SharedFlags,
        enable: bool,
        delay: &mut D,
    ) -> Result<(), LineError> {
        if flags.powered() == enable {
            debug!("sensor has already powered-{}", on_off(enable));
            return Ok(());
        }

        let mut result = Ok(());
        if self.control {
            if let Some(line) = self.line.as_mut() {
                result = line.set_level(enable);
                info!(
                    "set_power({}) {}",
                    on_off(enable),
                    if result.is_ok() { "succeeded" } else { "failed" }
                );
            }
            delay.delay_ms(self.settle_ms).await;
        }

        flags.update(|f| f.powered = enable);
        result
    }
}
