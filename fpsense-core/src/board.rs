//! Board binding
//!
//! A [`Board`] names the concrete collaborator types of one hardware
//! design; [`SensorParts`] carries the instances into [`Sensor::new`].
//!
//! [`Sensor::new`]: crate::Sensor::new

use embedded_hal_async::delay::DelayNs;
use fpsense_hal::{ClockSource, GpioLine, IrqLine, Monotonic, WakeSource};

use crate::fanout::EventFanout;
use crate::input::InputReporter;

/// Collaborator types of one board
pub trait Board {
    /// Sensor reset line
    type Reset: GpioLine;
    /// Sensor interrupt line
    type Irq: IrqLine;
    /// Power rail enable line
    type Power: GpioLine;
    /// Bus clock provider
    type Clock: ClockSource;
    /// Sleeping delay for settle times
    type Delay: DelayNs;
    /// Suspend blocker
    type Wake: WakeSource;
    /// Time base for the wake-lock
    type Timer: Monotonic;
    /// Event transport to user space
    type Fanout: EventFanout;
    /// Host input device
    type Input: InputReporter;
}

/// Hardware and transport instances for one sensor
///
/// Lines are handed over unrequested; the sensor claims them on first
/// open. The power line, if any, is expected to be claimed by the board.
pub struct SensorParts<B: Board> {
    pub reset: B::Reset,
    pub irq: B::Irq,
    pub power: Option<B::Power>,
    pub core_clock: Option<B::Clock>,
    pub iface_clock: Option<B::Clock>,
    pub delay: B::Delay,
    pub wake: B::Wake,
    pub timer: B::Timer,
    pub fanout: B::Fanout,
    pub input: B::Input,
}
