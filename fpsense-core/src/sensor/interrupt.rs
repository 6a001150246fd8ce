//! Interrupt servicing and IRQ masking

use fpsense_hal::IrqLine;
use fpsense_protocol::NetEvent;

use super::{Resources, Sensor};
use crate::board::Board;
use crate::input::{InputReporter, FINGER_DOWN_KEY};

/// Outcome of an IRQ mask/unmask request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IrqToggle {
    /// Line state changed
    Changed,
    /// Line was already in the requested state; nothing was done
    AlreadySet,
}

impl<B: Board> Sensor<B> {
    /// Service one sensor interrupt
    ///
    /// Never sleeps. In order: refresh the wake-lock, broadcast the IRQ
    /// event, synthesize a finger-down key if one is expected, then signal
    /// async subscribers.
    ///
    /// The expected-finger flag is consumed by every interrupt, whether or
    /// not a key is synthesized.
    pub fn handle_interrupt(&self) {
        debug!("interrupt received");
        self.stats.interrupts();

        self.wake.acquire();
        self.emit(NetEvent::Irq);

        let finger_down = self.flags.update(|f| {
            let fire = f.expect_finger && f.powered && f.screen_blanked;
            f.expect_finger = false;
            fire
        });
        if finger_down {
            self.input.press_and_release(FINGER_DOWN_KEY);
            self.stats.synthetic_keys();
        }

        self.notify_subscribers();
    }

    /// Record the proximity state and mask or unmask the interrupt
    ///
    /// The line is only touched while a session holds the hardware.
    pub async fn set_proximity(&self, blocked: bool) {
        self.flags.update(|f| f.proximity_blocked = blocked);

        let mut guard = self.hw.lock().await;
        if guard.lifecycle.is_open() {
            self.set_irq(&mut guard, !blocked);
        }
    }

    /// Mask or unmask the interrupt line
    ///
    /// A request matching the current state only warns.
    pub(crate) fn set_irq(&self, hw: &mut Resources<B>, enable: bool) -> IrqToggle {
        let changed = self.flags.update(|f| {
            if f.irq_enabled == enable {
                false
            } else {
                f.irq_enabled = enable;
                true
            }
        });

        if !changed {
            warn!("IRQ has been {}", if enable { "enabled" } else { "disabled" });
            self.stats.redundant_irq_toggles();
            return IrqToggle::AlreadySet;
        }

        if enable {
            hw.irq.enable();
        } else {
            hw.irq.disable();
        }
        IrqToggle::Changed
    }
}
