//! Open/close resource lifecycle

use embedded_hal_async::delay::DelayNs;
use fpsense_hal::{GpioLine, IrqLine, Trigger};

use super::{Resources, Sensor, Session};
use crate::board::Board;
use crate::config::RESET_LOW_MS;
use crate::error::{Error, Resource};
use crate::state::Edge;

/// How far an acquisition got, in acquisition order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Acquired {
    ResetLine,
    IrqLine,
    Handler,
}

impl<B: Board> Sensor<B> {
    /// Open a session
    ///
    /// The first session acquires the reset and interrupt lines, registers
    /// the interrupt handler masked, arms wake-on-interrupt and resets the
    /// sensor. On failure everything acquired so far is released and the
    /// opener count is unchanged.
    pub async fn open(&self) -> Result<Session, Error> {
        let mut guard = self.hw.lock().await;
        let hw = &mut *guard;

        let (next, edge) = hw.lifecycle.on_open();
        if edge == Edge::Acquire {
            self.acquire(hw).await?;
        }
        hw.lifecycle = next;

        info!("Succeed to open device ({} openers)", next.openers());
        Ok(Session {
            id: self.next_session_id(),
            epoch: hw.epoch,
        })
    }

    /// Close a session
    ///
    /// The session stops receiving async notifications. The last session
    /// releases the hardware and powers the sensor off. A session that
    /// outlived a detach no longer holds the hardware and only unsubscribes.
    pub async fn close(&self, session: Session) {
        self.forget(session.id);

        let mut guard = self.hw.lock().await;
        let hw = &mut *guard;

        if session.epoch != hw.epoch {
            debug!("session {} outlived detach", session.id.0);
            return;
        }

        let (next, edge) = hw.lifecycle.on_close();
        hw.lifecycle = next;
        if edge == Edge::Release {
            self.teardown(hw).await;
        }
    }

    async fn acquire(&self, hw: &mut Resources<B>) -> Result<(), Error> {
        if hw.reset.request("fpsense_reset").is_err() {
            error!("failed to request RESET line");
            return Err(Error::ResourceAcquisitionFailed(Resource::ResetLine));
        }
        if hw.reset.configure_output(false).is_err() {
            error!("failed to configure RESET line");
            self.unwind(hw, Acquired::ResetLine);
            return Err(Error::ResourceAcquisitionFailed(Resource::ResetLine));
        }

        if hw.irq.request("fpsense_irq").is_err() {
            error!("failed to request IRQ line");
            self.unwind(hw, Acquired::ResetLine);
            return Err(Error::ResourceAcquisitionFailed(Resource::IrqLine));
        }
        if hw.irq.configure_input().is_err() {
            error!("failed to configure IRQ line");
            self.unwind(hw, Acquired::IrqLine);
            return Err(Error::ResourceAcquisitionFailed(Resource::IrqLine));
        }

        if hw.irq.register(Trigger::RisingEdge, true).is_err() {
            error!("failed to register interrupt handler");
            self.unwind(hw, Acquired::IrqLine);
            return Err(Error::ResourceAcquisitionFailed(Resource::IrqHandler));
        }

        // Registration unmasks; stay masked until user space asks
        hw.irq.disable();

        if hw.irq.arm_wake().is_err() {
            error!("failed to arm wake interrupt");
            self.unwind(hw, Acquired::Handler);
            return Err(Error::ResourceAcquisitionFailed(Resource::WakeInterrupt));
        }

        Self::hw_reset(hw, self.config.reset_settle_ms).await;

        if !self.config.power_control {
            self.flags.update(|f| f.powered = true);
        }

        Ok(())
    }

    /// Release everything up to and including `acquired`, newest first
    fn unwind(&self, hw: &mut Resources<B>, acquired: Acquired) {
        if acquired >= Acquired::Handler && hw.irq.unregister().is_err() {
            self.teardown_failed("unregister interrupt handler");
        }
        if acquired >= Acquired::IrqLine && hw.irq.release().is_err() {
            self.teardown_failed("release IRQ line");
        }
        if hw.reset.release().is_err() {
            self.teardown_failed("release RESET line");
        }
    }

    /// Release session hardware and power off
    ///
    /// Best effort: a failing step is logged and the rest still run.
    pub(crate) async fn teardown(&self, hw: &mut Resources<B>) {
        self.set_irq(hw, false);

        if hw.irq.disarm_wake().is_err() {
            self.teardown_failed("disarm wake interrupt");
        }
        if hw.irq.unregister().is_err() {
            self.teardown_failed("unregister interrupt handler");
        }
        if hw.irq.release().is_err() {
            self.teardown_failed("release IRQ line");
        }
        if hw.reset.release().is_err() {
            self.teardown_failed("release RESET line");
        }
        if hw
            .rail
            .set_power(&self.flags, false, &mut hw.delay)
            .await
            .is_err()
        {
            self.teardown_failed("power off");
        }
    }

    fn teardown_failed(&self, step: &'static str) {
        warn!("failed to {} while releasing hardware", step);
        self.stats.teardown_failures();
    }

    /// Pulse the reset line: low for at least 3 ms, then high for `settle_ms`
    pub(crate) async fn hw_reset(hw: &mut Resources<B>, settle_ms: u32) {
        info!("performing HW reset");

        if hw.reset.configure_output(false).is_err() {
            warn!("failed to drive RESET low");
        }
        hw.delay.delay_ms(RESET_LOW_MS).await;

        if hw.reset.set_high().is_err() {
            warn!("failed to drive RESET high");
        }
        hw.delay.delay_ms(settle_ms).await;
    }
}
