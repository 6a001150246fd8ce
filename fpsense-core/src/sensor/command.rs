//! Command dispatcher

use fpsense_protocol::payload::{CHIP_INFO_SIZE, KEY_PAYLOAD_SIZE};
use fpsense_protocol::{ChipInfo, Command, CommandId, KeyPayload};
#[cfg(feature = "nav-events")]
use fpsense_protocol::{payload::NAV_EVENT_SIZE, NavEvent};

use super::{Sensor, Session};
use crate::board::Board;
use crate::buffer::UserBuffer;
use crate::error::Error;
use crate::input;

/// Check the buffer against the command's declared direction and size
fn check_buffer<U: UserBuffer + ?Sized>(id: CommandId, buf: &U) -> Result<(), Error> {
    let direction = id.direction();
    let ok = if direction.copies_out() {
        buf.writable(id.size())
    } else if direction.copies_in() {
        buf.readable(id.size())
    } else {
        true
    };

    if ok {
        Ok(())
    } else {
        Err(Error::BufferFault)
    }
}

impl<B: Board> Sensor<B> {
    /// Execute one user command
    ///
    /// Checks, in order: the magic number, buffer access for the declared
    /// direction and size, and that the sensor is powered (power commands
    /// excepted). A failed check changes nothing. Unknown commands with the
    /// right magic warn and succeed, as do failures of the hardware a
    /// command delegates to.
    ///
    /// The power check and the command run under the resource mutex, so a
    /// concurrent power-off cannot land between them.
    pub async fn dispatch<U: UserBuffer + ?Sized>(
        &self,
        _session: &Session,
        id: CommandId,
        buf: &mut U,
    ) -> Result<(), Error> {
        let command = Command::decode(id).map_err(|_| Error::InvalidCommand)?;
        check_buffer(id, buf)?;

        let mut guard = self.hw.lock().await;
        let hw = &mut *guard;

        if !command.is_power_command() && !self.flags.powered() {
            debug!("get cmd {} but sensor is powered off", id.nr());
            return Err(Error::NotReady);
        }

        match command {
            Command::Init => {
                debug!("INIT");
                buf.write_from(&[self.config.netlink_route])?;
            }
            Command::Exit => debug!("EXIT"),
            Command::EnableIrq => {
                self.set_irq(hw, true);
            }
            Command::DisableIrq => {
                self.set_irq(hw, false);
            }
            Command::Reset => Self::hw_reset(hw, self.config.reset_settle_ms).await,
            Command::InputKeyEvent => {
                let mut raw = [0u8; KEY_PAYLOAD_SIZE];
                buf.read_into(&mut raw)?;
                let key = KeyPayload::parse(&raw).map_err(|_| Error::BufferFault)?;
                input::inject_key(&self.input, &key);
            }
            Command::NavEvent => self.nav_event(buf)?,
            Command::EnableSpiClock => {
                if let Err(e) = hw.clocks.enable(&self.flags) {
                    error!("failed to enable bus clock: {:?}", e);
                }
            }
            Command::DisableSpiClock => hw.clocks.disable(&self.flags),
            Command::EnablePower | Command::DisablePower => {
                let enable = command == Command::EnablePower;
                if hw
                    .rail
                    .set_power(&self.flags, enable, &mut hw.delay)
                    .await
                    .is_err()
                {
                    error!("failed to switch sensor power");
                }
            }
            Command::EnterSleepMode => debug!("ENTER_SLEEP_MODE"),
            Command::GetFwInfo => debug!("GET_FW_INFO"),
            Command::Remove => debug!("REMOVE"),
            Command::ChipInfo => {
                let mut raw = [0u8; CHIP_INFO_SIZE];
                buf.read_into(&mut raw)?;
                let info = ChipInfo::parse(&raw).map_err(|_| Error::BufferFault)?;
                debug!(
                    "chip info: vendor_id {}, mode {}, operation {}",
                    info.vendor_id,
                    info.mode,
                    info.operation
                );
            }
            Command::Unsupported(id) => {
                warn!("unsupported command: {}", id.raw());
                self.stats.unsupported_commands();
            }
        }

        Ok(())
    }

    #[cfg(feature = "nav-events")]
    fn nav_event<U: UserBuffer + ?Sized>(&self, buf: &mut U) -> Result<(), Error> {
        let mut raw = [0u8; NAV_EVENT_SIZE];
        buf.read_into(&mut raw)?;
        let code = NavEvent::parse_raw(&raw).map_err(|_| Error::BufferFault)?;
        input::inject_nav(&self.input, code);
        Ok(())
    }

    #[cfg(not(feature = "nav-events"))]
    fn nav_event<U: UserBuffer + ?Sized>(&self, _buf: &mut U) -> Result<(), Error> {
        warn!("navigation event is not enabled");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use embassy_futures::join::join;
    use fpsense_protocol::command::*;
    use fpsense_protocol::{LogicalKey, MAGIC};

    use super::super::tests::sensor;
    use super::super::{BlankMode, DisplayNotification};
    use super::*;
    use crate::buffer::{NoBuffer, ReadOnly};
    use crate::config::SensorConfig;
    use crate::input::keycode::{KEY_CAMERA, KEY_POWER};
    use crate::mock::{block_on, HwTrace, MockBoard, Op};
    use crate::state::DeviceFlags;

    fn open(trace: &HwTrace, config: SensorConfig) -> (Sensor<MockBoard>, Session) {
        let dev = sensor(trace, config);
        let session = block_on(dev.open()).unwrap();
        trace.clear();
        (dev, session)
    }

    fn run(dev: &Sensor<MockBoard>, session: &Session, id: CommandId) -> Result<(), Error> {
        block_on(dev.dispatch(session, id, &mut NoBuffer))
    }

    #[test]
    fn test_wrong_magic_is_invalid() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());

        let foreign = CommandId::none(b'x', 3);
        assert_eq!(run(&dev, &session, foreign), Err(Error::InvalidCommand));
        assert!(trace.ops().is_empty());
    }

    #[test]
    fn test_init_writes_route() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());

        let mut out = [0u8; 1];
        block_on(dev.dispatch(&session, CMD_INIT, &mut out[..])).unwrap();
        assert_eq!(out, [25]);
    }

    #[test]
    fn test_init_with_read_only_buffer_faults() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());

        let data = [0u8; 1];
        assert_eq!(
            block_on(dev.dispatch(&session, CMD_INIT, &mut ReadOnly(&data))),
            Err(Error::BufferFault)
        );
    }

    #[test]
    fn test_short_key_buffer_faults_without_side_effects() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());
        let before = dev.flags();

        let data = [0u8; 4];
        assert_eq!(
            block_on(dev.dispatch(&session, CMD_INPUT_KEY_EVENT, &mut ReadOnly(&data))),
            Err(Error::BufferFault)
        );
        assert_eq!(dev.flags(), before);
        assert!(trace.ops().is_empty());
    }

    #[test]
    fn test_unpowered_rejects_all_but_power() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::with_power_control());
        let before = dev.flags();

        for id in [CMD_INIT, CMD_EXIT, CMD_RESET, CMD_ENABLE_IRQ, CMD_DISABLE_IRQ, CMD_ENABLE_SPI_CLK] {
            let mut buf = [0u8; 8];
            assert_eq!(
                block_on(dev.dispatch(&session, id, &mut buf[..])),
                Err(Error::NotReady)
            );
        }
        assert_eq!(dev.flags(), before);
        assert!(trace.ops().is_empty());

        assert_eq!(run(&dev, &session, CMD_DISABLE_POWER), Ok(()));
        assert_eq!(run(&dev, &session, CMD_ENABLE_POWER), Ok(()));
        assert!(dev.flags().powered);
        assert_eq!(trace.count(|op| *op == Op::SetLevel("pwr", true)), 1);
    }

    #[test]
    fn test_power_commands_are_idempotent() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::with_power_control());

        run(&dev, &session, CMD_ENABLE_POWER).unwrap();
        run(&dev, &session, CMD_ENABLE_POWER).unwrap();

        assert_eq!(trace.count(|op| matches!(op, Op::SetLevel("pwr", _))), 1);
    }

    #[test]
    fn test_irq_toggle_warnings() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());

        run(&dev, &session, CMD_ENABLE_IRQ).unwrap();
        run(&dev, &session, CMD_DISABLE_IRQ).unwrap();
        run(&dev, &session, CMD_ENABLE_IRQ).unwrap();
        assert!(dev.flags().irq_enabled);
        assert_eq!(dev.stats().redundant_irq_toggles, 0);

        run(&dev, &session, CMD_ENABLE_IRQ).unwrap();
        assert!(dev.flags().irq_enabled);
        assert_eq!(dev.stats().redundant_irq_toggles, 1);
        assert_eq!(
            trace.ops(),
            std::vec![Op::IrqEnable, Op::IrqDisable, Op::IrqEnable]
        );
    }

    #[test]
    fn test_reset_pulse() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());

        run(&dev, &session, CMD_RESET).unwrap();

        assert_eq!(
            trace.ops(),
            std::vec![
                Op::ConfigureOutput("reset", false),
                Op::Delay(3),
                Op::SetLevel("reset", true),
                Op::Delay(3),
            ]
        );
    }

    #[test]
    fn test_key_injection() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());

        for key in [LogicalKey::Power, LogicalKey::Camera] {
            let payload = KeyPayload { key, value: 1 }.to_bytes();
            block_on(dev.dispatch(&session, CMD_INPUT_KEY_EVENT, &mut ReadOnly(&payload))).unwrap();
        }

        assert_eq!(trace.count(|op| *op == Op::Key(KEY_POWER, 1)), 1);
        assert_eq!(trace.count(|op| *op == Op::Key(KEY_CAMERA, 0)), 1);
    }

    #[test]
    fn test_spi_clock_commands() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());
        let rate = 1_000_000u32.to_le_bytes();

        block_on(dev.dispatch(&session, CMD_ENABLE_SPI_CLK, &mut ReadOnly(&rate))).unwrap();
        assert!(dev.flags().clock_enabled);

        run(&dev, &session, CMD_DISABLE_SPI_CLK).unwrap();
        assert!(!dev.flags().clock_enabled);
        assert_eq!(trace.count(|op| matches!(op, Op::ClockEnable(_))), 2);
    }

    #[test]
    fn test_clock_failure_is_not_returned() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());
        trace.fail_on(Op::ClockEnable("iface"));
        let rate = [0u8; 4];

        assert_eq!(
            block_on(dev.dispatch(&session, CMD_ENABLE_SPI_CLK, &mut ReadOnly(&rate))),
            Ok(())
        );
        assert!(!dev.flags().clock_enabled);
    }

    #[test]
    fn test_chip_info_and_inert_commands() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());
        let info = [0x12, 0x01, 0x02, 0, 0, 0, 0, 0];

        block_on(dev.dispatch(&session, CMD_CHIP_INFO, &mut ReadOnly(&info))).unwrap();
        run(&dev, &session, CMD_ENTER_SLEEP_MODE).unwrap();
        run(&dev, &session, CMD_REMOVE).unwrap();
        run(&dev, &session, CMD_EXIT).unwrap();
        let mut fw = [0u8; 1];
        block_on(dev.dispatch(&session, CMD_GET_FW_INFO, &mut fw[..])).unwrap();

        assert!(trace.ops().is_empty());
    }

    #[test]
    fn test_unknown_command_warns_and_succeeds() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());
        let before = dev.flags();

        assert_eq!(run(&dev, &session, CommandId::none(MAGIC, 99)), Ok(()));
        assert_eq!(dev.flags(), before);
        assert_eq!(dev.stats().unsupported_commands, 1);
    }

    #[test]
    fn test_powered_off_blank_then_command() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::with_power_control());

        dev.on_display_notification(&DisplayNotification::blank(BlankMode::PowerDown));
        assert_eq!(run(&dev, &session, CMD_ENABLE_IRQ), Err(Error::NotReady));
        assert_eq!(dev.flags(), DeviceFlags::CLEAR);
    }

    #[test]
    fn test_power_off_in_flight_blocks_queued_command() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::with_power_control());
        run(&dev, &session, CMD_ENABLE_POWER).unwrap();
        trace.clear();
        trace.yield_on_delay();

        let (off, irq) = block_on(join(
            dev.dispatch(&session, CMD_DISABLE_POWER, &mut NoBuffer),
            dev.dispatch(&session, CMD_ENABLE_IRQ, &mut NoBuffer),
        ));

        assert_eq!(off, Ok(()));
        assert_eq!(irq, Err(Error::NotReady));
        assert_eq!(trace.count(|op| *op == Op::IrqEnable), 0);
        let flags = dev.flags();
        assert!(!flags.powered);
        assert!(!flags.irq_enabled);
    }

    #[cfg(not(feature = "nav-events"))]
    #[test]
    fn test_nav_event_disabled() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());
        let code = 7u32.to_le_bytes();

        block_on(dev.dispatch(&session, CMD_NAV_EVENT, &mut ReadOnly(&code))).unwrap();
        assert!(trace.ops().is_empty());
    }

    #[cfg(feature = "nav-events")]
    #[test]
    fn test_nav_event_enabled() {
        let trace = HwTrace::new();
        let (dev, session) = open(&trace, SensorConfig::default());
        let code = 7u32.to_le_bytes();

        block_on(dev.dispatch(&session, CMD_NAV_EVENT, &mut ReadOnly(&code))).unwrap();
        assert_eq!(
            trace.count(|op| *op == Op::Key(crate::input::keycode::KEY_VOLUMEDOWN, 1)),
            1
        );
    }
}
