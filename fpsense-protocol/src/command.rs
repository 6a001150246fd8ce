//! Sensor command table
//!
//! Commands are decoded from the full command word, so a command number
//! reused with a different size or direction is not recognized.

use crate::ioctl::{CommandId, MAGIC};
use crate::payload::{CHIP_INFO_SIZE, KEY_PAYLOAD_SIZE, NAV_EVENT_SIZE};

// Command words
pub const CMD_INIT: CommandId = CommandId::read(MAGIC, 0, 1);
pub const CMD_EXIT: CommandId = CommandId::none(MAGIC, 1);
pub const CMD_RESET: CommandId = CommandId::none(MAGIC, 2);
pub const CMD_ENABLE_IRQ: CommandId = CommandId::none(MAGIC, 3);
pub const CMD_DISABLE_IRQ: CommandId = CommandId::none(MAGIC, 4);
pub const CMD_ENABLE_SPI_CLK: CommandId = CommandId::write(MAGIC, 5, 4);
pub const CMD_DISABLE_SPI_CLK: CommandId = CommandId::none(MAGIC, 6);
pub const CMD_ENABLE_POWER: CommandId = CommandId::none(MAGIC, 7);
pub const CMD_DISABLE_POWER: CommandId = CommandId::none(MAGIC, 8);
pub const CMD_INPUT_KEY_EVENT: CommandId =
    CommandId::write(MAGIC, 9, KEY_PAYLOAD_SIZE as u16);
pub const CMD_ENTER_SLEEP_MODE: CommandId = CommandId::none(MAGIC, 10);
pub const CMD_GET_FW_INFO: CommandId = CommandId::read(MAGIC, 11, 1);
pub const CMD_REMOVE: CommandId = CommandId::none(MAGIC, 12);
pub const CMD_CHIP_INFO: CommandId = CommandId::write(MAGIC, 13, CHIP_INFO_SIZE as u16);
pub const CMD_NAV_EVENT: CommandId = CommandId::write(MAGIC, 14, NAV_EVENT_SIZE as u16);

/// Command word decoding errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Magic number does not belong to the sensor
    WrongMagic(u8),
}

/// Decoded sensor command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Session start; returns the datagram route id
    Init,
    /// Session end
    Exit,
    /// Pulse the reset line
    Reset,
    /// Unmask the sensor interrupt
    EnableIrq,
    /// Mask the sensor interrupt
    DisableIrq,
    /// Enable the bus clocks
    EnableSpiClock,
    /// Disable the bus clocks
    DisableSpiClock,
    /// Power the sensor on
    EnablePower,
    /// Power the sensor off
    DisablePower,
    /// Inject a key event into the input device
    InputKeyEvent,
    /// Sensor entered sleep mode (informational)
    EnterSleepMode,
    /// Firmware info request (informational)
    GetFwInfo,
    /// Service is being removed (informational)
    Remove,
    /// Chip identification report
    ChipInfo,
    /// Inject a navigation gesture
    NavEvent,
    /// Correct magic, unknown command
    Unsupported(CommandId),
}

impl Command {
    /// Decode a command word
    pub fn decode(id: CommandId) -> Result<Self, DecodeError> {
        if id.magic() != MAGIC {
            return Err(DecodeError::WrongMagic(id.magic()));
        }

        let command = match id {
            CMD_INIT => Command::Init,
            CMD_EXIT => Command::Exit,
            CMD_RESET => Command::Reset,
            CMD_ENABLE_IRQ => Command::EnableIrq,
            CMD_DISABLE_IRQ => Command::DisableIrq,
            CMD_ENABLE_SPI_CLK => Command::EnableSpiClock,
            CMD_DISABLE_SPI_CLK => Command::DisableSpiClock,
            CMD_ENABLE_POWER => Command::EnablePower,
            CMD_DISABLE_POWER => Command::DisablePower,
            CMD_INPUT_KEY_EVENT => Command::InputKeyEvent,
            CMD_ENTER_SLEEP_MODE => Command::EnterSleepMode,
            CMD_GET_FW_INFO => Command::GetFwInfo,
            CMD_REMOVE => Command::Remove,
            CMD_CHIP_INFO => Command::ChipInfo,
            CMD_NAV_EVENT => Command::NavEvent,
            other => Command::Unsupported(other),
        };

        Ok(command)
    }

    /// Command word for this command
    pub fn id(self) -> CommandId {
        match self {
            Command::Init => CMD_INIT,
            Command::Exit => CMD_EXIT,
            Command::Reset => CMD_RESET,
            Command::EnableIrq => CMD_ENABLE_IRQ,
            Command::DisableIrq => CMD_DISABLE_IRQ,
            Command::EnableSpiClock => CMD_ENABLE_SPI_CLK,
            Command::DisableSpiClock => CMD_DISABLE_SPI_CLK,
            Command::EnablePower => CMD_ENABLE_POWER,
            Command::DisablePower => CMD_DISABLE_POWER,
            Command::InputKeyEvent => CMD_INPUT_KEY_EVENT,
            Command::EnterSleepMode => CMD_ENTER_SLEEP_MODE,
            Command::GetFwInfo => CMD_GET_FW_INFO,
            Command::Remove => CMD_REMOVE,
            Command::ChipInfo => CMD_CHIP_INFO,
            Command::NavEvent => CMD_NAV_EVENT,
            Command::Unsupported(id) => id,
        }
    }

    /// Returns true for the commands accepted while the sensor is unpowered
    pub fn is_power_command(&self) -> bool {
        matches!(self, Command::EnablePower | Command::DisablePower)
    }
}
