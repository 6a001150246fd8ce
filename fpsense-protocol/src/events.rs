//! Events broadcast to the user-space service

/// Datagram route identifier handed out by the init command
pub const NETLINK_ROUTE: u8 = 25;

/// Event values sent on the datagram channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NetEvent {
    /// Sensor raised its interrupt line
    Irq,
    /// Host display powered down
    ScreenOff,
    /// Host display powered up
    ScreenOn,
}

// Wire format values
const EVENT_IRQ: u8 = 1;
const EVENT_SCREEN_OFF: u8 = 2;
const EVENT_SCREEN_ON: u8 = 3;

impl NetEvent {
    /// Convert to wire format byte
    pub fn to_byte(self) -> u8 {
        match self {
            NetEvent::Irq => EVENT_IRQ,
            NetEvent::ScreenOff => EVENT_SCREEN_OFF,
            NetEvent::ScreenOn => EVENT_SCREEN_ON,
        }
    }
}
