//! Payload layouts exchanged through user buffers
//!
//! All multi-byte fields are little-endian.

/// Key event payload size: `u32` key + `i32` value
pub const KEY_PAYLOAD_SIZE: usize = 8;

/// Chip info payload size: vendor, mode, operation + 5 reserved bytes
pub const CHIP_INFO_SIZE: usize = 8;

/// Navigation event payload size
pub const NAV_EVENT_SIZE: usize = 4;

/// Payload parsing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PayloadError {
    /// Buffer shorter than the payload layout
    TooShort,
}

fn le_u32(bytes: &[u8]) -> Result<u32, PayloadError> {
    let raw: [u8; 4] = bytes
        .get(..4)
        .and_then(|b| b.try_into().ok())
        .ok_or(PayloadError::TooShort)?;
    Ok(u32::from_le_bytes(raw))
}

/// Logical keys reported by the user-space service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogicalKey {
    None,
    Home,
    Power,
    Menu,
    Back,
    Camera,
    /// Any other value, used as a raw key code
    Other(u32),
}

impl LogicalKey {
    /// Parse a logical key from its wire value
    pub fn from_u32(value: u32) -> Self {
        match value {
            0 => LogicalKey::None,
            1 => LogicalKey::Home,
            2 => LogicalKey::Power,
            3 => LogicalKey::Menu,
            4 => LogicalKey::Back,
            5 => LogicalKey::Camera,
            other => LogicalKey::Other(other),
        }
    }

    /// Convert to wire value
    pub fn to_u32(self) -> u32 {
        match self {
            LogicalKey::None => 0,
            LogicalKey::Home => 1,
            LogicalKey::Power => 2,
            LogicalKey::Menu => 3,
            LogicalKey::Back => 4,
            LogicalKey::Camera => 5,
            LogicalKey::Other(raw) => raw,
        }
    }
}

/// Key event injected by the user-space service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyPayload {
    /// Logical key
    pub key: LogicalKey,
    /// 1 = press, 0 = release
    pub value: i32,
}

impl KeyPayload {
    /// Parse from the user buffer bytes
    pub fn parse(bytes: &[u8]) -> Result<Self, PayloadError> {
        if bytes.len() < KEY_PAYLOAD_SIZE {
            return Err(PayloadError::TooShort);
        }
        Ok(Self {
            key: LogicalKey::from_u32(le_u32(&bytes[0..4])?),
            value: le_u32(&bytes[4..8])? as i32,
        })
    }

    /// Encode into the wire layout
    pub fn to_bytes(&self) -> [u8; KEY_PAYLOAD_SIZE] {
        let mut out = [0u8; KEY_PAYLOAD_SIZE];
        out[0..4].copy_from_slice(&self.key.to_u32().to_le_bytes());
        out[4..8].copy_from_slice(&self.value.to_le_bytes());
        out
    }

    /// Returns true for a key press
    pub fn is_press(&self) -> bool {
        self.value == 1
    }
}

/// Chip identification reported by the user-space service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChipInfo {
    pub vendor_id: u8,
    pub mode: u8,
    pub operation: u8,
}

impl ChipInfo {
    /// Parse from the user buffer bytes (reserved bytes are ignored)
    pub fn parse(bytes: &[u8]) -> Result<Self, PayloadError> {
        if bytes.len() < CHIP_INFO_SIZE {
            return Err(PayloadError::TooShort);
        }
        Ok(Self {
            vendor_id: bytes[0],
            mode: bytes[1],
            operation: bytes[2],
        })
    }
}

/// Navigation gestures recognized by the user-space service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NavEvent {
    FingerUp,
    FingerDown,
    Up,
    Down,
    Left,
    Right,
    Click,
    Heavy,
    LongPress,
    DoubleClick,
}

impl NavEvent {
    /// Parse a gesture from its wire value
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            1 => Some(NavEvent::FingerUp),
            2 => Some(NavEvent::FingerDown),
            3 => Some(NavEvent::Up),
            4 => Some(NavEvent::Down),
            5 => Some(NavEvent::Left),
            6 => Some(NavEvent::Right),
            7 => Some(NavEvent::Click),
            8 => Some(NavEvent::Heavy),
            9 => Some(NavEvent::LongPress),
            10 => Some(NavEvent::DoubleClick),
            _ => None,
        }
    }

    /// Parse the raw gesture value from the user buffer bytes
    pub fn parse_raw(bytes: &[u8]) -> Result<u32, PayloadError> {
        le_u32(bytes)
    }
}
