//! Host input device
//!
//! Maps sensor-side keys and gestures onto host key codes and reports them
//! through an [`InputReporter`].

use fpsense_protocol::{KeyPayload, LogicalKey, NavEvent};

/// Host input key codes
pub mod keycode {
    pub const KEY_HOME: u16 = 102;
    pub const KEY_UP: u16 = 103;
    pub const KEY_LEFT: u16 = 105;
    pub const KEY_RIGHT: u16 = 106;
    pub const KEY_DOWN: u16 = 108;
    pub const KEY_VOLUMEDOWN: u16 = 114;
    pub const KEY_VOLUMEUP: u16 = 115;
    pub const KEY_POWER: u16 = 116;
    pub const KEY_MENU: u16 = 139;
    pub const KEY_BACK: u16 = 158;
    pub const KEY_CAMERA: u16 = 212;
    pub const KEY_CHAT: u16 = 216;
    pub const KEY_SEARCH: u16 = 217;
}

use keycode::*;

/// Key synthesized by the first interrupt after the display blanks
pub const FINGER_DOWN_KEY: u16 = KEY_RIGHT;

/// Key codes the input device advertises
#[cfg(not(feature = "nav-events"))]
pub const CAPABILITIES: &[u16] = &[
    KEY_HOME,
    KEY_MENU,
    KEY_BACK,
    KEY_POWER,
    KEY_CAMERA,
    FINGER_DOWN_KEY,
];

/// Key codes the input device advertises
#[cfg(feature = "nav-events")]
pub const CAPABILITIES: &[u16] = &[
    KEY_HOME,
    KEY_MENU,
    KEY_BACK,
    KEY_POWER,
    KEY_UP,
    KEY_DOWN,
    KEY_RIGHT,
    KEY_LEFT,
    KEY_CAMERA,
    KEY_VOLUMEDOWN,
    KEY_VOLUMEUP,
    KEY_SEARCH,
    KEY_CHAT,
];

/// Check if the input device advertises `code`
pub fn is_capable(code: u16) -> bool {
    CAPABILITIES.contains(&code)
}

/// Sink for host input events
///
/// Must be callable from interrupt context.
pub trait InputReporter {
    /// Report a key state change (1 = press, 0 = release)
    fn report_key(&self, code: u16, value: i32);

    /// Mark the end of an event batch
    fn sync(&self);

    /// Report a full press and release of `code`
    fn press_and_release(&self, code: u16) {
        self.report_key(code, 1);
        self.sync();
        self.report_key(code, 0);
        self.sync();
    }
}

impl<T: InputReporter + ?Sized> InputReporter for &T {
    fn report_key(&self, code: u16, value: i32) {
        T::report_key(self, code, value)
    }

    fn sync(&self) {
        T::sync(self)
    }
}

/// Host key code for a logical key
///
/// Raw codes outside the host key range have no code.
pub fn key_code(key: LogicalKey) -> Option<u16> {
    match key {
        LogicalKey::Home => Some(KEY_HOME),
        LogicalKey::Power => Some(KEY_POWER),
        LogicalKey::Camera => Some(KEY_CAMERA),
        other => u16::try_from(other.to_u32()).ok(),
    }
}

/// Report a key event injected from user space
///
/// Power and camera produce a complete click on press and nothing on
/// release. Home forwards the raw value so user space controls press and
/// release. Other keys are only logged.
pub fn inject_key<I: InputReporter + ?Sized>(input: &I, event: &KeyPayload) {
    let Some(code) = key_code(event.key) else {
        warn!(
            "key event with out-of-range key={}, value={}",
            event.key.to_u32(),
            event.value
        );
        return;
    };
    debug!(
        "received key event[{}], key={}, value={}",
        code,
        event.key.to_u32(),
        event.value
    );

    match event.key {
        LogicalKey::Power | LogicalKey::Camera if event.is_press() => {
            input.press_and_release(code);
        }
        LogicalKey::Home => {
            input.report_key(code, event.value);
            input.sync();
        }
        _ => {}
    }
}

/// Host key code for a navigation gesture, `None` for finger presence
pub fn nav_key_code(event: NavEvent) -> Option<u16> {
    match event {
        NavEvent::FingerUp | NavEvent::FingerDown => None,
        NavEvent::Up => Some(KEY_UP),
        NavEvent::Down => Some(KEY_DOWN),
        NavEvent::Left => Some(KEY_LEFT),
        NavEvent::Right => Some(KEY_RIGHT),
        NavEvent::Click => Some(KEY_VOLUMEDOWN),
        NavEvent::Heavy => Some(KEY_CHAT),
        NavEvent::LongPress => Some(KEY_SEARCH),
        NavEvent::DoubleClick => Some(KEY_VOLUMEUP),
    }
}

/// Report a navigation gesture from user space
///
/// Gestures become a press and release of their key. Finger presence
/// pseudo-events and unknown codes are only logged.
pub fn inject_nav<I: InputReporter + ?Sized>(input: &I, raw: u32) {
    let Some(event) = NavEvent::from_u32(raw) else {
        warn!("unknown navigation event: {}", raw);
        return;
    };

    match nav_key_code(event) {
        Some(code) => {
            debug!("nav {:?}", event);
            input.press_and_release(code);
        }
        None => debug!("nav finger {:?}", event),
    }
}
