//! Board-agnostic lifecycle core for the fpsense fingerprint sensor
//!
//! This crate contains everything between the hardware collaborators and
//! the user-space fingerprint service that does not depend on a specific
//! board:
//!
//! - Device flags shared by interrupt, display and command contexts
//! - Reference-counted open/close of the sensor hardware
//! - Interrupt servicing with a timed wake-lock
//! - Display-blank observer arming the finger-down key
//! - Command dispatcher
//! - Power rail and bus clock control
//! - Device registry and diagnostics
//!
//! Events leave through an [`EventFanout`] and key reports through an
//! [`InputReporter`], both supplied by the board.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod board;
pub mod buffer;
pub mod config;
pub mod error;
pub mod fanout;
pub mod input;
pub mod power;
pub mod registry;
pub mod sensor;
pub mod state;
pub mod stats;
pub mod wake;

#[cfg(test)]
mod mock;

pub use board::{Board, SensorParts};
pub use buffer::{NoBuffer, ReadOnly, UserBuffer};
pub use config::SensorConfig;
pub use error::{Error, Resource};
pub use fanout::{EventFanout, SessionId};
pub use input::InputReporter;
pub use registry::{DeviceRegistry, Minor};
pub use sensor::{
    BlankMode, DisplayNotification, IrqToggle, NotificationKind, NotifyResult, Sensor, Session,
};
pub use state::DeviceFlags;
pub use stats::DiagnosticsSnapshot;
