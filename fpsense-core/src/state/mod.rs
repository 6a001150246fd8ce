//! Device state
//!
//! The flag word shared by the interrupt, display and command contexts,
//! and the explicit open/close state machine.

pub mod flags;
pub mod lifecycle;

pub use flags::{DeviceFlags, SharedFlags};
pub use lifecycle::{Edge, Lifecycle};
