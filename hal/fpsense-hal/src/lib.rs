//! fpsense Hardware Abstraction Layer
//!
//! This crate defines the hardware-facing collaborator traits the sensor
//! core drives. Board support code implements them on top of the platform's
//! GPIO, interrupt controller, clock tree and power management.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  fpsense-core (lifecycle, IRQ, display) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fpsense-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ fpsense-      │       │ board support │
//! │   drivers     │       │     code      │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::GpioLine`] - Requestable digital line (reset, power)
//! - [`irq::IrqLine`] - Interrupt-capable line with wake arming
//! - [`clock::ClockSource`] - Bus clock with discrete rate rounding
//! - [`wake::WakeSource`], [`wake::Monotonic`] - Suspend blocking and time
//!
//! Every call is fallible except masking/unmasking, which the platform
//! cannot refuse.

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod error;
pub mod gpio;
pub mod irq;
pub mod wake;

// Re-export key traits at crate root for convenience
pub use clock::ClockSource;
pub use error::{ClockError, LineError};
pub use gpio::GpioLine;
pub use irq::{IrqLine, Trigger};
pub use wake::{Monotonic, WakeSource};
