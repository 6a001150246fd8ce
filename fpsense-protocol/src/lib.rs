//! fpsense user-space protocol
//!
//! This crate defines the narrow surface between the sensor core and the
//! user-space fingerprint service:
//!
//! - Command identifiers, encoded as ioctl-style words
//! - The payload layouts read from or written to user buffers
//! - The event bytes broadcast on the datagram channel
//!
//! # Command Word
//!
//! ```text
//! ┌───────────┬────────────────┬────────────┬──────────┐
//! │ DIRECTION │ SIZE           │ MAGIC      │ NUMBER   │
//! │ bits 30-31│ bits 16-29     │ bits 8-15  │ bits 0-7 │
//! └───────────┴────────────────┴────────────┴──────────┘
//! ```
//!
//! Direction is seen from user space: `Read` means the core writes into
//! the user buffer, `Write` means the core reads from it.

#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![deny(unsafe_code)]

pub mod command;
pub mod events;
pub mod ioctl;
pub mod payload;

pub use command::{Command, DecodeError};
pub use events::{NetEvent, NETLINK_ROUTE};
pub use ioctl::{CommandId, Direction, MAGIC};
pub use payload::{ChipInfo, KeyPayload, LogicalKey, NavEvent, PayloadError};
