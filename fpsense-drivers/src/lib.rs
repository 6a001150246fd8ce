//! Collaborator implementations
//!
//! This crate provides concrete implementations of the traits the
//! fpsense core drives:
//!
//! - Event fanout over embassy-sync channels (broadcast and per-session
//!   signal)
//! - Input reporter queueing key events for the host input stack
//! - GPIO lines over embedded-hal output pins
//! - Clock provider with a fixed rate table

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod clock;
pub mod fanout;
pub mod gpio;
pub mod input;
