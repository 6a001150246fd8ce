//! Input reporter implementations

pub mod channel;

pub use channel::{ChannelInput, InputEvent};
