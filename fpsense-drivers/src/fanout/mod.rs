//! Event fanout implementations

pub mod channel;

pub use channel::{ChannelFanout, EventSubscriber};
