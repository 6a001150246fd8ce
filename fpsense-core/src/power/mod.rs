//! Power and clock control
//!
//! - Power rail switching with settle delay
//! - Core/interface bus clock pair with rollback
//! - Rate search against the provider's discrete rates

pub mod clock;
pub mod rail;

pub use clock::{max_rate_at_most, SpiClocks, MAX_RATE_STEPS};
pub use rail::PowerRail;
