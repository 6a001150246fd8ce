//! Clock provider implementations

pub mod table;

pub use table::TableClock;
