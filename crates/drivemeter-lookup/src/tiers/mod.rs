//! Live tier implementations.

pub mod common;
pub mod free;
pub mod paid;

pub use free::FreeTierAdapter;
pub use paid::PaidTierAdapter;
