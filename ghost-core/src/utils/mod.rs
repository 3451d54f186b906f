//! # Utilities Module
//!
//! Internal utility modules for the ghost-core crate.

pub(crate) mod logger;
pub(crate) mod units;

pub use logger::setup_logger;
pub use units::{gas_cost_eth, gwei_to_wei, wei_to_eth};
