//! Unit conversions between wei, gwei, and ether.

use ethers::types::U256;

/// Convert gwei to wei as u64.
pub fn gwei_to_wei(gwei: f64) -> u64 {
    (gwei * 1e9) as u64
}

/// Lossy conversion for display math.
pub fn wei_to_eth(wei: U256) -> f64 {
    wei.as_u128() as f64 / 1e18
}

/// Cost of `gas` units at `gas_price` wei, in ether.
pub fn gas_cost_eth(gas: u64, gas_price: U256) -> f64 {
    (gas as u128).saturating_mul(gas_price.as_u128()) as f64 / 1e18
}
